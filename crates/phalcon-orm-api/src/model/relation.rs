//! Relations declared between models.

use serde::{Deserialize, Serialize};

/// The cardinality of a [`RelationDef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// The source table holds the referencing column.
    BelongsTo,
    /// Rows of the target table reference the source table.
    HasMany,
}

/// What the foreign key enforcer does with a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ForeignKeyAction {
    /// Refuse the operation when the relation would be broken.
    #[default]
    Restrict,
    /// Delete the dependent records along with the referenced one (has-many only).
    Cascade,
    /// Do not enforce the relation.
    Ignore,
}

/// A directed edge `(source_table, source_column) -> (target_table, target_column)`.
///
/// For [`RelationKind::BelongsTo`] the source column is the foreign key and the target column
/// the referenced key. For [`RelationKind::HasMany`] the source column is the local key and the
/// target column the foreign key of the dependent table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationDef {
    pub kind: RelationKind,
    pub source_table: &'static str,
    pub source_column: &'static str,
    pub target_table: &'static str,
    pub target_column: &'static str,
    /// Name the relation is known by, defaults to the target table.
    pub alias: Option<&'static str>,
    /// Message reported instead of the default one when the relation is broken.
    pub message: Option<String>,
    pub action: ForeignKeyAction,
}

impl RelationDef {
    /// Declares that `source_table.source_column` references `target_table.target_column`.
    pub fn belongs_to(
        source_table: &'static str,
        source_column: &'static str,
        target_table: &'static str,
        target_column: &'static str,
    ) -> Self {
        Self::new(
            RelationKind::BelongsTo,
            source_table,
            source_column,
            target_table,
            target_column,
        )
    }

    /// Declares that rows of `target_table` reference `source_table.source_column` through
    /// `target_table.target_column`.
    pub fn has_many(
        source_table: &'static str,
        source_column: &'static str,
        target_table: &'static str,
        target_column: &'static str,
    ) -> Self {
        Self::new(
            RelationKind::HasMany,
            source_table,
            source_column,
            target_table,
            target_column,
        )
    }

    fn new(
        kind: RelationKind,
        source_table: &'static str,
        source_column: &'static str,
        target_table: &'static str,
        target_column: &'static str,
    ) -> Self {
        Self {
            kind,
            source_table,
            source_column,
            target_table,
            target_column,
            alias: None,
            message: None,
            action: ForeignKeyAction::default(),
        }
    }

    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn action(mut self, action: ForeignKeyAction) -> Self {
        self.action = action;
        self
    }

    /// Returns the name the relation is known by.
    pub fn name(&self) -> &'static str {
        self.alias.unwrap_or(self.target_table)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_should_declare_belongs_to() {
        let relation = RelationDef::belongs_to("robots_parts", "robots_id", "robots", "id")
            .message("The robot code does not exist");

        assert_eq!(relation.kind, RelationKind::BelongsTo);
        assert_eq!(relation.source_column, "robots_id");
        assert_eq!(relation.action, ForeignKeyAction::Restrict);
        assert_eq!(
            relation.message.as_deref(),
            Some("The robot code does not exist")
        );
        assert_eq!(relation.name(), "robots");
    }

    #[test]
    fn test_should_declare_has_many_with_alias() {
        let relation = RelationDef::has_many("robots", "id", "robots_parts", "robots_id")
            .alias("robotsParts")
            .action(ForeignKeyAction::Cascade);

        assert_eq!(relation.kind, RelationKind::HasMany);
        assert_eq!(relation.name(), "robotsParts");
        assert_eq!(relation.action, ForeignKeyAction::Cascade);
        assert!(relation.message.is_none());
    }
}
