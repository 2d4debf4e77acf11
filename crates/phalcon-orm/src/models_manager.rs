use phalcon_orm_api::prelude::{RelationDef, RelationKind};

/// Registry of the relations declared between models.
///
/// Relations are declared once, while the models are defined, and are only read afterwards.
/// The manager is passed explicitly to every component which needs it.
#[derive(Debug, Clone, Default)]
pub struct ModelsManager {
    relations: Vec<RelationDef>,
}

impl ModelsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a relation.
    pub fn add_relation(&mut self, relation: RelationDef) {
        self.relations.push(relation);
    }

    /// Declares a relation, builder style.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.add_relation(relation);
        self
    }

    /// Returns the belongs-to relations declared on `table`, in declaration order.
    pub fn belongs_to<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a RelationDef> + 'a {
        self.declared_on(table, RelationKind::BelongsTo)
    }

    /// Returns the has-many relations declared on `table`, in declaration order.
    pub fn has_many<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a RelationDef> + 'a {
        self.declared_on(table, RelationKind::HasMany)
    }

    fn declared_on<'a>(
        &'a self,
        table: &'a str,
        kind: RelationKind,
    ) -> impl Iterator<Item = &'a RelationDef> + 'a {
        self.relations
            .iter()
            .filter(move |relation| relation.kind == kind && relation.source_table == table)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_should_lookup_relations_in_declaration_order() {
        let manager = ModelsManager::new()
            .with_relation(RelationDef::belongs_to(
                "robots_parts",
                "robots_id",
                "robots",
                "id",
            ))
            .with_relation(RelationDef::has_many("robots", "id", "robots_parts", "robots_id"))
            .with_relation(RelationDef::belongs_to(
                "robots_parts",
                "parts_id",
                "parts",
                "id",
            ));

        let belongs_to: Vec<_> = manager
            .belongs_to("robots_parts")
            .map(|relation| relation.source_column)
            .collect();
        assert_eq!(belongs_to, vec!["robots_id", "parts_id"]);

        let has_many: Vec<_> = manager
            .has_many("robots")
            .map(|relation| relation.target_table)
            .collect();
        assert_eq!(has_many, vec!["robots_parts"]);

        assert_eq!(manager.has_many("robots_parts").count(), 0);
    }
}
