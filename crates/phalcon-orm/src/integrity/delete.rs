use phalcon_orm_api::prelude::{
    Filter, ForeignKeyAction, Message, OrmResult, QueryError, Record, RelationDef, TableDef,
};

use crate::models_manager::ModelsManager;
use crate::storage::Storage;

/// Integrity validator for delete operations.
pub struct DeleteIntegrityValidator<'a, S>
where
    S: Storage,
{
    storage: &'a S,
    manager: &'a ModelsManager,
}

impl<'a, S> DeleteIntegrityValidator<'a, S>
where
    S: Storage,
{
    /// Creates a new delete integrity validator.
    pub fn new(storage: &'a S, manager: &'a ModelsManager) -> Self {
        Self { storage, manager }
    }
}

impl<S> DeleteIntegrityValidator<'_, S>
where
    S: Storage,
{
    /// Verify whether the given record can be deleted.
    ///
    /// A record can be deleted when no [`ForeignKeyAction::Restrict`] has-many relation of its
    /// table has dependent rows. The first violation is returned, following the declaration
    /// order of the relations. Cascaded relations are checked for a valid configuration only,
    /// their dependents are deleted by the caller.
    pub fn validate(&self, record: &Record) -> OrmResult<Option<Message>> {
        for relation in self
            .manager
            .has_many(record.table().name)
            .filter(|relation| relation.action != ForeignKeyAction::Ignore)
        {
            let Some(dependent) = self.dependent_table(relation, record) else {
                return Ok(Some(self.violation(relation, misconfigured_message(relation))));
            };
            if relation.action != ForeignKeyAction::Restrict {
                continue;
            }
            let Some(filter) = dependents_filter(relation, record)? else {
                continue;
            };
            if !self.storage.exists(relation.target_table, &filter)? {
                continue;
            }

            let text = relation
                .message
                .clone()
                .unwrap_or_else(|| format!("Record is referenced by model {}", dependent.model));
            return Ok(Some(self.violation(relation, text)));
        }

        Ok(None)
    }

    /// Resolves the dependent table of `relation`, if both ends of the relation exist.
    fn dependent_table(&self, relation: &RelationDef, record: &Record) -> Option<TableDef> {
        record.table().column(relation.source_column)?;
        self.storage
            .table(relation.target_table)
            .filter(|dependent| dependent.column(relation.target_column).is_some())
    }

    fn violation(&self, relation: &RelationDef, text: String) -> Message {
        tracing::warn!(
            table = relation.source_table,
            relation = relation.name(),
            field = relation.source_column,
            referencing = relation.target_table,
            "foreign key violation on delete: {text}"
        );
        Message::constraint_violation(text, relation.source_column)
    }
}

fn misconfigured_message(relation: &RelationDef) -> String {
    format!(
        "Relation \"{}\" of field \"{}\" references a missing table or column",
        relation.name(),
        relation.source_column
    )
}

/// Returns the filter selecting the rows which reference `record` through `relation`.
///
/// Returns `None` when the local key of the record is null, since nothing can reference it.
pub(crate) fn dependents_filter(
    relation: &RelationDef,
    record: &Record,
) -> OrmResult<Option<Filter>> {
    let value = record
        .get(relation.source_column)
        .ok_or_else(|| QueryError::UnknownColumn(relation.source_column.to_string()))?;
    if value.is_null() {
        return Ok(None);
    }

    Ok(Some(Filter::eq(relation.target_column, value.clone())))
}

#[cfg(test)]
mod tests {

    use phalcon_orm_api::prelude::Value;

    use super::*;
    use crate::tests::{DELES, PARTS, ROBOTS, ROBOTTERS, load_fixtures, models_manager};

    fn first<S: Storage>(storage: &S, table: phalcon_orm_api::prelude::TableDef) -> Record {
        let row = storage
            .select(table.name, None)
            .unwrap()
            .into_iter()
            .next()
            .expect("table should not be empty");
        Record::from_row(table, row).unwrap()
    }

    #[test]
    fn test_should_report_generic_message() {
        let storage = load_fixtures();
        let manager = models_manager();
        let validator = DeleteIntegrityValidator::new(&storage, &manager);

        let robot = first(&storage, ROBOTS);
        assert_eq!(
            validator.validate(&robot).unwrap(),
            Some(Message::constraint_violation(
                "Record is referenced by model Phalcon\\Test\\Models\\RobotsParts",
                "id",
            ))
        );
    }

    #[test]
    fn test_should_report_custom_message() {
        let storage = load_fixtures();
        let manager = models_manager();
        let validator = DeleteIntegrityValidator::new(&storage, &manager);

        let part = first(&storage, PARTS);
        assert_eq!(
            validator.validate(&part).unwrap(),
            Some(Message::constraint_violation(
                "Parts cannot be deleted because is referenced by a Robot",
                "id",
            ))
        );
    }

    #[test]
    fn test_should_report_renamed_local_key() {
        let storage = load_fixtures();
        let manager = models_manager();
        let validator = DeleteIntegrityValidator::new(&storage, &manager);

        let robotter = first(&storage, ROBOTTERS);
        assert_eq!(
            validator.validate(&robotter).unwrap(),
            Some(Message::constraint_violation(
                "Record is referenced by model Phalcon\\Test\\Models\\RobottersDeles",
                "code",
            ))
        );

        let dele = first(&storage, DELES);
        assert_eq!(
            validator.validate(&dele).unwrap(),
            Some(Message::constraint_violation(
                "Deles cannot be deleted because is referenced by a Robotter",
                "code",
            ))
        );
    }

    #[test]
    fn test_should_pass_unreferenced_record() {
        let storage = load_fixtures();
        let manager = models_manager();
        let validator = DeleteIntegrityValidator::new(&storage, &manager);

        let mut robot = first(&storage, ROBOTS);
        robot.set("id", 3).unwrap();
        assert_eq!(validator.validate(&robot).unwrap(), None);
    }

    #[test]
    fn test_should_not_check_cascade_relations() {
        let storage = load_fixtures();
        let manager = ModelsManager::new().with_relation(
            RelationDef::has_many("robots", "id", "robots_parts", "robots_id")
                .action(ForeignKeyAction::Cascade),
        );
        let validator = DeleteIntegrityValidator::new(&storage, &manager);

        assert_eq!(validator.validate(&first(&storage, ROBOTS)).unwrap(), None);
    }

    #[test]
    fn test_should_report_unknown_dependent_table() {
        let storage = load_fixtures();
        let manager = ModelsManager::new().with_relation(
            RelationDef::has_many("robots", "id", "androids", "robots_id").alias("androidParts"),
        );
        let validator = DeleteIntegrityValidator::new(&storage, &manager);

        assert_eq!(
            validator.validate(&first(&storage, ROBOTS)).unwrap(),
            Some(Message::constraint_violation(
                "Relation \"androidParts\" of field \"id\" references a missing table or column",
                "id",
            ))
        );
    }

    #[test]
    fn test_should_report_unknown_relation_columns() {
        let storage = load_fixtures();
        let robot = first(&storage, ROBOTS);

        let manager = ModelsManager::new().with_relation(RelationDef::has_many(
            "robots",
            "id",
            "robots_parts",
            "robot_code",
        ));
        let validator = DeleteIntegrityValidator::new(&storage, &manager);
        assert_eq!(
            validator.validate(&robot).unwrap(),
            Some(Message::constraint_violation(
                "Relation \"robots_parts\" of field \"id\" references a missing table or column",
                "id",
            ))
        );

        let manager = ModelsManager::new().with_relation(
            RelationDef::has_many("robots", "code", "robots_parts", "robots_id")
                .action(ForeignKeyAction::Cascade),
        );
        let validator = DeleteIntegrityValidator::new(&storage, &manager);
        assert_eq!(
            validator.validate(&robot).unwrap(),
            Some(Message::constraint_violation(
                "Relation \"robots_parts\" of field \"code\" references a missing table or column",
                "code",
            ))
        );
    }

    #[test]
    fn test_should_report_misconfiguration_regardless_of_data() {
        let mut storage = load_fixtures();
        storage
            .delete("robots_parts", &Filter::not_null("id"))
            .unwrap();
        let manager = ModelsManager::new().with_relation(RelationDef::has_many(
            "robots",
            "id",
            "robots_parts",
            "robot_code",
        ));
        let validator = DeleteIntegrityValidator::new(&storage, &manager);

        assert!(validator.validate(&first(&storage, ROBOTS)).unwrap().is_some());
    }

    #[test]
    fn test_should_build_dependents_filter() {
        let relation = RelationDef::has_many("robots", "id", "robots_parts", "robots_id");
        let robot = Record::from_values(ROBOTS, [("id", Value::from(1))]).unwrap();
        assert_eq!(
            dependents_filter(&relation, &robot).unwrap(),
            Some(Filter::eq("robots_id", 1))
        );
        assert_eq!(
            dependents_filter(&relation, &Record::new(ROBOTS)).unwrap(),
            None
        );
    }
}
