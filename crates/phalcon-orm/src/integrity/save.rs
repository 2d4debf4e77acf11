use phalcon_orm_api::prelude::{
    Filter, ForeignKeyAction, Message, OrmResult, Record, RelationDef, Value,
};

use crate::models_manager::ModelsManager;
use crate::storage::Storage;

/// Integrity validator for save operations.
pub struct SaveIntegrityValidator<'a, S>
where
    S: Storage,
{
    storage: &'a S,
    manager: &'a ModelsManager,
}

impl<'a, S> SaveIntegrityValidator<'a, S>
where
    S: Storage,
{
    /// Creates a new save integrity validator.
    pub fn new(storage: &'a S, manager: &'a ModelsManager) -> Self {
        Self { storage, manager }
    }
}

impl<S> SaveIntegrityValidator<'_, S>
where
    S: Storage,
{
    /// Verify whether the foreign keys of the given record reference existing records.
    ///
    /// The belongs-to relations of the record's table are checked in declaration order and the
    /// first violation is returned. Null values and [`ForeignKeyAction::Ignore`] relations are
    /// not checked.
    pub fn validate(&self, record: &Record) -> OrmResult<Option<Message>> {
        let table = record.table().name;
        for relation in self.manager.belongs_to(table) {
            if relation.action == ForeignKeyAction::Ignore {
                continue;
            }
            let Some(value) = record.get(relation.source_column) else {
                return Ok(Some(self.violation(relation, default_message(relation))));
            };
            if value.is_null() {
                continue;
            }
            if let Some(message) = self.check_relation(relation, value)? {
                return Ok(Some(message));
            }
        }

        Ok(None)
    }

    fn check_relation(&self, relation: &RelationDef, value: &Value) -> OrmResult<Option<Message>> {
        let target_exists = self
            .storage
            .table(relation.target_table)
            .is_some_and(|target| target.column(relation.target_column).is_some());
        if !target_exists {
            return Ok(Some(self.violation(relation, default_message(relation))));
        }

        let filter = Filter::eq(relation.target_column, value.clone());
        if self.storage.exists(relation.target_table, &filter)? {
            return Ok(None);
        }

        let text = relation
            .message
            .clone()
            .unwrap_or_else(|| default_message(relation));
        Ok(Some(self.violation(relation, text)))
    }

    fn violation(&self, relation: &RelationDef, text: String) -> Message {
        tracing::warn!(
            table = relation.source_table,
            relation = relation.name(),
            field = relation.source_column,
            referenced = relation.target_table,
            "foreign key violation on save: {text}"
        );
        Message::constraint_violation(text, relation.source_column)
    }
}

fn default_message(relation: &RelationDef) -> String {
    format!(
        "Value of field \"{}\" does not exist on referenced table",
        relation.source_column
    )
}

#[cfg(test)]
mod tests {

    use phalcon_orm_api::prelude::MessageType;

    use super::*;
    use crate::tests::{ROBOTS_PARTS, ROBOTTERS_DELES, load_fixtures, models_manager};

    fn robots_part(robots_id: i64, parts_id: i64) -> Record {
        Record::from_values(
            ROBOTS_PARTS,
            [
                ("robots_id", Value::from(robots_id)),
                ("parts_id", Value::from(parts_id)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_should_pass_existing_references() {
        let storage = load_fixtures();
        let manager = models_manager();
        let validator = SaveIntegrityValidator::new(&storage, &manager);

        assert_eq!(validator.validate(&robots_part(1, 1)).unwrap(), None);
    }

    #[test]
    fn test_should_report_default_message_for_missing_part() {
        let storage = load_fixtures();
        let manager = models_manager();
        let validator = SaveIntegrityValidator::new(&storage, &manager);

        let message = validator
            .validate(&robots_part(1, 100))
            .unwrap()
            .expect("should fail");
        assert_eq!(
            message,
            Message::constraint_violation(
                "Value of field \"parts_id\" does not exist on referenced table",
                "parts_id",
            )
        );
        assert_eq!(message.kind(), MessageType::ConstraintViolation);
    }

    #[test]
    fn test_should_report_custom_message_for_missing_robot() {
        let storage = load_fixtures();
        let manager = models_manager();
        let validator = SaveIntegrityValidator::new(&storage, &manager);

        // both references are broken; the first declared relation wins
        let message = validator
            .validate(&robots_part(100, 100))
            .unwrap()
            .expect("should fail");
        assert_eq!(
            message,
            Message::constraint_violation("The robot code does not exist", "robots_id")
        );
    }

    #[test]
    fn test_should_check_renamed_columns() {
        let storage = load_fixtures();
        let manager = models_manager();
        let validator = SaveIntegrityValidator::new(&storage, &manager);

        let record = Record::from_values(
            ROBOTTERS_DELES,
            [
                ("robottersCode", Value::from(1)),
                ("delesCode", Value::from(100)),
            ],
        )
        .unwrap();
        assert_eq!(
            validator.validate(&record).unwrap(),
            Some(Message::constraint_violation(
                "Value of field \"delesCode\" does not exist on referenced table",
                "delesCode",
            ))
        );

        let record = Record::from_values(
            ROBOTTERS_DELES,
            [
                ("robottersCode", Value::from(100)),
                ("delesCode", Value::from(1)),
            ],
        )
        .unwrap();
        assert_eq!(
            validator.validate(&record).unwrap(),
            Some(Message::constraint_violation(
                "The robotters code does not exist",
                "robottersCode",
            ))
        );
    }

    #[test]
    fn test_should_skip_null_references() {
        let storage = load_fixtures();
        let manager = models_manager();
        let validator = SaveIntegrityValidator::new(&storage, &manager);

        let record = Record::from_values(ROBOTS_PARTS, [("parts_id", Value::from(1))]).unwrap();
        assert_eq!(validator.validate(&record).unwrap(), None);
    }

    #[test]
    fn test_should_skip_ignored_relations() {
        let storage = load_fixtures();
        let manager = ModelsManager::new().with_relation(
            RelationDef::belongs_to("robots_parts", "parts_id", "parts", "id")
                .action(ForeignKeyAction::Ignore),
        );
        let validator = SaveIntegrityValidator::new(&storage, &manager);

        assert_eq!(validator.validate(&robots_part(1, 100)).unwrap(), None);
    }

    #[test]
    fn test_should_report_misconfigured_relation() {
        let storage = load_fixtures();
        let manager = ModelsManager::new()
            .with_relation(
                RelationDef::belongs_to("robots_parts", "robots_id", "androids", "id")
                    .message("The robot code does not exist"),
            )
            .with_relation(RelationDef::belongs_to(
                "robots_parts",
                "parts_id",
                "parts",
                "code",
            ));
        let validator = SaveIntegrityValidator::new(&storage, &manager);

        assert_eq!(
            validator.validate(&robots_part(1, 1)).unwrap(),
            Some(Message::constraint_violation(
                "Value of field \"robots_id\" does not exist on referenced table",
                "robots_id",
            ))
        );

        let manager = ModelsManager::new().with_relation(RelationDef::belongs_to(
            "robots_parts",
            "parts_id",
            "parts",
            "code",
        ));
        let validator = SaveIntegrityValidator::new(&storage, &manager);
        assert_eq!(
            validator.validate(&robots_part(1, 1)).unwrap(),
            Some(Message::constraint_violation(
                "Value of field \"parts_id\" does not exist on referenced table",
                "parts_id",
            ))
        );
    }
}
