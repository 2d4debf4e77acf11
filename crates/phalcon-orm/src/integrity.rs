//! This module exposes the referential integrity validators run before saving and deleting records.

mod delete;
mod save;

use phalcon_orm_api::prelude::{Message, MessageType, Record};

pub(crate) use self::delete::dependents_filter;
pub use self::delete::DeleteIntegrityValidator;
pub use self::save::SaveIntegrityValidator;

/// Checks that every non-nullable column of `record` holds a value.
///
/// The primary key is skipped, since the storage may generate it.
/// Every missing field is reported, in column declaration order.
pub fn check_non_nullable_fields(record: &Record) -> Vec<Message> {
    record
        .values()
        .iter()
        .filter(|(col, value)| !col.nullable && !col.primary_key && value.is_null())
        .map(|(col, _)| {
            Message::new(
                MessageType::PresenceOf,
                format!("{} is required", col.name),
                col.name,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {

    use phalcon_orm_api::prelude::Value;

    use super::*;
    use crate::tests::ROBOTS;

    #[test]
    fn test_should_report_every_missing_field() {
        let record = Record::new(ROBOTS);
        let messages = check_non_nullable_fields(&record);

        let fields: Vec<_> = messages.iter().map(Message::field).collect();
        assert_eq!(fields, vec!["name", "type", "year"]);
        assert_eq!(messages[0].kind(), MessageType::PresenceOf);
        assert_eq!(messages[0].message(), "name is required");
    }

    #[test]
    fn test_should_pass_complete_record() {
        let record = Record::from_values(
            ROBOTS,
            [
                ("name", Value::from("Robotina")),
                ("type", Value::from("mechanical")),
                ("year", Value::from(1972)),
            ],
        )
        .unwrap();
        assert!(check_non_nullable_fields(&record).is_empty());
    }
}
