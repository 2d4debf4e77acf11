use phalcon_orm_api::prelude::{
    AggregateKind, AggregateResult, AggregateSpec, Filter, ForeignKeyAction, Message,
    ModelSettings, OrmError, OrmResult, QueryError, Record, RelationDef, TableDef, Value,
};

use crate::aggregate::AggregateEvaluator;
use crate::integrity::{self, DeleteIntegrityValidator, SaveIntegrityValidator};
use crate::models_manager::ModelsManager;
use crate::storage::Storage;

/// Persistence facade of the models layer.
///
/// Every dependency (storage, relations and settings) is provided explicitly on construction.
#[derive(Debug)]
pub struct Model<S>
where
    S: Storage,
{
    storage: S,
    manager: ModelsManager,
    settings: ModelSettings,
}

impl<S> Model<S>
where
    S: Storage,
{
    pub fn new(storage: S, manager: ModelsManager, settings: ModelSettings) -> Self {
        Self {
            storage,
            manager,
            settings,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn manager(&self) -> &ModelsManager {
        &self.manager
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Returns every record of `table` matching `filter`.
    pub fn find(&self, table: &str, filter: Option<&Filter>) -> OrmResult<Vec<Record>> {
        let def = self.table(table)?;
        self.storage
            .select(table, filter)?
            .into_iter()
            .map(|row| Record::from_row(def, row))
            .collect()
    }

    /// Returns the first record of `table` matching `filter`.
    pub fn find_first(&self, table: &str, filter: Option<&Filter>) -> OrmResult<Option<Record>> {
        let def = self.table(table)?;
        let row = self.storage.select(table, filter)?.into_iter().next();
        row.map(|row| Record::from_row(def, row)).transpose()
    }

    /// Saves the record, inserting it when its primary key is not stored yet and updating it
    /// otherwise.
    ///
    /// Returns `Ok(false)` when the record fails validation; the violations can be read from
    /// [`Record::messages`] and nothing is written to the storage. With
    /// [`ModelSettings::exception_on_failed_save`] an [`OrmError::Constraint`] is returned instead.
    ///
    /// On insert, a primary key generated by the storage is written back to the record.
    pub fn save(&mut self, record: &mut Record) -> OrmResult<bool> {
        record.clear_messages();

        let mut messages = Vec::new();
        if self.settings.not_null_validations {
            messages = integrity::check_non_nullable_fields(record);
        }
        if messages.is_empty() && self.settings.virtual_foreign_keys {
            let validator = SaveIntegrityValidator::new(&self.storage, &self.manager);
            messages.extend(validator.validate(record)?);
        }
        if !messages.is_empty() {
            return self.save_failed(record, messages);
        }

        let table = *record.table();
        let existing = match record.primary_key_value() {
            Some(pk) => {
                let filter = Filter::eq(table.primary_key, pk.clone());
                self.storage.exists(table.name, &filter)?.then_some(filter)
            }
            None => None,
        };

        match existing {
            Some(filter) => {
                tracing::debug!(table = table.name, "updating record");
                self.storage.update(table.name, &filter, record.to_row())?;
            }
            None => {
                tracing::debug!(table = table.name, "inserting record");
                let primary_key = table.primary_key;
                let stored = self.storage.insert(table.name, record.to_row())?;
                if let Some((_, pk)) = stored.into_iter().find(|(col, _)| col.name == primary_key) {
                    record.set(primary_key, pk)?;
                }
            }
        }

        Ok(true)
    }

    fn save_failed(&self, record: &mut Record, messages: Vec<Message>) -> OrmResult<bool> {
        for message in &messages {
            record.append_message(message.clone());
        }
        if self.settings.exception_on_failed_save {
            return Err(OrmError::Constraint(messages));
        }
        Ok(false)
    }

    /// Deletes the record, along with the dependents of its cascaded relations.
    ///
    /// Returns `Ok(false)` when the record, or one of the cascaded dependents, is still
    /// referenced; the violation can be read from [`Record::messages`]. The whole delete is
    /// atomic: nothing is removed from the storage unless every step succeeds.
    pub fn delete(&mut self, record: &mut Record) -> OrmResult<bool> {
        record.clear_messages();
        if record.primary_key_value().is_none() {
            return Err(QueryError::MissingPrimaryKey(record.table().name.to_string()).into());
        }

        self.storage.begin();
        match self.delete_record(record, 0) {
            Ok(None) => {
                self.storage.commit()?;
                Ok(true)
            }
            Ok(Some(message)) => {
                tracing::debug!(table = record.table().name, "rolling back delete");
                self.storage.rollback()?;
                record.append_message(message);
                Ok(false)
            }
            Err(err) => {
                tracing::debug!(table = record.table().name, "rolling back delete: {err}");
                self.storage.rollback()?;
                Err(err)
            }
        }
    }

    /// Deletes `record` and its cascaded dependents, returning the first violation met.
    fn delete_record(&mut self, record: &Record, depth: usize) -> OrmResult<Option<Message>> {
        if depth > self.settings.cascade_depth_limit {
            return Err(QueryError::InvalidQuery(format!(
                "cascade depth limit of {} exceeded",
                self.settings.cascade_depth_limit
            ))
            .into());
        }

        let table = record.table();
        if self.settings.virtual_foreign_keys {
            let validator = DeleteIntegrityValidator::new(&self.storage, &self.manager);
            if let Some(message) = validator.validate(record)? {
                return Ok(Some(message));
            }

            let cascades: Vec<RelationDef> = self
                .manager
                .has_many(table.name)
                .filter(|relation| relation.action == ForeignKeyAction::Cascade)
                .cloned()
                .collect();
            for relation in &cascades {
                if let Some(message) = self.delete_dependents(relation, record, depth)? {
                    return Ok(Some(message));
                }
            }
        }

        let pk = record
            .primary_key_value()
            .cloned()
            .ok_or_else(|| QueryError::MissingPrimaryKey(table.name.to_string()))?;
        self.storage.delete(table.name, &Filter::eq(table.primary_key, pk))?;
        Ok(None)
    }

    fn delete_dependents(
        &mut self,
        relation: &RelationDef,
        record: &Record,
        depth: usize,
    ) -> OrmResult<Option<Message>> {
        let Some(filter) = integrity::dependents_filter(relation, record)? else {
            return Ok(None);
        };
        let def = self.table(relation.target_table)?;
        let rows = self.storage.select(def.name, Some(&filter))?;
        tracing::debug!(
            table = relation.source_table,
            dependents = relation.target_table,
            count = rows.len(),
            "cascading delete"
        );

        for row in rows {
            let dependent = Record::from_row(def, row)?;
            if let Some(message) = self.delete_record(&dependent, depth + 1)? {
                return Ok(Some(message));
            }
        }
        Ok(None)
    }

    /// Counts the rows of `table`; see [`AggregateEvaluator::evaluate`].
    pub fn count(&self, table: &str, spec: &AggregateSpec) -> OrmResult<AggregateResult> {
        self.aggregate(table, spec, AggregateKind::Count)
    }

    pub fn sum(&self, table: &str, spec: &AggregateSpec) -> OrmResult<AggregateResult> {
        self.aggregate(table, spec, AggregateKind::Sum)
    }

    pub fn average(&self, table: &str, spec: &AggregateSpec) -> OrmResult<AggregateResult> {
        self.aggregate(table, spec, AggregateKind::Average)
    }

    pub fn minimum(&self, table: &str, spec: &AggregateSpec) -> OrmResult<AggregateResult> {
        self.aggregate(table, spec, AggregateKind::Minimum)
    }

    pub fn maximum(&self, table: &str, spec: &AggregateSpec) -> OrmResult<AggregateResult> {
        self.aggregate(table, spec, AggregateKind::Maximum)
    }

    /// Computes an ungrouped aggregate, returning its value.
    pub fn aggregate_scalar(
        &self,
        table: &str,
        spec: &AggregateSpec,
        kind: AggregateKind,
    ) -> OrmResult<Value> {
        match self.aggregate(table, spec, kind)? {
            AggregateResult::Scalar(value) => Ok(value),
            AggregateResult::Rows(_) => Err(QueryError::InvalidQuery(
                "grouped aggregate has no scalar value".to_string(),
            )
            .into()),
        }
    }

    fn aggregate(
        &self,
        table: &str,
        spec: &AggregateSpec,
        kind: AggregateKind,
    ) -> OrmResult<AggregateResult> {
        AggregateEvaluator::new(&self.storage).evaluate(table, spec, kind)
    }

    fn table(&self, name: &str) -> OrmResult<TableDef> {
        self.storage
            .table(name)
            .ok_or_else(|| QueryError::TableNotFound(name.to_string()).into())
    }
}
