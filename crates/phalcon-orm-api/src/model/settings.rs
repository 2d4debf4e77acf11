//! Global behaviour switches of the models layer.

use serde::{Deserialize, Serialize};

use crate::prelude::{OrmError, OrmResult};

/// Settings applied by the models layer to every save and delete.
///
/// Unspecified fields take their default value when deserialized:
///
/// ```rust
/// use phalcon_orm_api::prelude::ModelSettings;
///
/// let settings = ModelSettings::from_json(r#"{ "exception_on_failed_save": true }"#).unwrap();
/// assert!(settings.exception_on_failed_save);
/// assert!(settings.virtual_foreign_keys);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Check the declared relations on save and delete.
    pub virtual_foreign_keys: bool,
    /// Refuse to save records with null values in non-nullable columns.
    pub not_null_validations: bool,
    /// Report refused saves as errors instead of `false`.
    pub exception_on_failed_save: bool,
    /// Maximum nesting of cascaded deletes.
    pub cascade_depth_limit: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            virtual_foreign_keys: true,
            not_null_validations: true,
            exception_on_failed_save: false,
            cascade_depth_limit: 16,
        }
    }
}

impl ModelSettings {
    /// Loads the settings from a JSON document.
    pub fn from_json(json: &str) -> OrmResult<Self> {
        serde_json::from_str(json).map_err(|e| OrmError::Settings(e.to_string()))
    }
}
