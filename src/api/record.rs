//! Single record retrieval

use crate::api::{field_text, Session};
use crate::page::{PageSpec, Record};
use crate::{Result, SalsaError};

impl Session {
    /// Fetches the key, title and date fields of one record
    ///
    /// The title field must be present. The date field may be missing or
    /// null, which reads as an empty string (an undated record).
    ///
    /// # Errors
    ///
    /// Transport failures and malformed bodies are `SalsaError::Record`,
    /// which is fatal to the run.
    pub async fn get_record(&self, spec: &PageSpec, key: &str) -> Result<Record> {
        let include = spec.include_fields();
        let params = [
            ("key", key.to_string()),
            ("object", spec.table().to_string()),
            ("include", include.join(",")),
        ];

        let record_error = |message: String| SalsaError::Record {
            table: spec.table().to_string(),
            key: key.to_string(),
            message,
        };

        let body = self
            .api_get("getObject.sjs", &params)
            .await
            .map_err(|e| record_error(e.to_string()))?;

        let object = body
            .as_object()
            .ok_or_else(|| record_error(format!("expected a JSON object, got {}", body)))?;

        let mut record = Record::new();
        for field in include {
            match object.get(field).map(field_text) {
                Some(Some(text)) => record.insert(field, text),
                Some(None) => {
                    return Err(record_error(format!("{} is not a scalar", field)));
                }
                None if field == spec.title_field() => {
                    return Err(record_error(format!("missing {}", field)));
                }
                None => record.insert(field, ""),
            }
        }

        Ok(record)
    }
}
