//! Paginated key listing

use crate::api::{field_text, Session};
use crate::page::PageSpec;
use crate::{Result, SalsaError};
use serde_json::Value;

/// Records requested per `getObjects.sjs` call
pub const PAGE_SIZE: usize = 500;

/// Which listed records produce keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFilter {
    /// Every record
    #[default]
    All,

    /// Only records whose `Stage` is `Complete` (sent blasts)
    CompletedOnly,
}

impl KeyFilter {
    fn accepts(&self, row: &Value) -> bool {
        match self {
            Self::All => true,
            Self::CompletedOnly => row.get("Stage").and_then(Value::as_str) == Some("Complete"),
        }
    }
}

impl Session {
    /// Lists every primary key in `spec`'s table, in API order
    ///
    /// Requests `PAGE_SIZE` records at a time starting at offset 0 and stops
    /// at the first batch shorter than `PAGE_SIZE`. A table whose size is an
    /// exact multiple of the page size therefore costs one extra (empty)
    /// request. Filtering never changes the offsets: they advance by the raw
    /// batch length.
    ///
    /// # Errors
    ///
    /// Any transport failure or malformed batch is `SalsaError::Enumeration`;
    /// no partial key set is returned.
    pub async fn list_keys(&self, spec: &PageSpec, filter: KeyFilter) -> Result<Vec<String>> {
        let mut include = spec.include_fields();
        if filter == KeyFilter::CompletedOnly {
            include.push("Stage");
        }
        let include = include.join(",");

        let mut keys = Vec::new();
        let mut offset = 0usize;

        loop {
            let params = [
                ("limit", format!("{},{}", offset, PAGE_SIZE)),
                ("object", spec.table().to_string()),
                ("include", include.clone()),
            ];

            let body = self
                .api_get("getObjects.sjs", &params)
                .await
                .map_err(|e| enumeration_error(spec, e.to_string()))?;

            let batch = body.as_array().ok_or_else(|| {
                enumeration_error(spec, format!("expected a JSON array at offset {}", offset))
            })?;

            for row in batch {
                if !filter.accepts(row) {
                    continue;
                }
                let key = row
                    .get(spec.key_field())
                    .and_then(field_text)
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| {
                        enumeration_error(spec, format!("record without {}", spec.key_field()))
                    })?;
                keys.push(key);
            }

            tracing::debug!(
                "{}: offset {} returned {} records",
                spec.table(),
                offset,
                batch.len()
            );

            offset += batch.len();
            if batch.len() != PAGE_SIZE {
                break;
            }
        }

        Ok(keys)
    }
}

fn enumeration_error(spec: &PageSpec, message: String) -> SalsaError {
    SalsaError::Enumeration {
        table: spec.table().to_string(),
        message,
    }
}
