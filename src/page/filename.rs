//! Deterministic output filenames
//!
//! Layout: `{dir}/{table}/{date}{ optional " "+key } {title}.{ext}`. When the
//! record has a creation date the key follows it after a space; otherwise the
//! filename starts with the key.

use crate::page::{PageSpec, Record};
use crate::SalsaError;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Date layout used by Salsa Classic, after the leading weekday and the
/// " GMT..." suffix are removed
const SALSA_DATE_FORMAT: &str = "%b %d %Y %H:%M:%S";

/// Builds output paths for archived pages
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameRecipe {
    trim_title: bool,
}

impl FilenameRecipe {
    /// Creates a recipe; `trim_title` strips surrounding whitespace from sanitized titles
    pub fn new(trim_title: bool) -> Self {
        Self { trim_title }
    }

    /// Computes the output path for one record
    ///
    /// # Arguments
    ///
    /// * `dir` - Output root (the HTML or PDF directory)
    /// * `spec` - Page kind; supplies the table subdirectory and field names
    /// * `record` - Record fetched for `key`
    /// * `key` - Primary key of the record
    /// * `ext` - Extension without the dot, e.g. "html"
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - The output path
    /// * `Err(SalsaError::DateParse)` - The record's date is not in Salsa's format
    pub fn path(
        &self,
        dir: &Path,
        spec: &PageSpec,
        record: &Record,
        key: &str,
        ext: &str,
    ) -> Result<PathBuf, SalsaError> {
        let mut date = String::new();
        let mut key_part = key.to_string();

        if let Some(date_field) = spec.date_field() {
            let raw = record.get(date_field).unwrap_or("");
            if !raw.is_empty() {
                date = parse_salsa_date(raw)?;
                key_part = format!(" {}", key);
            }
        }

        let mut title = sanitize_title(record.get(spec.title_field()).unwrap_or(""));
        if self.trim_title {
            title = title.trim().to_string();
        }

        Ok(dir
            .join(spec.table())
            .join(format!("{}{} {}.{}", date, key_part, title, ext)))
    }
}

/// Removes every character except ASCII letters, digits and whitespace
///
/// # Examples
///
/// ```
/// use salsa_archiver::page::sanitize_title;
///
/// assert_eq!(sanitize_title("Hello, World!"), "Hello World");
/// ```
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Converts a Salsa Classic timestamp into `YYYY-MM-DD`
///
/// Input looks like "Mon Oct 09 2017 19:25:56 GMT-0400". The zone suffix is
/// discarded; the date is taken as written.
pub fn parse_salsa_date(value: &str) -> Result<String, SalsaError> {
    let local = value.split(" GMT").next().unwrap_or("").trim();
    // The weekday is not checked against the date
    let without_weekday = local.split_once(' ').map_or("", |(_, rest)| rest.trim_start());

    NaiveDateTime::parse_from_str(without_weekday, SALSA_DATE_FORMAT)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .map_err(|_| SalsaError::DateParse {
            value: value.to_string(),
        })
}
