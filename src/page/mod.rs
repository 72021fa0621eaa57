//! Page kinds, records and archive tasks
//!
//! A [`PageSpec`] describes one kind of public page (email blast, blog entry):
//! where its public URL lives and which table and fields describe it. A
//! [`Task`] pairs a spec with one record key.

mod filename;

pub use filename::{parse_salsa_date, sanitize_title, FilenameRecipe};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Table holding email blasts
pub const EMAIL_BLAST_TABLE: &str = "email_blast";

/// Table holding blog entries
pub const BLOG_ENTRY_TABLE: &str = "blog_entry";

/// Static description of one kind of public-facing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    url_template: String,
    table: String,
    title_field: String,
    key_field: String,
    date_field: Option<String>,
}

impl PageSpec {
    /// Creates a spec
    ///
    /// # Arguments
    ///
    /// * `url_template` - Public page URL with `{host}`, `{organizationKey}` and `{key}` placeholders
    /// * `table` - Salsa table (object) name
    /// * `title_field` - Field used as the page title in filenames
    /// * `key_field` - Primary key field
    /// * `date_field` - Creation date field, if the table has one
    pub fn new(
        url_template: impl Into<String>,
        table: impl Into<String>,
        title_field: impl Into<String>,
        key_field: impl Into<String>,
        date_field: Option<&str>,
    ) -> Self {
        Self {
            url_template: url_template.into(),
            table: table.into(),
            title_field: title_field.into(),
            key_field: key_field.into(),
            date_field: date_field.map(str::to_string),
        }
    }

    /// Email blasts, rendered by blastContent.jsp
    pub fn email_blast() -> Self {
        Self::new(
            "https://{host}/o/{organizationKey}/t/0/blastContent.jsp?email_blast_KEY={key}",
            EMAIL_BLAST_TABLE,
            "Subject",
            "email_blast_KEY",
            Some("Date_Created"),
        )
    }

    /// Public blog entries
    pub fn blog_entry() -> Self {
        Self::new(
            "http://{host}/o/{organizationKey}/p/salsa/web/blog/public/index.sjs?blog_entry_KEY={key}",
            BLOG_ENTRY_TABLE,
            "Title",
            "blog_entry_KEY",
            Some("Display_Date"),
        )
    }

    /// All page kinds the PDF tool knows about, in processing order
    ///
    /// photo_library, post_card, tell_a_friend and thank_you are absent
    /// because the API answers "invalid object/query" for them.
    pub fn builtin() -> Vec<Self> {
        vec![Self::email_blast(), Self::blog_entry()]
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn title_field(&self) -> &str {
        &self.title_field
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    pub fn date_field(&self) -> Option<&str> {
        self.date_field.as_deref()
    }

    /// Fields requested for a key listing or record fetch: key, title, then date when present
    pub fn include_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.key_field.as_str(), self.title_field.as_str()];
        if let Some(date) = self.date_field() {
            fields.push(date);
        }
        fields
    }

    /// Public URL for one record
    pub fn page_url(&self, host: &str, organization_key: &str, key: &str) -> String {
        crate::url::fill_template(&self.url_template, host, organization_key, key)
    }
}

impl fmt::Display for PageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)
    }
}

/// Field values of one record, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// One page instance to archive
#[derive(Debug, Clone)]
pub struct Task {
    pub spec: Arc<PageSpec>,
    pub key: String,
}

impl Task {
    pub fn new(spec: Arc<PageSpec>, key: impl Into<String>) -> Self {
        Self {
            spec,
            key: key.into(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.spec.table(), self.key)
    }
}
