//! URL handling module
//!
//! This module rewrites links found in archived pages so that they point at
//! live Salsa domains instead of decommissioned ones, and fills the page URL
//! templates used to locate public pages.

mod rewrite;

pub use rewrite::{rewrite_link, LinkRewriter, RootRelative, DOMAIN_ALIASES, ROOT_PREFIXES};

/// Fills a page URL template
///
/// Recognized placeholders are `{host}`, `{organizationKey}` and `{key}`.
/// Any other text, including unknown braces, is copied unchanged.
///
/// # Examples
///
/// ```
/// use salsa_archiver::url::fill_template;
///
/// let url = fill_template("https://{host}/o/{organizationKey}/x?k={key}", "h.org", "7", "42");
/// assert_eq!(url, "https://h.org/o/7/x?k=42");
/// ```
pub fn fill_template(template: &str, host: &str, organization_key: &str, key: &str) -> String {
    template
        .replace("{host}", host)
        .replace("{organizationKey}", organization_key)
        .replace("{key}", key)
}
