use url::Url;

/// Decommissioned Salsa hostnames and their current equivalents, applied in order
pub const DOMAIN_ALIASES: &[(&str, &str)] = &[
    ("org2.democracyinaction.org", "org2.salsalabs.com"),
    ("salsa.democracyinaction.org", "org.salsalabs.com"),
    ("hq.demaction.org", "org.salsalabs.com"),
];

/// Root-relative path prefixes that are made absolute against the API host
pub const ROOT_PREFIXES: &[&str] = &["/salsa", "/o/", "/dia/", "/var/"];

/// How root-relative links are made absolute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootRelative {
    /// Only values starting with one of [`ROOT_PREFIXES`] are rewritten
    Prefix,

    /// Every value is first joined against `https://{host}`, then the prefix rule runs
    BaseJoin,
}

/// Rewrites embedded `href`/`src` values for one Salsa host
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    host: String,
    root_relative: RootRelative,
}

impl LinkRewriter {
    pub fn new(host: impl Into<String>, root_relative: RootRelative) -> Self {
        Self {
            host: host.into(),
            root_relative,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn root_relative(&self) -> RootRelative {
        self.root_relative
    }

    /// Rewrites one attribute value
    pub fn rewrite(&self, raw: &str) -> String {
        rewrite_link(raw, &self.host, self.root_relative)
    }
}

/// Rewrites a link value according to the archiver's ordered rules
///
/// # Rules
///
/// 1. Legacy hostnames in [`DOMAIN_ALIASES`] are replaced (plain substring replace)
/// 2. Every `cid:` becomes `https:`
/// 3. Values starting with a [`ROOT_PREFIXES`] entry get `https://{host}` in front
///    (with [`RootRelative::BaseJoin`] the value is joined against the host first)
/// 4. Every literal `true` becomes `https://{host}/true/`
/// 5. Every `#` becomes `%23`
///
/// Rules see the output of earlier rules. The function never fails; applying
/// it twice is not guaranteed to be a no-op.
///
/// # Examples
///
/// ```
/// use salsa_archiver::url::{rewrite_link, RootRelative};
///
/// let v = rewrite_link("/o/123/page", "example.org", RootRelative::Prefix);
/// assert_eq!(v, "https://example.org/o/123/page");
/// ```
pub fn rewrite_link(raw: &str, host: &str, root_relative: RootRelative) -> String {
    let mut value = raw.to_string();

    for (legacy, current) in DOMAIN_ALIASES {
        value = value.replace(legacy, current);
    }

    value = value.replace("cid:", "https:");

    let origin = format!("https://{}", host);

    if root_relative == RootRelative::BaseJoin {
        value = join_against(&origin, &value);
    }

    for prefix in ROOT_PREFIXES {
        if let Some(rest) = value.strip_prefix(prefix) {
            value = format!("{}{}{}", origin, prefix, rest);
        }
    }

    value = value.replace("true", &format!("{}/true/", origin));

    value.replace('#', "%23")
}

/// Resolves `value` against the bare `origin` (no path)
///
/// Only relative references are resolved. Values with their own scheme and
/// authority, or with a scheme other than `https`, come back byte for byte.
/// Empty, fragment-only and query-only references are appended to `origin`
/// as written. An `https:` value without an authority is relative to the
/// origin.
fn join_against(origin: &str, value: &str) -> String {
    let reference = match split_scheme(value) {
        Some((scheme, rest)) if !scheme.eq_ignore_ascii_case("https") || rest.starts_with("//") => {
            return value.to_string();
        }
        Some((_, rest)) => rest,
        None => value,
    };

    if reference.is_empty() || reference.starts_with('#') || reference.starts_with('?') {
        return format!("{}{}", origin, reference);
    }

    if reference.starts_with("//") {
        return format!("https:{}", reference);
    }

    match Url::parse(origin).and_then(|base| base.join(reference)) {
        Ok(joined) => joined.to_string(),
        Err(_) => value.to_string(),
    }
}

/// Splits off a leading URL scheme, as in `mailto:x` -> ("mailto", "x")
fn split_scheme(value: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = value.split_once(':')?;
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (starts_alpha && valid).then_some((scheme, rest))
}
