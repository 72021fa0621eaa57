//! Link rewriting over a whole HTML document

use crate::url::LinkRewriter;
use lol_html::{element, HtmlRewriter, Settings};

/// Elements whose links are rewritten
pub const REWRITTEN_TAGS: &[&str] = &["a", "link", "img", "script"];

/// Attributes rewritten on those elements
pub const REWRITTEN_ATTRIBUTES: &[&str] = &["href", "src"];

/// Rewrites every `href`/`src` on `a`, `link`, `img` and `script` elements
///
/// Attributes whose rewritten value equals the original are left untouched,
/// and the rest of the markup passes through unchanged.
///
/// # Arguments
///
/// * `html` - The page markup
/// * `rewriter` - Link rules bound to the session host
///
/// # Returns
///
/// * `Ok(String)` - The rewritten document
/// * `Err(String)` - The rewriter rejected the markup
pub fn rewrite_links(html: &str, rewriter: &LinkRewriter) -> Result<String, String> {
    let mut output = Vec::with_capacity(html.len());

    let handlers = REWRITTEN_TAGS
        .iter()
        .map(|tag| {
            let rewriter = rewriter.clone();
            element!(*tag, move |el| {
                for attr in REWRITTEN_ATTRIBUTES {
                    if let Some(value) = el.get_attribute(attr) {
                        let rewritten = rewriter.rewrite(&value);
                        if rewritten != value {
                            el.set_attribute(attr, &rewritten)?;
                        }
                    }
                }
                Ok(())
            })
        })
        .collect();

    let mut html_rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: handlers,
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    html_rewriter
        .write(html.as_bytes())
        .map_err(|e| format!("HtmlRewriter error: {}", e))?;
    html_rewriter
        .end()
        .map_err(|e| format!("HtmlRewriter end error: {}", e))?;

    String::from_utf8(output).map_err(|e| format!("Invalid UTF-8 in rewritten HTML: {}", e))
}
