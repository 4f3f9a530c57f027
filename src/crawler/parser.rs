//! Child-link extraction from parent pages
//!
//! A parent page lists its children as hyperlinks whose targets carry a
//! `code` query parameter. Only proper prefix-extensions of the parent code
//! qualify: the page's self-referential link and stray cross-branch links
//! are dropped.

use crate::model::CodeRecord;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Trims and collapses internal whitespace runs to single spaces
pub(crate) fn squish(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts the child codes linked from a parent page
///
/// # Arguments
///
/// * `document` - The parsed parent page
/// * `parent_code` - The code whose page this is; must be uppercase
/// * `base_url` - Base for resolving relative link targets
///
/// # Returns
///
/// One deduplicated `CodeRecord` per child link, codes uppercased, names
/// whitespace-squished, in document order.
pub fn parse_children(document: &Html, parent_code: &str, base_url: &Url) -> Vec<CodeRecord> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let href = match element.value().attr("href") {
                Some(href) => href,
                None => continue,
            };
            let code = match code_param(href, base_url) {
                Some(code) => code.trim().to_uppercase(),
                None => continue,
            };

            // Not children: the page itself, and links into other branches.
            if code == parent_code || !code.starts_with(parent_code) {
                continue;
            }
            if !seen.insert(code.clone()) {
                continue;
            }

            let text = squish(&element.text().collect::<String>());
            let name = link_name(&text, &code);
            records.push(CodeRecord { code, name });
        }
    }

    records
}

/// Extracts the `code` query parameter from a link target
fn code_param(href: &str, base_url: &Url) -> Option<String> {
    let resolved = base_url.join(href.trim()).ok()?;
    resolved
        .query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
}

/// Derives a display name from link text
///
/// The index renders child links either as the bare code or as the code
/// followed by the classification name; a leading code token is stripped
/// from the name.
fn link_name(text: &str, code: &str) -> Option<String> {
    let rest = if text.len() >= code.len()
        && text.is_char_boundary(code.len())
        && text[..code.len()].eq_ignore_ascii_case(code)
    {
        text[code.len()..].trim_start()
    } else {
        text
    };

    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}
