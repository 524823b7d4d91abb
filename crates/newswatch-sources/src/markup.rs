//! Thin helpers over `scraper` for the document-parsing adapters.
//!
//! `scraper::Html` is not `Send`, so parsing always happens inside a
//! synchronous function that returns owned data before the next `.await`.

use scraper::{ElementRef, Selector};

use crate::error::SourceError;

/// # Errors
///
/// Returns [`SourceError::Parse`] for an invalid CSS selector.
pub(crate) fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse {
        context: format!("selector `{css}`"),
        reason: e.to_string(),
    })
}

/// Text of an element with each text node trimmed and the pieces joined.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Trimmed text of the first match of `sel` under `scope`, if non-empty.
pub(crate) fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// Non-empty texts of every match of `sel` under `scope`.
pub(crate) fn all_texts(scope: ElementRef<'_>, sel: &Selector) -> Vec<String> {
    scope
        .select(sel)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// First non-empty text among `selectors`, tried in order.
pub(crate) fn first_text_of(scope: ElementRef<'_>, selectors: &[&Selector]) -> Option<String> {
    selectors.iter().find_map(|sel| first_text(scope, sel))
}
