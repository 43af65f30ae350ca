//! Stylesheets for highlighted fragments.

use syntect::highlighting::ThemeSet;
use syntect::html::css_for_theme_with_class_style;

use crate::error::{RenderError, RenderResult};
use crate::html::CLASS_STYLE;

/// Theme used when none is named.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Names of the bundled themes, sorted.
pub fn theme_names() -> Vec<String> {
    let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
    names.sort();
    names
}

/// CSS for the classes [`HtmlTableRenderer`](crate::HtmlTableRenderer)
/// emits, in the colours of a bundled theme.
pub fn stylesheet(theme: &str) -> RenderResult<String> {
    let themes = ThemeSet::load_defaults();
    let Some(found) = themes.themes.get(theme) else {
        return Err(RenderError::UnknownTheme {
            name: theme.to_owned(),
            available: theme_names().join(", "),
        });
    };
    css_for_theme_with_class_style(found, CLASS_STYLE)
        .map_err(|e| RenderError::Highlight(e.to_string()))
}
