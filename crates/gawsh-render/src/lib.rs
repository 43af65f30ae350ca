//! Blob renderers for gawsh.
//!
//! A renderer is the collaborator each generated rule pipes a blob through:
//! raw bytes and a filename hint in, an HTML fragment out. The
//! [`ContentRenderer`] trait is the seam; [`HtmlTableRenderer`] is the
//! renderer behind `gawsh render`, highlighting with syntect. The CSS for
//! its classes comes from [`stylesheet`].

pub mod error;
pub mod html;
pub mod theme;
pub mod traits;

pub use error::{RenderError, RenderResult};
pub use html::{escape_html, is_binary, HtmlTableRenderer, CLASS_PREFIX};
pub use theme::{stylesheet, theme_names, DEFAULT_THEME};
pub use traits::ContentRenderer;
