use std::io::Write;

use crate::error::RenderResult;

/// Turns blob bytes into an HTML fragment.
///
/// The filename is only a hint, typically used to pick a syntax from the
/// extension. Implementations must depend on nothing but `content` and
/// `filename`: the same blob is rendered once and shared by every path
/// that references it.
pub trait ContentRenderer: Send + Sync {
    /// Render `content` to an HTML fragment.
    fn render(&self, content: &[u8], filename: &str) -> RenderResult<String>;

    /// Render straight into a writer.
    ///
    /// Default implementation buffers via `render()`.
    fn render_to(&self, content: &[u8], filename: &str, out: &mut dyn Write) -> RenderResult<()> {
        let html = self.render(content, filename)?;
        out.write_all(html.as_bytes())?;
        Ok(())
    }
}
