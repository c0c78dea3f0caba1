//! Markdown rendering for assistant messages
//!
//! Assistant messages arrive as plain text (or as HTML a previous pass
//! already produced) and are rewritten into display HTML by an ordered
//! sequence of regex substitutions. This is deliberately not a real
//! Markdown parser: the pipeline reproduces the small dialect the chat
//! pages actually use.

mod renderer;

pub use renderer::render_markdown;
