//! Output sinks for tilescii.
//!
//! Console text and standalone HTML documents.

pub mod console;
pub mod html;

pub use console::ConsoleOutput;
pub use html::HtmlOutput;
