//! Reading and writing field documents in the supported formats.

mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{parse_document_str, parse_external_value, parse_items};
pub use output::{ValueSink, render_value};
