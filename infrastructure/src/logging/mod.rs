//! Logging infrastructure: the transparency feed.
//!
//! Provides [`JsonlTransparencySink`], a JSONL file writer that implements
//! the [`TransparencySink`](advisor_application::TransparencySink) port.

mod jsonl_sink;

pub use jsonl_sink::JsonlTransparencySink;
