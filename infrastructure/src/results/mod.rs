//! Result sink adapters.

mod json_sink;

pub use json_sink::JsonFileSink;
