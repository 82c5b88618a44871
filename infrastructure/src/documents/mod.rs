//! Document source adapters.

mod local;

pub use local::LocalDocumentSource;
