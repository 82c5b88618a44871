//! Progress reporting during consensus rounds

pub mod reporter;
