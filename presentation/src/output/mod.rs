//! Output formatting for audit results

pub mod console;
