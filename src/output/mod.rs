//! Output formatting for analysis reports

pub mod formatter;
