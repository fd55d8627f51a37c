// ABOUTME: Library module for sql-dumper
// ABOUTME: Exports the dumper, dialect adapters and database handles for the binary and tests

pub mod config;
pub mod database;
pub mod dialect;
pub mod dump;
pub mod error;
pub mod mysql;
pub mod output;
pub mod postgres;
pub mod utils;

pub use dialect::SequenceAttribution;
pub use dump::Dumper;
pub use error::{DumpError, Result};
