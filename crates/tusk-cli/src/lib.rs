//! # tusk-cli
//!
//! Turns a directory of raw `.sql` files into typed TypeScript modules.
//!
//! For every statement the pipeline runs: describe against a live database
//! (`tusk-postgres`), sharpen nullability and row counts (`tusk-core`), map
//! PostgreSQL type OIDs to TypeScript types, and emit one module per file
//! with a typed `Row` interface and an async query function.
//!
//! The binary in `main.rs` drives the pipeline; the modules here hold the
//! testable parts: file discovery, type mapping, code emission, and warning
//! rendering.

pub mod codegen;
pub mod discover;
pub mod error;
pub mod report;
pub mod ts_types;

pub use codegen::generate_module;
pub use discover::discover_sql_files;
pub use error::CliError;
pub use report::format_warnings;
