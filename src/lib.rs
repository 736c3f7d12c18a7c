//! In-memory data sets of fixed-width packed rows.
//!
//! This crate provides:
//! - [`Schema`] and [`Variable`]: ordered, typed column definitions with byte offsets.
//! - [`DataSet`]: a row store whose rows are packed against a single schema, with
//!   schema evolution ([`DataSet::drop_column`], [`DataSet::derive_column`]).
//! - [`Importer`] and [`Exporter`]: delimited-text input and output, including
//!   schema inference from untyped text.
//! - [`stats`]: descriptive statistics over quantitative columns.
//!
//! Quantitative values default to `f64`; any [`Quantity`] can be chosen per
//! importer, exporter or statistic.

pub mod classify;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod import;
mod mutate;
pub mod schema;
pub mod stats;
pub mod value;
pub mod variable;

pub use classify::{classify, TokenClass};
pub use config::{CsvOptions, ImportConfig};
pub use dataset::{DataSet, PossibleValues, Row, RowBuilder};
pub use error::{DataError, DataResult};
pub use export::{write_csv, Exporter};
pub use import::{read_csv, read_csv_with_schema, Importer};
pub use schema::Schema;
pub use value::{Field, Quantity};
pub use variable::{ColumnRef, Kind, Role, Variable};
