//! Generic DDL builders, parameterized by a [`crate::dialect::Dialect`].

mod index;
mod table;

pub use index::IndexBuilder;
pub use table::TableBuilder;
