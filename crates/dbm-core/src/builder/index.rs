//! CREATE / DROP INDEX rendering.

use crate::buffer::Buffer;
use crate::dialect::Dialect;
use crate::error::{DdlError, Result};
use crate::schema::{Index, SchemaOp};

/// Renders index descriptions for one dialect.
pub struct IndexBuilder<'d, D: Dialect + ?Sized> {
    dialect: &'d D,
}

impl<'d, D: Dialect + ?Sized> IndexBuilder<'d, D> {
    /// Creates a builder for `dialect`.
    #[must_use]
    pub const fn new(dialect: &'d D) -> Self {
        Self { dialect }
    }

    /// Renders `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnsupportedOperation`] for rename and alter.
    pub fn build(&self, index: &Index) -> Result<String> {
        let mut buffer = Buffer::new(self.dialect);

        match index.op {
            SchemaOp::Create => {
                buffer.push_str("CREATE ");
                if index.unique {
                    buffer.push_str("UNIQUE ");
                }
                buffer.push_str("INDEX ");
                if index.optional {
                    buffer.push_str("IF NOT EXISTS ");
                }
                buffer.push_identifier(&index.name);
                buffer.push_str(" ON ");
                buffer.push_identifier(&index.table);
                buffer.push_str(" (");
                buffer.push_identifiers(&index.columns);
                buffer.push(')');
            }
            SchemaOp::Drop => {
                buffer.push_str("DROP INDEX ");
                if index.optional {
                    buffer.push_str("IF EXISTS ");
                }
                buffer.push_identifier(&index.name);
                if self.dialect.drop_index_on_table() {
                    buffer.push_str(" ON ");
                    buffer.push_identifier(&index.table);
                }
            }
            op @ (SchemaOp::Alter | SchemaOp::Rename) => {
                return Err(DdlError::UnsupportedOperation {
                    object: format!("index `{}`", index.name),
                    op,
                });
            }
        }

        buffer.push_options(index.options.as_deref());
        buffer.push(';');
        Ok(buffer.finish())
    }
}
