//! CREATE / ALTER / RENAME / DROP TABLE rendering.

use tracing::warn;

use crate::buffer::Buffer;
use crate::dialect::Dialect;
use crate::error::{DdlError, Result};
use crate::schema::{Column, DefaultValue, Definition, Key, KeyKind, SchemaOp, Table};

/// Renders table descriptions for one dialect.
pub struct TableBuilder<'d, D: Dialect + ?Sized> {
    dialect: &'d D,
}

impl<'d, D: Dialect + ?Sized> TableBuilder<'d, D> {
    /// Creates a builder for `dialect`.
    #[must_use]
    pub const fn new(dialect: &'d D) -> Self {
        Self { dialect }
    }

    /// Renders `table`. ALTER TABLE yields one statement per definition.
    ///
    /// # Errors
    ///
    /// Returns a [`DdlError`] when the description cannot be expressed in
    /// the dialect. No partial SQL is produced in that case.
    pub fn build(&self, table: &Table) -> Result<String> {
        let mut buffer = Buffer::new(self.dialect);

        match table.op {
            SchemaOp::Create => self.write_create(&mut buffer, table)?,
            SchemaOp::Alter => self.write_alter(&mut buffer, table)?,
            SchemaOp::Rename => Self::write_rename(&mut buffer, table)?,
            SchemaOp::Drop => Self::write_drop(&mut buffer, table),
        }

        Ok(buffer.finish())
    }

    fn write_create(&self, buffer: &mut Buffer<'d, D>, table: &Table) -> Result<()> {
        let definitions = self.definitions(table);

        match self
            .dialect
            .create_table_guard(&table.name)
            .filter(|_| table.optional)
        {
            Some(guard) => {
                buffer.push_str(&guard);
                buffer.push_str("CREATE TABLE ");
            }
            None if table.optional => buffer.push_str("CREATE TABLE IF NOT EXISTS "),
            None => buffer.push_str("CREATE TABLE "),
        }
        buffer.push_identifier(&table.name);

        if !definitions.is_empty() {
            buffer.push_str(" (");
            for (i, definition) in definitions.into_iter().enumerate() {
                if i > 0 {
                    buffer.push_str(", ");
                }
                match definition {
                    Definition::Column(column) => self.write_column(buffer, table, column)?,
                    Definition::Key(key) => Self::write_key(buffer, table, key)?,
                    Definition::Raw(sql) => buffer.push_str(sql),
                }
            }
            buffer.push(')');
        }

        buffer.push_options(table.options.as_deref());
        buffer.push(';');
        Ok(())
    }

    fn write_alter(&self, buffer: &mut Buffer<'d, D>, table: &Table) -> Result<()> {
        for definition in self.definitions(table) {
            buffer.push_str("ALTER TABLE ");
            buffer.push_identifier(&table.name);
            buffer.push(' ');

            match definition {
                Definition::Column(column) => match column.op {
                    SchemaOp::Create => {
                        buffer.push_str("ADD COLUMN ");
                        self.write_column(buffer, table, column)?;
                    }
                    SchemaOp::Rename => {
                        let rename =
                            column
                                .rename
                                .as_deref()
                                .ok_or_else(|| DdlError::MissingRename {
                                    object: format!("column `{}`", column.name),
                                })?;
                        buffer.push_str("RENAME COLUMN ");
                        buffer.push_identifier(&column.name);
                        buffer.push_str(" TO ");
                        buffer.push_identifier(rename);
                    }
                    SchemaOp::Drop => {
                        buffer.push_str("DROP COLUMN ");
                        buffer.push_identifier(&column.name);
                    }
                    SchemaOp::Alter => {
                        return Err(DdlError::AlterColumnInPlace {
                            table: table.name.clone(),
                            column: column.name.clone(),
                        });
                    }
                },
                Definition::Key(key) => match key.op {
                    SchemaOp::Create => {
                        buffer.push_str("ADD ");
                        Self::write_key(buffer, table, key)?;
                    }
                    SchemaOp::Drop => {
                        let name = key.name.as_deref().ok_or_else(|| {
                            DdlError::MissingKeyName {
                                table: table.name.clone(),
                            }
                        })?;
                        buffer.push_str("DROP ");
                        buffer.push_str(self.dialect.drop_key_keyword(key.kind)?);
                        buffer.push(' ');
                        buffer.push_identifier(name);
                    }
                    op @ (SchemaOp::Alter | SchemaOp::Rename) => {
                        return Err(DdlError::UnsupportedOperation {
                            object: format!("{} on table `{}`", key.kind, table.name),
                            op,
                        });
                    }
                },
                Definition::Raw(sql) => buffer.push_str(sql),
            }

            buffer.push_options(table.options.as_deref());
            buffer.push(';');
        }
        Ok(())
    }

    fn write_rename(buffer: &mut Buffer<'d, D>, table: &Table) -> Result<()> {
        let rename = table
            .rename
            .as_deref()
            .ok_or_else(|| DdlError::MissingRename {
                object: format!("table `{}`", table.name),
            })?;
        buffer.push_str("ALTER TABLE ");
        buffer.push_identifier(&table.name);
        buffer.push_str(" RENAME TO ");
        buffer.push_identifier(rename);
        buffer.push(';');
        Ok(())
    }

    fn write_drop(buffer: &mut Buffer<'d, D>, table: &Table) {
        buffer.push_str("DROP TABLE ");
        if table.optional {
            buffer.push_str("IF EXISTS ");
        }
        buffer.push_identifier(&table.name);
        buffer.push(';');
    }

    fn write_column(
        &self,
        buffer: &mut Buffer<'d, D>,
        table: &Table,
        column: &Column,
    ) -> Result<()> {
        if matches!(column.default, Some(DefaultValue::Float(f)) if !f.is_finite()) {
            return Err(DdlError::NonFiniteDefault {
                table: table.name.clone(),
                column: column.name.clone(),
            });
        }

        let mut column = column.clone();
        let ty = self.dialect.map_column(&mut column);

        buffer.push_identifier(&column.name);
        buffer.push(' ');
        buffer.push_str(&ty.name);

        if let Some(size) = ty.size {
            buffer.push('(');
            buffer.push_str(&size.to_string());
            if let Some(scale) = ty.scale {
                buffer.push(',');
                buffer.push_str(&scale.to_string());
            }
            buffer.push(')');
        }

        if column.unsigned {
            buffer.push_str(" UNSIGNED");
        }
        if column.unique {
            buffer.push_str(" UNIQUE");
        }
        if column.required {
            buffer.push_str(" NOT NULL");
        }
        if column.primary {
            buffer.push_str(" PRIMARY KEY");
        }
        if let Some(default) = &column.default {
            buffer.push_str(" DEFAULT ");
            buffer.push_value(default);
        }

        buffer.push_options(column.options.as_deref());
        Ok(())
    }

    fn write_key(buffer: &mut Buffer<'d, D>, table: &Table, key: &Key) -> Result<()> {
        if key.columns.is_empty() {
            return Err(DdlError::EmptyKeyColumns {
                table: table.name.clone(),
            });
        }

        buffer.push_str(key.kind.as_sql());
        if let Some(name) = key.name.as_deref().filter(|n| !n.is_empty()) {
            buffer.push(' ');
            buffer.push_identifier(name);
        }
        buffer.push_str(" (");
        buffer.push_identifiers(&key.columns);
        buffer.push(')');

        if key.kind == KeyKind::Foreign {
            let reference = key
                .reference
                .as_ref()
                .filter(|r| !r.table.is_empty())
                .ok_or_else(|| DdlError::MissingReference {
                    table: table.name.clone(),
                })?;

            buffer.push_str(" REFERENCES ");
            buffer.push_identifier(&reference.table);
            buffer.push_str(" (");
            buffer.push_identifiers(&reference.columns);
            buffer.push(')');

            if let Some(action) = reference.on_delete {
                buffer.push_str(" ON DELETE ");
                buffer.push_str(action.as_sql());
            }
            if let Some(action) = reference.on_update {
                buffer.push_str(" ON UPDATE ");
                buffer.push_str(action.as_sql());
            }
        }

        buffer.push_options(key.options.as_deref());
        Ok(())
    }

    fn definitions<'t>(&self, table: &'t Table) -> Vec<&'t Definition> {
        table
            .definitions
            .iter()
            .filter(|definition| {
                let keep = self.dialect.keep_definition(table, definition);
                if !keep {
                    warn!(
                        dialect = self.dialect.name(),
                        table = %table.name,
                        definition = definition.kind_name(),
                        "unsupported table definition excluded"
                    );
                }
                keep
            })
            .collect()
    }
}
