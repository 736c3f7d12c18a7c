use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use crate::error::{DataError, DataResult};
use crate::schema::Schema;
use crate::value::{field_text, Field, Quantity};
use crate::variable::{ColumnRef, Kind, Role, Variable};

/// Number of distinct values a column can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PossibleValues {
    /// Quantitative columns have an unbounded domain.
    Unbounded,
    /// Distinct categorical values observed across the current rows.
    Count(usize),
}

/// In-memory row store: fixed-width packed rows over a single [`Schema`].
///
/// Every row buffer is exactly `schema.row_width()` bytes long. Rows are only
/// created by store operations and are read through [`Row`] views that borrow
/// the store, so a row can never be interpreted against another schema.
/// Cloning performs a deep copy of the schema and all row buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSet {
    pub(crate) schema: Schema,
    pub(crate) rows: Vec<Box<[u8]>>,
}

impl DataSet {
    /// Creates an empty data set over `schema`.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Creates an empty data set from a list of variables.
    pub fn from_variables(variables: Vec<Variable>) -> DataResult<Self> {
        Schema::new(variables).map(Self::new)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn set_role<'a>(&mut self, column: impl Into<ColumnRef<'a>>, role: Role) -> DataResult<()> {
        self.schema.set_role(column, role)
    }

    /// Returns the number of variables.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Returns the variable names in column order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.names()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the data set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Byte width of every row.
    pub fn row_width(&self) -> usize {
        self.schema.row_width()
    }

    /// Starts encoding a new row for this data set.
    pub fn row_builder(&self) -> RowBuilder<'_> {
        RowBuilder::new(&self.schema)
    }

    /// Appends a copy of `bytes` as a new row.
    pub fn append(&mut self, bytes: &[u8]) -> DataResult<()> {
        let index = self.row_count();
        self.insert(index, bytes)
    }

    /// Inserts a copy of `bytes` before the row currently at `index`.
    pub fn insert(&mut self, index: usize, bytes: &[u8]) -> DataResult<()> {
        if index > self.rows.len() {
            return Err(DataError::out_of_range(index, self.rows.len()));
        }
        self.check_width(bytes)?;
        self.rows.insert(index, bytes.into());
        Ok(())
    }

    /// Removes and destroys the row at `index`.
    pub fn remove(&mut self, index: usize) -> DataResult<()> {
        if index >= self.rows.len() {
            return Err(DataError::out_of_range(index, self.rows.len()));
        }
        self.rows.remove(index);
        Ok(())
    }

    /// Destroys every row, leaving the schema untouched.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Returns a view of the row at `index`.
    pub fn get(&self, index: usize) -> DataResult<Row<'_>> {
        self.rows
            .get(index)
            .map(|bytes| Row {
                schema: &self.schema,
                bytes: &bytes[..],
            })
            .ok_or_else(|| DataError::out_of_range(index, self.rows.len()))
    }

    /// Iterates over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |bytes| Row {
            schema: &self.schema,
            bytes: &bytes[..],
        })
    }

    /// Returns the raw bytes of `column` in the row at `row`.
    pub fn field<'a>(&self, row: usize, column: impl Into<ColumnRef<'a>>) -> DataResult<&[u8]> {
        let variable = self.schema.resolve(column)?;
        let bytes = self
            .rows
            .get(row)
            .ok_or_else(|| DataError::out_of_range(row, self.rows.len()))?;
        Ok(&bytes[variable.range()])
    }

    /// Reinterprets a field as a value of type `T`.
    pub fn field_as<'a, T: Field>(
        &self,
        row: usize,
        column: impl Into<ColumnRef<'a>>,
    ) -> DataResult<T> {
        self.get(row)?.field_as(column)
    }

    /// Reads a categorical field as text.
    pub fn field_text<'a>(&self, row: usize, column: impl Into<ColumnRef<'a>>) -> DataResult<String> {
        Ok(self.get(row)?.text(column)?.into_owned())
    }

    /// Returns how many distinct values the column `name` holds.
    ///
    /// Categorical values are compared on their text up to the first NUL, so
    /// differently padded copies of one string count once.
    pub fn possible_values(&self, name: &str) -> DataResult<PossibleValues> {
        let variable = self
            .schema
            .lookup(name)
            .ok_or_else(|| DataError::not_found(name))?;
        if variable.kind() == Kind::Quantitative {
            return Ok(PossibleValues::Unbounded);
        }
        let range = variable.range();
        let distinct: HashSet<&[u8]> = self
            .rows
            .iter()
            .map(|bytes| field_text(&bytes[range.clone()]))
            .collect();
        Ok(PossibleValues::Count(distinct.len()))
    }

    /// Returns `true` when every variable is quantitative.
    pub fn all_quantitative(&self) -> bool {
        self.schema.all_of_kind(Kind::Quantitative)
    }

    /// Returns `true` when every variable is categorical.
    pub fn all_categorical(&self) -> bool {
        self.schema.all_of_kind(Kind::Categorical)
    }

    /// Renders the rows into a padded textual form, decoding quantitative
    /// fields as `Q`.
    pub fn render<Q: Quantity>(&self) -> String {
        let mut cells: Vec<Vec<String>> = Vec::with_capacity(self.row_count());
        for row in self.rows() {
            cells.push(
                self.schema
                    .iter()
                    .map(|variable| row.display::<Q>(variable))
                    .collect(),
            );
        }
        let mut widths: Vec<usize> = self.schema.iter().map(|v| v.name().len()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let mut output = String::new();
        for (idx, (variable, width)) in self.schema.iter().zip(widths.iter()).enumerate() {
            if idx > 0 {
                output.push(' ');
            }
            output.push_str(&format!("{:<width$}", variable.name(), width = width));
        }
        output.push('\n');
        for (idx, width) in widths.iter().enumerate() {
            if idx > 0 {
                output.push(' ');
            }
            output.push_str(&"-".repeat(*width));
        }
        for row in &cells {
            output.push('\n');
            for (idx, (cell, width)) in row.iter().zip(widths.iter()).enumerate() {
                if idx > 0 {
                    output.push(' ');
                }
                output.push_str(&format!("{:<width$}", cell, width = width));
            }
        }
        output
    }

    fn check_width(&self, bytes: &[u8]) -> DataResult<()> {
        let width = self.schema.row_width();
        if bytes.len() != width {
            return Err(DataError::size_mismatch("row", width, bytes.len()));
        }
        Ok(())
    }
}

/// Borrowed view of one row, read in the context of its owning data set.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    schema: &'a Schema,
    bytes: &'a [u8],
}

impl<'a> Row<'a> {
    /// Raw packed bytes of the row.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the number of bytes in the row.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the number of fields in the row.
    pub fn field_count(&self) -> usize {
        self.schema.len()
    }

    /// Returns the raw bytes of `column`.
    pub fn field<'c>(&self, column: impl Into<ColumnRef<'c>>) -> DataResult<&'a [u8]> {
        let variable = self.schema.resolve(column)?;
        Ok(&self.bytes[variable.range()])
    }

    /// Reinterprets a field as `T`, whose width must match the column's.
    pub fn field_as<'c, T: Field>(&self, column: impl Into<ColumnRef<'c>>) -> DataResult<T> {
        let variable = self.schema.resolve(column)?;
        if T::WIDTH != variable.width() {
            return Err(DataError::size_mismatch(
                format!("column '{}'", variable.name()),
                variable.width(),
                T::WIDTH,
            ));
        }
        T::read(&self.bytes[variable.range()]).ok_or_else(|| {
            DataError::size_mismatch(format!("column '{}'", variable.name()), T::WIDTH, variable.width())
        })
    }

    /// Reads a field as text, stopping at the first NUL byte.
    pub fn text<'c>(&self, column: impl Into<ColumnRef<'c>>) -> DataResult<Cow<'a, str>> {
        let bytes = self.field(column)?;
        Ok(String::from_utf8_lossy(field_text(bytes)))
    }

    fn display<Q: Quantity>(&self, variable: &Variable) -> String {
        let bytes = &self.bytes[variable.range()];
        match variable.kind() {
            Kind::Categorical => String::from_utf8_lossy(field_text(bytes)).into_owned(),
            Kind::Quantitative => match Q::read(bytes) {
                Some(value) => value.to_string(),
                None => "?".to_string(),
            },
        }
    }
}

impl fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row").field("bytes", &self.bytes).finish()
    }
}

/// Assembles one correctly packed row for a schema.
///
/// Fields left unset are zero bytes.
#[derive(Debug)]
pub struct RowBuilder<'a> {
    schema: &'a Schema,
    buffer: Vec<u8>,
}

impl<'a> RowBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            buffer: vec![0; schema.row_width()],
        }
    }

    /// Stores a fixed-width value; `T` must be exactly as wide as the column.
    pub fn set<'c, T: Field>(&mut self, column: impl Into<ColumnRef<'c>>, value: T) -> DataResult<&mut Self> {
        let variable = self.schema.resolve(column)?;
        if T::WIDTH != variable.width() {
            return Err(DataError::size_mismatch(
                format!("column '{}'", variable.name()),
                variable.width(),
                T::WIDTH,
            ));
        }
        value.write(&mut self.buffer[variable.range()]);
        Ok(self)
    }

    /// Stores text, zero-padded to the column width.
    ///
    /// Text longer than the column fails with [`DataError::FieldTooLong`].
    pub fn set_text<'c>(&mut self, column: impl Into<ColumnRef<'c>>, text: &str) -> DataResult<&mut Self> {
        let variable = self.schema.resolve(column)?;
        let bytes = text.as_bytes();
        if bytes.len() > variable.width() {
            return Err(DataError::field_too_long(variable.name(), bytes.len(), variable.width()));
        }
        let field = &mut self.buffer[variable.range()];
        field[..bytes.len()].copy_from_slice(bytes);
        field[bytes.len()..].fill(0);
        Ok(self)
    }

    /// Returns the packed row bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}
