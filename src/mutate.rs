//! Schema evolution over a populated [`DataSet`].
//!
//! Both operations build the complete replacement schema and row set before
//! touching the data set, so a failure leaves it exactly as it was.

use log::{info, warn};

use crate::dataset::DataSet;
use crate::error::{DataError, DataResult};
use crate::value::Field;
use crate::variable::{ColumnRef, Variable};

impl DataSet {
    /// Removes a column and repacks every row to the narrower layout.
    ///
    /// Surviving fields are copied from their old offsets to their new ones.
    /// Fails with [`DataError::NotFound`] when the column is not part of the
    /// schema, and with [`DataError::InvalidSchema`] when it is the only one.
    pub fn drop_column<'a>(&mut self, column: impl Into<ColumnRef<'a>>) -> DataResult<()> {
        let removed = self.schema.resolve(column)?.clone();
        let schema = self.schema.drop_variable(&removed)?;

        // Surviving variables keep their order, so old and new line up by position.
        let moves: Vec<(std::ops::Range<usize>, usize)> = self
            .schema
            .iter()
            .filter(|v| **v != removed)
            .zip(schema.iter())
            .map(|(old, new)| (old.range(), new.offset()))
            .collect();

        let width = schema.row_width();
        let mut rows = Vec::with_capacity(self.rows.len());
        for old in &self.rows {
            let mut packed = vec![0u8; width];
            for (source, target) in &moves {
                packed[*target..*target + source.len()].copy_from_slice(&old[source.clone()]);
            }
            rows.push(packed.into_boxed_slice());
        }

        self.schema = schema;
        self.rows = rows;
        info!(
            "dropped column '{}', {} rows repacked to {} bytes",
            removed.name(),
            self.rows.len(),
            width
        );
        Ok(())
    }

    /// Appends a column computed from an existing one.
    ///
    /// The new variable copies the source's role and kind and is as wide as
    /// `T`. For each row, `transform` receives the source field's raw bytes.
    /// Fails with [`DataError::NameConflict`] when `new_name` is already used
    /// by any column and [`DataError::NotFound`] when `source` is absent.
    pub fn derive_column<T, F>(&mut self, new_name: &str, source: &str, mut transform: F) -> DataResult<()>
    where
        T: Field,
        F: FnMut(&[u8]) -> T,
    {
        self.try_derive_column(new_name, source, |raw| Ok(transform(raw)))
    }

    /// Like [`DataSet::derive_column`], but the transform may fail.
    ///
    /// The first error aborts the operation with no change to the data set.
    pub fn try_derive_column<T, F>(&mut self, new_name: &str, source: &str, mut transform: F) -> DataResult<()>
    where
        T: Field,
        F: FnMut(&[u8]) -> DataResult<T>,
    {
        if self.schema.lookup(new_name).is_some() {
            return Err(DataError::NameConflict(new_name.to_string()));
        }
        let source = self
            .schema
            .lookup(source)
            .ok_or_else(|| DataError::not_found(source))?;
        let derived = Variable::new(new_name, source.role(), source.kind(), T::WIDTH);
        let schema = self.schema.add_variable(derived)?;

        let source_range = source.range();
        let old_width = self.schema.row_width();
        let mut rows = Vec::with_capacity(self.rows.len());
        for (index, old) in self.rows.iter().enumerate() {
            let value = transform(&old[source_range.clone()]).map_err(|err| {
                warn!("deriving '{}' failed at row {}: {}", new_name, index, err);
                err
            })?;
            let mut packed = Vec::with_capacity(schema.row_width());
            packed.extend_from_slice(old);
            packed.resize(old_width + T::WIDTH, 0);
            value.write(&mut packed[old_width..]);
            rows.push(packed.into_boxed_slice());
        }

        self.schema = schema;
        self.rows = rows;
        info!(
            "derived column '{}' ({} bytes) for {} rows",
            new_name,
            T::WIDTH,
            self.rows.len()
        );
        Ok(())
    }
}
