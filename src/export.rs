//! Delimited-text export.
//!
//! Fields are written with a bare delimiter join. Categorical text that
//! contains the delimiter is not escaped and will not read back aligned.
//! A single-column store with an empty categorical field is rejected: its
//! line would be blank, and blank lines are skipped on import.

use std::fs::File;
use std::io;
use std::marker::PhantomData;
use std::path::Path;

use log::info;

use crate::config::CsvOptions;
use crate::dataset::DataSet;
use crate::error::{DataError, DataResult};
use crate::value::{field_text, Quantity};
use crate::variable::Kind;

/// Writes a [`DataSet`] as delimited text, decoding quantitative fields as `Q`.
#[derive(Debug, Clone)]
pub struct Exporter<Q: Quantity = f64> {
    options: CsvOptions,
    _quantity: PhantomData<Q>,
}

impl<Q: Quantity> Default for Exporter<Q> {
    fn default() -> Self {
        Self::new(CsvOptions::default())
    }
}

impl<Q: Quantity> Exporter<Q> {
    pub fn new(options: CsvOptions) -> Self {
        Self {
            options,
            _quantity: PhantomData,
        }
    }

    /// Writes `dataset` to the file at `path`, replacing its contents.
    pub fn write_path<P: AsRef<Path>>(&self, dataset: &DataSet, path: P) -> DataResult<()> {
        let path = path.as_ref();
        self.write_to(dataset, File::create(path)?)?;
        info!("exported {} rows to {}", dataset.row_count(), path.display());
        Ok(())
    }

    /// Writes a header line (when enabled) and one line per row.
    ///
    /// Quantitative fields use the `Display` form of `Q`; categorical fields
    /// are their stored bytes up to the first NUL or the column width.
    pub fn write_to<W: io::Write>(&self, dataset: &DataSet, writer: W) -> DataResult<()> {
        let mut csv = csv::WriterBuilder::new()
            .delimiter(self.options.delimiter_byte()?)
            .quote_style(csv::QuoteStyle::Never)
            .flexible(true)
            .from_writer(writer);

        let schema = dataset.schema();
        for variable in schema {
            if variable.kind() == Kind::Quantitative && variable.width() != Q::WIDTH {
                return Err(DataError::size_mismatch(
                    format!("quantitative column '{}'", variable.name()),
                    variable.width(),
                    Q::WIDTH,
                ));
            }
        }

        if let [variable] = schema.variables() {
            if variable.kind() == Kind::Categorical {
                let header = u64::from(self.options.has_header);
                for (index, row) in dataset.rows().enumerate() {
                    if field_text(row.as_bytes()).is_empty() {
                        return Err(DataError::malformed(
                            header + index as u64 + 1,
                            format!(
                                "empty '{}' in a single-column row would be written as a blank line",
                                variable.name()
                            ),
                        ));
                    }
                }
            }
        }

        if self.options.has_header {
            csv.write_record(schema.iter().map(|v| v.name()))?;
        }

        let mut record: Vec<Vec<u8>> = Vec::with_capacity(schema.len());
        for row in dataset.rows() {
            record.clear();
            for variable in schema {
                let bytes = &row.as_bytes()[variable.range()];
                match variable.kind() {
                    Kind::Quantitative => {
                        let value = Q::read(bytes).ok_or_else(|| {
                            DataError::size_mismatch(variable.name(), Q::WIDTH, bytes.len())
                        })?;
                        record.push(value.to_string().into_bytes());
                    }
                    Kind::Categorical => record.push(field_text(bytes).to_vec()),
                }
            }
            csv.write_record(&record)?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Writes `dataset` as comma-separated text with a header line and `f64`
/// quantitative fields.
pub fn write_csv<P: AsRef<Path>>(dataset: &DataSet, path: P) -> DataResult<()> {
    Exporter::<f64>::default().write_path(dataset, path)
}
