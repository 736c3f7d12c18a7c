//! Delimited-text import.
//!
//! Two entry points: decoding against a known [`Schema`], and inferring the
//! schema from the text first. Inference scans the file, restarting from the
//! first data line whenever a column believed numeric turns out to hold
//! text, then materializes rows with a separate schema-given pass.

use std::cmp::Ordering;
use std::fs::File;
use std::io;
use std::marker::PhantomData;
use std::path::Path;

use log::{debug, info, warn};

use crate::classify::{classify, TokenClass};
use crate::config::CsvOptions;
use crate::dataset::{DataSet, RowBuilder};
use crate::error::{DataError, DataResult};
use crate::schema::Schema;
use crate::value::Quantity;
use crate::variable::{Kind, Variable};

/// Reads delimited text into a [`DataSet`], decoding quantitative fields as `Q`.
#[derive(Debug, Clone)]
pub struct Importer<Q: Quantity = f64> {
    options: CsvOptions,
    _quantity: PhantomData<Q>,
}

impl<Q: Quantity> Default for Importer<Q> {
    fn default() -> Self {
        Self::new(CsvOptions::default())
    }
}

/// Working type guess for one column during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guess {
    /// Assumed quantitative, but no numeric token has fixed its width yet.
    Undetermined,
    /// A numeric token fixed the width to `Q::WIDTH`.
    Quantitative,
    /// Text; width is the longest token seen plus one terminator byte.
    Categorical { width: usize },
}

/// Outcome of one inference scan over the data lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Complete,
    Demoted { column: usize, line: u64 },
}

impl<Q: Quantity> Importer<Q> {
    pub fn new(options: CsvOptions) -> Self {
        Self {
            options,
            _quantity: PhantomData,
        }
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Reads the file at `path` against a caller-supplied schema.
    pub fn read_with_schema<P: AsRef<Path>>(&self, path: P, schema: Schema) -> DataResult<DataSet> {
        let path = path.as_ref();
        let dataset = self.read_from(File::open(path)?, schema)?;
        info!(
            "imported {} rows x {} columns from {}",
            dataset.row_count(),
            dataset.column_count(),
            path.display()
        );
        Ok(dataset)
    }

    /// Decodes delimited text from `reader` against `schema`.
    ///
    /// The whole import fails on the first bad record; no partial data set is
    /// returned.
    pub fn read_from<R: io::Read>(&self, reader: R, schema: Schema) -> DataResult<DataSet> {
        let mut dataset = DataSet::new(schema);
        let mut records = self.csv_reader(reader)?.into_records();
        if self.options.has_header {
            records.next().transpose()?;
        }
        for result in records {
            let record = result?;
            let row = self.decode_record(&dataset.schema, &record)?;
            dataset.rows.push(row.into_boxed_slice());
        }
        Ok(dataset)
    }

    /// Infers a schema from the file at `path`, then reads it.
    pub fn read_inferred<P: AsRef<Path>>(&self, path: P) -> DataResult<DataSet> {
        let path = path.as_ref();
        let schema = self.infer_schema(path)?;
        self.read_with_schema(path, schema)
    }

    /// Discovers column kinds and widths from the file at `path`.
    ///
    /// Every column starts out quantitative. The first numeric token fixes its
    /// width; a later text token demotes it to categorical and restarts the
    /// scan so the text width is measured over every row. A column can only
    /// move from numeric to text, so there is at most one restart per column.
    pub fn infer_schema<P: AsRef<Path>>(&self, path: P) -> DataResult<Schema> {
        let path = path.as_ref();
        let names = self.read_names(path)?;
        let mut guesses = vec![Guess::Undetermined; names.len()];

        let mut restarts = 0;
        loop {
            match self.scan(path, &mut guesses)? {
                Pass::Complete => break,
                Pass::Demoted { column, line } => {
                    restarts += 1;
                    debug!(
                        "column '{}' demoted to categorical at line {}, restarting scan",
                        names[column], line
                    );
                    if restarts > names.len() {
                        return Err(DataError::UndeterminedSchema(names[column].clone()));
                    }
                }
            }
        }

        let mut variables = Vec::with_capacity(names.len());
        for (name, guess) in names.into_iter().zip(guesses) {
            let variable = match guess {
                Guess::Quantitative => Variable::quantitative::<Q>(name),
                Guess::Categorical { width } if width > 0 => Variable::categorical(name, width),
                _ => {
                    warn!("no data determines the type of column '{}'", name);
                    return Err(DataError::UndeterminedSchema(name));
                }
            };
            variables.push(variable);
        }
        let schema = Schema::new(variables)?;
        debug!(
            "inferred {} columns ({} bytes per row) after {} restarts",
            schema.len(),
            schema.row_width(),
            restarts
        );
        Ok(schema)
    }

    /// Column names from the header line, or generated names when the file
    /// has no header.
    fn read_names(&self, path: &Path) -> DataResult<Vec<String>> {
        let mut records = self.csv_reader(File::open(path)?)?.into_records();
        let first = records
            .next()
            .transpose()?
            .ok_or_else(|| DataError::invalid_schema("input has no lines to take columns from"))?;
        if self.options.has_header {
            Ok(first.iter().map(str::to_string).collect())
        } else {
            Ok((1..=first.len()).map(|i| format!("column_{}", i)).collect())
        }
    }

    /// One scan over the data lines, updating `guesses` in place.
    fn scan(&self, path: &Path, guesses: &mut [Guess]) -> DataResult<Pass> {
        let mut records = self.csv_reader(File::open(path)?)?.into_records();
        if self.options.has_header {
            records.next().transpose()?;
        }
        for result in records {
            let record = result?;
            let line = line_of(&record);
            check_field_count(guesses.len(), record.len(), line)?;
            for (column, (guess, token)) in guesses.iter_mut().zip(record.iter()).enumerate() {
                let numeric = match classify(token) {
                    TokenClass::Integer => true,
                    TokenClass::Real => !Q::INTEGRAL,
                    TokenClass::Text => false,
                } && Q::parse_token(token).is_some();
                match (*guess, numeric) {
                    (Guess::Undetermined, true) => *guess = Guess::Quantitative,
                    (Guess::Quantitative, true) => {}
                    (Guess::Quantitative, false) => {
                        *guess = Guess::Categorical { width: 0 };
                        return Ok(Pass::Demoted { column, line });
                    }
                    (Guess::Undetermined, false) => {
                        *guess = Guess::Categorical {
                            width: token.len() + 1,
                        }
                    }
                    (Guess::Categorical { width }, _) => {
                        *guess = Guess::Categorical {
                            width: width.max(token.len() + 1),
                        }
                    }
                }
            }
        }
        Ok(Pass::Complete)
    }

    fn decode_record(&self, schema: &Schema, record: &csv::StringRecord) -> DataResult<Vec<u8>> {
        let line = line_of(record);
        check_field_count(schema.len(), record.len(), line)?;
        let mut builder = RowBuilder::new(schema);
        for (index, (variable, token)) in schema.iter().zip(record.iter()).enumerate() {
            match variable.kind() {
                Kind::Quantitative => {
                    if variable.width() != Q::WIDTH {
                        return Err(DataError::size_mismatch(
                            format!("quantitative column '{}'", variable.name()),
                            variable.width(),
                            Q::WIDTH,
                        ));
                    }
                    let value = Q::parse_token(token).ok_or_else(|| {
                        DataError::malformed(
                            line,
                            format!("'{}' in column '{}' is not a number", token, variable.name()),
                        )
                    })?;
                    builder.set(index, value)?;
                }
                Kind::Categorical => {
                    builder.set_text(index, token)?;
                }
            }
        }
        Ok(builder.finish())
    }

    fn csv_reader<R: io::Read>(&self, reader: R) -> DataResult<csv::Reader<R>> {
        Ok(csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .delimiter(self.options.delimiter_byte()?)
            .from_reader(reader))
    }
}

/// Infers the schema of a comma-separated file with a header line and
/// reads it with `f64` quantitative fields.
pub fn read_csv<P: AsRef<Path>>(path: P) -> DataResult<DataSet> {
    Importer::<f64>::default().read_inferred(path)
}

/// Reads a comma-separated file with a header line against `schema`.
pub fn read_csv_with_schema<P: AsRef<Path>>(path: P, schema: Schema) -> DataResult<DataSet> {
    Importer::<f64>::default().read_with_schema(path, schema)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, |pos| pos.line())
}

fn check_field_count(expected: usize, found: usize, line: u64) -> DataResult<()> {
    match found.cmp(&expected) {
        Ordering::Equal => Ok(()),
        Ordering::Less => Err(DataError::malformed(
            line,
            format!("too few fields: expected {}, found {}", expected, found),
        )),
        Ordering::Greater => Err(DataError::malformed(
            line,
            format!("too many fields: expected {}, found {}", expected, found),
        )),
    }
}
