//! Descriptive statistics over quantitative columns.

use crate::dataset::DataSet;
use crate::error::{DataError, DataResult};
use crate::value::Quantity;
use crate::variable::Kind;

/// Arithmetic mean of column `name`, read as `Q`. An empty data set yields 0.
pub fn mean<Q: Quantity>(dataset: &DataSet, name: &str) -> DataResult<f64> {
    let values = column_values::<Q>(dataset, name)?;
    if values.is_empty() {
        return Ok(0.0);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n - 1 denominator). Fewer than two rows yield 0.
pub fn variance<Q: Quantity>(dataset: &DataSet, name: &str) -> DataResult<f64> {
    let values = column_values::<Q>(dataset, name)?;
    if values.len() < 2 {
        return Ok(0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Ok(squares / (n - 1.0))
}

/// Sample standard deviation.
pub fn stdev<Q: Quantity>(dataset: &DataSet, name: &str) -> DataResult<f64> {
    variance::<Q>(dataset, name).map(f64::sqrt)
}

fn column_values<Q: Quantity>(dataset: &DataSet, name: &str) -> DataResult<Vec<f64>> {
    let variable = dataset
        .schema()
        .lookup(name)
        .ok_or_else(|| DataError::not_found(name))?;
    if variable.kind() != Kind::Quantitative {
        return Err(DataError::kind_mismatch(name, Kind::Quantitative));
    }
    dataset
        .rows()
        .map(|row| row.field_as::<Q>(variable).map(Quantity::to_f64))
        .collect()
}
