use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    LargeStringArray, StringArray, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{
    CrimeDataset, Record, COL_CATEGORY, COL_INCIDENTS, COL_RATE, COL_REGION,
    COL_VICTIMS_FEMALE, COL_VICTIMS_MALE, COL_VICTIMS_UNDETERMINED, COL_YEAR, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Schema / value errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: column '{column}' {problem}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        problem: &'static str,
    },
    #[error("dataset contains no rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the crime dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the SNIC provincial export (recommended)
/// * `.json`    – `[{ "provincia_nombre": ..., "anio": ..., ... }, ...]`
/// * `.parquet` – one column per field, same names as the CSV
///
/// Any failure rejects the whole file; there is no partial dataset.
pub fn load_file(path: &Path) -> Result<CrimeDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if records.is_empty() {
        return Err(SchemaError::Empty).with_context(|| format!("loading {}", path.display()));
    }

    let dataset = CrimeDataset::from_records(records);
    log::info!(
        "Loaded {} records ({} provinces, {} crime categories) from {}",
        dataset.len(),
        dataset.regions().len(),
        dataset.categories().len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw row → validated Record
// ---------------------------------------------------------------------------

/// A row as read from any source format, before validation.
#[derive(Debug, Default, Deserialize)]
struct RawRow {
    #[serde(rename = "provincia_nombre")]
    region: Option<String>,
    #[serde(rename = "anio")]
    year: Option<f64>,
    #[serde(rename = "codigo_delito_snic_nombre")]
    category: Option<String>,
    #[serde(rename = "cantidad_hechos")]
    incidents: Option<RawCount>,
    #[serde(rename = "tasa_hechos")]
    rate: Option<f64>,
    #[serde(rename = "cantidad_victimas_masc")]
    victims_male: Option<RawCount>,
    #[serde(rename = "cantidad_victimas_fem")]
    victims_female: Option<RawCount>,
    #[serde(rename = "cantidad_victimas_sd")]
    victims_undetermined: Option<RawCount>,
}

/// A count cell. Exports with blank cells commonly write whole numbers as
/// `12.0`, so floats are accepted as long as they convert exactly.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
enum RawCount {
    Whole(u64),
    Real(f64),
}

/// Largest float below which every whole number is exactly representable.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

impl RawRow {
    /// `row` is the 1-based data row, not counting the header.
    fn validate(self, row: usize) -> Result<Record, SchemaError> {
        let invalid = |column: &'static str, problem: &'static str| SchemaError::InvalidValue {
            row,
            column,
            problem,
        };

        let text = |value: Option<String>, column: &'static str| {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or(invalid(column, "is empty"))
        };

        // NaN is how pandas spells a blank numeric cell.
        let number = |value: Option<f64>, column: &'static str| -> Result<Option<f64>, SchemaError> {
            match value {
                Some(v) if v.is_nan() => Ok(None),
                Some(v) if v.is_infinite() => Err(invalid(column, "is not a finite number")),
                Some(v) if v < 0.0 => Err(invalid(column, "is negative")),
                other => Ok(other),
            }
        };

        let count = |value: Option<RawCount>, column: &'static str| -> Result<Option<u64>, SchemaError> {
            let v = match value {
                None => return Ok(None),
                Some(RawCount::Whole(n)) => return Ok(Some(n)),
                Some(RawCount::Real(v)) => v,
            };
            match number(Some(v), column)? {
                None => Ok(None),
                Some(v) if v.fract() != 0.0 => Err(invalid(column, "is not a whole number")),
                Some(v) if v > MAX_EXACT_FLOAT => Err(invalid(column, "is out of range")),
                Some(v) => Ok(Some(v as u64)),
            }
        };

        let year = match self.year {
            Some(y) if y.is_finite() && y.fract() == 0.0 && y.abs() <= i32::MAX as f64 => y as i32,
            Some(_) => return Err(invalid(COL_YEAR, "is not a valid year")),
            None => return Err(invalid(COL_YEAR, "is empty")),
        };

        Ok(Record {
            region: text(self.region, COL_REGION)?,
            year,
            category: text(self.category, COL_CATEGORY)?,
            incidents: count(self.incidents, COL_INCIDENTS)?,
            rate: number(self.rate, COL_RATE)?,
            victims_male: count(self.victims_male, COL_VICTIMS_MALE)?,
            victims_female: count(self.victims_female, COL_VICTIMS_FEMALE)?,
            victims_undetermined: count(self.victims_undetermined, COL_VICTIMS_UNDETERMINED)?,
        })
    }
}

fn ensure_columns(mut present: impl FnMut(&str) -> bool) -> Result<(), SchemaError> {
    for column in REQUIRED_COLUMNS {
        if !present(column) {
            return Err(SchemaError::MissingColumn(column));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the SNIC column names; extra columns are
/// ignored. Blank numeric cells become `None`.
fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    ensure_columns(|col| headers.iter().any(|h| h == col))?;

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<RawRow>().enumerate() {
        let row_no = i + 1;
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(raw.validate(row_no)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "provincia_nombre": "Salta",
///     "anio": 2019,
///     "codigo_delito_snic_nombre": "Robos",
///     "cantidad_hechos": 120,
///     "tasa_hechos": 8.4,
///     "cantidad_victimas_masc": null,
///     ...
///   }
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<Map<String, JsonValue>> =
        serde_json::from_str(&text).context("Expected a top-level JSON array of objects")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, obj) in rows.into_iter().enumerate() {
        let row_no = i + 1;
        ensure_columns(|col| obj.contains_key(col))?;
        let raw: RawRow = serde_json::from_value(JsonValue::Object(obj))
            .with_context(|| format!("JSON row {row_no}"))?;
        records.push(raw.validate(row_no)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per field.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns any of the common
/// integer or float widths written by Pandas and Polars.
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        ensure_columns(|col| schema.index_of(col).is_ok())?;

        let columns = ParquetColumns {
            region: batch.column(schema.index_of(COL_REGION)?),
            year: batch.column(schema.index_of(COL_YEAR)?),
            category: batch.column(schema.index_of(COL_CATEGORY)?),
            incidents: batch.column(schema.index_of(COL_INCIDENTS)?),
            rate: batch.column(schema.index_of(COL_RATE)?),
            male: batch.column(schema.index_of(COL_VICTIMS_MALE)?),
            female: batch.column(schema.index_of(COL_VICTIMS_FEMALE)?),
            undetermined: batch.column(schema.index_of(COL_VICTIMS_UNDETERMINED)?),
        };

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row + 1;
            let raw = columns
                .read_row(row)
                .with_context(|| format!("Row {row_no}"))?;
            records.push(raw.validate(row_no)?);
        }
        row_offset += batch.num_rows();
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// The required columns of one record batch.
struct ParquetColumns<'a> {
    region: &'a ArrayRef,
    year: &'a ArrayRef,
    category: &'a ArrayRef,
    incidents: &'a ArrayRef,
    rate: &'a ArrayRef,
    male: &'a ArrayRef,
    female: &'a ArrayRef,
    undetermined: &'a ArrayRef,
}

impl ParquetColumns<'_> {
    fn read_row(&self, row: usize) -> Result<RawRow> {
        Ok(RawRow {
            region: extract_str(self.region, row)?,
            year: extract_f64(self.year, row)?,
            category: extract_str(self.category, row)?,
            incidents: extract_count(self.incidents, row)?,
            rate: extract_f64(self.rate, row)?,
            victims_male: extract_count(self.male, row)?,
            victims_female: extract_count(self.female, row)?,
            victims_undetermined: extract_count(self.undetermined, row)?,
        })
    }
}

/// Extract an optional string cell.
fn extract_str(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row)
            .to_string(),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .context("expected LargeStringArray")?
            .value(row)
            .to_string(),
        DataType::Utf8View => col.as_string_view().value(row).to_string(),
        other => bail!("Expected a text column, got {other:?}"),
    };
    Ok(Some(value))
}

/// Extract an optional numeric cell as `f64`.
fn extract_f64(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => downcast::<Float64Array>(any)?.value(row),
        DataType::Float32 => downcast::<Float32Array>(any)?.value(row) as f64,
        DataType::Int64 => downcast::<Int64Array>(any)?.value(row) as f64,
        DataType::Int32 => downcast::<Int32Array>(any)?.value(row) as f64,
        DataType::Int16 => downcast::<Int16Array>(any)?.value(row) as f64,
        DataType::UInt64 => downcast::<UInt64Array>(any)?.value(row) as f64,
        DataType::UInt32 => downcast::<UInt32Array>(any)?.value(row) as f64,
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(Some(value))
}

/// Extract an optional count cell, keeping unsigned and non-negative integers
/// exact.
fn extract_count(col: &ArrayRef, row: usize) -> Result<Option<RawCount>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let signed: i64 = match col.data_type() {
        DataType::UInt64 => {
            let n = downcast::<UInt64Array>(any)?.value(row);
            return Ok(Some(RawCount::Whole(n)));
        }
        DataType::UInt32 => {
            let n = downcast::<UInt32Array>(any)?.value(row);
            return Ok(Some(RawCount::Whole(n.into())));
        }
        DataType::Int64 => downcast::<Int64Array>(any)?.value(row),
        DataType::Int32 => downcast::<Int32Array>(any)?.value(row).into(),
        DataType::Int16 => downcast::<Int16Array>(any)?.value(row).into(),
        _ => return Ok(extract_f64(col, row)?.map(RawCount::Real)),
    };
    Ok(Some(match u64::try_from(signed) {
        Ok(n) => RawCount::Whole(n),
        // Negative; validation rejects it.
        Err(_) => RawCount::Real(signed as f64),
    }))
}

fn downcast<T: 'static>(any: &dyn std::any::Any) -> Result<&T> {
    any.downcast_ref::<T>()
        .with_context(|| format!("expected {}", std::any::type_name::<T>()))
}
