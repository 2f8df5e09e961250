use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Dataset, Record};

/// Columns every input format must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["location_name", "sex_name", "year_id", "val"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the mortality table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the IHME export as published (extra columns are ignored)
/// * `.json`    – `[{ "location_name": ..., "sex_name": ..., "year_id": ..., "val": ... }, ...]`
/// * `.parquet` – columnar copy with the same four columns
pub fn load_file(path: &Path) -> Result<Dataset> {
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

    validate(&records)?;
    Ok(Dataset::from_records(records))
}

fn validate(records: &[Record]) -> Result<()> {
    if records.is_empty() {
        bail!("input table contains no records");
    }
    if let Some((i, rec)) = records.iter().enumerate().find(|(_, r)| !r.val.is_finite()) {
        bail!(
            "Row {i}: non-finite val {} for {} / {} / {}",
            rec.val,
            rec.location_name,
            rec.sex_name,
            rec.year_id
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column");
        }
    }

    reader
        .deserialize::<Record>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// `year_id` may be Int32 or Int64 and `val` Float32, Float64 or integer.
/// Text columns may be plain or dictionary-encoded (Pandas `category`).
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        read_batch(&batch, &mut records)?;
    }
    Ok(records)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

/// Like [`column`], with dictionary-encoded text decoded to plain Utf8.
fn text_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    let col = column(batch, name)?;
    match col.data_type() {
        DataType::Dictionary(_, values)
            if matches!(values.as_ref(), DataType::Utf8 | DataType::LargeUtf8) =>
        {
            cast(col.as_ref(), &DataType::Utf8)
                .with_context(|| format!("decoding dictionary column '{name}'"))
        }
        _ => Ok(Arc::clone(col)),
    }
}

fn read_batch(batch: &RecordBatch, out: &mut Vec<Record>) -> Result<()> {
    let loc_col = &text_column(batch, "location_name")?;
    let sex_col = &text_column(batch, "sex_name")?;
    let year_col = column(batch, "year_id")?;
    let val_col = column(batch, "val")?;

    let base = out.len();
    for row in 0..batch.num_rows() {
        let row_no = base + row;
        out.push(Record {
            location_name: extract_string(loc_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'location_name'"))?,
            sex_name: extract_string(sex_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'sex_name'"))?,
            year_id: extract_year(year_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'year_id'"))?,
            val: extract_f64(val_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'val'"))?,
        });
    }
    Ok(())
}

// -- Arrow helpers --

fn extract_string(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn extract_year(col: &ArrayRef, row: usize) -> Result<i32> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            i32::try_from(arr.value(row)).context("year out of range")
        }
        other => bail!("expected an integer column, got {other:?}"),
    }
}

#[allow(clippy::cast_precision_loss)]
fn extract_f64(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(f64::from(arr.value(row)))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(f64::from(arr.value(row)))
        }
        other => bail!("expected a numeric column, got {other:?}"),
    }
}
