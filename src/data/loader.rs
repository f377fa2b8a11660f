use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DataLoadError, RowParseError};
use super::model::{Column, Dataset, SalesRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`           – comma separated, header row first
/// * `.tsv` / `.tab`  – tab separated
/// * `.txt`           – delimiter sniffed from the header line
/// * `.json`          – `[{ "Region": "East", "Sales": 12.5, ... }, ...]`
/// * `.parquet`       – the nine columns as flat Parquet columns
///
/// Every format must provide the nine [`Column`]s; extra columns are
/// ignored. The first bad row aborts the load.
pub fn load_file(path: &Path) -> Result<Dataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" | "tab" => load_delimited(path, b'\t')?,
        "txt" => {
            let delimiter = sniff_delimiter(path)?;
            load_delimited(path, delimiter)?
        }
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

fn io_error(path: &Path, source: std::io::Error) -> DataLoadError {
    DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn row_error(path: &Path, source: RowParseError) -> DataLoadError {
    DataLoadError::Row {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Position of each required column in the source header.
struct ColumnIndex {
    positions: BTreeMap<Column, usize>,
}

impl ColumnIndex {
    fn resolve<'a>(
        path: &Path,
        headers: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, DataLoadError> {
        let names: Vec<&str> = headers
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        let mut positions = BTreeMap::new();
        for column in Column::ALL {
            let idx = names
                .iter()
                .position(|h| *h == column.name())
                .ok_or_else(|| DataLoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.name(),
                })?;
            positions.insert(column, idx);
        }
        Ok(ColumnIndex { positions })
    }

    fn get(&self, column: Column) -> usize {
        self.positions[&column]
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

fn parse_text(raw: &str, row: usize, column: Column) -> Result<String, RowParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(RowParseError::new(row, column.name(), "missing value"));
    }
    Ok(value.to_string())
}

fn parse_float(raw: &str, row: usize, column: Column) -> Result<f64, RowParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(RowParseError::new(row, column.name(), "missing value"));
    }
    let parsed = value
        .parse::<f64>()
        .map_err(|_| RowParseError::new(row, column.name(), format!("'{value}' is not a number")))?;
    if !parsed.is_finite() {
        return Err(RowParseError::new(
            row,
            column.name(),
            format!("'{value}' is not a finite number"),
        ));
    }
    Ok(parsed)
}

fn parse_year(raw: &str, row: usize, column: Column) -> Result<i64, RowParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(RowParseError::new(row, column.name(), "missing value"));
    }
    value
        .parse::<i64>()
        .map_err(|_| RowParseError::new(row, column.name(), format!("'{value}' is not an integer year")))
}

/// Build a record from a positional row, as produced by the delimited reader.
fn record_from_fields(
    fields: &csv::StringRecord,
    index: &ColumnIndex,
    row: usize,
) -> Result<SalesRecord, RowParseError> {
    let field = |column: Column| fields.get(index.get(column)).unwrap_or("");

    Ok(SalesRecord {
        region: parse_text(field(Column::Region), row, Column::Region)?,
        segment: parse_text(field(Column::Segment), row, Column::Segment)?,
        year: parse_year(field(Column::Year), row, Column::Year)?,
        sales: parse_float(field(Column::Sales), row, Column::Sales)?,
        profit: parse_float(field(Column::Profit), row, Column::Profit)?,
        discount: parse_float(field(Column::Discount), row, Column::Discount)?,
        category: parse_text(field(Column::Category), row, Column::Category)?,
        product: parse_text(field(Column::Product), row, Column::Product)?,
        shipping_mode: parse_text(field(Column::ShippingMode), row, Column::ShippingMode)?,
    })
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per following line.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset, DataLoadError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| DataLoadError::malformed(path, format!("reading header: {e}")))?
        .clone();
    let index = ColumnIndex::resolve(path, headers.iter())?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let fields =
            result.map_err(|e| DataLoadError::malformed(path, format!("row {row}: {e}")))?;
        let record = record_from_fields(&fields, &index, row).map_err(|e| row_error(path, e))?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

/// Pick the delimiter that splits the header line into the most fields.
fn sniff_delimiter(path: &Path) -> Result<u8, DataLoadError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut header = String::new();
    BufReader::new(file)
        .read_line(&mut header)
        .map_err(|e| io_error(path, e))?;
    let delimiter = [b',', b';', b'\t', b'|']
        .into_iter()
        .map(|d| (header.matches(d as char).count(), d))
        .filter(|(n, _)| *n > 0)
        .max_by_key(|(n, _)| *n)
        .map_or(b',', |(_, d)| d);
    log::debug!("Sniffed delimiter {:?} for {}", delimiter as char, path.display());
    Ok(delimiter)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Region": "East", "Segment": "Consumer", "Year": 2020, "Sales": 100.0,
///     "Profit": 10.0, "Discount": 0.1, "Category": "Tech", "Product": "A",
///     "Shipping_Mode": "Air" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DataLoadError::malformed(path, e))?;

    let rows = root
        .as_array()
        .ok_or_else(|| DataLoadError::malformed(path, "expected top-level JSON array"))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value.as_object().ok_or_else(|| {
            DataLoadError::malformed(path, format!("row {row} is not a JSON object"))
        })?;

        // The first row stands in for the header.
        if i == 0 {
            ColumnIndex::resolve(path, obj.keys().map(String::as_str))?;
        }

        let record: SalesRecord = serde_json::from_value(value.clone()).map_err(|e| {
            let column = offending_json_column(obj).map_or("*", Column::name);
            row_error(path, RowParseError::new(row, column, e.to_string()))
        })?;
        let record = validate_record(record, row).map_err(|e| row_error(path, e))?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

/// First column that is absent from `obj` or holds a value of the wrong
/// JSON type for it.
fn offending_json_column(obj: &serde_json::Map<String, JsonValue>) -> Option<Column> {
    Column::ALL.into_iter().find(|column| match obj.get(column.name()) {
        None => true,
        Some(value) => match column {
            Column::Year => value.as_i64().is_none(),
            Column::Sales | Column::Profit | Column::Discount => !value.is_number(),
            _ => !value.is_string(),
        },
    })
}

/// Apply the delimited loader's field rules to a deserialized record:
/// text is trimmed and must be non-empty, numbers must be finite.
fn validate_record(record: SalesRecord, row: usize) -> Result<SalesRecord, RowParseError> {
    for (column, value) in [
        (Column::Sales, record.sales),
        (Column::Profit, record.profit),
        (Column::Discount, record.discount),
    ] {
        if !value.is_finite() {
            return Err(RowParseError::new(row, column.name(), "not a finite number"));
        }
    }

    Ok(SalesRecord {
        region: parse_text(&record.region, row, Column::Region)?,
        segment: parse_text(&record.segment, row, Column::Segment)?,
        category: parse_text(&record.category, row, Column::Category)?,
        product: parse_text(&record.product, row, Column::Product)?,
        shipping_mode: parse_text(&record.shipping_mode, row, Column::ShippingMode)?,
        ..record
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing the nine columns.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns may be any
/// integer or float type and are cast to `f64` (`Year` to `i64`).
fn load_parquet(path: &Path) -> Result<Dataset, DataLoadError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataLoadError::malformed(path, format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| DataLoadError::malformed(path, format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| DataLoadError::malformed(path, format!("reading record batch: {e}")))?;
        let first_row = records.len() + 1;
        append_batch(path, &batch, first_row, &mut records)?;
    }

    Ok(Dataset::from_records(records))
}

// -- Parquet / Arrow helpers --

/// `Year` as stored: integer-like columns cast to `Int64`, float columns
/// kept as `Float64` so fractional years can be rejected instead of
/// truncated.
enum YearColumn {
    Integer(ArrayRef),
    Float(ArrayRef),
}

impl YearColumn {
    fn value(&self, i: usize, row: usize) -> Result<i64, RowParseError> {
        let invalid = |reason: String| RowParseError::new(row, Column::Year.name(), reason);
        match self {
            YearColumn::Integer(arr) => {
                let arr = arr.as_primitive::<Int64Type>();
                if arr.is_null(i) {
                    return Err(invalid("missing or non-integer value".to_string()));
                }
                Ok(arr.value(i))
            }
            YearColumn::Float(arr) => {
                let arr = arr.as_primitive::<Float64Type>();
                if arr.is_null(i) {
                    return Err(invalid("missing value".to_string()));
                }
                let v = arr.value(i);
                if !v.is_finite() || v.fract() != 0.0 || v.abs() > i64::MAX as f64 {
                    return Err(invalid(format!("'{v}' is not an integer year")));
                }
                Ok(v as i64)
            }
        }
    }
}

/// Typed views of one record batch, one array per required column.
struct BatchColumns {
    text: BTreeMap<Column, ArrayRef>,
    year: YearColumn,
    floats: BTreeMap<Column, ArrayRef>,
}

fn append_batch(
    path: &Path,
    batch: &RecordBatch,
    first_row: usize,
    out: &mut Vec<SalesRecord>,
) -> Result<(), DataLoadError> {
    let schema = batch.schema();
    let index = ColumnIndex::resolve(path, schema.fields().iter().map(|f| f.name().as_str()))?;

    let cast_column = |column: Column, to: &DataType| -> Result<ArrayRef, DataLoadError> {
        cast(batch.column(index.get(column)).as_ref(), to).map_err(|e| {
            DataLoadError::malformed(path, format!("column '{}': {e}", column.name()))
        })
    };

    let year = if batch.column(index.get(Column::Year)).data_type().is_floating() {
        YearColumn::Float(cast_column(Column::Year, &DataType::Float64)?)
    } else {
        YearColumn::Integer(cast_column(Column::Year, &DataType::Int64)?)
    };

    let mut cols = BatchColumns {
        text: BTreeMap::new(),
        year,
        floats: BTreeMap::new(),
    };
    for column in [
        Column::Region,
        Column::Segment,
        Column::Category,
        Column::Product,
        Column::ShippingMode,
    ] {
        cols.text.insert(column, cast_column(column, &DataType::Utf8)?);
    }
    for column in [Column::Sales, Column::Profit, Column::Discount] {
        cols.floats.insert(column, cast_column(column, &DataType::Float64)?);
    }

    for i in 0..batch.num_rows() {
        let row = first_row + i;
        let record = record_from_batch(&cols, i, row).map_err(|e| row_error(path, e))?;
        out.push(record);
    }
    Ok(())
}

fn record_from_batch(
    cols: &BatchColumns,
    i: usize,
    row: usize,
) -> Result<SalesRecord, RowParseError> {
    let text = |column: Column| -> Result<String, RowParseError> {
        let arr = cols.text[&column].as_string::<i32>();
        if arr.is_null(i) {
            return Err(RowParseError::new(row, column.name(), "missing value"));
        }
        parse_text(arr.value(i), row, column)
    };
    let float = |column: Column| -> Result<f64, RowParseError> {
        let arr = cols.floats[&column].as_primitive::<Float64Type>();
        if arr.is_null(i) {
            return Err(RowParseError::new(row, column.name(), "missing or non-numeric value"));
        }
        let v = arr.value(i);
        if !v.is_finite() {
            return Err(RowParseError::new(row, column.name(), "not a finite number"));
        }
        Ok(v)
    };

    Ok(SalesRecord {
        region: text(Column::Region)?,
        segment: text(Column::Segment)?,
        year: cols.year.value(i, row)?,
        sales: float(Column::Sales)?,
        profit: float(Column::Profit)?,
        discount: float(Column::Discount)?,
        category: text(Column::Category)?,
        product: text(Column::Product)?,
        shipping_mode: text(Column::ShippingMode)?,
    })
}
