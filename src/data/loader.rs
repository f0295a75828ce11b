use std::io::Read;
use std::path::Path;
use std::time::Instant;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::LoadError;
use super::model::{non_blank, Catalog, CatalogRow, ContentType};

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["type", "country", "release_year", "listed_in", "duration"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a catalog from an HTTP(S) URL or a local file.
///
/// One attempt only; any failure is returned to the caller as is.
pub fn load_source(source: &str) -> Result<Catalog, LoadError> {
    let started = Instant::now();
    let catalog = if is_url(source) {
        fetch_csv(source)?
    } else {
        load_file(Path::new(source))?
    };
    log::info!(
        "Loaded {} titles from {source} in {:.2?}",
        catalog.len(),
        started.elapsed()
    );
    Ok(catalog)
}

/// Load a catalog from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – header row with at least the required columns
/// * `.parquet`      – same column names, Utf8 strings, Int32/Int64 year
pub fn load_file(path: &Path) -> Result<Catalog, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => parse_csv(std::fs::File::open(path)?),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

fn is_url(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

fn fetch_csv(url: &str) -> Result<Catalog, LoadError> {
    log::debug!("GET {url}");
    let response = reqwest::blocking::get(url)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes()?;
    parse_csv(body.as_ref())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse a header-ed CSV stream into a [`Catalog`].
///
/// Unknown columns are ignored, blank cells become `None`, and a row with an
/// unknown `type` or a non-integer `release_year` fails the load.
pub fn parse_csv<R: Read>(input: R) -> Result<Catalog, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn(required.to_string()));
        }
    }

    let rows = reader
        .deserialize::<CatalogRow>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Catalog::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the catalog.
///
/// The required columns are read by name; `show_id`, `title`, `director`,
/// `cast`, `date_added`, `rating` and `description` are picked up when
/// present.
fn load_parquet(path: &Path) -> Result<Catalog, LoadError> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        append_batch(&batch, &mut rows)?;
    }

    Ok(Catalog::from_rows(rows))
}

fn append_batch(batch: &RecordBatch, rows: &mut Vec<CatalogRow>) -> Result<(), LoadError> {
    let type_col = required_column(batch, "type")?;
    let country_col = required_column(batch, "country")?;
    let year_col = required_column(batch, "release_year")?;
    let listed_col = required_column(batch, "listed_in")?;
    let duration_col = required_column(batch, "duration")?;

    let show_id_col = optional_column(batch, "show_id");
    let title_col = optional_column(batch, "title");
    let director_col = optional_column(batch, "director");
    let cast_col = optional_column(batch, "cast");
    let date_col = optional_column(batch, "date_added");
    let rating_col = optional_column(batch, "rating");
    let description_col = optional_column(batch, "description");

    let offset = rows.len();
    for i in 0..batch.num_rows() {
        let row = offset + i;
        let invalid = |message: String| LoadError::InvalidRow { row, message };

        let content_type = string_at(type_col, i)
            .map_err(&invalid)?
            .ok_or_else(|| invalid("empty 'type'".to_string()))?
            .parse::<ContentType>()
            .map_err(&invalid)?;
        let release_year = int_at(year_col, i)
            .map_err(&invalid)?
            .ok_or_else(|| invalid("empty 'release_year'".to_string()))?;

        let opt = |col: Option<&ArrayRef>| -> Result<Option<String>, LoadError> {
            match col {
                Some(c) => string_at(c, i).map_err(&invalid),
                None => Ok(None),
            }
        };

        rows.push(CatalogRow {
            show_id: opt(show_id_col)?,
            title: opt(title_col)?.unwrap_or_default(),
            content_type,
            director: opt(director_col)?,
            cast: opt(cast_col)?,
            country: string_at(country_col, i).map_err(&invalid)?,
            date_added: opt(date_col)?,
            release_year,
            rating: opt(rating_col)?,
            duration: string_at(duration_col, i).map_err(&invalid)?,
            listed_in: string_at(listed_col, i).map_err(&invalid)?.unwrap_or_default(),
            description: opt(description_col)?,
        });
    }
    Ok(())
}

// -- Arrow helpers --

fn required_column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b ArrayRef, LoadError> {
    optional_column(batch, name).ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

fn optional_column<'b>(batch: &'b RecordBatch, name: &str) -> Option<&'b ArrayRef> {
    let idx = batch.schema_ref().index_of(name).ok()?;
    Some(batch.column(idx))
}

/// Non-blank string cell, `None` for null / blank.
fn string_at(col: &ArrayRef, row: usize) -> Result<Option<String>, String> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row),
        other => return Err(format!("expected a string column, got {other:?}")),
    };
    Ok(non_blank(value))
}

fn int_at(col: &ArrayRef, row: usize) -> Result<Option<i64>, String> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Int32 => Ok(Some(col.as_primitive::<Int32Type>().value(row) as i64)),
        DataType::Int64 => Ok(Some(col.as_primitive::<Int64Type>().value(row))),
        other => Err(format!("expected an integer column, got {other:?}")),
    }
}
