//! Spreadsheet Loader Module
//! Reads the card listing into a Polars DataFrame, skipping the intro rows
//! that precede the header. Every column is loaded as text.

use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Number of intro rows above the header in the published listing.
pub const DEFAULT_SKIP_ROWS: usize = 10;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Could not find '{}'", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Failed to build table: {0}")]
    Polars(#[from] PolarsError),
    #[error("Workbook has no sheet named '{0}'")]
    MissingSheet(String),
    #[error("Workbook contains no worksheets")]
    NoSheets,
    #[error("No header at row {row}: the sheet only has {available} rows")]
    NoHeader { row: usize, available: usize },
    #[error("Unsupported input format '{0}'")]
    UnsupportedFormat(String),
}

/// Input formats the loader understands, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Workbook,
    Csv,
}

impl InputFormat {
    fn detect(path: &Path) -> Result<Self, LoaderError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Workbook),
            "csv" => Ok(InputFormat::Csv),
            _ => Err(LoaderError::UnsupportedFormat(ext)),
        }
    }
}

/// Loads the listing with a fixed preamble offset.
#[derive(Debug, Clone)]
pub struct DataLoader {
    skip_rows: usize,
    sheet: Option<String>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_ROWS)
    }
}

impl DataLoader {
    pub fn new(skip_rows: usize) -> Self {
        Self {
            skip_rows,
            sheet: None,
        }
    }

    /// Read a named worksheet instead of the first one.
    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Load the file at `path`. Row `skip_rows` (0-indexed) is the header.
    pub fn load(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = match InputFormat::detect(path)? {
            InputFormat::Workbook => self.load_workbook(path)?,
            InputFormat::Csv => self.load_csv(path)?,
        };

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded listing"
        );
        Ok(df)
    }

    fn load_workbook(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names();

        let sheet = match &self.sheet {
            Some(name) if sheet_names.iter().any(|s| s == name) => name.clone(),
            Some(name) => return Err(LoaderError::MissingSheet(name.clone())),
            None => sheet_names.first().cloned().ok_or(LoaderError::NoSheets)?,
        };
        debug!(%sheet, "reading worksheet");

        let range = workbook.worksheet_range(&sheet)?;
        self.frame_from_range(&range)
    }

    /// Build a text DataFrame from a worksheet range.
    ///
    /// Calamine ranges begin at the first used cell, so the offset is
    /// translated back to absolute sheet rows.
    fn frame_from_range(&self, range: &Range<Data>) -> Result<DataFrame, LoaderError> {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let available = first_row + range.height();

        let no_header = LoaderError::NoHeader {
            row: self.skip_rows,
            available,
        };
        if range.is_empty() || self.skip_rows < first_row {
            return Err(no_header);
        }

        let mut rows = range.rows().skip(self.skip_rows - first_row);
        let header = rows.next().ok_or(no_header)?;
        let names = header_names(header.iter().map(cell_text));

        let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for row in rows {
            for (idx, column) in values.iter_mut().enumerate() {
                column.push(row.get(idx).and_then(cell_text));
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(values)
            .map(|(name, data)| Column::new(name.into(), data))
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    fn load_csv(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_skip_rows(self.skip_rows)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let raw: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let names = header_names(raw.into_iter().map(Some));
        df.set_column_names(names)?;
        Ok(df)
    }
}

/// Column names from the header row.
///
/// Blank headers become `Unnamed: <index>` and repeats get a `.<n>` suffix.
fn header_names<I>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells
        .into_iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("Unnamed: {}", idx));
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

/// Display text of a single cell. Empty and error cells have none.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(float_text(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(|d| d.to_string())
                .unwrap_or_else(|| float_text(dt.as_f64())),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Whole numbers render without a trailing ".0".
fn float_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::Float(0.0)), Some("0".to_string()));
        assert_eq!(cell_text(&Data::Float(39.5)), Some("39.5".to_string()));
        assert_eq!(cell_text(&Data::Int(95)), Some("95".to_string()));
        assert_eq!(
            cell_text(&Data::String("$0".to_string())),
            Some("$0".to_string())
        );
        assert_eq!(cell_text(&Data::Bool(true)), Some("true".to_string()));
    }

    #[test]
    fn test_header_names_fill_blanks_and_dedupe() {
        let header = vec![
            Data::String(" Institution Name ".to_string()),
            Data::Empty,
            Data::String("Notes".to_string()),
            Data::String("Notes".to_string()),
        ];
        assert_eq!(
            header_names(header.iter().map(cell_text)),
            vec!["Institution Name", "Unnamed: 1", "Notes", "Notes.1"]
        );
    }

    #[test]
    fn test_frame_from_range_skips_preamble() {
        // Content starts at sheet row 2, header sits at row 4.
        let mut range: Range<Data> = Range::new((2, 0), (6, 1));
        range.set_value((2, 0), Data::String("Intro text".to_string()));
        range.set_value((4, 0), Data::String("Product Name".to_string()));
        range.set_value((4, 1), Data::String("Annual Fee".to_string()));
        range.set_value((5, 0), Data::String("Basic Card".to_string()));
        range.set_value((5, 1), Data::Float(0.0));
        range.set_value((6, 0), Data::String("Gold Card".to_string()));

        let df = DataLoader::new(4).frame_from_range(&range).unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Product Name", "Annual Fee"]);

        let fee = df.column("Annual Fee").unwrap().str().unwrap();
        assert_eq!(fee.get(0), Some("0"));
        assert_eq!(fee.get(1), None);
    }

    #[test]
    fn test_frame_from_range_keeps_interior_empty_rows() {
        // Header at row 0, data at rows 1 and 3, row 2 left blank
        let mut range: Range<Data> = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("Product Name".to_string()));
        range.set_value((0, 1), Data::String("Rewards".to_string()));
        range.set_value((1, 0), Data::String("Basic Card".to_string()));
        range.set_value((1, 1), Data::String("Cashback".to_string()));
        range.set_value((3, 0), Data::String("Gold Card".to_string()));

        let df = DataLoader::new(0).frame_from_range(&range).unwrap();
        assert_eq!(df.height(), 3);

        let product = df.column("Product Name").unwrap().str().unwrap();
        let rewards = df.column("Rewards").unwrap().str().unwrap();
        assert_eq!(product.get(1), None);
        assert_eq!(rewards.get(1), None);
        assert_eq!(product.get(2), Some("Gold Card"));
        assert_eq!(rewards.get(2), None);
    }

    #[test]
    fn test_frame_from_range_header_out_of_bounds() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 0));
        range.set_value((0, 0), Data::String("only".to_string()));

        let err = DataLoader::new(10).frame_from_range(&range).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::NoHeader {
                row: 10,
                available: 2
            }
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DataLoader::default()
            .load(Path::new("definitely_missing_listing.xlsx"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let err = DataLoader::default().load(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_load_csv_with_preamble() {
        let mut file: NamedTempFile = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Credit card agreements").unwrap();
        writeln!(file, "Published quarterly").unwrap();
        writeln!(file, "Institution Name,Product Name,Annual Fee").unwrap();
        writeln!(file, "Acme Bank,Student Card,0").unwrap();
        writeln!(file, "Beta Credit Union,Travel Plus,95").unwrap();
        file.flush().unwrap();

        let df = DataLoader::new(2).load(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("Annual Fee").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_load_csv_normalizes_headers() {
        let mut file: NamedTempFile = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, " Institution Name ,Product Name  ,Annual Fee").unwrap();
        writeln!(file, "Acme Bank,Student Card,0").unwrap();
        file.flush().unwrap();

        let df = DataLoader::new(0).load(file.path()).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Institution Name", "Product Name", "Annual Fee"]);
    }
}
