//! Headered CSV metric table.
//!
//! Columns: `id, diagnostic_id, name, standard_lower, standard_higher,
//! everlab_lower, everlab_higher, min_age, max_age, gender, oru_sonic_codes,
//! oru_sonic_units`. Missing columns read as blank; extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::hl7::parse_numeric;
use crate::models::MetricRecord;

use super::{MetricProvider, ProviderError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    id: String,
    diagnostic_id: String,
    name: String,
    standard_lower: String,
    standard_higher: String,
    everlab_lower: String,
    everlab_higher: String,
    min_age: String,
    max_age: String,
    gender: String,
    oru_sonic_codes: String,
    oru_sonic_units: String,
}

impl CsvRow {
    /// `row` is the 1-based line number in the source, header included.
    fn into_record(self, row: usize) -> Result<MetricRecord, ProviderError> {
        Ok(MetricRecord {
            standard_lower: bound(row, "standard_lower", &self.standard_lower)?,
            standard_higher: bound(row, "standard_higher", &self.standard_higher)?,
            everlab_lower: bound(row, "everlab_lower", &self.everlab_lower)?,
            everlab_higher: bound(row, "everlab_higher", &self.everlab_higher)?,
            min_age: age(row, "min_age", &self.min_age)?,
            max_age: age(row, "max_age", &self.max_age)?,
            gender: Some(self.gender).filter(|g| !g.is_empty()),
            id: self.id,
            diagnostic_id: self.diagnostic_id,
            name: self.name,
            oru_sonic_codes: self.oru_sonic_codes,
            oru_sonic_units: self.oru_sonic_units,
        })
    }
}

/// Numeric prefix of the cell (`"5 mmol"` -> 5). Blank reads as 0.
fn bound(row: usize, field: &'static str, raw: &str) -> Result<f64, ProviderError> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    let value = parse_numeric(raw).ok_or_else(|| invalid(row, field, raw))?;
    warn_if_truncated(row, field, raw, raw.parse::<f64>().is_ok());
    Ok(value)
}

/// Leading whole number of the cell (`"18.5"` -> 18). Blank reads as `None`.
fn age(row: usize, field: &'static str, raw: &str) -> Result<Option<u32>, ProviderError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let digits = raw
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw, |end| &raw[..end]);
    let value = digits
        .parse::<u32>()
        .map_err(|_| invalid(row, field, raw))?;
    warn_if_truncated(row, field, raw, digits.len() == raw.len());
    Ok(Some(value))
}

fn warn_if_truncated(row: usize, field: &'static str, raw: &str, exact: bool) {
    if !exact {
        tracing::warn!(row, field, value = raw, "Using numeric prefix of metric cell");
    }
}

fn invalid(row: usize, field: &'static str, raw: &str) -> ProviderError {
    ProviderError::InvalidNumber {
        row,
        field,
        value: raw.to_string(),
    }
}

/// Parse a metric table from any reader. Blank lines are skipped and every
/// cell is trimmed.
pub fn parse_metrics_csv<R: Read>(reader: R) -> Result<Vec<MetricRecord>, ProviderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut raw = csv::StringRecord::new();
    let mut records = Vec::new();

    while csv_reader.read_record(&mut raw)? {
        let line = raw.position().map_or(0, |p| p.line() as usize);
        let row: CsvRow = raw.deserialize(Some(&headers))?;
        records.push(row.into_record(line)?);
    }
    Ok(records)
}

/// Reads the metric table from a CSV file on every `load_metrics` call.
#[derive(Debug, Clone)]
pub struct CsvMetricProvider {
    path: PathBuf,
}

impl CsvMetricProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetricProvider for CsvMetricProvider {
    fn load_metrics(&self) -> Result<Vec<MetricRecord>, ProviderError> {
        let file = File::open(&self.path).map_err(|source| ProviderError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records = parse_metrics_csv(file)?;

        tracing::info!(
            path = %self.path.display(),
            count = records.len(),
            "Loaded diagnostic metrics"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "id,diagnostic_id,name,standard_lower,standard_higher,everlab_lower,everlab_higher,min_age,max_age,gender,oru_sonic_codes,oru_sonic_units";

    #[test]
    fn parses_full_row() {
        let data = format!(
            "{HEADER}\nferr,d1,Ferritin,30,200,50,150,18,65,F,FERR; FER ,ug/L;µg/L\n"
        );
        let records = parse_metrics_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.id, "ferr");
        assert_eq!(r.everlab_lower, 50.0);
        assert_eq!(r.min_age, Some(18));
        assert_eq!(r.max_age, Some(65));
        assert_eq!(r.gender.as_deref(), Some("F"));
        assert_eq!(r.oru_sonic_codes, "FERR; FER");
    }

    #[test]
    fn blank_cells_take_defaults() {
        let data = format!("{HEADER}\nx,,Mystery,,,,,,,,,\n");
        let r = &parse_metrics_csv(data.as_bytes()).unwrap()[0];
        assert_eq!(r.standard_lower, 0.0);
        assert_eq!(r.everlab_higher, 0.0);
        assert_eq!(r.min_age, None);
        assert_eq!(r.max_age, None);
        assert_eq!(r.gender, None);
    }

    #[test]
    fn list_columns_split_when_indexed() {
        let data = format!("{HEADER}\nglu,d1,Glucose,3,7.8,4,5.5,,,,GLU;;GLUF ;,mmol/L\n");
        let record = parse_metrics_csv(data.as_bytes()).unwrap().remove(0);
        let metric = crate::models::Metric::from(record);
        assert_eq!(metric.codes, vec!["GLU", "GLUF"]);
        assert_eq!(metric.units, vec!["mmol/L"]);
    }

    #[test]
    fn extra_and_missing_columns_are_tolerated() {
        let data = "name,everlab_lower,everlab_higher,notes\nCRP,0,3,ignored\n";
        let r = &parse_metrics_csv(data.as_bytes()).unwrap()[0];
        assert_eq!(r.name, "CRP");
        assert_eq!(r.everlab_higher, 3.0);
        assert_eq!(r.id, "");
    }

    #[test]
    fn bad_number_reports_row_and_column() {
        let data = format!("{HEADER}\na,,A,1,2,1,2,,,,,\nb,,B,1,two,1,2,,,,,\n");
        let err = parse_metrics_csv(data.as_bytes()).unwrap_err();
        match err {
            ProviderError::InvalidNumber { row, field, value } => {
                assert_eq!(row, 3);
                assert_eq!(field, "standard_higher");
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn cells_with_trailing_text_keep_their_numeric_prefix() {
        let data = format!("{HEADER}\na,,A,1,5 mmol,1,2,18.5,65y,,,\n");
        let r = &parse_metrics_csv(data.as_bytes()).unwrap()[0];
        assert_eq!(r.standard_higher, 5.0);
        assert_eq!(r.min_age, Some(18));
        assert_eq!(r.max_age, Some(65));
    }

    #[test]
    fn age_without_leading_digits_is_rejected() {
        let data = format!("{HEADER}\na,,A,1,2,1,2,adult,,,,\n");
        assert!(matches!(
            parse_metrics_csv(data.as_bytes()),
            Err(ProviderError::InvalidNumber { field: "min_age", .. })
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "hb,d1,Haemoglobin,130,180,135,175,,,,HB,g/L").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "crp,d2,CRP,0,5,0,3,,,,CRP,mg/L").unwrap();

        let provider = CsvMetricProvider::new(file.path());
        let records = provider.load_metrics().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "crp");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvMetricProvider::new(dir.path().join("absent.csv"));
        assert!(matches!(
            provider.load_metrics(),
            Err(ProviderError::Io { .. })
        ));
    }
}
