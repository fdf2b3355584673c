//! In-memory tabular demand data.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// Column name used for product identifiers.
pub const PRODUCT_COLUMN: &str = "product_id";
/// Column name used for client identifiers.
pub const CLIENT_COLUMN: &str = "client_id";

/// A typed column of a [`DemandTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Date(Vec<DateTime<Utc>>),
    Numeric(Vec<f64>),
    Label(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Date(v) => v.len(),
            Column::Numeric(v) => v.len(),
            Column::Label(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind(&self) -> &'static str {
        match self {
            Column::Date(_) => "date",
            Column::Numeric(_) => "numeric",
            Column::Label(_) => "label",
        }
    }

    fn select(&self, rows: &[usize]) -> Column {
        match self {
            Column::Date(v) => Column::Date(rows.iter().map(|&i| v[i]).collect()),
            Column::Numeric(v) => Column::Numeric(rows.iter().map(|&i| v[i]).collect()),
            Column::Label(v) => Column::Label(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// Named columns of equal length, in insertion order.
///
/// Models read their target and date columns from here by name.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use demand_forecast::data::DemandTable;
///
/// let dates = (1..=3)
///     .map(|m| Utc.with_ymd_and_hms(2024, m, 1, 0, 0, 0).unwrap())
///     .collect();
/// let table = DemandTable::new()
///     .with_dates("date", dates).unwrap()
///     .with_numeric("demand", vec![10.0, 12.0, 11.0]).unwrap();
///
/// let series = table.series("demand", "date").unwrap();
/// assert_eq!(series.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemandTable {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl DemandTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column. All columns must share one length.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        let position = self.names.iter().position(|n| *n == name);

        let others = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != position)
            .map(|(_, c)| c.len())
            .next();
        if let Some(expected) = others {
            if column.len() != expected {
                return Err(ForecastError::DimensionMismatch {
                    expected,
                    got: column.len(),
                });
            }
        }

        match position {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(self)
    }

    pub fn with_dates(self, name: impl Into<String>, values: Vec<DateTime<Utc>>) -> Result<Self> {
        self.with_column(name, Column::Date(values))
    }

    pub fn with_numeric(self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.with_column(name, Column::Numeric(values))
    }

    pub fn with_labels<S: Into<String>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        self.with_column(
            name,
            Column::Label(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Number of rows (zero for a table without columns).
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    fn require(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| {
            ForecastError::Configuration(format!("column '{}' not found in data", name))
        })
    }

    /// Values of a date column.
    pub fn dates(&self, name: &str) -> Result<&[DateTime<Utc>]> {
        match self.require(name)? {
            Column::Date(v) => Ok(v),
            other => Err(ForecastError::Configuration(format!(
                "column '{}' is {}, expected date",
                name,
                other.kind()
            ))),
        }
    }

    /// Values of a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.require(name)? {
            Column::Numeric(v) => Ok(v),
            other => Err(ForecastError::Configuration(format!(
                "column '{}' is {}, expected numeric",
                name,
                other.kind()
            ))),
        }
    }

    /// Values of a label column.
    pub fn labels(&self, name: &str) -> Result<&[String]> {
        match self.require(name)? {
            Column::Label(v) => Ok(v),
            other => Err(ForecastError::Configuration(format!(
                "column '{}' is {}, expected label",
                name,
                other.kind()
            ))),
        }
    }

    /// Extract `target` indexed by `date`, sorted ascending by date.
    pub fn series(&self, target: &str, date: &str) -> Result<TimeSeries> {
        let values = self.numeric(target)?.to_vec();
        let dates = self.dates(date)?.to_vec();
        Ok(TimeSeries::from_unsorted(dates, values)?.with_label(target))
    }

    /// Check that all `required` columns exist and numeric ones have no NaN.
    pub fn validate(&self, required: &[&str]) -> Result<()> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect();
        if !missing.is_empty() {
            return Err(ForecastError::Configuration(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        for name in required {
            if let Some(Column::Numeric(values)) = self.column(name) {
                if values.iter().any(|v| v.is_nan()) {
                    return Err(ForecastError::MissingValues((*name).to_string()));
                }
            }
        }
        Ok(())
    }

    /// Keep rows matching the given product and/or client.
    ///
    /// A filter is ignored when its identifier column is absent or not a label column.
    pub fn filter_by_product_client(&self, product: Option<&str>, client: Option<&str>) -> Self {
        let keep: Vec<usize> = (0..self.num_rows())
            .filter(|&row| {
                self.label_matches(PRODUCT_COLUMN, product, row)
                    && self.label_matches(CLIENT_COLUMN, client, row)
            })
            .collect();

        DemandTable {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(&keep)).collect(),
        }
    }

    fn label_matches(&self, column: &str, wanted: Option<&str>, row: usize) -> bool {
        match (wanted, self.column(column)) {
            (Some(wanted), Some(Column::Label(values))) => values[row] == wanted,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn month(m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, m, 1, 0, 0, 0).unwrap()
    }

    fn table() -> DemandTable {
        DemandTable::new()
            .with_dates("date", vec![month(3), month(1), month(2), month(1)])
            .unwrap()
            .with_numeric("demand", vec![30.0, 10.0, 20.0, 15.0])
            .unwrap()
            .with_labels(PRODUCT_COLUMN, ["A", "A", "A", "B"])
            .unwrap()
            .with_labels(CLIENT_COLUMN, ["X", "X", "Y", "X"])
            .unwrap()
    }

    #[test]
    fn columns_must_share_length() {
        let result = DemandTable::new()
            .with_numeric("demand", vec![1.0, 2.0])
            .unwrap()
            .with_numeric("other", vec![1.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn replacing_a_column_keeps_position() {
        let t = table().with_numeric("date", vec![0.0; 4]).unwrap();
        assert_eq!(t.column_names()[0], "date");
        assert!(t.numeric("date").is_ok());
        assert_eq!(t.num_rows(), 4);
    }

    #[test]
    fn series_sorts_by_date() {
        let t = table().filter_by_product_client(Some("A"), None);
        let series = t.series("demand", "date").unwrap();

        assert_eq!(series.values(), &[10.0, 20.0, 30.0]);
        assert_eq!(series.label(), Some("demand"));
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        assert!(matches!(
            table().series("demand", "date"),
            Err(ForecastError::Timestamp(_))
        ));
    }

    #[test]
    fn missing_or_mistyped_columns_are_configuration_errors() {
        let t = table();
        assert!(matches!(
            t.series("sales", "date"),
            Err(ForecastError::Configuration(_))
        ));
        assert!(matches!(
            t.series("demand", "product_id"),
            Err(ForecastError::Configuration(_))
        ));
    }

    #[test]
    fn validate_reports_missing_columns_and_nan() {
        let t = table();
        assert!(t.validate(&["date", "demand"]).is_ok());

        match t.validate(&["date", "sales", "region"]) {
            Err(ForecastError::Configuration(msg)) => {
                assert!(msg.contains("sales"));
                assert!(msg.contains("region"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let t = t
            .with_numeric("demand", vec![1.0, f64::NAN, 3.0, 4.0])
            .unwrap();
        assert_eq!(
            t.validate(&["demand"]),
            Err(ForecastError::MissingValues("demand".to_string()))
        );
    }

    #[test]
    fn filter_by_product_and_client() {
        let t = table();

        let a_x = t.filter_by_product_client(Some("A"), Some("X"));
        assert_eq!(a_x.num_rows(), 2);
        assert_eq!(a_x.numeric("demand").unwrap(), &[30.0, 10.0]);

        let all = t.filter_by_product_client(None, None);
        assert_eq!(all, t);

        let none = t.filter_by_product_client(Some("C"), None);
        assert!(none.is_empty());
        assert_eq!(none.column_names(), t.column_names());
    }

    #[test]
    fn filter_ignores_absent_identifier_columns() {
        let t = DemandTable::new()
            .with_numeric("demand", vec![1.0, 2.0])
            .unwrap();
        assert_eq!(t.filter_by_product_client(Some("A"), Some("X")).num_rows(), 2);
    }
}
