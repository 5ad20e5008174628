//! Per-region time series and the metadata stored alongside it.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Largest magnitude below which every whole `f64` is an exact integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A non-null cell from a date column.
///
/// Numbers are the normal case. A date cell that is neither empty nor
/// numeric is kept verbatim as `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

/// Whole numbers go out as JSON integers (`500000`, not `500000.0`).
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INTEGER => {
                serializer.serialize_i64(*v as i64)
            }
            CellValue::Number(v) => serializer.serialize_f64(*v),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

/// Date key (`YYYY-MM` or `YYYY-MM-DD`) to value for one region.
///
/// Keys sort lexicographically, which for these formats is chronological.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeriesRecord(BTreeMap<String, CellValue>);

impl TimeSeriesRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: impl Into<String>, value: CellValue) {
        self.0.insert(date.into(), value);
    }

    pub fn get(&self, date: &str) -> Option<&CellValue> {
        self.0.get(date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in date order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Summarize the numeric observations of this series.
    pub fn summary(&self) -> SeriesSummary {
        let numeric: Vec<(&str, f64)> = self
            .iter()
            .filter_map(|(date, v)| v.as_f64().map(|n| (date, n)))
            .collect();

        let dated = |(date, value): (&str, f64)| DatedValue {
            date: date.to_string(),
            value,
        };

        let min = numeric
            .iter()
            .copied()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(dated);
        let max = numeric
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(dated);

        SeriesSummary {
            points: self.len(),
            numeric_points: numeric.len(),
            first: numeric.first().copied().map(dated),
            last: numeric.last().copied().map(dated),
            min,
            max,
        }
    }
}

impl FromIterator<(String, CellValue)> for TimeSeriesRecord {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Descriptive columns carried next to the series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county_name: Option<String>,
}

impl RegionMetadata {
    /// Record a metadata column if it is one we keep. Empty values are ignored.
    pub fn set(&mut self, column: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        let slot = match column {
            "RegionType" => &mut self.region_type,
            "City" => &mut self.city,
            "State" => &mut self.state,
            "StateName" => &mut self.state_name,
            "Metro" => &mut self.metro,
            "CountyName" => &mut self.county_name,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    /// "City, ST" style label, falling back to whichever part is known.
    pub fn label(&self) -> Option<String> {
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => Some(format!("{}, {}", city, state)),
            (Some(city), None) => Some(city.clone()),
            (None, Some(state)) => Some(state.clone()),
            (None, None) => None,
        }
    }
}

/// One lookup store value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionEntry {
    pub metadata: RegionMetadata,
    pub series: TimeSeriesRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedValue {
    pub date: String,
    pub value: f64,
}

/// Range statistics over a region's numeric observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub points: usize,
    pub numeric_points: usize,
    pub first: Option<DatedValue>,
    pub last: Option<DatedValue>,
    pub min: Option<DatedValue>,
    pub max: Option<DatedValue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    fn sample() -> TimeSeriesRecord {
        let mut record = TimeSeriesRecord::new();
        record.insert("2020-03", CellValue::Number(505_000.0));
        record.insert("2020-01", CellValue::Number(500_000.0));
        record.insert("2020-02", CellValue::Number(510_000.0));
        record
    }

    #[test]
    fn test_serializes_numbers_in_date_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"2020-01":500000,"2020-02":510000,"2020-03":505000}"#
        );
    }

    #[test]
    fn test_fractional_values_keep_their_fraction() {
        let mut record = TimeSeriesRecord::new();
        record.insert("2020-01", CellValue::Number(250_000.5));
        record.insert("2020-02", CellValue::Number(-3.0));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"2020-01":250000.5,"2020-02":-3}"#
        );
    }

    #[test]
    fn test_text_cells_serialize_as_strings() {
        let mut record = TimeSeriesRecord::new();
        record.insert("2020-01", CellValue::Text("n/a".into()));
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"2020-01":"n/a"}"#);
    }

    #[test]
    fn test_summary_range() {
        let summary = sample().summary();
        assert_eq!(summary.points, 3);
        assert_eq!(summary.first.as_ref().unwrap().date, "2020-01");
        assert_eq!(summary.last.as_ref().unwrap().date, "2020-03");
        assert_approx_eq!(summary.min.unwrap().value, 500_000.0, 1e-9);
        let max = summary.max.unwrap();
        assert_eq!(max.date, "2020-02");
        assert_approx_eq!(max.value, 510_000.0, 1e-9);
    }

    #[test]
    fn test_summary_ignores_text_cells() {
        let mut record = sample();
        record.insert("2020-04", CellValue::Text("oops".into()));
        let summary = record.summary();
        assert_eq!(summary.points, 4);
        assert_eq!(summary.numeric_points, 3);
        assert_eq!(summary.last.unwrap().date, "2020-03");
    }

    #[test]
    fn test_summary_of_empty_series() {
        let summary = TimeSeriesRecord::new().summary();
        assert_eq!(summary.points, 0);
        assert!(summary.first.is_none());
        assert!(summary.max.is_none());
    }

    #[test]
    fn test_metadata_label() {
        let mut meta = RegionMetadata::default();
        meta.set("City", "Beverly Hills");
        meta.set("State", "CA");
        meta.set("SizeRank", "1");
        assert_eq!(meta.label().as_deref(), Some("Beverly Hills, CA"));

        let mut only_state = RegionMetadata::default();
        only_state.set("State", "NY");
        only_state.set("City", "");
        assert_eq!(only_state.label().as_deref(), Some("NY"));
    }
}
