// Wire types for the Prometheus-compatible query envelope:
//
//   { "status": "success",
//     "data": { "resultType": "...",
//               "result": [ { "metric": {..labels..},
//                             "value":  [ts, "val"],          // instant
//                             "values": [[ts, "val"], ...] }  // range
//             ] } }
//
// The raw envelope is private to this crate; callers only see the typed
// `InstantVector` / `RangeMatrix` views with parsed `Sample`s.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub status: String,
    #[serde(default)]
    pub data: QueryData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueryData {
    #[serde(rename = "resultType", default)]
    pub result_type: String,
    #[serde(default)]
    pub result: Vec<RawSeries>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSeries {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    /// Instant queries: one `[ts, "val"]` pair.
    pub value: Option<RawPoint>,
    /// Range queries: ascending `[[ts, "val"], ...]`.
    #[serde(default)]
    pub values: Vec<RawPoint>,
}

/// One raw data point: unix timestamp (possibly fractional) and the value
/// as the backend's decimal string.
pub(crate) type RawPoint = (f64, String);

// ── Parsed sample ───────────────────────────────────────────────────

/// One parsed metric data point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    /// Parse a raw `[ts, "val"]` pair.
    ///
    /// Value parsing is deliberately lenient: malformed numeric text yields
    /// `0.0` rather than an error, so one bad sample cannot abort a cycle.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn from_raw(point: &RawPoint) -> Self {
        let (ts, value) = point;
        Self {
            timestamp: DateTime::from_timestamp(*ts as i64, 0).unwrap_or_default(),
            value: value.parse().unwrap_or(0.0),
        }
    }
}

// ── Typed query results ─────────────────────────────────────────────

/// One series of an instant query result: its label set and latest sample.
#[derive(Debug, Clone)]
pub struct InstantSeries {
    pub labels: HashMap<String, String>,
    pub sample: Sample,
}

/// Result of an instant query. A non-selective filter may match several
/// series; iteration order is whatever the backend returned.
#[derive(Debug, Clone, Default)]
pub struct InstantVector {
    pub series: Vec<InstantSeries>,
}

impl InstantVector {
    /// The first returned series, if any. When the filter matches several
    /// devices the choice is backend-order-dependent, not deterministic.
    pub fn first(&self) -> Option<&InstantSeries> {
        self.series.first()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// One series of a range query result: label set plus samples ordered by
/// timestamp ascending.
#[derive(Debug, Clone)]
pub struct RangeSeries {
    pub labels: HashMap<String, String>,
    pub samples: Vec<Sample>,
}

/// Result of a range query.
#[derive(Debug, Clone, Default)]
pub struct RangeMatrix {
    pub series: Vec<RangeSeries>,
}

impl RangeMatrix {
    pub fn first(&self) -> Option<&RangeSeries> {
        self.series.first()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// ── Envelope → typed conversion ─────────────────────────────────────

impl QueryResponse {
    pub(crate) fn into_instant(self) -> InstantVector {
        let series = self
            .data
            .result
            .into_iter()
            .filter_map(|raw| {
                let sample = Sample::from_raw(raw.value.as_ref()?);
                Some(InstantSeries {
                    labels: raw.metric,
                    sample,
                })
            })
            .collect();
        InstantVector { series }
    }

    pub(crate) fn into_range(self) -> RangeMatrix {
        let series = self
            .data
            .result
            .into_iter()
            .map(|raw| RangeSeries {
                samples: raw.values.iter().map(Sample::from_raw).collect(),
                labels: raw.metric,
            })
            .collect();
        RangeMatrix { series }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_parses_timestamp_and_value() {
        let s = Sample::from_raw(&(1_700_000_000.0, "8.25".into()));
        assert_eq!(s.timestamp.timestamp(), 1_700_000_000);
        assert!((s.value - 8.25).abs() < f64::EPSILON);
    }

    #[test]
    fn sample_malformed_value_defaults_to_zero() {
        let s = Sample::from_raw(&(1_700_000_000.0, "not-a-number".into()));
        assert!(s.value.abs() < f64::EPSILON);
    }

    #[test]
    fn instant_envelope_skips_series_without_value() {
        let envelope: QueryResponse = serde_json::from_value(serde_json::json!({
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [
                    { "metric": { "device_name": "plug" } },
                    { "metric": { "device_name": "plug2" }, "value": [1_700_000_000, "8.0"] }
                ]
            }
        }))
        .expect("envelope decodes");

        let vector = envelope.into_instant();
        assert_eq!(vector.series.len(), 1);
        assert_eq!(vector.series[0].labels["device_name"], "plug2");
    }
}
