use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single computed KPI. Undefined ratios are carried as `NotApplicable`
/// instead of `inf`/`NaN`, so they render as "n/a".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Metric {
    Value(f64),
    NotApplicable,
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NotApplicable => None,
        }
    }
}

impl From<Result<f64, AnalyticsError>> for Metric {
    fn from(result: Result<f64, AnalyticsError>) -> Self {
        match result {
            Ok(value) => Metric::Value(value),
            Err(e) => {
                tracing::debug!(error = %e, "Metric reported as n/a.");
                Metric::NotApplicable
            }
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v:.1}%"),
            Metric::NotApplicable => f.write_str("n/a"),
        }
    }
}

/// `numerator / denominator * 100`, unclamped.
///
/// A missing, zero or non-finite denominator is `DivisionUndefined`.
pub fn percentage(
    numerator: f64,
    denominator: Option<f64>,
    metric: &str,
) -> Result<f64, AnalyticsError> {
    match denominator {
        Some(d) if d != 0.0 && d.is_finite() => Ok(numerator / d * 100.0),
        _ => Err(AnalyticsError::DivisionUndefined {
            metric: metric.to_string(),
        }),
    }
}

/// The render state of one independent report section.
///
/// Sections fail in isolation: one section being `Failed` never prevents the
/// others in the same report from being computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    /// The selection matched no rows.
    NoData,
    /// The section exists but its defining ratio is undefined.
    NotApplicable(String),
    Failed(String),
}

impl<T> Section<T> {
    pub fn from_result(result: Result<T, AnalyticsError>) -> Self {
        match result {
            Ok(data) => Section::Ready(data),
            Err(AnalyticsError::EmptySelection(_)) => Section::NoData,
            Err(e @ AnalyticsError::DivisionUndefined { .. }) => {
                Section::NotApplicable(e.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Report section failed.");
                Section::Failed(e.to_string())
            }
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Section::NoData)
    }
}

impl<T> Section<Vec<T>> {
    /// An empty list is reported as `NoData`.
    pub fn non_empty(items: Vec<T>) -> Self {
        if items.is_empty() {
            Section::NoData
        } else {
            Section::Ready(items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_not_clamped() {
        assert_eq!(percentage(150.0, Some(100.0), "x").unwrap(), 150.0);
    }

    #[test]
    fn zero_or_missing_denominator_is_undefined() {
        for denominator in [Some(0.0), None, Some(f64::NAN)] {
            assert_eq!(
                percentage(10.0, denominator, "pct_max_game_total_distance"),
                Err(AnalyticsError::DivisionUndefined {
                    metric: "pct_max_game_total_distance".into()
                })
            );
        }
    }

    #[test]
    fn undefined_metric_renders_as_na() {
        let metric = Metric::from(percentage(1.0, Some(0.0), "x"));
        assert_eq!(metric, Metric::NotApplicable);
        assert_eq!(metric.to_string(), "n/a");
        assert_eq!(Metric::Value(42.345).to_string(), "42.3%");
    }

    #[test]
    fn sections_map_error_kinds_to_states() {
        let empty: Section<u8> =
            Section::from_result(Err(AnalyticsError::EmptySelection("x".into())));
        assert!(empty.is_no_data());
        let na: Section<u8> = Section::from_result(Err(AnalyticsError::DivisionUndefined {
            metric: "z".into(),
        }));
        assert!(matches!(na, Section::NotApplicable(_)));
        let failed: Section<u8> =
            Section::from_result(Err(AnalyticsError::UnknownPlayer("Q".into())));
        assert!(matches!(failed, Section::Failed(_)));
        assert_eq!(Section::<Vec<u8>>::non_empty(vec![]), Section::NoData);
    }

    #[test]
    fn sections_serialize_with_a_state_tag() {
        let json = serde_json::to_value(Section::Ready(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"state": "ready", "data": [1, 2]}));
        let json = serde_json::to_value(Section::<u8>::NoData).unwrap();
        assert_eq!(json, serde_json::json!({"state": "no_data"}));
    }
}
