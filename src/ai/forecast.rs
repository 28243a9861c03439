//! Trend forecasting via structured completion.
//!
//! A forecast is requested per metric; the model must answer with a JSON
//! object matching [`forecast_schema`].  Responses that fail to parse are
//! treated as "no result" — the dashboard simply hides the forecast
//! instead of surfacing an error.
//!
//! Forecasts for different metrics targeting the same future year are
//! merged into a single [`ForecastRow`] keyed by year, never shown as
//! separate synthetic entries.

use serde::{Deserialize, Serialize};

use crate::data::Metric;
use crate::i18n::Language;

use super::gateway::AiGateway;
use super::prompts::PromptBuilder;

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

/// One metric's forecast as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub forecasted_value: f64,
    pub explanation: String,
}

/// JSON schema the structured completion is constrained to.
pub fn forecast_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "forecastedValue": { "type": "NUMBER" },
            "explanation": { "type": "STRING" }
        },
        "required": ["forecastedValue", "explanation"]
    })
}

/// The year a forecast targets: one past the newest year in `series`.
pub fn next_year(series: &[(u16, f64)]) -> Option<u16> {
    series.iter().map(|(year, _)| *year).max().map(|y| y + 1)
}

/// Request a forecast for one metric.
///
/// Returns `None` on any gateway or parse failure; the caller falls back
/// to not displaying the feature.
pub async fn fetch_forecast(
    gateway: &dyn AiGateway,
    language: Language,
    metric: Metric,
    series: &[(u16, f64)],
) -> Option<Forecast> {
    let target = next_year(series)?;
    let prompt = PromptBuilder::new(language).forecast(metric, series, target);

    let value = match gateway.complete_structured(&prompt, &forecast_schema()).await {
        Ok(value) => value,
        Err(e) => {
            log::warn!("forecast request for {metric:?} failed: {e}");
            return None;
        }
    };

    match serde_json::from_value::<Forecast>(value) {
        Ok(forecast) => Some(forecast),
        Err(e) => {
            log::warn!("forecast response for {metric:?} did not validate: {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// ForecastRow
// ---------------------------------------------------------------------------

/// All forecast results for one future year, merged across metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub year: u16,
    entries: Vec<(Metric, Forecast)>,
}

impl ForecastRow {
    pub fn new(year: u16) -> Self {
        Self {
            year,
            entries: Vec::new(),
        }
    }

    /// Merge a metric's forecast into this row, replacing any earlier
    /// forecast for the same metric.
    pub fn merge(&mut self, metric: Metric, forecast: Forecast) {
        if let Some(slot) = self.entries.iter_mut().find(|(m, _)| *m == metric) {
            slot.1 = forecast;
        } else {
            self.entries.push((metric, forecast));
        }
    }

    /// The forecast for `metric`, when present.
    pub fn get(&self, metric: Metric) -> Option<&Forecast> {
        self.entries
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, f)| f)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gateway::AiError;
    use crate::ai::stream::TextStream;
    use async_trait::async_trait;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Gateway whose structured completion returns a fixed JSON value.
    struct StructuredStub(serde_json::Value);

    #[async_trait]
    impl AiGateway for StructuredStub {
        async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
            Err(AiError::EmptyResponse)
        }
        async fn complete_streaming(&self, _prompt: &str) -> Result<TextStream, AiError> {
            Err(AiError::EmptyResponse)
        }
        async fn complete_structured(
            &self,
            _prompt: &str,
            _schema: &serde_json::Value,
        ) -> Result<serde_json::Value, AiError> {
            Ok(self.0.clone())
        }
        async fn synthesize_speech(&self, _text: &str) -> Result<Vec<u8>, AiError> {
            Err(AiError::EmptyResponse)
        }
        async fn transcribe(
            &self,
            _wav: &[u8],
            _language: Language,
        ) -> Result<String, AiError> {
            Err(AiError::EmptyResponse)
        }
    }

    const SERIES: &[(u16, f64)] = &[(2021, 50.0), (2022, 55.0), (2023, 60.0)];

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[test]
    fn next_year_is_max_plus_one() {
        assert_eq!(next_year(SERIES), Some(2024));
        assert_eq!(next_year(&[(2023, 1.0), (2021, 2.0)]), Some(2024));
        assert_eq!(next_year(&[]), None);
    }

    #[tokio::test]
    async fn valid_response_parses() {
        let gateway = StructuredStub(serde_json::json!({
            "forecastedValue": 65.0,
            "explanation": "The upward trend is expected to continue."
        }));

        let forecast =
            fetch_forecast(&gateway, Language::English, Metric::PersonDays, SERIES)
                .await
                .unwrap();
        assert_eq!(forecast.forecasted_value, 65.0);
        assert!(forecast.explanation.contains("upward"));
    }

    #[tokio::test]
    async fn malformed_response_is_absent_not_an_error() {
        let gateway = StructuredStub(serde_json::json!({ "value": "not the schema" }));
        let result =
            fetch_forecast(&gateway, Language::English, Metric::PersonDays, SERIES).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn empty_series_yields_no_forecast() {
        let gateway = StructuredStub(serde_json::json!({
            "forecastedValue": 1.0,
            "explanation": "x"
        }));
        let result =
            fetch_forecast(&gateway, Language::English, Metric::PersonDays, &[]).await;
        assert!(result.is_none());
    }

    #[test]
    fn two_metrics_merge_into_one_row() {
        let mut row = ForecastRow::new(2024);
        row.merge(
            Metric::PersonDays,
            Forecast {
                forecasted_value: 65.0,
                explanation: "up".into(),
            },
        );
        row.merge(
            Metric::Expenditure,
            Forecast {
                forecasted_value: 270.0,
                explanation: "up".into(),
            },
        );

        assert_eq!(row.year, 2024);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(Metric::PersonDays).unwrap().forecasted_value, 65.0);
        assert_eq!(row.get(Metric::Expenditure).unwrap().forecasted_value, 270.0);
    }

    #[test]
    fn remerging_same_metric_replaces_value() {
        let mut row = ForecastRow::new(2024);
        row.merge(
            Metric::PersonDays,
            Forecast {
                forecasted_value: 65.0,
                explanation: "first".into(),
            },
        );
        row.merge(
            Metric::PersonDays,
            Forecast {
                forecasted_value: 66.0,
                explanation: "second".into(),
            },
        );

        assert_eq!(row.len(), 1);
        assert_eq!(row.get(Metric::PersonDays).unwrap().forecasted_value, 66.0);
    }
}
