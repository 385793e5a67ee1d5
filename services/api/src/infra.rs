use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use permit_form::config::{AppConfig, AppEnvironment};
use permit_form::error::AppError;
use permit_form::workflows::study_permit::{ApplicationRecord, FormService, TemplateStore, Today};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) started_at: Instant,
    pub(crate) environment: AppEnvironment,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Reads an application record from disk. Accepts either the bare record or the client's
/// request envelope `{ "formData": { ... } }`.
pub(crate) fn load_record(path: &Path) -> Result<ApplicationRecord, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let mut value: serde_json::Value = serde_json::from_str(&raw)?;
    if let Some(inner) = value.get_mut("formData") {
        value = inner.take();
    }
    Ok(serde_json::from_value(value)?)
}

/// Form service for one-shot CLI commands, pinned to `today` when given.
pub(crate) fn cli_form_service(today: Option<NaiveDate>) -> Result<FormService, AppError> {
    let config = AppConfig::load()?;
    let today = today.map(Today::Fixed).unwrap_or_default();
    Ok(FormService::new(TemplateStore::new(config.templates), today))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_record_unwraps_the_request_envelope() {
        let path = std::env::temp_dir().join("permit-form-api-envelope.json");
        std::fs::write(
            &path,
            r#"{"formData":{"personalInfo":{"familyName":"Smith","givenNames":"John"}}}"#,
        )
        .expect("write fixture");

        let record = load_record(&path).expect("record loads");
        assert_eq!(record.personal_info().family_name.value(), Some("Smith"));
    }

    #[test]
    fn load_record_reports_malformed_json() {
        let path = std::env::temp_dir().join("permit-form-api-malformed.json");
        std::fs::write(&path, "{ not json").expect("write fixture");

        let err = load_record(&path).expect_err("malformed");
        assert!(matches!(err, AppError::Record(_)));
    }

    #[test]
    fn load_record_reports_missing_files() {
        let err = load_record(Path::new("/nonexistent/permit-form/record.json"))
            .expect_err("missing file");
        assert!(matches!(err, AppError::Io(_)));
    }
}
