use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::TemplateConfig;
use crate::workflows::study_permit::domain::{
    ApplicationRecord, EducationHistory, MaritalInfo, PassportInfo, PersonalInfo, StudyDetails,
};
use crate::workflows::study_permit::render::TemplateStore;
use crate::workflows::study_permit::service::{FormService, Today};
use crate::workflows::study_permit::tips::TipService;
use crate::workflows::study_permit::{example_record, FormApi};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
}

pub(super) fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub(super) fn record() -> ApplicationRecord {
    example_record()
}

pub(super) fn with_personal(
    mut record: ApplicationRecord,
    edit: impl FnOnce(&mut PersonalInfo),
) -> ApplicationRecord {
    let mut section = record.personal_info().clone();
    edit(&mut section);
    record.set_personal_info(section);
    record
}

pub(super) fn with_marital(
    mut record: ApplicationRecord,
    edit: impl FnOnce(&mut MaritalInfo),
) -> ApplicationRecord {
    let mut section = record.marital_info().clone();
    edit(&mut section);
    record.set_marital_info(section);
    record
}

pub(super) fn with_passport(
    mut record: ApplicationRecord,
    edit: impl FnOnce(&mut PassportInfo),
) -> ApplicationRecord {
    let mut section = record.passport_info().clone();
    edit(&mut section);
    record.set_passport_info(section);
    record
}

pub(super) fn with_study(
    mut record: ApplicationRecord,
    edit: impl FnOnce(&mut StudyDetails),
) -> ApplicationRecord {
    let mut section = record.study_details().clone();
    edit(&mut section);
    record.set_study_details(section);
    record
}

pub(super) fn with_education(
    mut record: ApplicationRecord,
    edit: impl FnOnce(&mut EducationHistory),
) -> ApplicationRecord {
    let mut section = record.education_history().clone();
    edit(&mut section);
    record.set_education_history(section);
    record
}

pub(super) fn missing_templates() -> TemplateConfig {
    TemplateConfig {
        directory: PathBuf::from("no-such-template-dir"),
        ..TemplateConfig::default()
    }
}

pub(super) fn form_service() -> FormService {
    FormService::new(TemplateStore::new(missing_templates()), Today::Fixed(today()))
}

pub(super) fn form_api() -> Arc<FormApi> {
    Arc::new(FormApi::new(form_service(), TipService::offline()))
}

pub(super) fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("body serializes")))
        .expect("request builds")
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

pub(super) async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable")
        .to_vec()
}

pub(super) async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}
