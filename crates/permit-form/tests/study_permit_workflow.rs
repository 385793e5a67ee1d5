use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use chrono::NaiveDate;
use permit_form::config::TemplateConfig;
use permit_form::workflows::study_permit::{
    example_record, form_router, ApplicationRecord, DocumentTarget, FormApi, FormService,
    FormServiceError, RenderOutcome, TemplateStore, TipService, Today, ValidationMode,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn intake_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid intake date")
}

fn service() -> FormService {
    let templates = TemplateStore::new(TemplateConfig {
        directory: std::env::temp_dir().join("permit-form-missing"),
        ..TemplateConfig::default()
    });
    FormService::new(templates, Today::Fixed(intake_day()))
}

/// The example applicant as a browser client would post it: loose strings for flags and amounts.
fn client_payload() -> Value {
    let mut payload = serde_json::to_value(example_record()).expect("record serializes");
    payload["studyDetails"]["fundsAvailable"] = json!("$60,000");
    payload["contactInfo"]["residentialSameAsMailing"] = json!("yes");
    payload
}

#[test]
fn client_payload_passes_both_validation_modes_and_lists_documents() {
    let record: ApplicationRecord =
        serde_json::from_value(client_payload()).expect("payload decodes");
    let service = service();

    for mode in [ValidationMode::Complete, ValidationMode::Minimal] {
        let report = service.validate(&record, mode);
        assert!(report.is_valid, "{mode:?} errors: {:?}", report.errors.entries());
        assert_eq!(report.summary.invalid_fields, 0);
    }

    let checklist = service.checklist(&record);
    let ids: Vec<&str> = checklist.checklist.iter().map(|entry| entry.id).collect();
    for expected in [
        "application_form",
        "letter_of_acceptance",
        "passport",
        "proof_of_funds",
        "sponsor_documents",
        "language_test",
        "employment_letter",
        "police_certificate",
    ] {
        assert!(ids.contains(&expected), "missing {expected} in {ids:?}");
    }
    assert_eq!(checklist.summary.total_documents, checklist.checklist.len());
}

#[test]
fn every_scratch_target_renders_the_example_applicant() {
    let record = example_record();
    let service = service();

    for target in [
        DocumentTarget::EssentialPdf,
        DocumentTarget::CompletePdf,
        DocumentTarget::Xfdf,
        DocumentTarget::HtmlSummary,
    ] {
        let outcome = service.render(&record, target).expect("render succeeds");
        let RenderOutcome::Rendered(document) = outcome else {
            panic!("{} rejected a valid record", target.label());
        };
        assert!(!document.bytes.is_empty());
        assert!(document.pages >= 1);
    }

    let complete = service
        .render_document(&record, DocumentTarget::CompletePdf)
        .expect("complete pdf");
    let essential = service
        .render_document(&record, DocumentTarget::EssentialPdf)
        .expect("essential pdf");
    assert!(complete.bytes.starts_with(b"%PDF"));
    assert!(complete.pages >= essential.pages);
}

#[test]
fn filled_template_reports_the_missing_file() {
    let FormServiceError::Render(err) = service()
        .render(&example_record(), DocumentTarget::FilledTemplate)
        .expect_err("no template on disk");
    assert!(err.is_missing_resource(), "unexpected error: {err}");
}

#[tokio::test]
async fn http_surface_validates_then_renders_the_same_payload() {
    let api = Arc::new(FormApi::new(service(), TipService::offline()));
    let app = form_router(api);
    let body = json!({ "formData": client_payload() }).to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/pdf/validate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.clone()))
                .expect("request"),
        )
        .await
        .expect("validate response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let payload: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(payload["validation"]["isValid"], json!(true));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/pdf/generate-summary")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("request"),
        )
        .await
        .expect("summary response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let html = String::from_utf8(bytes.to_vec()).expect("utf-8 html");
    assert!(html.contains("University of Toronto"));
    assert!(html.contains("Generated on October 16, 2026"));
}
