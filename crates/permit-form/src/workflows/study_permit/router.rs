use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use super::domain::ApplicationRecord;
use super::rules::ValidationMode;
use super::service::{DocumentTarget, FormService, FormServiceError, RenderOutcome};
use super::tips::{static_tip, TipService, STATIC_TIPS};

const COMPLETE_FORM_HINT: &str = "This endpoint expects the complete form structure with all fields: personal details, marital status, languages, passport, national identity document, US PR card, contact information, study details, education, employment, and background information.";

/// Shared state behind the `/api/pdf` and `/api/tips` routes.
pub struct FormApi {
    pub forms: FormService,
    pub tips: TipService,
    pub expose_error_detail: bool,
}

impl FormApi {
    pub fn new(forms: FormService, tips: TipService) -> Self {
        Self {
            forms,
            tips,
            expose_error_detail: false,
        }
    }

    pub fn with_error_detail(mut self, expose: bool) -> Self {
        self.expose_error_detail = expose;
        self
    }
}

/// Router builder exposing validation, checklist, document, and tip endpoints.
pub fn form_router(api: Arc<FormApi>) -> Router {
    Router::new()
        .route("/api/pdf/validate", post(validate_handler))
        .route("/api/pdf/checklist", post(checklist_handler))
        .route("/api/pdf/generate", post(generate_handler))
        .route("/api/pdf/generate-form", post(generate_form_handler))
        .route(
            "/api/pdf/generate-complete-form",
            post(generate_complete_form_handler),
        )
        .route("/api/pdf/generate-xfdf", post(generate_xfdf_handler))
        .route("/api/pdf/export-xfdf", post(generate_xfdf_handler))
        .route("/api/pdf/generate-summary", post(generate_summary_handler))
        .route(
            "/api/pdf/generate-html-summary",
            post(generate_summary_handler),
        )
        .route("/api/pdf/test", get(pdf_test_handler))
        .route("/api/tips/get-tips", post(get_tips_handler))
        .route("/api/tips/validate-field", post(validate_field_handler))
        .route("/api/tips/all", get(all_tips_handler))
        .route("/api/tips/test", get(tips_test_handler))
        .with_state(api)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FormRequest {
    form_data: Option<ApplicationRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TipRequest {
    field_name: Option<String>,
    #[serde(default, alias = "formData")]
    context: Value,
    #[serde(default, rename = "useAI")]
    use_ai: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldRequest {
    field_name: Option<String>,
    #[serde(default)]
    value: Value,
    #[serde(default, alias = "formData")]
    context: Value,
}

fn bad_request(message: impl Into<String>) -> Response {
    let payload = json!({
        "success": false,
        "error": message.into(),
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

/// Decoded record, or the 400 response for a malformed body or missing `formData`.
fn form_data(payload: Result<axum::Json<FormRequest>, JsonRejection>) -> Result<ApplicationRecord, Response> {
    match payload {
        Ok(axum::Json(FormRequest {
            form_data: Some(record),
        })) => Ok(record),
        Ok(_) => Err(bad_request("Form data is required")),
        Err(rejection) => Err(bad_request(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    }
}

fn failure(api: &FormApi, summary: &str, err: &dyn std::error::Error) -> Response {
    error!(error = %err, "{summary}");
    let mut payload = json!({
        "success": false,
        "error": summary,
        "message": err.to_string(),
    });
    if api.expose_error_detail {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        payload["detail"] = json!(chain);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

async fn render_response(
    api: &FormApi,
    payload: Result<axum::Json<FormRequest>, JsonRejection>,
    target: DocumentTarget,
    failure_summary: &str,
) -> Response {
    let record = match form_data(payload) {
        Ok(record) => record,
        Err(response) => return response,
    };

    match api.forms.render(&record, target) {
        Ok(RenderOutcome::Rendered(document)) => {
            let disposition = format!("attachment; filename={}", document.file_name());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, document.content_type()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                document.bytes,
            )
                .into_response()
        }
        Ok(RenderOutcome::Invalid(report)) => {
            let mut payload = json!({
                "success": false,
                "error": "Form data contains validation errors",
                "errors": report.errors,
                "validation": report,
            });
            if target == DocumentTarget::CompletePdf {
                payload["hint"] = json!(COMPLETE_FORM_HINT);
            }
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(FormServiceError::Render(err)) => failure(api, failure_summary, &err),
    }
}

pub(crate) async fn generate_handler(
    State(api): State<Arc<FormApi>>,
    payload: Result<axum::Json<FormRequest>, JsonRejection>,
) -> Response {
    render_response(&api, payload, DocumentTarget::FilledTemplate, "Failed to generate PDF").await
}

pub(crate) async fn generate_form_handler(
    State(api): State<Arc<FormApi>>,
    payload: Result<axum::Json<FormRequest>, JsonRejection>,
) -> Response {
    render_response(&api, payload, DocumentTarget::EssentialPdf, "Failed to generate PDF form").await
}

pub(crate) async fn generate_complete_form_handler(
    State(api): State<Arc<FormApi>>,
    payload: Result<axum::Json<FormRequest>, JsonRejection>,
) -> Response {
    render_response(
        &api,
        payload,
        DocumentTarget::CompletePdf,
        "Failed to generate complete PDF form",
    )
    .await
}

pub(crate) async fn generate_xfdf_handler(
    State(api): State<Arc<FormApi>>,
    payload: Result<axum::Json<FormRequest>, JsonRejection>,
) -> Response {
    render_response(&api, payload, DocumentTarget::Xfdf, "Failed to generate XFDF").await
}

pub(crate) async fn generate_summary_handler(
    State(api): State<Arc<FormApi>>,
    payload: Result<axum::Json<FormRequest>, JsonRejection>,
) -> Response {
    render_response(
        &api,
        payload,
        DocumentTarget::HtmlSummary,
        "Failed to generate HTML summary",
    )
    .await
}

pub(crate) async fn validate_handler(
    State(api): State<Arc<FormApi>>,
    payload: Result<axum::Json<FormRequest>, JsonRejection>,
) -> Response {
    let record = match form_data(payload) {
        Ok(record) => record,
        Err(response) => return response,
    };
    let report = api.forms.validate(&record, ValidationMode::Complete);
    let payload = json!({
        "success": true,
        "validation": report,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn checklist_handler(
    State(api): State<Arc<FormApi>>,
    payload: Result<axum::Json<FormRequest>, JsonRejection>,
) -> Response {
    let record = match form_data(payload) {
        Ok(record) => record,
        Err(response) => return response,
    };
    let checklist = api.forms.checklist(&record);
    let payload = json!({
        "success": true,
        "checklist": checklist.checklist,
        "summary": checklist.summary,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn pdf_test_handler() -> Response {
    let payload = json!({
        "success": true,
        "message": "PDF routes are working",
        "availableEndpoints": [
            "POST /api/pdf/generate-complete-form - Generate the complete form with every section",
            "POST /api/pdf/generate-form - Generate the core sections from scratch",
            "POST /api/pdf/generate-summary - Generate HTML data summary for manual filling",
            "POST /api/pdf/generate - Fill the official PDF template",
            "POST /api/pdf/generate-xfdf - Generate XFDF data file for import",
            "POST /api/pdf/validate - Validate form data",
            "POST /api/pdf/checklist - Generate document checklist",
        ],
        "recommendation": "Use /api/pdf/generate-complete-form for the most comprehensive IMM 1294 form.",
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn required_field_name(name: Option<String>) -> Result<String, Response> {
    name.map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| bad_request("Field name is required"))
}

pub(crate) async fn get_tips_handler(
    State(api): State<Arc<FormApi>>,
    payload: Result<axum::Json<TipRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => {
            return bad_request(format!("Invalid request body: {}", rejection.body_text()))
        }
    };
    let field_name = match required_field_name(request.field_name) {
        Ok(name) => name,
        Err(response) => return response,
    };

    let tip = api
        .tips
        .get_tip(&field_name, &request.context, request.use_ai)
        .await;
    let mut payload = json!({ "success": true });
    if let (Value::Object(target), Ok(Value::Object(fields))) =
        (&mut payload, serde_json::to_value(&tip))
    {
        target.extend(fields);
    }
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn suggestions(field_name: &str, value: &Value, errors: &[String], warnings: &[String]) -> Vec<Value> {
    let mut suggestions = Vec::new();
    if let Some(first) = errors.first() {
        suggestions.push(json!({ "type": "error", "message": first }));
    }
    let blank = match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    };
    if field_name == "dli" && blank {
        suggestions.push(json!({
            "type": "info",
            "message": "You can find your institution's DLI number on their website or in your acceptance letter",
        }));
    }
    for warning in warnings {
        suggestions.push(json!({ "type": "warning", "message": warning }));
    }
    suggestions
}

pub(crate) async fn validate_field_handler(
    State(api): State<Arc<FormApi>>,
    payload: Result<axum::Json<FieldRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => {
            return bad_request(format!("Invalid request body: {}", rejection.body_text()))
        }
    };
    let field_name = match required_field_name(request.field_name) {
        Ok(name) => name,
        Err(response) => return response,
    };

    let context = match request.context {
        Value::Null => ApplicationRecord::default(),
        context => match serde_json::from_value::<ApplicationRecord>(context) {
            Ok(record) => record,
            Err(err) => {
                warn!(field = %field_name, error = %err, "field check context rejected");
                return bad_request(format!("Invalid form data context: {err}"));
            }
        },
    };
    let check = api.forms.check_field(&field_name, &request.value, &context);
    let payload = json!({
        "success": true,
        "suggestions": suggestions(&field_name, &request.value, &check.errors, &check.warnings),
        "validation": check,
        "tip": static_tip(&field_name),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn all_tips_handler(State(api): State<Arc<FormApi>>) -> Response {
    let tips: serde_json::Map<String, Value> = STATIC_TIPS
        .iter()
        .map(|tip| (tip.key.to_string(), json!(tip)))
        .collect();
    let payload = json!({
        "success": true,
        "tips": tips,
        "aiAvailable": api.tips.ai_available(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn tips_test_handler(State(api): State<Arc<FormApi>>) -> Response {
    let payload = json!({
        "success": true,
        "message": "Tips routes are working",
        "aiEnabled": api.tips.ai_available(),
        "availableStaticTips": STATIC_TIPS.iter().map(|tip| tip.key).collect::<Vec<_>>(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
