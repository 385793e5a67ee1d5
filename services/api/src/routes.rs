use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use permit_form::workflows::study_permit::{form_router, FormApi};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_form_routes(api: Arc<FormApi>) -> axum::Router {
    form_router(api)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "environment": state.environment.label(),
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use permit_form::config::{AppEnvironment, TemplateConfig};
    use permit_form::workflows::study_permit::{FormService, TemplateStore, TipService, Today};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            started_at: Instant::now(),
            environment: AppEnvironment::Test,
        }
    }

    fn app(state: AppState) -> axum::Router {
        let forms = FormService::new(TemplateStore::new(TemplateConfig::default()), Today::System);
        let api = Arc::new(FormApi::new(forms, TipService::offline()));
        with_form_routes(api).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn health_reports_environment_and_uptime() {
        let (status, body) = get(app(state(true)), "/health").await;
        assert_eq!(status, StatusCode::OK);

        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["status"], "OK");
        assert_eq!(payload["environment"], "test");
        assert!(payload["uptime"].as_f64().expect("uptime") >= 0.0);
        assert!(payload["timestamp"].as_str().expect("timestamp").ends_with('Z'));
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let state = state(false);
        let flag = state.readiness.clone();

        let (status, _) = get(app(state.clone()), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        flag.store(true, Ordering::Release);
        let (status, body) = get(app(state), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&body).contains("ready"));
    }

    #[tokio::test]
    async fn form_routes_are_mounted_alongside_health() {
        let (status, body) = get(app(state(true)), "/api/tips/test").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.is_empty());
    }
}
