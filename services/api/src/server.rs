use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_form_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use permit_form::config::AppConfig;
use permit_form::error::AppError;
use permit_form::telemetry;
use permit_form::workflows::study_permit::{FormApi, FormService, TipService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        started_at: Instant::now(),
        environment: config.environment,
    };

    let forms = FormService::from_config(&config.templates);
    let tips = TipService::from_config(&config.tips);
    info!(
        template = %config.templates.pdf_template_path().display(),
        ai_tips = tips.ai_available(),
        "form services configured"
    );
    let api = Arc::new(
        FormApi::new(forms, tips).with_error_detail(config.environment.exposes_error_detail()),
    );

    let app = with_form_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(environment = config.environment.label(), %addr, "study permit form service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
