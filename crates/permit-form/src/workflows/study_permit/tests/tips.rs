use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::workflows::study_permit::tips::{
    TipBody, TipError, TipGenerator, TipService, TipSource,
};

#[derive(Default)]
struct CannedGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl TipGenerator for CannedGenerator {
    async fn generate_tip(&self, field_name: &str, _context: &Value) -> Result<String, TipError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Double-check {field_name} against your acceptance letter."))
    }
}

struct FailingGenerator;

#[async_trait]
impl TipGenerator for FailingGenerator {
    async fn generate_tip(&self, _field_name: &str, _context: &Value) -> Result<String, TipError> {
        Err(TipError::Response("chat completion returned 503".to_string()))
    }
}

struct SlowGenerator;

#[async_trait]
impl TipGenerator for SlowGenerator {
    async fn generate_tip(&self, _field_name: &str, _context: &Value) -> Result<String, TipError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}

fn service_with(generator: Arc<dyn TipGenerator>) -> TipService {
    TipService::new(Some(generator), Duration::from_millis(50))
}

#[tokio::test]
async fn ai_tip_keeps_the_catalog_entry_alongside() {
    let generator = Arc::new(CannedGenerator::default());
    let service = service_with(generator.clone());

    let response = service.get_tip("dli", &json!({}), true).await;
    assert_eq!(response.source, TipSource::Ai);
    match &response.tip {
        TipBody::Generated(tip) => {
            assert_eq!(tip.title, "AI Guidance: Dli");
            assert!(tip.tip.contains("dli"));
            assert!(!tip.generated_at.is_empty());
        }
        other => panic!("expected generated tip, got {other:?}"),
    }
    assert_eq!(response.static_tip.map(|tip| tip.key), Some("dli"));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn ai_is_only_called_when_requested() {
    let generator = Arc::new(CannedGenerator::default());
    let service = service_with(generator.clone());

    let response = service.get_tip("passport", &json!({}), false).await;
    assert_eq!(response.source, TipSource::Static);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failures_fall_back_to_the_catalog() {
    let service = service_with(Arc::new(FailingGenerator));
    let response = service.get_tip("proofOfFunds", &json!({}), true).await;
    assert_eq!(response.source, TipSource::Static);
    assert!(matches!(response.tip, TipBody::Static(tip) if tip.key == "proofOfFunds"));
    assert!(response.static_tip.is_none());
}

#[tokio::test]
async fn slow_generators_are_cut_off() {
    let service = service_with(Arc::new(SlowGenerator));
    let response = service.get_tip("favouriteColour", &json!({}), true).await;
    assert_eq!(response.source, TipSource::Generic);

    let body = serde_json::to_value(&response).expect("response serializes");
    assert_eq!(body["source"], "generic");
    assert_eq!(body["tip"]["title"], "Guidance for Favourite Colour");
    assert!(body["tip"]["note"].is_string());
}

#[tokio::test]
async fn offline_service_never_reports_ai() {
    let service = TipService::offline();
    assert!(!service.ai_available());
    let response = service.get_tip("studyPlan", &json!({}), true).await;
    assert_eq!(response.source, TipSource::Static);
}
