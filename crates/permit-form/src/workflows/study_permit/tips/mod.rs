//! Field guidance: a static tip catalog plus an optional, time-boxed AI generator that
//! always falls back to the catalog.

mod catalog;
mod generator;

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::TipsConfig;

pub use catalog::{display_name, static_tip, StaticTip, STATIC_TIPS};
pub use generator::{OpenAiTipGenerator, TipGenerator};

#[derive(Debug, Error)]
pub enum TipError {
    #[error("AI tips are not configured")]
    Unavailable,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("unexpected AI response: {0}")]
    Response(String),
    #[error("AI tip timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TipSource {
    Ai,
    Static,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTip {
    pub title: String,
    pub tip: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericTip {
    pub title: String,
    pub tip: &'static str,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TipBody {
    Generated(GeneratedTip),
    Static(&'static StaticTip),
    Generic(GenericTip),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TipResponse {
    pub tip: TipBody,
    /// The catalog entry kept alongside an AI tip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_tip: Option<&'static StaticTip>,
    pub source: TipSource,
}

impl TipResponse {
    fn from_catalog(field_name: &str) -> Self {
        match static_tip(field_name) {
            Some(tip) => Self {
                tip: TipBody::Static(tip),
                static_tip: None,
                source: TipSource::Static,
            },
            None => Self {
                tip: TipBody::Generic(GenericTip {
                    title: format!("Guidance for {}", display_name(field_name)),
                    tip: "Please ensure this field is filled accurately and completely. Refer to IRCC guidelines for specific requirements.",
                    note: "Enable AI tips in settings for more detailed guidance.",
                }),
                static_tip: None,
                source: TipSource::Generic,
            },
        }
    }
}

pub struct TipService {
    generator: Option<Arc<dyn TipGenerator>>,
    timeout: Duration,
}

impl TipService {
    pub fn new(generator: Option<Arc<dyn TipGenerator>>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Catalog-only service.
    pub fn offline() -> Self {
        Self::new(None, Duration::from_secs(10))
    }

    pub fn from_config(config: &TipsConfig) -> Self {
        let generator = OpenAiTipGenerator::from_config(config)
            .map(|generator| Arc::new(generator) as Arc<dyn TipGenerator>);
        Self::new(generator, config.timeout)
    }

    pub fn ai_available(&self) -> bool {
        self.generator.is_some()
    }

    async fn generate(&self, field_name: &str, context: &Value) -> Result<String, TipError> {
        let generator = self.generator.as_ref().ok_or(TipError::Unavailable)?;
        tokio::time::timeout(self.timeout, generator.generate_tip(field_name, context))
            .await
            .map_err(|_| TipError::Timeout(self.timeout))?
    }

    /// AI guidance when asked for and configured, otherwise the catalog. AI failures are
    /// logged and answered from the catalog.
    pub async fn get_tip(&self, field_name: &str, context: &Value, use_ai: bool) -> TipResponse {
        if use_ai && self.ai_available() {
            match self.generate(field_name, context).await {
                Ok(tip) => {
                    debug!(field = field_name, "AI tip generated");
                    return TipResponse {
                        tip: TipBody::Generated(GeneratedTip {
                            title: format!("AI Guidance: {}", display_name(field_name)),
                            tip,
                            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                        }),
                        static_tip: static_tip(field_name),
                        source: TipSource::Ai,
                    };
                }
                Err(err) => warn!(field = field_name, error = %err, "AI tip failed; using static tip"),
            }
        }
        TipResponse::from_catalog(field_name)
    }
}

impl Default for TipService {
    fn default() -> Self {
        Self::offline()
    }
}
