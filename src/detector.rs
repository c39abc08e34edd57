use crate::config::RekognitionConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PERSON_LABEL: &str = "Person";

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Label detection provider failed: {0}")]
    Provider(String),
}

/// A label as returned by the provider, kept in the provider's own JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<Vec<LabelInstance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<NamedLabel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<NamedLabel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<NamedLabel>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<LabelBoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Ratios of the overall image size, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelBoundingBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NamedLabel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    pub max_labels: i32,
    /// Percentage, 0 to 100.
    pub min_confidence: f32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            max_labels: 10,
            min_confidence: 50.0,
        }
    }
}

impl From<&RekognitionConfig> for DetectionParams {
    fn from(config: &RekognitionConfig) -> Self {
        Self {
            max_labels: config.max_labels,
            min_confidence: config.min_confidence,
        }
    }
}

#[async_trait]
pub trait LabelDetector: Send + Sync + 'static {
    async fn detect_labels(
        &self,
        image: Vec<u8>,
        params: &DetectionParams,
    ) -> Result<Vec<LabelRecord>, DetectorError>;
}

pub fn label_names(labels: &[LabelRecord]) -> Vec<String> {
    labels
        .iter()
        .filter_map(|label| label.name.clone())
        .collect()
}

/// Logs the detected label names. Returns whether a person was detected.
pub fn report_labels(labels: &[LabelRecord]) -> bool {
    let names = label_names(labels);
    tracing::info!("Detected labels: {:?}", names);

    let person_detected = names.iter().any(|name| name == PERSON_LABEL);
    if person_detected {
        tracing::warn!("PERSON detected in image!");
    }

    if !names.is_empty() {
        tracing::info!("Objects detected: {}", names.join(", "));
    }

    person_detected
}
