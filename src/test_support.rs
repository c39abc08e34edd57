use crate::config::{Config, CorsConfig, LogLevel, RekognitionConfig, ServerConfig};
use crate::detector::{DetectionParams, DetectorError, LabelDetector, LabelRecord};
use async_trait::async_trait;
use std::{
    io,
    sync::{Arc, Mutex},
};
use tracing::subscriber::DefaultGuard;

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            max_body_bytes: 1024,
        },
        log_level: LogLevel::Info,
        cors: CorsConfig::default(),
        rekognition: RekognitionConfig::default(),
    }
}

pub fn label(name: &str, confidence: f32) -> LabelRecord {
    LabelRecord {
        name: Some(name.to_string()),
        confidence: Some(confidence),
        instances: None,
        parents: None,
        aliases: None,
        categories: None,
    }
}

/// Records every call and answers with a canned result.
pub struct MockDetector {
    result: Result<Vec<LabelRecord>, String>,
    pub calls: Mutex<Vec<(Vec<u8>, DetectionParams)>>,
}

impl MockDetector {
    pub fn returning(labels: Vec<LabelRecord>) -> Self {
        Self {
            result: Ok(labels),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn received_images(&self) -> Vec<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(image, _)| image.clone())
            .collect()
    }
}

#[async_trait]
impl LabelDetector for MockDetector {
    async fn detect_labels(
        &self,
        image: Vec<u8>,
        params: &DetectionParams,
    ) -> Result<Vec<LabelRecord>, DetectorError> {
        self.calls.lock().unwrap().push((image, params.clone()));
        self.result.clone().map_err(DetectorError::Provider)
    }
}

/// Plain-text log sink for asserting on emitted events.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn set_default(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
