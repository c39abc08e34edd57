mod detector;
mod image_payload;
mod rekognition;
mod routes;
mod server;
mod telemetry;

#[cfg(test)]
mod test_support;

pub mod app;
pub mod config;

pub use app::start_app;
pub use detector::{
    DetectionParams, DetectorError, LabelBoundingBox, LabelDetector, LabelInstance, LabelRecord,
    NamedLabel,
};
