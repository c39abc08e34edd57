use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagePayloadError {
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Image payload is empty")]
    Empty,
}

/// Strips an optional data-URI header (`data:<mime>;base64,`) and decodes the
/// remaining base64 text.
pub fn decode_image_payload(raw: &str) -> Result<Vec<u8>, ImagePayloadError> {
    let encoded = strip_data_uri_header(raw);
    let image = general_purpose::STANDARD.decode(encoded)?;

    if image.is_empty() {
        return Err(ImagePayloadError::Empty);
    }

    Ok(image)
}

fn strip_data_uri_header(raw: &str) -> &str {
    match raw.split_once(',') {
        Some((_header, payload)) => payload,
        None => raw,
    }
}
