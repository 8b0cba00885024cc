//! Sign-in payload wire contract
//!
//! The composer serializes a [`SignInRecord`] to canonical JSON and renders
//! it as a QR code; the intake parses the same text back (see `intake`).

use crate::types::SignInRecord;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::render::svg;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};

/// Minimum rendered QR size in pixels
const QR_MIN_DIMENSION: u32 = 240;

/// Errors producing the payload. None of these are user-correctable.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Failed to serialize sign-in record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),
}

/// Everything the player-side client needs to show a generated sign-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignInPayload {
    pub record: SignInRecord,
    /// Canonical JSON, also shown as copyable text
    pub text: String,
    pub qr_svg: String,
    /// `data:image/svg+xml;base64,...` form of `qr_svg`
    pub qr_data_uri: String,
}

/// Serialize a record to the canonical transport string
pub fn to_payload_text(record: &SignInRecord) -> Result<String, PayloadError> {
    Ok(serde_json::to_string(record)?)
}

/// Render payload text as an SVG QR code
pub fn render_qr_svg(text: &str) -> Result<String, PayloadError> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| PayloadError::QrEncode(e.to_string()))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// Encode a record into text, QR SVG and data URI
pub fn encode(record: SignInRecord) -> Result<SignInPayload, PayloadError> {
    let text = to_payload_text(&record)?;
    let qr_svg = render_qr_svg(&text)?;
    let qr_data_uri = format!("data:image/svg+xml;base64,{}", STANDARD.encode(&qr_svg));

    Ok(SignInPayload {
        record,
        text,
        qr_svg,
        qr_data_uri,
    })
}
