//! HTTP client for the report-storage service.
//!
//! The service is an external collaborator exposing `GET /api/reports` and
//! `POST /api/report`, both wrapped in a `{status, data}` / `{error}`
//! envelope. Uploaded images are served from the same origin, so asset paths
//! resolve against [`api_base`] too.

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{Coordinate, FloodReport};

/// Origin of the report service. Overridable at build time so deployments
/// can point the client elsewhere without code changes.
pub fn api_base() -> &'static str {
    option_env!("SEEFLOOD_API_BASE").unwrap_or("http://localhost:8080")
}

/// Resolve a service-relative asset path (e.g. `uploads/xyz.jpg`).
pub fn asset_url(path: &str) -> String {
    format!(
        "{}/{}",
        api_base().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn endpoint(path: &str) -> String {
    format!("{}{path}", api_base().trim_end_matches('/'))
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with an application-level error message.
    #[error("{0}")]
    Rejected(String),
    #[error("unexpected response from server")]
    Malformed,
}

// ─── Response envelope ───────────────────────────────────────────────────────

/// `{status: "success", data}` on success; `{error}` (with or without a
/// `status` field) on failure.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|_| ApiError::Malformed)?;
    if envelope.status.as_deref() == Some("success") {
        return envelope.data.ok_or(ApiError::Malformed);
    }
    match envelope.error {
        Some(message) => Err(ApiError::Rejected(message)),
        None => Err(ApiError::Malformed),
    }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// An image ready for upload, detached from any DOM handle.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

/// Fetch every known report. Called once at startup; afterwards the list
/// only grows through local submissions.
pub async fn fetch_reports() -> Result<Vec<FloodReport>, ApiError> {
    let body = reqwest::Client::new()
        .get(endpoint("/api/reports"))
        .send()
        .await?
        .text()
        .await?;
    parse_envelope(&body)
}

/// Submit a new report as multipart form data. The service classifies the
/// image and responds with the stored record.
pub async fn submit_report(
    image: ImageUpload,
    location: Coordinate,
) -> Result<FloodReport, ApiError> {
    let part = multipart::Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.mime)?;
    let form = multipart::Form::new()
        .part("image", part)
        .text("latitude", location.latitude.to_string())
        .text("longitude", location.longitude.to_string());

    let body = reqwest::Client::new()
        .post(endpoint("/api/report"))
        .multipart(form)
        .send()
        .await?
        .text()
        .await?;
    parse_envelope(&body)
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskLevel;

    #[test]
    fn reports_envelope_parses() {
        let body = r#"{
            "status": "success",
            "data": [{
                "id": 1,
                "latitude": 51.5,
                "longitude": -0.09,
                "risk_level": "red",
                "flood_depth": "knee_deep",
                "image_url": "uploads/a.jpg",
                "created_at": "2026-08-01T09:30:00Z"
            }]
        }"#;
        let reports: Vec<FloodReport> = parse_envelope(body).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, 1);
        assert_eq!(reports[0].risk_level, RiskLevel::Red);
    }

    #[test]
    fn submit_envelope_parses() {
        let body = r#"{
            "status": "success",
            "data": {
                "id": 2,
                "latitude": 51.5,
                "longitude": -0.09,
                "risk_level": "yellow",
                "flood_depth": 0.2,
                "created_at": "2026-08-01T10:00:00Z"
            }
        }"#;
        let report: FloodReport = parse_envelope(body).unwrap();
        assert_eq!(report.id, 2);
        assert_eq!(report.risk_level, RiskLevel::Yellow);
    }

    #[test]
    fn error_body_surfaces_service_message() {
        let err = parse_envelope::<FloodReport>(r#"{"error": "too large"}"#).unwrap_err();
        match err {
            ApiError::Rejected(message) => assert_eq!(message, "too large"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn non_success_status_with_message_is_rejected() {
        let err =
            parse_envelope::<Vec<FloodReport>>(r#"{"status": "error", "error": "db down"}"#)
                .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(m) if m == "db down"));
    }

    #[test]
    fn garbage_bodies_are_malformed() {
        assert!(matches!(
            parse_envelope::<FloodReport>("<html>502</html>"),
            Err(ApiError::Malformed)
        ));
        // success status without a payload is just as unusable
        assert!(matches!(
            parse_envelope::<FloodReport>(r#"{"status": "success"}"#),
            Err(ApiError::Malformed)
        ));
    }

    #[test]
    fn asset_urls_join_with_single_slash() {
        let url = asset_url("uploads/flood.jpg");
        assert!(url.ends_with("/uploads/flood.jpg"));
        assert!(!url.contains("//uploads"));
        assert_eq!(asset_url("/uploads/flood.jpg"), url);
    }
}
