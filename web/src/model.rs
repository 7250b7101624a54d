//! Wire types shared with the flood-report service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Coordinate ──────────────────────────────────────────────────────────────

/// A position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Accepts only coordinates inside the valid envelope:
    /// latitude in [-90, 90], longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Some(Coordinate {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

// ─── Risk level ──────────────────────────────────────────────────────────────

/// Severity classification assigned by the service.
///
/// The wire value is a free-form string; anything outside the known set
/// falls back to [`RiskLevel::Unknown`] so a misbehaving server can never
/// break marker rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    LightYellow,
    Yellow,
    LightRed,
    Red,
    #[serde(other)]
    Unknown,
}

impl RiskLevel {
    /// Marker colour for this level. Unknown levels get the neutral default
    /// (Leaflet's marker blue).
    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::None => "green",
            RiskLevel::LightYellow => "#FFFFE0",
            RiskLevel::Yellow => "yellow",
            RiskLevel::LightRed => "#FF7F7F",
            RiskLevel::Red => "red",
            RiskLevel::Unknown => "#3388FF",
        }
    }

    /// CSS classes for the map marker icon. Must stay in sync with the
    /// `.risk-*` rules in `style/main.css`.
    pub fn marker_class(self) -> &'static str {
        match self {
            RiskLevel::None => "risk-marker risk-none",
            RiskLevel::LightYellow => "risk-marker risk-light-yellow",
            RiskLevel::Yellow => "risk-marker risk-yellow",
            RiskLevel::LightRed => "risk-marker risk-light-red",
            RiskLevel::Red => "risk-marker risk-red",
            RiskLevel::Unknown => "risk-marker risk-unknown",
        }
    }

    /// Wire-style name shown in the popup.
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::LightYellow => "light_yellow",
            RiskLevel::Yellow => "yellow",
            RiskLevel::LightRed => "light_red",
            RiskLevel::Red => "red",
            RiskLevel::Unknown => "unknown",
        }
    }
}

// ─── Flood depth ─────────────────────────────────────────────────────────────

/// Reported flood depth. The service has returned both labels
/// (`"ankle_deep"`) and bare numbers over time, so the wire format is kept
/// loose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FloodDepth {
    Number(f64),
    Label(String),
}

impl std::fmt::Display for FloodDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloodDepth::Number(n) => write!(f, "{n}"),
            FloodDepth::Label(s) => f.write_str(s),
        }
    }
}

// ─── Flood report ────────────────────────────────────────────────────────────

/// A persisted flood observation as returned by the service.
///
/// Only the service creates these (on submission or listing); the client
/// never assigns an id and never mutates a report after it arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodReport {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub location_name: Option<String>,
    pub risk_level: RiskLevel,
    pub flood_depth: FloodDepth,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FloodReport {
    /// Absolute URL of the attached image, if any. The service stores
    /// `image_url` as a path relative to its own origin and serializes
    /// "no image" as either `null` or the empty string.
    pub fn image_href(&self) -> Option<String> {
        self.image_url
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(crate::api::asset_url)
    }

    /// Popup title: the named location when the service resolved one.
    pub fn title(&self) -> &str {
        self.location_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Flood Report")
    }

    /// Human-readable submission time.
    pub fn submitted_at(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn report_json(risk: &str, image: &str) -> String {
        format!(
            r#"{{
                "id": 1,
                "latitude": 1.3521,
                "longitude": 103.8198,
                "location_name": "",
                "risk_level": "{risk}",
                "flood_depth": "ankle_deep",
                "image_url": "{image}",
                "created_at": "2026-08-01T09:30:00Z"
            }}"#
        )
    }

    #[test]
    fn coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(90.1, 0.0).is_none());
        assert!(Coordinate::new(0.0, -180.5).is_none());
        let c = Coordinate::new(-45.0, 170.0).unwrap();
        assert_eq!(c.latitude, -45.0);
        assert_eq!(c.longitude, 170.0);
    }

    #[test]
    fn known_risk_levels_parse() {
        for (wire, expected) in [
            ("none", RiskLevel::None),
            ("light_yellow", RiskLevel::LightYellow),
            ("yellow", RiskLevel::Yellow),
            ("light_red", RiskLevel::LightRed),
            ("red", RiskLevel::Red),
        ] {
            let parsed: RiskLevel = serde_json::from_str(&format!("\"{wire}\"")).unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(parsed.label(), wire);
        }
    }

    #[test]
    fn unrecognized_risk_level_degrades_to_default() {
        let parsed: RiskLevel = serde_json::from_str("\"purple_alert\"").unwrap();
        assert_eq!(parsed, RiskLevel::Unknown);
        assert_eq!(parsed.color(), "#3388FF");
        assert_eq!(parsed.marker_class(), "risk-marker risk-unknown");
    }

    #[test]
    fn red_report_parses_with_colour() {
        let report: FloodReport = serde_json::from_str(&report_json("red", "")).unwrap();
        assert_eq!(report.risk_level, RiskLevel::Red);
        assert_eq!(report.risk_level.color(), "red");
        assert_eq!(report.latitude, 1.3521);
        assert_eq!(report.longitude, 103.8198);
    }

    #[test]
    fn flood_depth_accepts_label_and_number() {
        let label: FloodDepth = serde_json::from_str("\"knee_deep\"").unwrap();
        assert_eq!(label.to_string(), "knee_deep");
        let number: FloodDepth = serde_json::from_str("0.4").unwrap();
        assert_eq!(number.to_string(), "0.4");
    }

    #[test]
    fn empty_image_url_means_no_thumbnail() {
        let report: FloodReport = serde_json::from_str(&report_json("red", "")).unwrap();
        assert_eq!(report.image_href(), None);

        let report: FloodReport =
            serde_json::from_str(&report_json("red", "uploads/flood.jpg")).unwrap();
        let href = report.image_href().unwrap();
        assert!(href.ends_with("/uploads/flood.jpg"));
    }

    #[test]
    fn empty_location_name_falls_back_to_generic_title() {
        let report: FloodReport = serde_json::from_str(&report_json("red", "")).unwrap();
        assert_eq!(report.title(), "Flood Report");
    }

    #[test]
    fn submitted_at_is_human_readable() {
        let report: FloodReport = serde_json::from_str(&report_json("red", "")).unwrap();
        assert_eq!(report.submitted_at(), "2026-08-01 09:30");
    }
}
