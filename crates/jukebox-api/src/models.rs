//! Wire models for the jukebox HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/tracks/request`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackRequestBody {
    /// Title of the track to acquire.
    pub title: String,
}

/// Successful acquisition response.
#[derive(Debug, Clone, Serialize)]
pub struct TrackResponse {
    /// The trimmed requested title.
    pub title: String,
    /// File name of the acquired track inside the library directory.
    pub file_name: String,
    /// Absolute URL the client can stream the track from.
    pub stream_url: String,
}

/// RFC 9457 style problem document returned for every API failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short human-readable summary.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Component entry inside the health document.
#[derive(Debug, Clone, Serialize)]
pub struct HealthComponent {
    /// Component status: `ok` or `unavailable`.
    pub status: &'static str,
    /// Path backing the component.
    pub path: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status: `ok` or `degraded`.
    pub status: &'static str,
    /// Library directory component.
    pub library: HealthComponent,
    /// Components currently reporting degraded service.
    pub degraded: Vec<String>,
}
