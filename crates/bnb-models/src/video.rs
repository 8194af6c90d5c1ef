//! Image and video references exchanged with the video generation backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MIME type used when the image extension is not recognized.
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// A single image identified to the generation backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Cloud Storage URI of the image
    #[serde(rename = "gcsUri")]
    pub uri: String,
    /// Image MIME type
    pub mime_type: String,
}

impl ImageRef {
    /// Create an image reference with an explicit MIME type.
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Create an image reference, inferring the MIME type from the extension.
    pub fn from_uri(uri: &str) -> Self {
        Self::new(uri, mime_type_for(uri))
    }
}

/// Guess an image MIME type from a URI's file extension.
fn mime_type_for(uri: &str) -> &'static str {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => DEFAULT_IMAGE_MIME_TYPE,
    }
}

/// Parameters of a video generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoConfig {
    /// Number of videos to generate
    pub sample_count: u32,
    /// Storage prefix the backend writes videos under
    #[serde(rename = "storageUri")]
    pub output_uri_prefix: String,
}

impl GenerateVideoConfig {
    /// Create a new config. `sample_count` is raised to at least 1.
    pub fn new(sample_count: u32, output_uri_prefix: impl Into<String>) -> Self {
        Self {
            sample_count: sample_count.max(1),
            output_uri_prefix: output_uri_prefix.into(),
        }
    }
}

/// Video returned by the backend.
///
/// Passed through to callers unmodified; fields the service does not know
/// about are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    /// Cloud Storage URI of the video
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcs_uri: Option<String>,
    /// Inline video bytes (when no storage URI was requested)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_base64_encoded: Option<String>,
    /// Video MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VideoRef {
    /// Create a reference to a stored video.
    pub fn stored(gcs_uri: impl Into<String>) -> Self {
        Self {
            gcs_uri: Some(gcs_uri.into()),
            mime_type: Some("video/mp4".to_string()),
            ..Default::default()
        }
    }
}
