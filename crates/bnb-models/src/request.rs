//! Inbound video generation request.

use serde::{Deserialize, Serialize};

use crate::video::{GenerateVideoConfig, ImageRef};

/// Request to generate a video for a listing (`POST /newvideo`).
///
/// Missing fields deserialize as empty values so they are reported by
/// [`GenerationRequest::validate`] instead of failing body decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Listing identifier
    #[serde(rename = "id", default)]
    pub listing_id: String,
    /// Listing photo URIs; only the first one is used
    #[serde(default)]
    pub image_uris: Vec<String>,
    /// Bucket the generated video is written to (e.g. `gs://bucket`)
    #[serde(default)]
    pub storage_bucket: String,
}

impl GenerationRequest {
    /// Create a new request.
    pub fn new(
        listing_id: impl Into<String>,
        image_uris: Vec<String>,
        storage_bucket: impl Into<String>,
    ) -> Self {
        Self {
            listing_id: listing_id.into(),
            image_uris,
            storage_bucket: storage_bucket.into(),
        }
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), String> {
        match self.first_image_uri() {
            None => return Err("At least one image URI is required".to_string()),
            Some(uri) if uri.trim().is_empty() => {
                return Err("First image URI must not be empty".to_string())
            }
            Some(_) => {}
        }

        if self.listing_id.is_empty() {
            return Err("Listing id is required".to_string());
        }

        if self.storage_bucket.is_empty() {
            return Err("Storage bucket is required".to_string());
        }

        Ok(())
    }

    /// First image URI of the listing.
    pub fn first_image_uri(&self) -> Option<&str> {
        self.image_uris.first().map(String::as_str)
    }

    /// First image as a backend image reference.
    pub fn first_image(&self) -> Option<ImageRef> {
        self.first_image_uri().map(ImageRef::from_uri)
    }

    /// Output location for generated videos: `{bucket}/videos/{listing}/`.
    pub fn output_uri_prefix(&self) -> String {
        format!("{}/videos/{}/", self.storage_bucket, self.listing_id)
    }

    /// Video job parameters for this request (one sample).
    pub fn video_config(&self) -> GenerateVideoConfig {
        GenerateVideoConfig::new(1, self.output_uri_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GenerationRequest {
        GenerationRequest::new("L1", vec!["gs://b/1.jpg".to_string()], "gs://out")
    }

    #[test]
    fn test_valid_request() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_images_rejected() {
        let mut req = valid();
        req.image_uris.clear();
        assert!(req.validate().unwrap_err().contains("image"));
    }

    #[test]
    fn test_blank_first_image_rejected() {
        for uri in ["", "   "] {
            let mut req = valid();
            req.image_uris = vec![uri.to_string(), "gs://b/2.jpg".to_string()];
            assert!(req.validate().unwrap_err().contains("image URI"));
        }
    }

    #[test]
    fn test_empty_listing_id_rejected() {
        let mut req = valid();
        req.listing_id.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_bucket_rejected() {
        let mut req = valid();
        req.storage_bucket.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_output_uri_prefix() {
        assert_eq!(valid().output_uri_prefix(), "gs://out/videos/L1/");
        let config = valid().video_config();
        assert_eq!(config.sample_count, 1);
        assert_eq!(config.output_uri_prefix, "gs://out/videos/L1/");
    }

    #[test]
    fn test_deserialize_wire_names() {
        let req: GenerationRequest = serde_json::from_str(
            r#"{"id":"L1","imageUris":["gs://b/1.jpg","gs://b/2.jpg"],"storageBucket":"gs://out"}"#,
        )
        .unwrap();
        assert_eq!(req.listing_id, "L1");
        assert_eq!(req.first_image_uri(), Some("gs://b/1.jpg"));
        assert_eq!(req.storage_bucket, "gs://out");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: GenerationRequest = serde_json::from_str(r#"{"id":"L1"}"#).unwrap();
        assert!(req.image_uris.is_empty());
        assert!(req.storage_bucket.is_empty());
        assert!(req.validate().is_err());
    }
}
