//! Gemini `generateContent` client.
//!
//! Used for two calls per video: describing the listing photo (text + image)
//! and turning that description into video instructions (text only).

use std::sync::Arc;

use async_trait::async_trait;
use bnb_models::ImageRef;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::auth::IdentityTokenProvider;
use crate::config::VertexConfig;
use crate::error::{VertexError, VertexResult};
use crate::http::AuthorizedHttp;

/// Text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text from `prompt`, optionally grounded on an image.
    async fn generate_text(&self, prompt: &str, image: Option<&ImageRef>) -> VertexResult<String>;
}

/// Gemini on Vertex AI.
pub struct GeminiClient {
    http: AuthorizedHttp,
    model_url: String,
}

/// generateContent request.
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    file_uri: &'a str,
    mime_type: &'a str,
}

/// generateContent response.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, image: Option<&'a ImageRef>) -> Self {
        let mut parts = vec![Part::Text { text: prompt }];
        if let Some(image) = image {
            parts.push(Part::File {
                file_data: FileData {
                    file_uri: &image.uri,
                    mime_type: &image.mime_type,
                },
            });
        }

        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> VertexResult<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| VertexError::decode("No candidates in Gemini response"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(VertexError::decode(format!(
                "No text in Gemini response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text.to_string())
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: &VertexConfig, http: Client, tokens: Arc<dyn IdentityTokenProvider>) -> Self {
        Self {
            http: AuthorizedHttp::new(http, tokens),
            model_url: config.model_url(&config.text_model),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str, image: Option<&ImageRef>) -> VertexResult<String> {
        let url = format!("{}:generateContent", self.model_url);
        let request = GenerateContentRequest::new(prompt, image);

        let response: GenerateContentResponse = self
            .http
            .post_json("generateContent", &url, &self.model_url, &request)
            .await?;

        response.into_text()
    }
}
