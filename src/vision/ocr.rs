//! OCR backend
//!
//! Talks to the Baidu "accurate" OCR endpoint with vertex locations enabled.
//! Credentials are passed in at construction; nothing here reads globals.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::config::OcrSettings;
use crate::vision::{Anchor, RawRegion};

/// Failures reported by the OCR collaborator
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR credentials are not configured (api_key and secret_key are required)")]
    MissingCredentials,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("OCR service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("OCR service error {code}: {message}")]
    Service { code: i64, message: String },
    #[error("failed to obtain access token: {0}")]
    Token(String),
    #[error("malformed OCR response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),
}

/// Source of text regions for a screenshot
pub trait TextDetector {
    /// Detect text regions in the image at `image_path`
    fn detect(&self, image_path: &Path) -> Result<Vec<RawRegion>, OcrError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    error_code: Option<i64>,
    #[serde(default)]
    error_msg: String,
    #[serde(default)]
    words_result: Vec<WordResult>,
}

#[derive(Debug, Deserialize)]
struct WordResult {
    words: String,
    #[serde(default)]
    vertexes_location: Vec<Vertex>,
}

#[derive(Debug, Deserialize)]
struct Vertex {
    x: i32,
    y: i32,
}

/// Baidu OCR client
pub struct BaiduOcrClient {
    settings: OcrSettings,
    client: reqwest::Client,
}

impl BaiduOcrClient {
    /// Create a client from explicit settings
    pub fn new(settings: OcrSettings) -> Result<Self, OcrError> {
        if settings.api_key.trim().is_empty() || settings.secret_key.trim().is_empty() {
            return Err(OcrError::MissingCredentials);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { settings, client })
    }

    async fn access_token(&self) -> Result<String, OcrError> {
        let response = self
            .client
            .post(&self.settings.token_url)
            .query(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.settings.api_key.as_str()),
                ("client_secret", self.settings.secret_key.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = response.json().await?;
        token.access_token.ok_or_else(|| {
            OcrError::Token(
                token
                    .error_description
                    .unwrap_or_else(|| "no access_token in response".to_string()),
            )
        })
    }

    async fn detect_async(&self, image: &[u8]) -> Result<Vec<RawRegion>, OcrError> {
        let token = self.access_token().await?;
        let encoded = STANDARD.encode(image);

        let response = self
            .client
            .post(&self.settings.endpoint)
            .query(&[("access_token", token.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("detect_direction", "false"),
                ("vertexes_location", "true"),
                ("paragraph", "false"),
                ("probability", "false"),
                ("image", encoded.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("OCR response ({}): {} bytes", status, body.len());

        if !status.is_success() {
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_response(&body)
    }
}

impl TextDetector for BaiduOcrClient {
    fn detect(&self, image_path: &Path) -> Result<Vec<RawRegion>, OcrError> {
        info!("Baidu OCR annotating screenshot {:?}", image_path);
        let image = std::fs::read(image_path)?;

        let rt = Runtime::new().map_err(OcrError::Runtime)?;
        let regions = rt.block_on(self.detect_async(&image))?;

        info!("Baidu OCR returned {} text regions", regions.len());
        Ok(regions)
    }
}

/// Parse a recognition response body into regions
///
/// A body carrying `error_code` is a failure even when the HTTP status was 200.
pub fn parse_response(body: &str) -> Result<Vec<RawRegion>, OcrError> {
    let response: OcrResponse = serde_json::from_str(body)?;

    if let Some(code) = response.error_code {
        return Err(OcrError::Service {
            code,
            message: response.error_msg,
        });
    }

    Ok(response
        .words_result
        .into_iter()
        .map(|word| RawRegion {
            text: word.words,
            vertices: word
                .vertexes_location
                .into_iter()
                .map(|v| Anchor::new(v.x, v.y))
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_parse_words_result() {
        let body = r#"{
            "log_id": 1,
            "words_result_num": 2,
            "words_result": [
                {"words": "Settings", "vertexes_location": [
                    {"x": 10, "y": 20}, {"x": 90, "y": 20}, {"x": 90, "y": 40}, {"x": 10, "y": 40}
                ]},
                {"words": "OK", "vertexes_location": [{"x": 300, "y": 310}]}
            ]
        }"#;

        let regions = parse_response(body).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].text, "Settings");
        assert_eq!(regions[0].vertices.len(), 4);
        assert_eq!(regions[0].anchor(), Some(Anchor::new(10, 20)));
        assert_eq!(regions[1].anchor(), Some(Anchor::new(300, 310)));
    }

    #[test]
    fn test_parse_error_payload() {
        let body = r#"{"error_code": 110, "error_msg": "Access token invalid or no longer valid"}"#;

        match parse_response(body) {
            Err(OcrError::Service { code, message }) => {
                assert_eq!(code, 110);
                assert!(message.contains("Access token"));
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_vertices() {
        let body = r#"{"words_result": [{"words": "Title"}]}"#;
        let regions = parse_response(body).unwrap();
        assert_eq!(regions.len(), 1);
        assert!(regions[0].anchor().is_none());
    }

    #[test]
    fn test_parse_empty_result() {
        let regions = parse_response(r#"{"words_result_num": 0}"#).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse_response("<html>"), Err(OcrError::Decode(_))));
    }

    #[test]
    fn test_client_requires_credentials() {
        let settings = AppConfig::default().ocr;
        assert!(matches!(
            BaiduOcrClient::new(settings),
            Err(OcrError::MissingCredentials)
        ));
    }

    #[test]
    fn test_client_with_credentials() {
        let mut settings = AppConfig::default().ocr;
        settings.api_key = "key".to_string();
        settings.secret_key = "secret".to_string();
        assert!(BaiduOcrClient::new(settings).is_ok());
    }
}
