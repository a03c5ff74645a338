// API client module: a small blocking HTTP client for the remote vision
// service. One call to `analyze` is one POST; there is no retry and no
// state carried between calls.

use crate::config::{ClientConfig, Credentials};
use crate::error::{VisionError, VisionResult};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

// Header names are case-insensitive; `from_static` wants lowercase.
pub const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

/// Blocking client for the analyze endpoint. The subscription key is sent
/// as a default header on every request.
#[derive(Clone)]
pub struct VisionClient {
    client: Client,
    credentials: Credentials,
}

/// Typed view of the parts of the response we read. Everything else the
/// service returns (categories, color, metadata) stays in the raw document.
#[derive(Deserialize, Debug, Default)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub description: Option<Description>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Description {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub captions: Vec<Caption>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Outcome of a successful analysis: the primary caption plus the full
/// response document as returned by the service.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub caption: String,
    pub confidence: Option<f64>,
    pub tags: Vec<String>,
    pub raw: Value,
}

impl AnalysisResult {
    /// Parse a response body. The first caption is taken as primary; a body
    /// without any caption is treated as malformed.
    pub fn from_body(body: &str) -> VisionResult<Self> {
        let raw: Value = serde_json::from_str(body)?;
        let parsed = AnalyzeResponse::deserialize(&raw)?;
        let description = parsed.description.unwrap_or_default();
        let first = description
            .captions
            .into_iter()
            .next()
            .ok_or_else(|| VisionError::Parse("response contains no captions".into()))?;
        Ok(AnalysisResult {
            caption: first.text,
            confidence: first.confidence,
            tags: description.tags,
            raw,
        })
    }

    /// The raw response, indented for display.
    pub fn pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}

impl VisionClient {
    pub fn new(config: ClientConfig) -> VisionResult<Self> {
        let mut key = HeaderValue::from_str(config.credentials.subscription_key())?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(SUBSCRIPTION_KEY_HEADER), key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(VisionClient {
            client,
            credentials: config.credentials,
        })
    }

    /// Read an image from disk and analyze it. A path that is not a regular
    /// file is reported before any network I/O happens.
    pub fn analyze(&self, file_path: &Path) -> VisionResult<AnalysisResult> {
        let bytes = read_image(file_path)?;
        self.analyze_bytes(bytes)
    }

    /// POST an in-memory image as an octet stream and parse the response.
    pub fn analyze_bytes(&self, bytes: Vec<u8>) -> VisionResult<AnalysisResult> {
        let url = self.credentials.analyze_url();
        debug!("Sending {} byte image to {}", bytes.len(), url);

        let res = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()?;

        let status = res.status();
        let body = res.text()?;
        if !status.is_success() {
            warn!("Vision service returned {}", status);
            return Err(VisionError::Status { status, body });
        }
        debug!("Received {} byte response", body.len());
        AnalysisResult::from_body(&body)
    }
}

/// Load the whole image into memory. Directories and missing paths are
/// both `FileNotFound`.
pub fn read_image(file_path: &Path) -> VisionResult<Vec<u8>> {
    if !file_path.is_file() {
        return Err(VisionError::FileNotFound(file_path.to_path_buf()));
    }
    // `fs::read` closes the handle before returning, on success or error.
    let bytes = std::fs::read(file_path).map_err(|source| VisionError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), file_path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "categories": [{"name": "animal_dog", "score": 0.99}],
        "color": {"dominantColorForeground": "Brown", "isBWImg": false},
        "description": {
            "tags": ["dog", "grass", "outdoor"],
            "captions": [
                {"text": "A dog standing in a field.", "confidence": 0.93},
                {"text": "A brown dog.", "confidence": 0.71}
            ]
        },
        "requestId": "7b0ba0a5",
        "metadata": {"width": 500, "height": 375, "format": "Jpeg"}
    }"#;

    #[test]
    fn first_caption_is_primary() {
        let result = AnalysisResult::from_body(SAMPLE).unwrap();
        assert_eq!(result.caption, "A dog standing in a field.");
        assert_eq!(result.confidence, Some(0.93));
        assert_eq!(result.tags, vec!["dog", "grass", "outdoor"]);
    }

    #[test]
    fn raw_document_is_passed_through() {
        let result = AnalysisResult::from_body(SAMPLE).unwrap();
        assert_eq!(result.raw["color"]["dominantColorForeground"], "Brown");
        assert_eq!(result.raw["categories"][0]["name"], "animal_dog");
        let pretty = result.pretty_json();
        assert!(pretty.contains("\n  \"requestId\": \"7b0ba0a5\""));
    }

    #[test]
    fn empty_captions_is_a_parse_error() {
        let err = AnalysisResult::from_body(r#"{"description": {"captions": []}}"#).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn missing_description_is_a_parse_error() {
        let err = AnalysisResult::from_body(r#"{"code": "InvalidImageUrl"}"#).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn directory_is_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_image(dir.path()).unwrap_err();
        assert!(matches!(err, VisionError::FileNotFound(ref p) if p == dir.path()));
    }

    #[test]
    fn read_image_returns_file_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, &[0, 255, 10, 13, 0]).unwrap();
        assert_eq!(read_image(file.path()).unwrap(), vec![0, 255, 10, 13, 0]);
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = AnalysisResult::from_body("<html>Bad Gateway</html>").unwrap_err();
        assert!(err.is_parse());
    }
}
