//! Request/response types for the generative-model API.
//!
//! These are explicit tagged types validated at the API boundary; nothing
//! downstream touches raw model JSON.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// One part of a multimodal prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Plain instruction text.
    Text(String),
    /// An image embedded inline as base64 data.
    InlineImage {
        /// MIME type (e.g. `image/jpeg`).
        mime_type: String,
        /// Base64-encoded image bytes.
        data: String,
    },
    /// An image the model host fetches by URL.
    ImageUri(String),
}

/// A generated image plus any accompanying text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// The image as a `data:<mime>;base64,<data>` URI.
    pub data_uri: String,
    /// Text the model emitted alongside the image, if any.
    pub text: Option<String>,
}

/// A parsed `data:<mime>;base64,<data>` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataUri {
    /// MIME type (e.g. `image/png`).
    pub mime_type: String,
    /// Base64 payload, verified to decode.
    pub data: String,
}

impl DataUri {
    /// Parse and validate a data URI.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidImage` if the input is not of the form
    /// `data:<mime>;base64,<data>` or the payload is not valid base64.
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| ModelError::InvalidImage("missing data: prefix".to_string()))?;

        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| ModelError::InvalidImage("missing ;base64, marker".to_string()))?;

        if mime_type.is_empty() {
            return Err(ModelError::InvalidImage("empty MIME type".to_string()));
        }

        BASE64
            .decode(data)
            .map_err(|e| ModelError::InvalidImage(format!("invalid base64 payload: {e}")))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Render back to `data:<mime>;base64,<data>` form.
    #[must_use]
    pub fn to_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

// =============================================================================
// Wire types
// =============================================================================

/// Request body for a generate-content call.
#[derive(Debug, Serialize)]
pub(super) struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
pub(super) struct Content {
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum WirePart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub(super) struct FileData {
    #[serde(rename = "fileUri")]
    pub file_uri: String,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerationConfig {
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

impl From<Part> for WirePart {
    fn from(part: Part) -> Self {
        match part {
            Part::Text(text) => Self::Text { text },
            Part::InlineImage { mime_type, data } => Self::InlineData {
                inline_data: InlineData { mime_type, data },
            },
            Part::ImageUri(file_uri) => Self::FileData {
                file_data: FileData { file_uri },
            },
        }
    }
}

/// Response body for a generate-content call.
#[derive(Debug, Deserialize)]
pub(super) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "inlineData", default)]
    pub inline_data: Option<InlineData>,
}
