//! Drawing analysis: one multimodal call that turns an interior drawing
//! into a structured list of material items.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::EXTRACTION_MAX_TOKENS;
use crate::error::{Error, Result};
use crate::prompts::extraction::build_extraction_prompt;
use crate::provider::{ImagePayload, Provider, Request, extract_json};

/// What kind of thing an item is. Mirrors the categories the model is told
/// to use; anything else in a reply is a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Flooring,
    WallFinish,
    Ceiling,
    Fixtures,
    Furniture,
    Millwork,
    DoorsWindows,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Flooring => "flooring",
            Category::WallFinish => "wall finish",
            Category::Ceiling => "ceiling",
            Category::Fixtures => "fixtures",
            Category::Furniture => "furniture",
            Category::Millwork => "millwork",
            Category::DoorsWindows => "doors & windows",
        };
        f.write_str(label)
    }
}

/// How an item's quantity is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Sqm,
    Lm,
    Units,
    Pcs,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Unit::Sqm => "sqm",
            Unit::Lm => "lm",
            Unit::Units => "units",
            Unit::Pcs => "pcs",
        };
        f.write_str(label)
    }
}

/// One material, fixture, or finish extracted from the drawing.
/// Immutable once extracted; pricing wraps it rather than mutating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialItem {
    pub category: Category,
    pub item_name: String,
    pub material: String,
    pub quantity: f64,
    pub unit: Unit,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
}

/// The full extraction result: item list plus drawing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingAnalysis {
    pub drawing_type: String,
    #[serde(default)]
    pub rooms: Vec<String>,
    pub items: Vec<MaterialItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// An image ready to send: raw bytes plus declared media type.
#[derive(Debug, Clone)]
pub struct DrawingImage {
    pub data: Vec<u8>,
    pub media_type: String,
}

impl DrawingImage {
    /// Load from a file, inferring the media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let media_type = media_type_for(path)?;
        let data = std::fs::read(path)?;
        Ok(Self { data, media_type })
    }
}

fn media_type_for(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => {
            return Err(Error::Extraction(format!(
                "unsupported image format: {}",
                path.display()
            )));
        }
    };
    Ok(media_type.to_string())
}

/// Analyze a drawing: one API call, strict JSON reply.
///
/// Fails on upstream errors and on unparsable replies alike — there is no
/// retry and no partial recovery.
pub async fn analyze(provider: &dyn Provider, image: &DrawingImage) -> Result<DrawingAnalysis> {
    let request = Request {
        prompt: build_extraction_prompt(),
        image: Some(ImagePayload {
            media_type: image.media_type.clone(),
            data: image.data.clone(),
        }),
        max_tokens: EXTRACTION_MAX_TOKENS,
    };

    let reply = provider
        .complete(request)
        .await
        .map_err(|e| Error::Extraction(e.to_string()))?;

    let json = extract_json(&reply.text);
    serde_json::from_str(json)
        .map_err(|e| Error::Extraction(format!("reply is not the expected JSON: {e}")))
}
