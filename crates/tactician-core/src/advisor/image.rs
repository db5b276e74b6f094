//! Inline screenshot payloads.

use crate::error::{Result, TacticianError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

fn data_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^data:(.+);base64,(.+)$").unwrap())
}

impl InlineImage {
    /// Parse `data:<mime>;base64,<data>`.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let caps = data_url_re()
            .captures(url.trim())
            .ok_or_else(|| TacticianError::InvalidImage("invalid image data URL format".into()))?;
        Ok(Self {
            mime_type: caps[1].to_string(),
            data: caps[2].to_string(),
        })
    }

    /// Read an image file, guessing its type from the extension. Anything
    /// that is not `image/*` is rejected.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(TacticianError::InvalidImage(format!(
                "{} is not an image ({mime})",
                path.display()
            )));
        }
        let bytes = std::fs::read(path)?;
        Ok(Self {
            mime_type: mime.essence_str().to_string(),
            data: STANDARD.encode(bytes),
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Load every path that is an image, collecting the rejects separately so a
/// batch can partially succeed.
pub fn load_images(paths: &[impl AsRef<Path>]) -> (Vec<InlineImage>, Vec<String>) {
    let mut images = Vec::new();
    let mut skipped = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match InlineImage::from_file(path) {
            Ok(img) => images.push(img),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping file");
                skipped.push(path.display().to_string());
            }
        }
    }
    (images, skipped)
}

/// Message shown when some files of a batch were not usable images.
pub const PARTIAL_IMAGES_NOTICE: &str = "Some files were not valid images and were ignored.";
