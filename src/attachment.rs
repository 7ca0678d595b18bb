use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// An attachment as handed over by the caller. Adapters only ever borrow it.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub content_type: String,
    pub display_filename: String,
    pub body: Vec<u8>,
}

impl Attachment {
    pub fn new(
        content_type: impl Into<String>,
        display_filename: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            display_filename: display_filename.into(),
            body: body.into(),
        }
    }

    /// Reads an attachment from disk. Without an explicit content type one is
    /// guessed from the file extension.
    pub fn from_path(path: &Path, content_type: Option<&str>) -> Result<Self> {
        let body =
            std::fs::read(path).with_context(|| format!("reading attachment: {}", path.display()))?;
        let content_type = match content_type {
            Some(ct) => ct.to_string(),
            None => guess_content_type(path).to_string(),
        };
        let display_filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            content_type,
            display_filename,
            body,
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match ext.as_deref() {
        Some("txt") | Some("text") => Format::Text.mime(),
        Some("pdf") => Format::Pdf.mime(),
        Some("rtf") => Format::Rtf.mime(),
        _ => "application/octet-stream",
    }
}

/// The closed set of formats an adapter exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    Pdf,
    Rtf,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Text, Format::Pdf, Format::Rtf];

    /// Canonical MIME type.
    pub fn mime(self) -> &'static str {
        match self {
            Format::Text => "text/plain",
            Format::Pdf => "application/pdf",
            Format::Rtf => "application/rtf",
        }
    }

    /// Maps a content type string to a format. Matching ignores case and any
    /// `;`-separated parameters.
    pub fn from_content_type(content_type: &str) -> Option<Format> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "text/plain" => Some(Format::Text),
            "application/pdf" => Some(Format::Pdf),
            "application/rtf" | "text/rtf" => Some(Format::Rtf),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}
