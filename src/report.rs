use crate::{
    adapters::ConversionResult,
    attachment::{Attachment, Format},
    util::sha256_hex,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input: String,
    pub content_type: String,
    pub format: Format,
    pub display_filename: String,
    pub input_bytes: u64,
    pub input_sha256: String,
    pub html_bytes: u64,
    pub success: Option<bool>,
    pub started: String,
    pub finished: String,
    pub elapsed_ms: u64,
}

impl ConversionReport {
    pub fn new(
        input: &str,
        attachment: &Attachment,
        result: &ConversionResult,
        started: String,
        finished: String,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            input: input.to_string(),
            content_type: attachment.content_type.clone(),
            format: result.format,
            display_filename: attachment.display_filename.clone(),
            input_bytes: attachment.body.len() as u64,
            input_sha256: sha256_hex(&attachment.body),
            html_bytes: result.html.len() as u64,
            success: result.success,
            started,
            finished,
            elapsed_ms,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("writing report: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConversionReport {
        let attachment = Attachment::new("text/plain", "a.txt", "hello");
        let result = ConversionResult {
            format: Format::Text,
            html: "<p>hello</p>".into(),
            success: None,
        };
        ConversionReport::new("a.txt", &attachment, &result, "s".into(), "f".into(), 3)
    }

    #[test]
    fn writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.html.report.json");
        sample().write_json(&path).unwrap();

        let back: ConversionReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.input_bytes, 5);
        assert_eq!(back.html_bytes, 12);
        assert_eq!(back.input_sha256.len(), 64);
    }

    #[test]
    fn write_failure_names_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a.html.report.json");
        let err = sample().write_json(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("writing report:"), "{msg}");
        assert!(msg.contains("a.html.report.json"), "{msg}");
    }
}
