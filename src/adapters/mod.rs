pub mod pdf;
pub mod rtf;
pub mod text;

use crate::{attachment::Format, config::Config, error::Result};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub use pdf::PdfAdapter;
pub use rtf::RtfAdapter;
pub use text::TextAdapter;

pub const DEFAULT_WRAPPER_ID: &str = "wrapper";

/// A single-shot converter for one attachment.
///
/// Implementations memoise their output, so calling [`Adapter::to_html`]
/// repeatedly runs any external tool at most once.
pub trait Adapter {
    fn to_html(&self) -> Result<String>;

    /// Content-quality signal for formats that have one.
    fn success(&self) -> Result<Option<bool>> {
        Ok(None)
    }
}

/// An external converter binary and the bound on a single run of it.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub program: PathBuf,
    pub timeout: Duration,
}

impl ToolSpec {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// `id` of the div injected around the converted body.
    pub wrapper_id: String,
    /// Directory holding scratch files; also the tools' working directory.
    pub working_dir: PathBuf,
    pub pdftohtml: ToolSpec,
    pub unrtf: ToolSpec,
    pub normalize_unicode: bool,
    pub keep_tool_stderr: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            wrapper_id: DEFAULT_WRAPPER_ID.into(),
            working_dir: std::env::temp_dir(),
            pdftohtml: ToolSpec::new("pdftohtml", Duration::from_secs(30)),
            unrtf: ToolSpec::new("unrtf", Duration::from_secs(120)),
            normalize_unicode: false,
            keep_tool_stderr: true,
        }
    }
}

impl ConversionOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let working_dir = if cfg.conversion.work_dir.trim().is_empty() {
            std::env::temp_dir()
        } else {
            PathBuf::from(&cfg.conversion.work_dir)
        };
        Self {
            wrapper_id: cfg.conversion.wrapper_id.clone(),
            working_dir,
            pdftohtml: ToolSpec::new(
                &cfg.pdf.program,
                Duration::from_secs(cfg.pdf.timeout_seconds),
            ),
            unrtf: ToolSpec::new(
                &cfg.rtf.program,
                Duration::from_secs(cfg.rtf.timeout_seconds),
            ),
            normalize_unicode: cfg.conversion.normalize_unicode,
            keep_tool_stderr: cfg.debug.keep_tool_stderr,
        }
    }

    pub fn with_wrapper_id(mut self, wrapper_id: impl Into<String>) -> Self {
        self.wrapper_id = wrapper_id.into();
        self
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub format: Format,
    pub html: String,
    /// Only PDF conversions carry a success signal.
    pub success: Option<bool>,
}
