use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub conversion: Conversion,
    #[serde(default)]
    pub dispatch: Dispatch,
    #[serde(default)]
    pub pdf: Pdf,
    #[serde(default)]
    pub rtf: Rtf,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversion {
    pub wrapper_id: String,
    /// Empty means the system temp directory.
    pub work_dir: String,
    pub normalize_unicode: bool,
}
impl Default for Conversion {
    fn default() -> Self {
        Self {
            wrapper_id: crate::adapters::DEFAULT_WRAPPER_ID.into(),
            work_dir: "".into(),
            normalize_unicode: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dispatch {
    pub register_rtf: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pdf {
    pub program: String,
    pub timeout_seconds: u64,
}
impl Default for Pdf {
    fn default() -> Self {
        Self {
            program: "pdftohtml".into(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Rtf {
    pub program: String,
    pub timeout_seconds: u64,
}
impl Default for Rtf {
    fn default() -> Self {
        Self {
            program: "unrtf".into(),
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub write_report_json: bool,
    pub report_suffix: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            write_report_json: true,
            report_suffix: ".report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Debug {
    pub keep_tool_stderr: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            keep_tool_stderr: true,
        }
    }
}
