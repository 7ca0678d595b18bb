use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Everything that can go wrong while turning an attachment into HTML.
///
/// A conversion that runs cleanly but yields an empty page is not an error;
/// see [`crate::adapters::pdf::PdfAdapter::is_successful`].
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("no adapter registered for content type: {0}")]
    UnsupportedFormat(String),

    #[error("{program} exceeded timeout ({timeout:?})")]
    SubprocessTimeout { program: String, timeout: Duration },

    #[error("{program} failed: {detail}")]
    SubprocessFailure { program: String, detail: String },

    #[error("scratch file {}: {source}", path.display())]
    TempFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn temp_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::TempFileIo {
            path: path.into(),
            source,
        }
    }
}
