pub mod adapters;
pub mod attachment;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod external;
pub mod postprocess;
pub mod report;
pub mod util;

pub use adapters::{Adapter, ConversionOptions, ConversionResult, ToolSpec};
pub use attachment::{Attachment, Format};
pub use dispatch::Dispatcher;
pub use error::{ConvertError, Result};
