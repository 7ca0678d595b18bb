use crate::{
    adapters::{Adapter, ConversionOptions, ConversionResult, PdfAdapter, RtfAdapter, TextAdapter},
    attachment::{Attachment, Format},
    config::Config,
    error::{ConvertError, Result},
};
use std::collections::BTreeSet;
use tracing::info;

/// Picks an adapter by content type and drives the conversion.
///
/// Text and PDF are registered out of the box; RTF has to be opted into with
/// [`Dispatcher::register`] or `dispatch.register_rtf`.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    options: ConversionOptions,
    registered: BTreeSet<Format>,
}

impl Dispatcher {
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            registered: BTreeSet::from([Format::Text, Format::Pdf]),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let mut dispatcher = Self::new(ConversionOptions::from_config(cfg));
        if cfg.dispatch.register_rtf {
            dispatcher.register(Format::Rtf);
        }
        dispatcher
    }

    pub fn register(&mut self, format: Format) -> &mut Self {
        self.registered.insert(format);
        self
    }

    pub fn unregister(&mut self, format: Format) -> &mut Self {
        self.registered.remove(&format);
        self
    }

    pub fn formats(&self) -> impl Iterator<Item = Format> + '_ {
        self.registered.iter().copied()
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn lookup(&self, content_type: &str) -> Result<Format> {
        Format::from_content_type(content_type)
            .filter(|f| self.registered.contains(f))
            .ok_or_else(|| ConvertError::UnsupportedFormat(content_type.to_string()))
    }

    pub fn to_html(&self, attachment: &Attachment) -> Result<String> {
        let format = self.lookup(&attachment.content_type)?;
        self.adapter_for(format, attachment).to_html()
    }

    pub fn convert(&self, attachment: &Attachment) -> Result<ConversionResult> {
        let format = self.lookup(&attachment.content_type)?;
        info!(
            "convert format={} filename={} bytes={}",
            format,
            attachment.display_filename,
            attachment.body.len()
        );
        let adapter = self.adapter_for(format, attachment);
        let html = adapter.to_html()?;
        let success = adapter.success()?;
        Ok(ConversionResult {
            format,
            html,
            success,
        })
    }

    fn adapter_for<'a>(&'a self, format: Format, attachment: &'a Attachment) -> Box<dyn Adapter + 'a> {
        match format {
            Format::Text => Box::new(TextAdapter::new(attachment, &self.options)),
            Format::Pdf => Box::new(PdfAdapter::new(attachment, &self.options)),
            Format::Rtf => Box::new(RtfAdapter::new(attachment, &self.options)),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(ConversionOptions::default())
    }
}
