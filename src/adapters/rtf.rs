use super::{Adapter, ConversionOptions};
use crate::{attachment::Attachment, dom, error::Result, external};
use std::cell::OnceCell;

pub const UNRTF_ARGS: [&str; 1] = ["--html"];

/// Converts `application/rtf` attachments with `unrtf`. Unlike the PDF path
/// the tool output is reshaped through a parsed document tree.
pub struct RtfAdapter<'a> {
    attachment: &'a Attachment,
    options: &'a ConversionOptions,
    html: OnceCell<String>,
}

impl<'a> RtfAdapter<'a> {
    pub fn new(attachment: &'a Attachment, options: &'a ConversionOptions) -> Self {
        Self {
            attachment,
            options,
            html: OnceCell::new(),
        }
    }

    fn generate_html(&self) -> Result<String> {
        let raw = external::convert_via_scratch_file(
            &self.options.unrtf,
            &UNRTF_ARGS,
            &self.attachment.body,
            &self.options.working_dir,
            self.options.keep_tool_stderr,
        )?;
        let mut doc = dom::parse(&raw);
        dom::set_title(&mut doc, &self.attachment.display_filename);
        dom::wrap_body(&mut doc, &self.options.wrapper_id);
        Ok(dom::serialize(&doc))
    }
}

impl Adapter for RtfAdapter<'_> {
    fn to_html(&self) -> Result<String> {
        if let Some(html) = self.html.get() {
            return Ok(html.clone());
        }
        let html = self.generate_html()?;
        Ok(self.html.get_or_init(|| html).clone())
    }
}
