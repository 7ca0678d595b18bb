use super::{Adapter, ConversionOptions};
use crate::{attachment::Attachment, dom, error::Result, external, postprocess};
use std::cell::OnceCell;

pub const PDFTOHTML_ARGS: [&str; 7] =
    ["-nodrm", "-zoom", "1.0", "-stdout", "-enc", "UTF-8", "-noframes"];

/// Converts `application/pdf` attachments with `pdftohtml`.
pub struct PdfAdapter<'a> {
    attachment: &'a Attachment,
    options: &'a ConversionOptions,
    html: OnceCell<String>,
}

impl<'a> PdfAdapter<'a> {
    pub fn new(attachment: &'a Attachment, options: &'a ConversionOptions) -> Self {
        Self {
            attachment,
            options,
            html: OnceCell::new(),
        }
    }

    /// Whether the converted page holds anything worth showing: some body
    /// text once tags are stripped, or at least one image.
    ///
    /// Text-free PDFs that pdftohtml turns into an empty page report false
    /// even though the tool exited cleanly.
    pub fn is_successful(&self) -> Result<bool> {
        let html = self.to_html()?;
        Ok(html_has_content(&html))
    }

    fn generate_html(&self) -> Result<String> {
        let raw = external::convert_via_scratch_file(
            &self.options.pdftohtml,
            &PDFTOHTML_ARGS,
            &self.attachment.body,
            &self.options.working_dir,
            self.options.keep_tool_stderr,
        )?;
        let html = postprocess::inject_title(&raw, &self.attachment.display_filename);
        Ok(postprocess::inject_wrapper(&html, &self.options.wrapper_id))
    }
}

/// Success test applied to a converted PDF page.
pub fn html_has_content(html: &str) -> bool {
    let doc = dom::parse(html);
    !dom::body_text(&doc).trim().is_empty() || dom::body_has_images(&doc)
}

impl Adapter for PdfAdapter<'_> {
    fn to_html(&self) -> Result<String> {
        if let Some(html) = self.html.get() {
            return Ok(html.clone());
        }
        let html = self.generate_html()?;
        Ok(self.html.get_or_init(|| html).clone())
    }

    fn success(&self) -> Result<Option<bool>> {
        self.is_successful().map(Some)
    }
}
