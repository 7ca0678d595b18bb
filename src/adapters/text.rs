use super::{Adapter, ConversionOptions};
use crate::{attachment::Attachment, error::Result, postprocess};
use std::cell::OnceCell;

/// Renders `text/plain` attachments as an escaped, linkified HTML page.
pub struct TextAdapter<'a> {
    attachment: &'a Attachment,
    options: &'a ConversionOptions,
    html: OnceCell<String>,
}

impl<'a> TextAdapter<'a> {
    pub fn new(attachment: &'a Attachment, options: &'a ConversionOptions) -> Self {
        Self {
            attachment,
            options,
            html: OnceCell::new(),
        }
    }

    pub fn wrapper_id(&self) -> &str {
        &self.options.wrapper_id
    }

    fn body(&self) -> String {
        let raw = self.attachment.body_text();
        let mut text = raw.trim().to_string();
        if self.options.normalize_unicode {
            text = postprocess::normalize_unicode(&text);
        }
        let text = postprocess::escape_html(&text);
        let text = postprocess::make_clickable(&text);
        postprocess::newlines_to_br(&text)
    }

    fn generate_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>");
        html.push_str("<html>");
        html.push_str("<head>");
        html.push_str(&format!(
            "<title>{}</title>",
            self.attachment.display_filename
        ));
        html.push_str("</head>");
        html.push_str("<body>");
        html.push_str(&postprocess::wrapper_div(self.wrapper_id(), &self.body()));
        html.push_str("</body>");
        html.push_str("</html>");
        html
    }
}

impl Adapter for TextAdapter<'_> {
    fn to_html(&self) -> Result<String> {
        Ok(self.html.get_or_init(|| self.generate_html()).clone())
    }
}
