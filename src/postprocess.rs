use regex::{Captures, NoExpand, Regex};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>.*?</title>").expect("title regex"));
static HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head[^>]*>").expect("head regex"));
static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(<body[^>]*>)(.*)(</body>)").expect("body regex"));
static BODY_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body[^>]*>").expect("body open regex"));
static HEAD_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("head close regex"));
static HTML_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html[^>]*>").expect("html open regex"));
static HTML_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</html\s*>").expect("html close regex"));
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("token regex"));
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:https?)://[A-Za-z0-9](?:[A-Za-z0-9\-.]*[A-Za-z0-9])?(?::\d+)?(?:[/?#]\S*)?$")
        .expect("url regex")
});

/// Characters stripped off the end of a URL token and kept as plain text.
const TRAILING_PUNCT: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Escapes `& < > " '` so that no input can introduce markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Turns every whitespace-delimited token that is an absolute http(s) URL into
/// an anchor. Expects already-escaped text.
pub fn make_clickable(s: &str) -> String {
    TOKEN_RE
        .replace_all(s, |caps: &Captures| {
            let token = &caps[0];
            let url = token.trim_end_matches(TRAILING_PUNCT);
            if URL_RE.is_match(url) {
                let rest = &token[url.len()..];
                format!("<a href='{url}'>{url}</a>{rest}")
            } else {
                token.to_string()
            }
        })
        .into_owned()
}

pub fn newlines_to_br(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\n', "<br>")
}

pub fn normalize_unicode(s: &str) -> String {
    s.nfc().collect()
}

pub fn wrapper_div(wrapper_id: &str, contents: &str) -> String {
    format!(r#"<div id="{wrapper_id}">{contents}</div>"#)
}

/// Replaces the first `<title>` element with one holding `title`. If the
/// document has none, one is inserted straight after `<head>`.
///
/// The title is inserted verbatim.
pub fn inject_title(html: &str, title: &str) -> String {
    let element = format!("<title>{title}</title>");
    if TITLE_RE.is_match(html) {
        return TITLE_RE.replacen(html, 1, NoExpand(&element)).into_owned();
    }
    HEAD_RE
        .replacen(html, 1, |caps: &Captures| format!("{}{}", &caps[0], element))
        .into_owned()
}

/// Wraps everything between `<body ...>` and the last `</body>` in the
/// wrapper div. Assumes the tool emits at most one body span.
///
/// Output with no closing `</body>` still gets exactly one wrapper: content
/// after `<body>` (or, lacking that, after `</head>` or `<html>`) up to
/// `</html>` is wrapped and the body closed.
pub fn inject_wrapper(html: &str, wrapper_id: &str) -> String {
    if BODY_RE.is_match(html) {
        return BODY_RE
            .replacen(html, 1, |caps: &Captures| {
                format!("{}{}{}", &caps[1], wrapper_div(wrapper_id, &caps[2]), &caps[3])
            })
            .into_owned();
    }

    let (start, open_body) = match BODY_OPEN_RE.find(html) {
        Some(m) => (m.end(), ""),
        None => {
            let start = HEAD_CLOSE_RE
                .find(html)
                .or_else(|| HTML_OPEN_RE.find(html))
                .map_or(0, |m| m.end());
            (start, "<body>")
        }
    };
    let end = HTML_CLOSE_RE
        .find_at(html, start)
        .map_or(html.len(), |m| m.start());

    format!(
        "{}{}{}</body>{}",
        &html[..start],
        open_body,
        wrapper_div(wrapper_id, &html[start..end]),
        &html[end..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape_html("Hello world 42"), "Hello world 42");
    }

    #[test]
    fn trailing_punctuation_stays_outside_link() {
        assert_eq!(
            make_clickable("see http://example.com."),
            "see <a href='http://example.com'>http://example.com</a>."
        );
    }

    #[test]
    fn embedded_url_is_not_linked() {
        assert_eq!(make_clickable("seehttp://example.com"), "seehttp://example.com");
    }

    #[test]
    fn title_with_dollar_is_literal() {
        let out = inject_title("<head><title>x</title></head>", "$1 report.pdf");
        assert_eq!(out, "<head><title>$1 report.pdf</title></head>");
    }

    #[test]
    fn title_goes_after_head_when_missing() {
        let out = inject_title("<html><HEAD><meta charset=\"utf-8\"></head></html>", "a.pdf");
        assert_eq!(out, "<html><HEAD><title>a.pdf</title><meta charset=\"utf-8\"></head></html>");
    }

    #[test]
    fn wrapper_wraps_body_span() {
        let out = inject_wrapper("<html><body bgcolor=\"#A0A0A0\">\nx\n</body></html>", "w");
        assert_eq!(out, "<html><body bgcolor=\"#A0A0A0\"><div id=\"w\">\nx\n</div></body></html>");
    }

    #[test]
    fn wrapper_added_when_body_missing() {
        let out = inject_wrapper("<html><head><title>t</title></head>text</html>", "w");
        assert_eq!(
            out,
            "<html><head><title>t</title></head><body><div id=\"w\">text</div></body></html>"
        );

        let bare = inject_wrapper("just text", "w");
        assert_eq!(bare, "<body><div id=\"w\">just text</div></body>");
    }

    #[test]
    fn wrapper_closes_unterminated_body() {
        let out = inject_wrapper("<html><body class=\"p\">text</html>", "w");
        assert_eq!(out, "<html><body class=\"p\"><div id=\"w\">text</div></body></html>");
        assert_eq!(out.matches("id=\"w\"").count(), 1);
    }
}
