//! Structural HTML helpers built on `scraper`.

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{Html, Node, Selector};

const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

pub fn parse(html: &str) -> Html {
    Html::parse_document(html)
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(XHTML_NS), LocalName::from(local))
}

/// Sets the document title, creating `<title>` inside `<head>` if needed.
pub fn set_title(doc: &mut Html, title: &str) {
    let Some(title_sel) = selector("title") else {
        return;
    };
    let existing = doc.select(&title_sel).next().map(|el| el.id());

    let title_id = match existing {
        Some(id) => id,
        None => {
            let Some(head_sel) = selector("head") else {
                return;
            };
            let Some(head_id) = doc.select(&head_sel).next().map(|el| el.id()) else {
                return;
            };
            let Some(mut head) = doc.tree.get_mut(head_id) else {
                return;
            };
            head.append(Node::Element(Element::new(html_name("title"), Vec::new())))
                .id()
        }
    };

    let Some(mut title_node) = doc.tree.get_mut(title_id) else {
        return;
    };
    while let Some(mut child) = title_node.first_child() {
        child.detach();
    }
    title_node.append(Node::Text(Text {
        text: StrTendril::from(title),
    }));
}

/// Moves every child of `<body>` into a new `<div id="wrapper_id">`, which
/// becomes the body's only child.
pub fn wrap_body(doc: &mut Html, wrapper_id: &str) {
    let Some(body_sel) = selector("body") else {
        return;
    };
    let Some(body_id) = doc.select(&body_sel).next().map(|el| el.id()) else {
        return;
    };

    let id_attr = Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from("id")),
        value: StrTendril::from(wrapper_id),
    };
    let mut wrapper = doc
        .tree
        .orphan(Node::Element(Element::new(html_name("div"), vec![id_attr])));
    wrapper.reparent_from_id_append(body_id);
    let wrapper_id = wrapper.id();

    if let Some(mut body) = doc.tree.get_mut(body_id) {
        body.append_id(wrapper_id);
    }
}

pub fn serialize(doc: &Html) -> String {
    doc.html()
}

/// Concatenated text of `<body>` with all tags removed.
pub fn body_text(doc: &Html) -> String {
    let Some(body_sel) = selector("body") else {
        return String::new();
    };
    doc.select(&body_sel)
        .flat_map(|body| body.text())
        .collect()
}

pub fn body_has_images(doc: &Html) -> bool {
    selector("body img").is_some_and(|sel| doc.select(&sel).next().is_some())
}
