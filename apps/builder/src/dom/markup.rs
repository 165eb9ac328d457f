//! Typed view builder. Every string that reaches HTML output passes through
//! [`escape_text`] or [`escape_attr`], so user input is always inert text.

use std::fmt::Write;

/// CSS `display` value carried in an element's inline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    /// No inline display; the stylesheet decides.
    Inherit,
    Block,
    Flex,
    None,
}

impl Display {
    pub fn css(self) -> Option<&'static str> {
        match self {
            Display::Inherit => None,
            Display::Block => Some("block"),
            Display::Flex => Some("flex"),
            Display::None => Some("none"),
        }
    }
}

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub display: Display,
    pub children: Vec<Markup>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            display: Display::Inherit,
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, M>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Markup>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Markup::Text(text.into()))
    }
}

impl From<Element> for Markup {
    fn from(el: Element) -> Self {
        Markup::Element(el)
    }
}

impl Markup {
    pub fn text(text: impl Into<String>) -> Self {
        Markup::Text(text.into())
    }

    #[cfg(test)]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    #[cfg(test)]
    fn write_html(&self, out: &mut String) {
        match self {
            Markup::Text(text) => out.push_str(&escape_text(text)),
            Markup::Element(el) => {
                let attrs = el.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()));
                write_open_tag(out, el.tag, el.id.as_deref(), &el.classes, attrs, el.display);
                if is_void(el.tag) {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

pub(crate) fn write_open_tag<'a>(
    out: &mut String,
    tag: &str,
    id: Option<&str>,
    classes: &[String],
    attrs: impl Iterator<Item = (&'a str, &'a str)>,
    display: Display,
) {
    out.push('<');
    out.push_str(tag);
    if let Some(id) = id {
        let _ = write!(out, " id=\"{}\"", escape_attr(id));
    }
    if !classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape_attr(&classes.join(" ")));
    }
    for (name, value) in attrs {
        let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
    }
    if let Some(css) = display.css() {
        let _ = write!(out, " style=\"display: {css}\"");
    }
    out.push('>');
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
