//! Standalone export document: the captured template root wrapped in a minimal
//! page shell that carries all collected CSS plus fixed A4 print rules.

use crate::dom::markup::escape_attr;

const FONT_LINKS: [&str; 2] = [
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css",
];

/// Forces the template visible and measurable at A4 width, and strips decoration
/// that breaks pagination.
pub const PRINT_RULES: &str = r#"
.resume-template {
    display: block !important;
    visibility: visible !important;
    max-width: 210mm;
    min-height: 297mm;
    margin: 0 auto;
    background: white;
    padding: 20px;
    font-family: 'Inter', Arial, sans-serif;
    font-size: 14px;
    line-height: 1.5;
    color: #333;
}

body {
    margin: 0;
    padding: 0;
    background: white;
    font-family: 'Inter', Arial, sans-serif;
}

@page {
    size: A4;
    margin: 0.5in;
}

@media print {
    .resume-template {
        box-shadow: none;
        border: none;
        margin: 0;
        max-width: none;
    }
}
"#;

/// Style of the container the root is mounted in.
pub const MOUNT_STYLE: &str = "width: 210mm; background: white;";

/// Builds the full HTML document.
///
/// `root_html` must already be serialized markup (text escaped by the document
/// serializer). `css` is inserted raw after neutralizing any `</style` sequence.
pub fn build_document(root_html: &str, css: &str) -> String {
    let links: String = FONT_LINKS
        .iter()
        .map(|href| format!("<link href=\"{}\" rel=\"stylesheet\">\n", escape_attr(href)))
        .collect();

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n{links}<style>\n{css}\n{PRINT_RULES}</style>\n</head>\n<body>\n<div class=\"export-mount\" style=\"{MOUNT_STYLE}\">\n{root_html}\n</div>\n</body>\n</html>\n",
        css = neutralize_style_end(css),
    )
}

/// Stops stylesheet text from closing the `<style>` element early.
fn neutralize_style_end(css: &str) -> String {
    let lower = css.to_ascii_lowercase();
    let mut out = String::with_capacity(css.len());
    let mut last = 0;
    for (i, _) in lower.match_indices("</style") {
        out.push_str(&css[last..i]);
        out.push_str("<\\/style");
        last = i + "</style".len();
    }
    out.push_str(&css[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_carries_root_css_and_print_rules() {
        let doc = build_document("<div id=\"template-modern\">x</div>", ".a { color: red; }");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(".a { color: red; }"));
        assert!(doc.contains("size: A4;"));
        assert!(doc.contains("box-shadow: none;"));
        assert!(doc.contains("<div id=\"template-modern\">x</div>"));
        assert!(doc.contains("fonts.googleapis.com/css2?family=Inter"));
    }

    #[test]
    fn test_style_end_is_neutralized() {
        let doc = build_document("", "a{} </STYLE><script>x()</script>");
        assert_eq!(doc.matches("</style>").count(), 1);
        assert!(doc.contains("<\\/style><script>"));
    }

    #[test]
    fn test_child_selectors_survive() {
        let doc = build_document("", ".list > li { margin: 0; }");
        assert!(doc.contains(".list > li"));
    }
}
