//! Allowlist cleaner for pasted HTML.

use super::{Attribute, TokenKind, decode_entities, escape_attr, tokenize};

/// Elements dropped together with everything inside them.
const DROP_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "template", "noscript", "title", "textarea",
    "select", "svg", "math", "head",
];

const ALLOWED_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "caption", "cite", "code", "col", "colgroup", "dd",
    "del", "div", "dl", "dt", "em", "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "i", "img", "ins", "kbd", "li", "mark", "ol", "p", "pre", "q", "s", "small", "span",
    "strike", "strong", "sub", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "u",
    "ul",
];

const GLOBAL_ATTRIBUTES: &[&str] = &["class", "dir", "lang", "style", "title"];

const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite"];

fn element_attributes(element: &str) -> &'static [&'static str] {
    match element {
        "a" => &["href", "target", "rel", "name"],
        "img" => &["src", "alt", "width", "height", "loading"],
        "td" | "th" => &["colspan", "rowspan", "scope"],
        "ol" => &["start", "type", "reversed"],
        "col" | "colgroup" => &["span"],
        "blockquote" | "q" | "del" | "ins" => &["cite"],
        _ => &[],
    }
}

/// Re-serializes a fragment keeping only allowlisted elements and attributes.
///
/// Unknown elements are unwrapped, script-like elements vanish with their
/// content, comments and declarations are dropped. Clean input comes back
/// byte-for-byte apart from attribute quoting.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    allow_inline_styles: bool,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            allow_inline_styles: true,
        }
    }
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every `style` attribute instead of screening it.
    pub fn without_inline_styles(mut self) -> Self {
        self.allow_inline_styles = false;
        self
    }

    pub fn sanitize(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        // (element, nesting depth) of a dropped subtree we are inside.
        let mut dropping: Option<(String, usize)> = None;

        for token in tokenize(html) {
            if let Some((element, depth)) = dropping.as_mut() {
                match &token.kind {
                    TokenKind::StartTag {
                        name,
                        self_closing: false,
                        ..
                    } if name.eq_ignore_ascii_case(element) => *depth += 1,
                    TokenKind::EndTag { name } if name.eq_ignore_ascii_case(element) => {
                        *depth -= 1;
                        if *depth == 0 {
                            dropping = None;
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match &token.kind {
                TokenKind::Text => push_text(&mut out, token.source(html)),
                TokenKind::StartTag {
                    name,
                    attrs,
                    self_closing,
                } => {
                    let name = name.to_ascii_lowercase();
                    if DROP_WITH_CONTENT.contains(&name.as_str()) {
                        tracing::debug!(
                            target: "folio::paste",
                            element = %name,
                            "dropping element"
                        );
                        if !self_closing {
                            dropping = Some((name, 1));
                        }
                        continue;
                    }
                    if !ALLOWED_ELEMENTS.contains(&name.as_str()) {
                        continue;
                    }
                    self.push_start_tag(&mut out, &name, attrs, *self_closing);
                }
                TokenKind::EndTag { name } => {
                    let name = name.to_ascii_lowercase();
                    if ALLOWED_ELEMENTS.contains(&name.as_str()) && !super::is_void_element(&name) {
                        out.push_str("</");
                        out.push_str(&name);
                        out.push('>');
                    }
                }
                TokenKind::Comment | TokenKind::Declaration => {}
            }
        }

        out
    }

    fn push_start_tag(
        &self,
        out: &mut String,
        name: &str,
        attrs: &[Attribute<'_>],
        self_closing: bool,
    ) {
        out.push('<');
        out.push_str(name);
        for attr in attrs {
            let attr_name = attr.name.to_ascii_lowercase();
            if !self.attribute_allowed(name, &attr_name) {
                continue;
            }
            let value = attr.decoded_value();
            if URL_ATTRIBUTES.contains(&attr_name.as_str()) && !is_safe_url(&value) {
                tracing::debug!(
                    target: "folio::paste",
                    attribute = %attr_name,
                    "dropping unsafe url"
                );
                continue;
            }
            if attr_name == "style" && !is_safe_style(&value) {
                continue;
            }
            out.push(' ');
            out.push_str(&attr_name);
            if attr.value.is_some() {
                out.push_str("=\"");
                out.push_str(&escape_attr(&value));
                out.push('"');
            }
        }
        if self_closing {
            out.push_str(" />");
        } else {
            out.push('>');
        }
    }

    fn attribute_allowed(&self, element: &str, attr: &str) -> bool {
        if attr.starts_with("on") {
            return false;
        }
        if attr == "style" && !self.allow_inline_styles {
            return false;
        }
        GLOBAL_ATTRIBUTES.contains(&attr) || element_attributes(element).contains(&attr)
    }
}

/// Text is copied as-is except for stray `<`, which the tokenizer hands us
/// as text when it does not start a tag.
fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '<' {
            out.push_str("&lt;");
        } else {
            out.push(c);
        }
    }
}

pub(crate) fn is_safe_url(value: &str) -> bool {
    let compact: String = decode_entities(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if compact.starts_with("javascript:") || compact.starts_with("vbscript:") {
        return false;
    }
    if compact.starts_with("data:") {
        return compact.starts_with("data:image/");
    }
    true
}

pub(crate) fn is_safe_style(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    !(lower.contains("expression(") || lower.contains("url(") || lower.contains("javascript:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(html: &str) -> String {
        Sanitizer::default().sanitize(html)
    }

    #[test]
    fn test_clean_markup_unchanged() {
        assert_eq!(clean("<b>Bold</b>"), "<b>Bold</b>");
        assert_eq!(
            clean("<p>One <em>two</em><br>three</p>"),
            "<p>One <em>two</em><br>three</p>"
        );
        assert_eq!(clean("plain text &amp; more"), "plain text &amp; more");
    }

    #[test]
    fn test_script_dropped_with_content() {
        assert_eq!(
            clean("<p>hi</p><script>alert('x')</script><p>there</p>"),
            "<p>hi</p><p>there</p>"
        );
        assert_eq!(clean("<svg><svg></svg><g>x</g></svg>after"), "after");
    }

    #[test]
    fn test_event_handlers_dropped() {
        assert_eq!(
            clean(r#"<a href="/x" onclick="steal()">go</a>"#),
            r#"<a href="/x">go</a>"#
        );
    }

    #[test]
    fn test_unknown_elements_unwrapped() {
        assert_eq!(clean("<font color=red><b>x</b></font>"), "<b>x</b>");
        assert_eq!(clean("<!-- note --><!DOCTYPE html><p>a</p>"), "<p>a</p>");
    }

    #[test]
    fn test_unsafe_urls_and_styles() {
        assert_eq!(clean(r#"<a href="javascript:alert(1)">x</a>"#), "<a>x</a>");
        assert_eq!(clean(r#"<a href="java&#x09;script:alert(1)">x</a>"#), "<a>x</a>");
        assert_eq!(
            clean(r#"<img src="data:image/png;base64,AAAA" alt="ok">"#),
            r#"<img src="data:image/png;base64,AAAA" alt="ok">"#
        );
        assert_eq!(clean(r#"<img src="data:text/html,x">"#), "<img>");
        assert_eq!(
            clean(r#"<span style="background: url(x)">t</span>"#),
            "<span>t</span>"
        );
        assert_eq!(
            clean(r#"<span style="color: red;">t</span>"#),
            r#"<span style="color: red;">t</span>"#
        );
    }

    #[test]
    fn test_without_inline_styles() {
        let sanitizer = Sanitizer::new().without_inline_styles();
        assert_eq!(
            sanitizer.sanitize(r#"<div style="text-align: center;">c</div>"#),
            "<div>c</div>"
        );
    }

    #[test]
    fn test_self_closing_image() {
        insta::assert_snapshot!(
            clean(r#"<IMG SRC="a.png" ALT="a &amp; b" style="max-width: 100%; height: auto;" />"#),
            @r#"<img src="a.png" alt="a &amp; b" style="max-width: 100%; height: auto;" />"#
        );
    }

    #[test]
    fn test_stray_angle_bracket_escaped() {
        assert_eq!(clean("5 < 10 > 2"), "5 &lt; 10 > 2");
    }
}
