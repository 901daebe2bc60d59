//! HTML fragment scanning, escaping and the markup heuristic.
//!
//! Fragments handled here are whatever an operator typed or pasted, so they
//! are frequently not well-formed. The tokenizer has two modes: `Lenient`
//! treats anything that does not lex as markup as literal text (this is what
//! the visual surface and the sanitizer use), `Strict` reports the first
//! unterminated construct (used to decide whether HTML-looking plain text
//! can be pasted as HTML).

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use smol_str::{SmolStr, ToSmolStr};

use crate::error::HtmlError;

mod offset_map;
mod sanitize;

pub use offset_map::{OffsetMap, TextRun};
pub use sanitize::Sanitizer;
pub(crate) use sanitize::is_safe_style;

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Loose "is there a tag in here" pattern for plain-text clipboard payloads.
static MARKUP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?[a-z][\s\S]*>").expect("markup pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// Raw (still entity-encoded) value, without quotes.
    pub value: Option<&'a str>,
}

impl<'a> Attribute<'a> {
    pub fn decoded_value(&self) -> Cow<'a, str> {
        self.value.map(decode_entities).unwrap_or(Cow::Borrowed(""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<'a> {
    Text,
    StartTag {
        name: &'a str,
        attrs: Vec<Attribute<'a>>,
        self_closing: bool,
    },
    EndTag {
        name: &'a str,
    },
    Comment,
    /// `<!doctype>`, `<![CDATA[`, `<?xml ...>` and friends.
    Declaration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Byte span in the source fragment.
    pub span: Range<usize>,
}

impl Token<'_> {
    pub fn source<'s>(&self, src: &'s str) -> &'s str {
        &src[self.span.clone()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Lenient,
    Strict,
}

/// Streaming tokenizer over an HTML fragment.
///
/// Tokens are contiguous: concatenating every token's span reproduces the
/// input. In strict mode the iterator stops after yielding the first error.
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    mode: ParseMode,
    raw_text: Option<&'static str>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str, mode: ParseMode) -> Self {
        Self {
            src,
            pos: 0,
            mode,
            raw_text: None,
        }
    }

    fn lex_markup(&self, start: usize) -> Result<Option<Token<'a>>, HtmlError> {
        let src = self.src;
        let bytes = src.as_bytes();
        let Some(&next) = bytes.get(start + 1) else {
            return Ok(None);
        };

        match next {
            b'!' if src[start..].starts_with("<!--") => {
                let body = start + 4;
                match src[body..].find("-->") {
                    Some(p) => Ok(Some(Token {
                        kind: TokenKind::Comment,
                        span: start..body + p + 3,
                    })),
                    None => Err(HtmlError::UnterminatedComment { offset: start }),
                }
            }
            b'!' | b'?' => {
                let close = find_byte(bytes, start + 2, b'>')
                    .ok_or(HtmlError::UnterminatedTag { offset: start })?;
                Ok(Some(Token {
                    kind: TokenKind::Declaration,
                    span: start..close + 1,
                }))
            }
            b'/' => {
                let name_start = start + 2;
                let name_end = scan_name(bytes, name_start);
                if name_end == name_start {
                    return Ok(None);
                }
                let close = find_byte(bytes, name_end, b'>')
                    .ok_or(HtmlError::UnterminatedTag { offset: start })?;
                Ok(Some(Token {
                    kind: TokenKind::EndTag {
                        name: &src[name_start..name_end],
                    },
                    span: start..close + 1,
                }))
            }
            b if b.is_ascii_alphabetic() => self.lex_start_tag(start).map(Some),
            _ => Ok(None),
        }
    }

    fn lex_start_tag(&self, start: usize) -> Result<Token<'a>, HtmlError> {
        let src = self.src;
        let bytes = src.as_bytes();
        let name_start = start + 1;
        let name_end = scan_name(bytes, name_start);
        let name = &src[name_start..name_end];

        let mut attrs = Vec::new();
        let mut i = name_end;
        loop {
            i = skip_whitespace(bytes, i);
            match bytes.get(i) {
                None => return Err(HtmlError::UnterminatedTag { offset: start }),
                Some(b'>') => {
                    return Ok(Token {
                        kind: TokenKind::StartTag {
                            name,
                            attrs,
                            self_closing: false,
                        },
                        span: start..i + 1,
                    });
                }
                Some(b'/') => {
                    if bytes.get(i + 1) == Some(&b'>') {
                        return Ok(Token {
                            kind: TokenKind::StartTag {
                                name,
                                attrs,
                                self_closing: true,
                            },
                            span: start..i + 2,
                        });
                    }
                    i += 1;
                }
                Some(_) => {
                    let attr_start = i;
                    while i < bytes.len()
                        && !bytes[i].is_ascii_whitespace()
                        && !matches!(bytes[i], b'=' | b'>' | b'/')
                    {
                        i += 1;
                    }
                    if i == attr_start {
                        // stray '='
                        i += 1;
                        continue;
                    }
                    let attr_name = &src[attr_start..i];

                    let mut value = None;
                    let eq = skip_whitespace(bytes, i);
                    if bytes.get(eq) == Some(&b'=') {
                        let v = skip_whitespace(bytes, eq + 1);
                        match bytes.get(v) {
                            Some(&quote @ (b'"' | b'\'')) => {
                                let close = find_byte(bytes, v + 1, quote)
                                    .ok_or(HtmlError::UnterminatedAttribute { offset: v })?;
                                value = Some(&src[v + 1..close]);
                                i = close + 1;
                            }
                            Some(_) => {
                                let mut end = v;
                                while end < bytes.len()
                                    && !bytes[end].is_ascii_whitespace()
                                    && bytes[end] != b'>'
                                {
                                    end += 1;
                                }
                                value = Some(&src[v..end]);
                                i = end;
                            }
                            None => return Err(HtmlError::UnterminatedTag { offset: start }),
                        }
                    }

                    attrs.push(Attribute {
                        name: attr_name,
                        value,
                    });
                }
            }
        }
    }

    fn raw_text_token(&mut self, element: &'static str) -> Option<Token<'a>> {
        let start = self.pos;
        let end = find_closing_tag(self.src, start, element).unwrap_or(self.src.len());
        if end == start {
            return None;
        }
        self.pos = end;
        Some(Token {
            kind: TokenKind::Text,
            span: start..end,
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, HtmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.src.len() {
            return None;
        }

        if let Some(element) = self.raw_text.take() {
            if let Some(token) = self.raw_text_token(element) {
                return Some(Ok(token));
            }
        }

        let bytes = self.src.as_bytes();
        let start = self.pos;

        if bytes[start] == b'<' {
            match self.lex_markup(start) {
                Ok(Some(token)) => {
                    self.pos = token.span.end;
                    if let TokenKind::StartTag {
                        name,
                        self_closing: false,
                        ..
                    } = &token.kind
                    {
                        self.raw_text = raw_text_element(name);
                    }
                    return Some(Ok(token));
                }
                Ok(None) => {}
                Err(err) => {
                    if self.mode == ParseMode::Strict {
                        self.pos = self.src.len();
                        return Some(Err(err));
                    }
                    tracing::trace!(
                        target: "folio::html",
                        %err,
                        "treating malformed markup as text"
                    );
                }
            }
            // Literal '<'
            let end = next_lt(bytes, start + 1);
            self.pos = end;
            return Some(Ok(Token {
                kind: TokenKind::Text,
                span: start..end,
            }));
        }

        let end = next_lt(bytes, start);
        self.pos = end;
        Some(Ok(Token {
            kind: TokenKind::Text,
            span: start..end,
        }))
    }
}

/// Tokenize leniently. Never fails.
pub fn tokenize(src: &str) -> Vec<Token<'_>> {
    Tokenizer::new(src, ParseMode::Lenient)
        .filter_map(Result::ok)
        .collect()
}

/// Tokenize strictly, failing on the first unterminated construct.
pub fn parse_fragment(src: &str) -> Result<Vec<Token<'_>>, HtmlError> {
    Tokenizer::new(src, ParseMode::Strict).collect()
}

/// Heuristic for plain-text clipboard payloads: contains both angle brackets
/// and something shaped like a tag.
pub fn looks_like_markup(text: &str) -> bool {
    text.contains('<') && text.contains('>') && MARKUP_PATTERN.is_match(text)
}

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// Make a fragment self-contained before it is spliced into a document.
///
/// End tags with no start tag in the fragment are dropped. Elements still
/// open at an end tag for an outer element, or at the end of the fragment,
/// are closed innermost first, the way a parser closes them implicitly.
pub fn balance_fragment(html: &str) -> Cow<'_, str> {
    fn close(out: &mut String, name: &str) {
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    let mut out = String::with_capacity(html.len() + 16);
    let mut open: Vec<&str> = Vec::new();
    let mut changed = false;

    for token in tokenize(html) {
        match &token.kind {
            TokenKind::StartTag {
                name,
                self_closing: false,
                ..
            } if !is_void_element(name) => open.push(*name),
            TokenKind::EndTag { name } => {
                match open.iter().rposition(|n| n.eq_ignore_ascii_case(name)) {
                    Some(pos) => {
                        for inner in open.drain(pos + 1..).rev() {
                            close(&mut out, inner);
                            changed = true;
                        }
                        open.truncate(pos);
                    }
                    None => {
                        changed = true;
                        continue;
                    }
                }
            }
            _ => {}
        }
        out.push_str(token.source(html));
    }

    for name in open.into_iter().rev() {
        close(&mut out, name);
        changed = true;
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(html)
    }
}

/// Escape text for use as element content (DOM `textContent` semantics).
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escape text for use inside a double-quoted attribute value.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, |c| match c {
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

fn escape_with(s: &str, replacement: fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !s.chars().any(|c| replacement(c).is_some()) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match replacement(c) {
            Some(rep) => out.push_str(rep),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decode character references. Unknown references are kept verbatim.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut skip_until = 0;
    for (i, c) in s.char_indices() {
        if i < skip_until {
            continue;
        }
        if c == '&' {
            if let Some((decoded, len)) = entity_at(s, i) {
                out.push_str(&decoded);
                skip_until = i + len;
                continue;
            }
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Decode the character reference starting at byte `i`, returning the text
/// it stands for and the reference's byte length (always ASCII).
///
/// Named references cover the whole HTML5 table, a few of which expand to
/// two characters. Numeric references that name no scalar value (`&#0;`,
/// surrogates, past U+10FFFF) become U+FFFD as they do in a browser.
pub fn entity_at(s: &str, i: usize) -> Option<(SmolStr, usize)> {
    let rest = s.get(i..)?.strip_prefix('&')?;
    let semi = rest.bytes().take(40).position(|b| b == b';')?;
    let body = &rest[..semi];
    let len = semi + 2;

    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                u32::from_str_radix(hex, 16).unwrap_or(u32::MAX)
            }
            None if !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()) => {
                num.parse::<u32>().unwrap_or(u32::MAX)
            }
            _ => return None,
        };
        let c = match code {
            0 => char::REPLACEMENT_CHARACTER,
            _ => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
        };
        return Some((c.to_smolstr(), len));
    }

    let mut name = body.bytes();
    let well_formed = name.next().is_some_and(|b| b.is_ascii_alphabetic())
        && name.all(|b| b.is_ascii_alphanumeric());
    if !well_formed {
        return None;
    }
    let reference = &s[i..i + len];
    match html_escape::decode_html_entities(reference) {
        Cow::Owned(decoded) if decoded != reference => Some((SmolStr::from(decoded), len)),
        _ => None,
    }
}

fn raw_text_element(name: &str) -> Option<&'static str> {
    RAW_TEXT_ELEMENTS
        .iter()
        .copied()
        .find(|el| el.eq_ignore_ascii_case(name))
}

fn find_closing_tag(src: &str, from: usize, element: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets stable.
    let haystack = src[from..].to_ascii_lowercase();
    haystack.find(&format!("</{element}")).map(|p| from + p)
}

fn scan_name(bytes: &[u8], start: usize) -> usize {
    match bytes.get(start) {
        Some(b) if b.is_ascii_alphabetic() => {}
        _ => return start,
    }
    let mut i = start + 1;
    while i < bytes.len()
        && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'-' | b':' | b'_'))
    {
        i += 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|p| from + p)
}

fn next_lt(bytes: &[u8], from: usize) -> usize {
    find_byte(bytes, from, b'<').unwrap_or(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind<'_>> {
        tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokens_cover_input() {
        let src = "<p class=\"x\">Hi <b>there</b><!-- c --><br/></p> & done";
        let tokens = tokenize(src);
        let rebuilt: String = tokens.iter().map(|t| t.source(src)).collect();
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn test_start_tag_attributes() {
        let kinds = kinds(r#"<img src="a.png" alt='cat' hidden width=10 />"#);
        match &kinds[0] {
            TokenKind::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                assert_eq!(*name, "img");
                assert!(*self_closing);
                assert_eq!(attrs.len(), 4);
                assert_eq!(attrs[0].value, Some("a.png"));
                assert_eq!(attrs[1].value, Some("cat"));
                assert_eq!(attrs[2].value, None);
                assert_eq!(attrs[3].value, Some("10"));
            }
            other => panic!("expected start tag, got {other:?}"),
        }
    }

    #[test]
    fn test_lone_angle_brackets_are_text() {
        let tokens = tokenize("5 < 10 > 2");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
    }

    #[test]
    fn test_script_content_is_raw_text() {
        let kinds = kinds("<script>if (a<b) {}</script>");
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds[1], TokenKind::Text);
        assert_eq!(kinds[2], TokenKind::EndTag { name: "script" });
    }

    #[test]
    fn test_strict_reports_unterminated_tag() {
        assert_eq!(
            parse_fragment("<p>fine</p><b class=\"x"),
            Err(HtmlError::UnterminatedAttribute { offset: 20 })
        );
        assert_eq!(
            parse_fragment("text <div"),
            Err(HtmlError::UnterminatedTag { offset: 5 })
        );
        assert!(matches!(
            parse_fragment("<!-- never closed"),
            Err(HtmlError::UnterminatedComment { offset: 0 })
        ));
        assert!(parse_fragment("<p>Hello</p>").is_ok());
    }

    #[test]
    fn test_lenient_recovers_from_unterminated_tag() {
        let tokens = tokenize("a <div");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
    }

    #[test]
    fn test_looks_like_markup() {
        assert!(looks_like_markup("<b>Bold</b>"));
        assert!(looks_like_markup("see </p> here"));
        assert!(!looks_like_markup("5 < 10 > 2"));
        assert!(!looks_like_markup("no brackets"));
        assert!(!looks_like_markup("a > b"));
    }

    #[test]
    fn test_escape_and_decode() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert!(matches!(escape_text("plain"), Cow::Borrowed(_)));
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(decode_entities("&lt;b&gt; &amp; &#65;&#x42; &bogus;"), "<b> & AB &bogus;");
    }

    #[test]
    fn test_named_references_beyond_basics() {
        assert_eq!(
            decode_entities("caf&eacute; &rarr; &bull;&times;&middot;"),
            "café → •×·"
        );
        assert_eq!(entity_at("a&eacute;b", 1), Some(("é".into(), 8)));
        // Unknown names and bare ampersands stay literal.
        assert_eq!(entity_at("&nosuchthing;", 0), None);
        assert_eq!(entity_at("AT&T; x", 2), None);
        assert_eq!(entity_at("& amp;", 0), None);
    }

    #[test]
    fn test_invalid_code_points_become_replacement() {
        assert_eq!(decode_entities("&#0;&#xD800;&#1114112;"), "\u{fffd}\u{fffd}\u{fffd}");
        assert_eq!(entity_at("&#;", 0), None);
        assert_eq!(entity_at("&#xZZ;", 0), None);
    }

    #[test]
    fn test_balance_fragment() {
        assert!(matches!(balance_fragment("<p>a<br>b</p>"), Cow::Borrowed(_)));
        assert_eq!(balance_fragment("<b>x"), "<b>x</b>");
        assert_eq!(balance_fragment("</p><h1>x"), "<h1>x</h1>");
        assert_eq!(balance_fragment("<b><i>x</b>y"), "<b><i>x</i></b>y");
        assert_eq!(balance_fragment("<script>a</b></script>"), "<script>a</b></script>");
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("IMG"));
        assert!(!is_void_element("p"));
    }
}
