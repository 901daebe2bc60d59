//! Formatting commands and the markup they produce.
//!
//! One table serves both surfaces. The visual surface escapes the selected
//! text before wrapping it, the raw surface wraps it verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::html::is_safe_style;

/// A toolbar formatting command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatCommand {
    #[serde(alias = "h1")]
    Heading1,
    #[serde(alias = "h2")]
    Heading2,
    #[serde(alias = "h3")]
    Heading3,
    #[serde(alias = "h4")]
    Heading4,
    #[serde(alias = "h5")]
    Heading5,
    #[serde(alias = "b")]
    Bold,
    #[serde(alias = "i")]
    Italic,
    #[serde(alias = "u")]
    Underline,
    #[serde(alias = "left")]
    AlignLeft,
    #[serde(alias = "center")]
    AlignCenter,
    #[serde(alias = "right")]
    AlignRight,
    #[serde(alias = "ul")]
    UnorderedList,
    #[serde(alias = "ol")]
    OrderedList,
    #[serde(alias = "a")]
    Link,
    #[serde(alias = "code")]
    InlineCode,
    #[serde(alias = "color")]
    TextColor,
}

/// Opening tag, closing tag and placeholder text for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub open: String,
    pub close: &'static str,
    pub placeholder: &'static str,
}

impl Markup {
    fn simple(tag: &str, close: &'static str, placeholder: &'static str) -> Self {
        Self {
            open: format!("<{tag}>"),
            close,
            placeholder,
        }
    }

    /// Wrap already-prepared inner content.
    pub fn wrap(&self, inner: &str) -> String {
        format!("{}{}{}", self.open, inner, self.close)
    }
}

impl FormatCommand {
    pub const ALL: [FormatCommand; 16] = [
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::Heading4,
        Self::Heading5,
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::AlignLeft,
        Self::AlignCenter,
        Self::AlignRight,
        Self::UnorderedList,
        Self::OrderedList,
        Self::Link,
        Self::InlineCode,
        Self::TextColor,
    ];

    /// Short toolbar id.
    pub fn id(self) -> &'static str {
        match self {
            Self::Heading1 => "h1",
            Self::Heading2 => "h2",
            Self::Heading3 => "h3",
            Self::Heading4 => "h4",
            Self::Heading5 => "h5",
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
            Self::AlignLeft => "left",
            Self::AlignCenter => "center",
            Self::AlignRight => "right",
            Self::UnorderedList => "ul",
            Self::OrderedList => "ol",
            Self::Link => "a",
            Self::InlineCode => "code",
            Self::TextColor => "color",
        }
    }

    /// Markup for this command.
    ///
    /// Returns `None` for `TextColor` without a usable color value.
    pub fn markup(self, color: Option<&str>) -> Option<Markup> {
        let markup = match self {
            Self::Heading1 => Markup::simple("h1", "</h1>", "Heading 1"),
            Self::Heading2 => Markup::simple("h2", "</h2>", "Heading 2"),
            Self::Heading3 => Markup::simple("h3", "</h3>", "Heading 3"),
            Self::Heading4 => Markup::simple("h4", "</h4>", "Heading 4"),
            Self::Heading5 => Markup::simple("h5", "</h5>", "Heading 5"),
            Self::Bold => Markup::simple("strong", "</strong>", "Bold text"),
            Self::Italic => Markup::simple("em", "</em>", "Italic text"),
            Self::Underline => Markup::simple("u", "</u>", "Underlined text"),
            Self::AlignLeft => aligned("left", "Left aligned text"),
            Self::AlignCenter => aligned("center", "Center aligned text"),
            Self::AlignRight => aligned("right", "Right aligned text"),
            Self::UnorderedList => Markup::simple("ul><li", "</li></ul>", "List item"),
            Self::OrderedList => Markup::simple("ol><li", "</li></ol>", "List item"),
            Self::Link => Markup {
                open: r##"<a href="#">"##.to_string(),
                close: "</a>",
                placeholder: "Link text",
            },
            Self::InlineCode => Markup::simple("code", "</code>", "Code snippet"),
            Self::TextColor => {
                let color = color.map(str::trim).filter(|c| is_css_color(c))?;
                Markup {
                    open: format!(r#"<span style="color: {color};">"#),
                    close: "</span>",
                    placeholder: "Colored text",
                }
            }
        };
        Some(markup)
    }
}

fn aligned(side: &str, placeholder: &'static str) -> Markup {
    Markup {
        open: format!(r#"<div style="text-align: {side};">"#),
        close: "</div>",
        placeholder,
    }
}

/// Accepts the color notations a color picker hands back: keywords,
/// hex codes and functional `rgb()`/`hsl()` forms. The declaration is
/// screened like a pasted `style` attribute.
fn is_css_color(value: &str) -> bool {
    let charset = value.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-')
    });
    !value.is_empty()
        && value.len() <= 64
        && charset
        && is_safe_style(&format!("color: {value};"))
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown formatting command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for FormatCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|cmd| {
                cmd.id() == lower
                    || serde_json::to_value(cmd)
                        .ok()
                        .is_some_and(|v| v.as_str() == Some(lower.as_str()))
            })
            .ok_or(UnknownCommand(s.to_string()))
    }
}

/// A named entry of the text-color palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub name: SmolStr,
    pub value: SmolStr,
}

impl ColorOption {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

pub fn default_palette() -> Vec<ColorOption> {
    [
        ("Default", "inherit"),
        ("Black", "#000000"),
        ("Gray", "#718096"),
        ("Red", "#E53E3E"),
        ("Orange", "#ED8936"),
        ("Yellow", "#ECC94B"),
        ("Green", "#48BB78"),
        ("Teal", "#38B2AC"),
        ("Blue", "#4299E1"),
        ("Indigo", "#667EEA"),
        ("Purple", "#9F7AEA"),
        ("Pink", "#ED64A6"),
    ]
    .into_iter()
    .map(|(name, value)| ColorOption::new(name, value))
    .collect()
}
