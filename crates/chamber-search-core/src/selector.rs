#![forbid(unsafe_code)]

//! Compound element selectors (`tag.class.class`).
//!
//! The host contract only ever needs to name an element by tag and/or a set
//! of classes, so this is deliberately not a CSS engine: no combinators, no
//! attributes, no pseudo-classes. Scoping ("descendant of X", "direct child
//! of Y") is expressed by the caller through [`crate::dom::Document`] queries.
//!
//! Class names may contain characters that utility-CSS frameworks use, such
//! as `/` and `:` (`border-border/60`, `hover:bg-muted`). [`Selector::to_css`]
//! escapes them for browser `querySelector` calls.

use std::fmt;
use std::str::FromStr;

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
}

/// Selector parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Empty or whitespace-only input.
    Empty,
    /// A character outside the supported compound-selector grammar.
    Unsupported { selector: String, ch: char },
    /// A `.` not followed by a class name.
    EmptyClass { selector: String },
    /// Tag segment is not a valid element name.
    InvalidTag { selector: String },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::Unsupported { selector, ch } => {
                write!(f, "unsupported character {ch:?} in selector {selector:?}")
            }
            Self::EmptyClass { selector } => write!(f, "empty class name in selector {selector:?}"),
            Self::InvalidTag { selector } => write!(f, "invalid tag name in selector {selector:?}"),
        }
    }
}

impl std::error::Error for SelectorError {}

impl Selector {
    /// Parse a compound selector such as `aside`, `.oc-group-body`, or
    /// `div.border-b.border-border/60`.
    pub fn parse(src: &str) -> Result<Self, SelectorError> {
        let src = src.trim();
        if src.is_empty() {
            return Err(SelectorError::Empty);
        }
        if let Some(ch) = src
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '>' | '+' | '~' | ',' | '[' | ']' | '#' | '*' | '(' | ')'))
        {
            return Err(SelectorError::Unsupported {
                selector: src.to_owned(),
                ch,
            });
        }

        let mut segments = src.split('.');
        let tag = segments.next().unwrap_or_default();
        let tag = if tag.is_empty() {
            None
        } else if tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && tag.starts_with(|c: char| c.is_ascii_alphabetic())
        {
            Some(tag.to_ascii_lowercase())
        } else {
            return Err(SelectorError::InvalidTag {
                selector: src.to_owned(),
            });
        };

        let mut classes = Vec::new();
        for class in segments {
            if class.is_empty() {
                return Err(SelectorError::EmptyClass {
                    selector: src.to_owned(),
                });
            }
            classes.push(class.to_owned());
        }

        Ok(Self { tag, classes })
    }

    /// Selector matching any element with the given tag.
    #[must_use]
    pub fn tag_only(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_ascii_lowercase()),
            classes: Vec::new(),
        }
    }

    /// Required tag, if any (lower-case).
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Required classes, in source order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Evaluate against an element described by its tag and a class probe.
    pub fn matches(&self, tag: &str, has_class: impl Fn(&str) -> bool) -> bool {
        if let Some(want) = &self.tag
            && !want.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        self.classes.iter().all(|class| has_class(class))
    }

    /// Render as an escaped CSS selector for `querySelector`.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        if let Some(tag) = &self.tag {
            out.push_str(tag);
        }
        for class in &self.classes {
            out.push('.');
            escape_ident(class, &mut out);
        }
        out
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        Ok(())
    }
}

/// CSS identifier escaping (subset of `CSS.escape`).
fn escape_ident(ident: &str, out: &mut String) {
    if ident == "-" {
        out.push_str("\\-");
        return;
    }
    let leading_dash = ident.starts_with('-');
    for (idx, ch) in ident.chars().enumerate() {
        if ch.is_ascii_digit() && (idx == 0 || (idx == 1 && leading_dash)) {
            // A digit may not start an identifier, even after a single `-`.
            out.push_str(&format!("\\3{ch} "));
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            out.push(ch);
        } else {
            out.push('\\');
            out.push(ch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tag_and_classes() {
        let sel = Selector::parse("div.border-b.border-border/60").unwrap();
        assert_eq!(sel.tag(), Some("div"));
        assert_eq!(sel.classes(), ["border-b", "border-border/60"]);
        assert_eq!(sel.to_string(), "div.border-b.border-border/60");
    }

    #[test]
    fn class_only_selector_has_no_tag() {
        let sel: Selector = ".oc-group-body".parse().unwrap();
        assert_eq!(sel.tag(), None);
        assert_eq!(sel.classes(), ["oc-group-body"]);
    }

    #[test]
    fn tag_is_case_insensitive() {
        let sel = Selector::parse("ASIDE").unwrap();
        assert_eq!(sel.tag(), Some("aside"));
        assert!(sel.matches("ASIDE", |_| false));
    }

    #[test]
    fn rejects_combinators_and_empty_parts() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("aside .flex-1"),
            Err(SelectorError::Unsupported { ch: ' ', .. })
        ));
        assert!(matches!(
            Selector::parse(".oc-group-body > div"),
            Err(SelectorError::Unsupported { .. })
        ));
        assert!(matches!(
            Selector::parse(".a..b"),
            Err(SelectorError::EmptyClass { .. })
        ));
        assert!(matches!(
            Selector::parse("9div"),
            Err(SelectorError::InvalidTag { .. })
        ));
    }

    #[test]
    fn matches_requires_every_class() {
        let sel = Selector::parse(".flex-1.min-h-0").unwrap();
        assert!(sel.matches("div", |c| c == "flex-1" || c == "min-h-0"));
        assert!(!sel.matches("div", |c| c == "flex-1"));
    }

    #[test]
    fn css_escapes_utility_class_characters() {
        let sel = Selector::parse(".border-b.border-border/60").unwrap();
        assert_eq!(sel.to_css(), ".border-b.border-border\\/60");

        let sel = Selector::parse(".hover:bg-muted").unwrap();
        assert_eq!(sel.to_css(), ".hover\\:bg-muted");

        let sel = Selector::parse(".2xl").unwrap();
        assert_eq!(sel.to_css(), ".\\32 xl");
    }

    #[test]
    fn css_escapes_digit_after_leading_dash() {
        let sel = Selector::parse(".-2x").unwrap();
        assert_eq!(sel.to_css(), ".-\\32 x");

        let sel = Selector::parse("div.-mt-2").unwrap();
        assert_eq!(sel.to_css(), "div.-mt-2");

        let sel = Selector::parse(".--2").unwrap();
        assert_eq!(sel.to_css(), ".--2");

        let sel = Selector::parse(".-").unwrap();
        assert_eq!(sel.to_css(), ".\\-");
    }
}
