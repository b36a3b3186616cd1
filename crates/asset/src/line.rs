//! Line classification: comment, blank or `keyword args...` directive.

use std::borrow::Cow;

/// One non-comment, non-blank line split into keyword + arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive<'a> {
    pub keyword: Cow<'a, str>,
    pub args: Vec<Cow<'a, str>>,
}

impl<'a> Directive<'a> {
    pub fn new<K, I, A>(keyword: K, args: I) -> Self
    where
        K: Into<Cow<'a, str>>,
        I: IntoIterator<Item = A>,
        A: Into<Cow<'a, str>>,
    {
        Self {
            keyword: keyword.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(|a| &**a)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Comment,
    Blank,
    Directive(Directive<'a>),
}

/// Classify a raw input line.
///
/// Only a `#` in the very first byte marks a comment; `"  # foo"` is a
/// directive with keyword `"#"`. Tokens are separated by runs of Unicode
/// whitespace.
pub fn classify(line: &str) -> Line<'_> {
    if line.starts_with('#') {
        return Line::Comment;
    }

    let mut parts = line.split_whitespace();
    match parts.next() {
        None => Line::Blank,
        Some(keyword) => Line::Directive(Directive {
            keyword: Cow::Borrowed(keyword),
            args: parts.map(Cow::Borrowed).collect(),
        }),
    }
}
