//! Remote command templates and the placeholders they may reference.
//!
//! A placeholder is `@` followed by one or more `[A-Z_]` characters. Only
//! the names in [`Placeholder`] are substituted; any other `@`-token (for
//! example the `%T@ %p` format in `find -printf`) is left untouched.

use std::collections::BTreeSet;

/// Prefix that introduces a placeholder in a template or argument string.
pub const PLACEHOLDER_PREFIX: char = '@';

/// Placeholders understood by the substitution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// Remote working directory for generated files.
    FsPath,
    /// Cloud Foundry application name.
    AppName,
    /// Generated file name carrying a uniqueness token.
    FileName,
    /// Deterministic file name without the token.
    StaticFileName,
    /// Free-form caller arguments. May reference the other placeholders.
    Args,
}

impl Placeholder {
    pub const ALL: [Placeholder; 5] = [
        Self::FsPath,
        Self::AppName,
        Self::FileName,
        Self::StaticFileName,
        Self::Args,
    ];

    /// The placeholder as it appears in text, prefix included.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::FsPath => "@FSPATH",
            Self::AppName => "@APP_NAME",
            Self::FileName => "@FILE_NAME",
            Self::StaticFileName => "@STATIC_FILE_NAME",
            Self::Args => "@ARGS",
        }
    }

    /// Special placeholders are substituted in a second pass and may embed
    /// references to the non-special ones.
    #[must_use]
    pub fn is_special(self) -> bool {
        self == Self::Args
    }

    /// Look up a placeholder by its bare name (`"FSPATH"`, not `"@FSPATH"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| &p.token()[1..] == name)
    }
}

/// One segment of a scanned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Literal(&'a str),
    Known(Placeholder),
    /// An `@NAME` token that is not a [`Placeholder`].
    Unknown(&'a str),
}

/// Split `text` into literal runs and `@NAME` tokens.
pub(crate) fn scan(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(PLACEHOLDER_PREFIX) {
        let at = cursor + offset;
        let name_start = at + PLACEHOLDER_PREFIX.len_utf8();
        let name_len = text[name_start..]
            .bytes()
            .take_while(|b| b.is_ascii_uppercase() || *b == b'_')
            .count();

        if name_len == 0 {
            cursor = name_start;
            continue;
        }

        let token = &text[at..name_start + name_len];
        if literal_start < at {
            segments.push(Segment::Literal(&text[literal_start..at]));
        }
        segments.push(match Placeholder::from_name(&token[1..]) {
            Some(p) => Segment::Known(p),
            None => Segment::Unknown(token),
        });
        cursor = name_start + name_len;
        literal_start = cursor;
    }

    if literal_start < text.len() {
        segments.push(Segment::Literal(&text[literal_start..]));
    }
    segments
}

/// A remote shell fragment with its placeholder references extracted up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: &'static str,
    placeholders: BTreeSet<Placeholder>,
}

impl Template {
    #[must_use]
    pub fn new(source: &'static str) -> Self {
        let placeholders = scan(source)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Known(p) => Some(p),
                Segment::Literal(_) | Segment::Unknown(_) => None,
            })
            .collect();
        Self {
            source,
            placeholders,
        }
    }

    #[must_use]
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Placeholders the template references, in declaration order of [`Placeholder`].
    #[must_use]
    pub fn placeholders(&self) -> &BTreeSet<Placeholder> {
        &self.placeholders
    }

    #[must_use]
    pub fn references(&self, placeholder: Placeholder) -> bool {
        self.placeholders.contains(&placeholder)
    }

    /// Uppercase `@`-tokens that look like placeholders but are not known.
    /// Catalog templates are expected to have none.
    #[must_use]
    pub fn unknown_tokens(&self) -> Vec<&'static str> {
        scan(self.source)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Unknown(token) => Some(token),
                Segment::Literal(_) | Segment::Known(_) => None,
            })
            .collect()
    }
}
