//! Placeholder substitution for remote command templates.
//!
//! Non-special placeholders are replaced literally, without shell escaping;
//! quoting is the template author's job. `@ARGS` is special: its own value
//! may reference the non-special placeholders, which are expanded inside it
//! before it is spliced into the template. The template is scanned once, so
//! nothing produced by a replacement is ever expanded again and a crafted
//! argument cannot inject `@ARGS`.

use std::collections::BTreeMap;

use crate::domain::error::SubstitutionError;
use crate::domain::template::{PLACEHOLDER_PREFIX, Placeholder, Segment, Template, scan};

/// Values bound to placeholders for a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<Placeholder, String>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.insert(placeholder, value);
        self
    }

    pub fn insert(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.values.insert(placeholder, value.into());
    }

    #[must_use]
    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }

    #[must_use]
    pub fn is_bound(&self, placeholder: Placeholder) -> bool {
        self.values.contains_key(&placeholder)
    }

    /// Check the binding rules without rendering anything.
    ///
    /// # Errors
    ///
    /// Returns `NestedPlaceholder` if a non-special value contains the
    /// placeholder prefix, or `SelfReference` if any value contains its own
    /// placeholder token.
    pub fn validate(&self) -> Result<(), SubstitutionError> {
        for (&placeholder, value) in &self.values {
            if value.contains(placeholder.token()) {
                return Err(SubstitutionError::SelfReference {
                    placeholder: placeholder.token(),
                });
            }
            if !placeholder.is_special() && value.contains(PLACEHOLDER_PREFIX) {
                return Err(SubstitutionError::NestedPlaceholder {
                    placeholder: placeholder.token(),
                });
            }
        }
        Ok(())
    }

    /// Replace every bound non-special placeholder in `text`. Special and
    /// unbound tokens are kept verbatim.
    fn expand_plain(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in scan(text) {
            match segment {
                Segment::Literal(s) | Segment::Unknown(s) => out.push_str(s),
                Segment::Known(p) => match self.get(p) {
                    Some(value) if !p.is_special() => out.push_str(value),
                    _ => out.push_str(p.token()),
                },
            }
        }
        out
    }

    /// Render `text` in one scan: plain placeholders take their value, the
    /// special one takes its value with plain references expanded inside it.
    fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in scan(text) {
            match segment {
                Segment::Literal(s) | Segment::Unknown(s) => out.push_str(s),
                Segment::Known(p) => match self.get(p) {
                    Some(value) if p.is_special() => out.push_str(&self.expand_plain(value)),
                    Some(value) => out.push_str(value),
                    None => out.push_str(p.token()),
                },
            }
        }
        out
    }
}

/// Render `template` against `bindings`.
///
/// # Errors
///
/// Fails closed: a rule violation or a placeholder without a binding yields
/// an error and no partial command.
pub fn substitute(template: &Template, bindings: &Bindings) -> Result<String, SubstitutionError> {
    bindings.validate()?;
    if let Some(missing) = template
        .placeholders()
        .iter()
        .find(|p| !bindings.is_bound(**p))
    {
        return Err(SubstitutionError::MissingBinding {
            placeholder: missing.token(),
        });
    }

    Ok(bindings.render(template.source()))
}
