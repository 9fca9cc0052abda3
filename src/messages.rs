//! Error kinds and the lookup of their human-readable messages.
//!
//! Every field and schema renders its errors from a *message chain*: the
//! instance's own overrides first, then a sequence of static tables ordered
//! from the most specific kind of field (or schema) to the most general. The
//! first template found for an error kind wins.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// A machine-readable code identifying why a value was rejected.
///
/// The set of kinds is open: fields defined outside this crate can declare
/// their own with [`ErrorKind::new`](#method.new).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorKind(&'static str);

impl ErrorKind {
    pub const REQUIRED: ErrorKind = ErrorKind("required");
    pub const NULL: ErrorKind = ErrorKind("null");
    pub const INVALID: ErrorKind = ErrorKind("invalid");
    pub const NON_EMPTY: ErrorKind = ErrorKind("non_empty");
    pub const MIN_LENGTH: ErrorKind = ErrorKind("min_length");
    pub const MAX_LENGTH: ErrorKind = ErrorKind("max_length");
    pub const MIN_VALUE: ErrorKind = ErrorKind("min_value");
    pub const MAX_VALUE: ErrorKind = ErrorKind("max_value");
    pub const NO_MATCH: ErrorKind = ErrorKind("no_match");
    pub const INVALID_EMAIL: ErrorKind = ErrorKind("invalid_email");
    pub const INVALID_URL: ErrorKind = ErrorKind("invalid_url");
    pub const INVALID_FORMAT: ErrorKind = ErrorKind("invalid_format");
    pub const NO_TIMEZONE: ErrorKind = ErrorKind("no_timezone");
    pub const INVALID_CHOICE: ErrorKind = ErrorKind("invalid_choice");
    pub const ALLOWED_CHARACTERS: ErrorKind = ErrorKind("allowed_characters");
    pub const LUHN_CHECKSUM: ErrorKind = ErrorKind("luhn_checksum");
    pub const UNKNOWN: ErrorKind = ErrorKind("unknown");

    /// Declare a new kind of error.
    pub const fn new(code: &'static str) -> Self {
        ErrorKind(code)
    }

    /// The code of this kind, e.g. `"max_length"`.
    pub fn code(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Default message templates owned by one kind of field or schema.
pub type MessageTable = &'static [(ErrorKind, &'static str)];

/// An ordered chain of tables, nearest first.
pub type MessageChain = &'static [MessageTable];

/// Per-instance message overrides, keyed by error code.
///
/// Overrides deserialize from a plain JSON object, which makes it easy to keep
/// a catalogue of messages outside the code:
///
/// ```
/// use cleanse::{ErrorKind, Messages};
/// use serde_json::json;
///
/// let messages: Messages = serde_json::from_value(json!({
///     "required": "Dieses Feld ist erforderlich",
/// })).unwrap();
///
/// assert_eq!(
///     messages.template(&[], ErrorKind::REQUIRED).unwrap(),
///     "Dieses Feld ist erforderlich",
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Messages {
    overrides: HashMap<String, String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the template used for `kind`.
    pub fn set<T: Into<String>>(&mut self, kind: ErrorKind, template: T) -> &mut Self {
        self.overrides.insert(kind.code().to_owned(), template.into());
        self
    }

    /// Find the nearest template for `kind`: an override, or the first table
    /// in `chain` that defines it.
    pub fn template<'a>(&'a self, chain: &[MessageTable], kind: ErrorKind) -> Option<&'a str> {
        if let Some(template) = self.overrides.get(kind.code()) {
            return Some(template.as_str());
        }

        chain
            .iter()
            .flat_map(|table| table.iter())
            .find(|(k, _)| *k == kind)
            .map(|(_, template)| *template)
    }

    /// Render the message for `kind`, substituting `{name}` placeholders with
    /// `params`. Kinds without any template render as their code.
    pub fn render(
        &self,
        chain: &[MessageTable],
        kind: ErrorKind,
        params: &[(&str, String)],
    ) -> String {
        match self.template(chain, kind) {
            Some(template) => substitute(template, params).into_owned(),
            None => kind.code().to_owned(),
        }
    }
}

fn substitute<'a>(template: &'a str, params: &[(&str, String)]) -> Cow<'a, str> {
    if params.is_empty() || !template.contains('{') {
        return Cow::Borrowed(template);
    }

    let mut out = template.to_owned();
    for (name, value) in params {
        out = out.replace(&format!("{{{}}}", name), value);
    }

    Cow::Owned(out)
}
