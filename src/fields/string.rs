use crate::errors::{ErrorNode, SchemaError};
use crate::field::{expect_type, Configure, Field, FieldOptions, FIELD_MESSAGES, TYPED_MESSAGES};
use crate::messages::{ErrorKind, MessageChain, MessageTable};
use crate::value::Cleaned;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use url::Url;

pub const STRING_MESSAGES: MessageTable = &[
    (ErrorKind::NON_EMPTY, "This field can not be empty"),
    (ErrorKind::MIN_LENGTH, "Minimum length {min}"),
    (ErrorKind::MAX_LENGTH, "Maximum length {max}"),
    (ErrorKind::NO_MATCH, "Not in the expected format"),
];

pub const EMAIL_MESSAGES: MessageTable = &[(ErrorKind::INVALID_EMAIL, "Not a valid email address")];

pub const URL_MESSAGES: MessageTable = &[(ErrorKind::INVALID_URL, "Not a valid URL")];

const STRING_CHAIN: MessageChain = &[STRING_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];
const EMAIL_CHAIN: MessageChain = &[EMAIL_MESSAGES, STRING_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];
const URL_CHAIN: MessageChain = &[URL_MESSAGES, STRING_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];

/// Accepts strings, and only strings.
///
/// An empty string counts as missing for a required field. Lengths are
/// counted in characters.
#[derive(Clone, Debug)]
pub struct StringField {
    options: FieldOptions,
    min_length: usize,
    max_length: Option<usize>,
    pattern: Option<Regex>,
}

impl StringField {
    pub fn new() -> Self {
        Self {
            options: FieldOptions::default(),
            min_length: 0,
            max_length: None,
            pattern: None,
        }
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Only accept strings matching `pattern`. Anchor the pattern if the
    /// whole string must match.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Run the string checks, reporting errors through `outer` so that
    /// fields built on top of this one render their own messages.
    pub(crate) fn clean_str<'v>(&self, outer: &dyn Field, raw: &'v Value) -> Result<&'v str, ErrorNode> {
        let value = expect_type(outer, "string", raw, Value::as_str)?;

        if value.is_empty() && self.options.required {
            return Err(outer.error(ErrorKind::REQUIRED, &[]));
        }

        let len = value.chars().count();
        if len < self.min_length {
            return Err(if self.min_length == 1 {
                outer.error(ErrorKind::NON_EMPTY, &[])
            } else {
                outer.error(ErrorKind::MIN_LENGTH, &[("min", self.min_length.to_string())])
            });
        }

        if let Some(max_length) = self.max_length {
            if len > max_length {
                return Err(outer.error(ErrorKind::MAX_LENGTH, &[("max", max_length.to_string())]));
            }
        }

        if let Some(ref pattern) = self.pattern {
            if !pattern.is_match(value) {
                return Err(outer.error(ErrorKind::NO_MATCH, &[]));
            }
        }

        Ok(value)
    }

    pub(crate) fn check_bounds(&self, name: &str) -> Result<(), SchemaError> {
        match self.max_length {
            Some(max_length) if max_length < self.min_length => Err(SchemaError::InvalidBounds {
                field: name.to_owned(),
                min: self.min_length.to_string(),
                max: max_length.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl Default for StringField {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for StringField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }
}

impl Field for StringField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        self.clean_str(self, raw).map(Cleaned::from)
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn messages(&self) -> MessageChain {
        STRING_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        self.check_bounds(name)
    }
}

fn email_re() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("email pattern is valid"))
}

/// A string field that only accepts email addresses.
///
/// Only basic conformance is checked: some characters, an `@`, then more
/// characters containing at least one dot.
#[derive(Clone, Debug, Default)]
pub struct EmailField {
    string: StringField,
}

impl EmailField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.string = self.string.min_length(min_length);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.string = self.string.max_length(max_length);
        self
    }
}

impl Configure for EmailField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        self.string.options_mut()
    }
}

impl Field for EmailField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let value = self.string.clean_str(self, raw)?;
        if !email_re().is_match(value) {
            return Err(self.error(ErrorKind::INVALID_EMAIL, &[]));
        }
        Ok(value.into())
    }

    fn options(&self) -> &FieldOptions {
        self.string.options()
    }

    fn messages(&self) -> MessageChain {
        EMAIL_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        self.string.check_bounds(name)
    }
}

/// A string field that only accepts absolute URLs with a host, using one of
/// a set of schemes (`http`, `https`, `ftp` and `ftps` by default).
///
/// The cleaned value is the input string, unchanged.
#[derive(Clone, Debug)]
pub struct UrlField {
    string: StringField,
    schemes: Vec<String>,
}

impl UrlField {
    pub fn new() -> Self {
        Self {
            string: StringField::new(),
            schemes: vec!["http".into(), "https".into(), "ftp".into(), "ftps".into()],
        }
    }

    /// Replace the accepted schemes.
    pub fn schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.string = self.string.max_length(max_length);
        self
    }
}

impl Default for UrlField {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for UrlField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        self.string.options_mut()
    }
}

impl Field for UrlField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let value = self.string.clean_str(self, raw)?;
        let valid = match Url::parse(value) {
            Ok(url) => url.host().is_some() && self.schemes.iter().any(|s| s == url.scheme()),
            Err(_) => false,
        };

        if valid {
            Ok(value.into())
        } else {
            Err(self.error(ErrorKind::INVALID_URL, &[]))
        }
    }

    fn options(&self) -> &FieldOptions {
        self.string.options()
    }

    fn messages(&self) -> MessageChain {
        URL_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        self.string.check_bounds(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_util::{err, ok};
    use serde_json::json;

    #[test]
    fn strings() {
        let field = StringField::new();
        assert_eq!(ok(&field, json!("hello")), Cleaned::from("hello"));
        assert_eq!(err(&field, json!("")), "This field is required");
        assert_eq!(err(&field, json!(10)), "Expected a value of type 'string'");
    }

    #[test]
    fn optional_strings_may_be_empty() {
        let field = StringField::new().optional();
        assert_eq!(ok(&field, json!("")), Cleaned::from(""));
    }

    #[test]
    fn lengths() {
        let field = StringField::new().min_length(3).max_length(5);
        assert_eq!(ok(&field, json!("hello")), Cleaned::from("hello"));
        assert_eq!(err(&field, json!("no")), "Minimum length 3");
        assert_eq!(err(&field, json!("hello!")), "Maximum length 5");

        // Characters, not bytes.
        assert_eq!(ok(&field, json!("héllo")), Cleaned::from("héllo"));
    }

    #[test]
    fn min_length_of_one_means_non_empty() {
        let field = StringField::new().optional().min_length(1);
        assert_eq!(err(&field, json!("")), "This field can not be empty");
    }

    #[test]
    fn pattern() {
        let field = StringField::new().pattern(Regex::new(r"^[A-Z]{3}\d{3}$").unwrap());
        assert_eq!(ok(&field, json!("ABC123")), Cleaned::from("ABC123"));
        assert_eq!(err(&field, json!("abc123")), "Not in the expected format");
    }

    #[test]
    fn bounds_are_checked() {
        assert!(StringField::new().min_length(4).max_length(2).check("code").is_err());
        assert!(StringField::new().min_length(2).max_length(2).check("code").is_ok());
    }

    #[test]
    fn emails() {
        let field = EmailField::new();
        assert_eq!(ok(&field, json!("test@example.com")), Cleaned::from("test@example.com"));
        assert_eq!(ok(&field, json!("t@e.c")), Cleaned::from("t@e.c"));

        for bad in &["t@e", "@te.com", "test@", "te.com", "test"] {
            assert_eq!(err(&field, json!(bad)), "Not a valid email address");
        }
        assert_eq!(err(&field, json!(10)), "Expected a value of type 'string'");
    }

    #[test]
    fn email_length() {
        let field = EmailField::new().max_length(10);
        assert_eq!(ok(&field, json!("t@e.c")), Cleaned::from("t@e.c"));
        assert_eq!(err(&field, json!("test@example.com")), "Maximum length 10");
    }

    #[test]
    fn urls() {
        let field = UrlField::new();
        assert_eq!(
            ok(&field, json!("https://example.com/path?q=1")),
            Cleaned::from("https://example.com/path?q=1")
        );
        assert_eq!(err(&field, json!("example.com")), "Not a valid URL");
        assert_eq!(err(&field, json!("mailto:test@example.com")), "Not a valid URL");
        assert_eq!(err(&field, json!("gopher://example.com")), "Not a valid URL");

        let gopher = UrlField::new().schemes(vec!["gopher"]);
        assert_eq!(ok(&gopher, json!("gopher://example.com")), Cleaned::from("gopher://example.com"));
    }
}
