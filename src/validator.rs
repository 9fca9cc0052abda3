//! Clean input data against schemas.
//!
//! This module contains the process of taking a JSON object and checking
//! every declared field of a schema against it, collecting every problem
//! along the way rather than stopping at the first.
//!
//! See [`Schema::clean`](../schema/struct.Schema.html#method.clean) for more.

use crate::errors::{ErrorCollection, ValidationError};
use crate::field::clean_value;
use crate::messages::{ErrorKind, Messages};
use crate::schema::Schema;
use crate::value::Record;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, debug_span, trace};

/// Configuration for how a schema treats its input.
///
/// `Config` can be loaded from JSON:
///
/// ```
/// use cleanse::Config;
/// use serde_json::json;
///
/// let config: Config = serde_json::from_value(json!({
///     "allowUnknownFields": true,
///     "errorMessages": { "unknown": "Unexpected field" },
/// })).unwrap();
///
/// assert!(config.allows_unknown_fields());
/// ```
#[derive(Debug, Default, PartialEq, Eq, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    allow_unknown_fields: bool,
    error_messages: Messages,
}

impl Config {
    /// Create a new, default `Config`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether keys in the input which aren't declared fields are
    /// allowed. The default is to reject them.
    ///
    /// Allowed unknown keys are dropped: they never appear in the cleaned
    /// output.
    pub fn allow_unknown_fields(&mut self, allow_unknown_fields: bool) -> &mut Self {
        self.allow_unknown_fields = allow_unknown_fields;
        self
    }

    /// Overrides the schema-level message for `kind`.
    pub fn error_message<T: Into<String>>(&mut self, kind: ErrorKind, template: T) -> &mut Self {
        self.error_messages.set(kind, template);
        self
    }

    pub fn allows_unknown_fields(&self) -> bool {
        self.allow_unknown_fields
    }

    pub fn error_messages(&self) -> &Messages {
        &self.error_messages
    }
}

impl Schema {
    /// Clean an input object.
    ///
    /// Every declared field is cleaned, in declaration order, and then (unless
    /// unknown fields are allowed) every undeclared key is reported. The
    /// result is either a record holding exactly the cleaned declared fields,
    /// or every error found. A partially cleaned record is never returned.
    pub fn clean(&self, input: &Map<String, Value>) -> Result<Record, ErrorCollection> {
        let span = debug_span!("clean", schema = %self.name);
        let _guard = span.enter();

        let mut errors = ErrorCollection::new();
        let mut record = Record::new();

        for (name, field) in &self.fields {
            match clean_value(field.as_ref(), input.get(name)) {
                Ok(Some(value)) => {
                    record.insert(name.clone(), value);
                }
                Ok(None) => {}
                Err(error) => {
                    trace!(field = %name, error = %error, "field rejected");
                    errors.insert(name.as_str(), error);
                }
            }
        }

        if !self.config.allows_unknown_fields() {
            for key in input.keys().filter(|key| !self.index.contains_key(*key)) {
                trace!(field = %key, "unknown field");
                errors.insert(key.as_str(), self.error(ErrorKind::UNKNOWN));
            }
        }

        if !errors.is_empty() {
            debug!(errors = errors.len(), "input rejected");
        }

        errors.into_result(record)
    }

    fn error(&self, kind: ErrorKind) -> ValidationError {
        let message = self.config.error_messages().render(&self.messages, kind, &[]);
        ValidationError::new(kind, message)
    }
}
