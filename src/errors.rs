//! Error types: the tree of validation errors produced while cleaning, and
//! the errors that can emerge while building a schema.

use crate::messages::ErrorKind;
use failure::Fail;
use json_pointer::JsonPointer;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// An enum of the ways a schema can be put together incorrectly.
///
/// These are checked once, when a schema is built, so that `clean` never has
/// to deal with a nonsensical field configuration.
#[derive(Debug, Fail, PartialEq, Clone, Eq, Hash)]
pub enum SchemaError {
    /// A field was declared with an empty name.
    #[fail(display = "schema {} declares a field with an empty name", schema)]
    EmptyFieldName { schema: String },

    /// A field's lower bound is greater than its upper bound, so no value
    /// could ever satisfy it.
    #[fail(
        display = "field {} has a minimum of {} but a maximum of {}",
        field, min, max
    )]
    InvalidBounds {
        field: String,
        min: String,
        max: String,
    },

    /// A choice field was declared without any choices.
    #[fail(display = "field {} has no choices", field)]
    EmptyChoices { field: String },

    /// A character field was declared with an empty alphabet.
    #[fail(display = "field {} has an empty alphabet", field)]
    EmptyAlphabet { field: String },

    /// A character field lists the same character as both punctuation and
    /// part of its alphabet, so it's ambiguous whether it should be stripped.
    #[fail(
        display = "field {} lists {:?} as both punctuation and alphabet",
        field, character
    )]
    AmbiguousCharacter { field: String, character: char },
}

/// A single problem with one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    kind: ErrorKind,
    message: String,
}

impl ValidationError {
    pub fn new<T: Into<String>>(kind: ErrorKind, message: T) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Why the value was rejected.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The rendered, human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One step along the path to an error: an object key or an array index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// The full path from the root of the input to one error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorPath(Vec<PathSegment>);

impl ErrorPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// This path as a JSON Pointer, e.g. `/items/2/quantity`.
    pub fn to_pointer(&self) -> JsonPointer<String, Vec<String>> {
        JsonPointer::new(self.0.iter().map(|segment| segment.to_string()).collect())
    }
}

impl<T: Into<PathSegment>> From<Vec<T>> for ErrorPath {
    fn from(segments: Vec<T>) -> Self {
        ErrorPath(segments.into_iter().map(Into::into).collect())
    }
}

/// Renders the dotted path, e.g. `items.2.quantity`.
impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Either a single error, or the errors of a nested object or list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorNode {
    Leaf(ValidationError),
    Branch(ErrorCollection),
}

impl From<ValidationError> for ErrorNode {
    fn from(error: ValidationError) -> Self {
        ErrorNode::Leaf(error)
    }
}

impl From<ErrorCollection> for ErrorNode {
    fn from(errors: ErrorCollection) -> Self {
        ErrorNode::Branch(errors)
    }
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorNode::Leaf(error) => write!(f, "{}", error),
            ErrorNode::Branch(errors) => write!(f, "{}", errors),
        }
    }
}

/// Every error found while cleaning an object or a list, keyed by where in
/// that object or list it was found.
///
/// Errors are kept in the order they were recorded, which is the order the
/// fields were declared in (then unknown keys), or the order of list indices.
/// A collection returned by this crate always holds at least one error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorCollection {
    errors: Vec<(PathSegment, ErrorNode)>,
}

impl ErrorCollection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert<K: Into<PathSegment>, E: Into<ErrorNode>>(&mut self, key: K, error: E) {
        self.errors.push((key.into(), error.into()));
    }

    /// Return `value` if no errors were recorded, and this collection
    /// otherwise.
    pub(crate) fn into_result<T>(self, value: T) -> Result<T, ErrorCollection> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// The number of direct entries in this collection. Nested collections
    /// count once; see [`flatten`](#method.flatten) for every leaf.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error recorded for `key`, if any.
    pub fn get<K: Into<PathSegment>>(&self, key: K) -> Option<&ErrorNode> {
        let key = key.into();
        self.errors
            .iter()
            .find(|(segment, _)| *segment == key)
            .map(|(_, error)| error)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathSegment, &ErrorNode)> {
        self.errors.iter().map(|(segment, error)| (segment, error))
    }

    /// Every leaf error in this tree, with the full path leading to it.
    ///
    /// The tree is walked depth-first, so the output order is deterministic.
    pub fn flatten(&self) -> Vec<(ErrorPath, String)> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.flatten_into(&mut prefix, &mut out);
        out
    }

    fn flatten_into(&self, prefix: &mut Vec<PathSegment>, out: &mut Vec<(ErrorPath, String)>) {
        for (segment, error) in &self.errors {
            prefix.push(segment.clone());
            match error {
                ErrorNode::Leaf(error) => {
                    out.push((ErrorPath(prefix.clone()), error.message().to_owned()))
                }
                ErrorNode::Branch(errors) => errors.flatten_into(prefix, out),
            }
            prefix.pop();
        }
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("{")?;
        for (i, (segment, error)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", segment, error)?;
        }
        f.write_str("}")
    }
}

impl std::error::Error for ErrorCollection {}

/// Serializes as a JSON object mirroring the shape of the input, with a
/// message at each rejected position.
impl Serialize for ErrorCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (segment, error) in &self.errors {
            let key = segment.to_string();
            match error {
                ErrorNode::Leaf(error) => map.serialize_entry(&key, error.message())?,
                ErrorNode::Branch(errors) => map.serialize_entry(&key, errors)?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn leaf(message: &str) -> ValidationError {
        ValidationError::new(ErrorKind::INVALID, message)
    }

    fn sample() -> ErrorCollection {
        let mut quantity = ErrorCollection::new();
        quantity.insert("quantity", leaf("too small"));

        let mut items = ErrorCollection::new();
        items.insert(1usize, leaf("not an object"));
        items.insert(2usize, quantity);

        let mut errors = ErrorCollection::new();
        errors.insert("name", leaf("required"));
        errors.insert("items", items);
        errors
    }

    #[test]
    fn flatten_is_depth_first() {
        assert_eq!(
            sample().flatten(),
            vec![
                (ErrorPath::from(vec!["name"]), "required".to_owned()),
                (
                    ErrorPath::from(vec![PathSegment::from("items"), PathSegment::from(1usize)]),
                    "not an object".to_owned()
                ),
                (
                    ErrorPath::from(vec![
                        PathSegment::from("items"),
                        PathSegment::from(2usize),
                        PathSegment::from("quantity")
                    ]),
                    "too small".to_owned()
                ),
            ]
        );
    }

    #[test]
    fn paths_render_dotted_and_as_pointers() {
        let flat = sample().flatten();
        let (path, _) = &flat[2];
        assert_eq!(path.to_string(), "items.2.quantity");
        assert_eq!(path.to_pointer().to_string(), "/items/2/quantity");
    }

    #[test]
    fn get_finds_index_and_key_entries() {
        let errors = sample();
        match errors.get("items") {
            Some(ErrorNode::Branch(items)) => {
                assert!(items.get(1usize).is_some());
                assert!(items.get(0usize).is_none());
            }
            other => panic!("expected a branch, got {:?}", other),
        }
        assert!(errors.get("missing").is_none());
    }

    #[test]
    fn serializes_as_nested_object() {
        assert_eq!(
            serde_json::to_value(sample()).unwrap(),
            json!({
                "name": "required",
                "items": {
                    "1": "not an object",
                    "2": { "quantity": "too small" },
                },
            })
        );
    }

    #[test]
    fn display_nests_braces() {
        assert_eq!(
            sample().to_string(),
            "{name: required, items: {1: not an object, 2: {quantity: too small}}}"
        );
    }

    #[test]
    fn into_result() {
        assert_eq!(ErrorCollection::new().into_result(5), Ok(5));
        assert!(sample().into_result(5).is_err());
    }
}
