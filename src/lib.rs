//! `cleanse` validates loosely-typed JSON data against declarative schemas,
//! producing either fully typed, cleaned values or *every* problem with the
//! input, each addressed by its path.
//!
//! It's meant for validating API requests: a client gets all of its mistakes
//! back at once, and each one points to the exact form field which caused it.
//!
//! # Cleaning data
//!
//! ```
//! use serde_json::{json, Value};
//! use cleanse::fields::{ListField, NestedValidator, NumberField, StringField};
//! use cleanse::{Cleaned, Configure, Schema, SchemaError};
//!
//! fn main() -> Result<(), SchemaError> {
//!     // Schemas are built once, and can then be used from any thread.
//!     let person = Schema::builder("Person")
//!         .field("name", StringField::new())
//!         .field("height", NumberField::new().min(0).optional())
//!         .build()?;
//!
//!     let book = Schema::builder("Book")
//!         .field("title", StringField::new().max_length(100))
//!         .field("author", NestedValidator::new(person))
//!         .field("tags", ListField::new(StringField::new().max_length(3)))
//!         .build()?;
//!
//!     let input_ok = json!({
//!         "title": "Middlemarch",
//!         "author": { "name": "George Eliot" },
//!         "tags": ["uk", "old"],
//!     });
//!
//!     let cleaned = book.clean(input_ok.as_object().unwrap()).unwrap();
//!     assert_eq!(cleaned["title"], Cleaned::from("Middlemarch"));
//!
//!     let input_bad = json!({
//!         "title": "Middlemarch",
//!         "author": { "height": "tall" },
//!         "tags": ["ok", "toolong", "x"],
//!         "isbn": "978-0141439549",
//!     });
//!
//!     // Every error is reported, each with the path to the bad value.
//!     let errors = book.clean(input_bad.as_object().unwrap()).unwrap_err();
//!     let flat: Vec<(String, String)> = errors
//!         .flatten()
//!         .into_iter()
//!         .map(|(path, message)| (path.to_string(), message))
//!         .collect();
//!
//!     assert_eq!(
//!         flat,
//!         vec![
//!             ("author.name".to_owned(), "This field is required".to_owned()),
//!             ("author.height".to_owned(), "Expected a value of type 'number'".to_owned()),
//!             ("tags.1".to_owned(), "Maximum length 3".to_owned()),
//!             ("isbn".to_owned(), "Unknown field".to_owned()),
//!         ]
//!     );
//!
//!     // The error tree also serializes to JSON, in the shape of the input.
//!     assert_eq!(
//!         serde_json::to_value(&errors).unwrap()["tags"],
//!         json!({ "1": "Maximum length 3" })
//!     );
//!
//!     Ok(())
//! }
//! ```
//!
//! # Declaring fields
//!
//! Every field implements [`Field`](field/trait.Field.html). The fields this
//! crate provides are in the [`fields`](fields/index.html) module, and all of
//! them share the builder methods of [`Configure`](field/trait.Configure.html)
//! for controlling whether they're required, their default value, whether
//! `null` is acceptable, and their error messages.
//!
//! Error messages are resolved from the nearest definition: a message set on
//! the field (or schema) itself, then the defaults of that kind of field, then
//! the defaults shared by all fields. See [`messages`](messages/index.html).

mod validator;

pub mod errors;
pub mod field;
pub mod fields;
pub mod messages;
pub mod schema;
pub mod value;

pub use crate::errors::{ErrorCollection, ErrorNode, ErrorPath, PathSegment, SchemaError, ValidationError};
pub use crate::field::{Configure, Field, FieldOptions};
pub use crate::messages::{ErrorKind, MessageChain, MessageTable, Messages};
pub use crate::schema::{Declare, Schema, SchemaBuilder};
pub use crate::validator::Config;
pub use crate::value::{Cleaned, Record};
