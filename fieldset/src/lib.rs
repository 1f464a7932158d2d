//! Admin panel field descriptors
//!
//! `fieldset` describes how the attributes of a resource appear in an admin
//! panel. Each `Field` knows its label and attribute, where it is shown, how it
//! reads a value from the resource, how a request writes it back, and the flat
//! JSON mapping the frontend renders from. The frontend picks a widget by the
//! `component` string; everything else in the mapping configures that widget.
//!
//! # Architecture
//!
//! - **Descriptor, not engine**: fields describe storage, validation and
//!   authorization; the application performs them
//! - **One kind enum**: per-kind options live in `FieldKind`, no type hierarchy
//! - **Request scoped**: fields are built, resolved and serialized per request;
//!   callbacks are `Arc`ed so a declared set can be cloned cheaply
//! - **YAML on disk**: resources can be declared as one `.yaml` file each and
//!   loaded through `FieldsContext`
//!
//! ```rust
//! use fieldset::{Field, Resource};
//!
//! let mut id = Field::id("User ID").attribute("user_id").as_big_int().copyable();
//! id.resolve(&Resource::new().with("user_id", "9223372036854775807"));
//!
//! let wire = id.json_serialize();
//! assert_eq!(wire["value"], "9223372036854775807");
//! assert_eq!(wire["asBigInt"], true);
//! assert_eq!(wire["copyable"], true);
//! ```

pub mod attribute;
pub mod collection;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod field;
pub mod resource;
pub mod types;

pub use attribute::attribute_for;
pub use collection::Fields;
pub use config::{AudioDefaults, FieldsConfig, FileDefaults};
pub use context::{FieldsContext, FieldsContextBuilder};
pub use definition::{FieldSpec, ResourceDef};
pub use error::{FieldsError, Result};
pub use field::{DisplayCallback, Field, FillCallback, ResolveCallback, SeeCallback};
pub use resource::{Request, Resource};
pub use types::{
    AudioOptions, BooleanOptions, FieldKind, FileOptions, HeadingOptions, IdOptions, LineOptions,
    NumberOptions, Preload, TextareaOptions, View, Visibility,
};
