//! Named schemas and the validators compiled from them.
//!
//! A [`SchemaRegistry`] is built once at startup, either from Rust types
//! deriving [`utoipa::ToSchema`] or from raw JSON Schema documents. Building
//! compiles every schema, so requests only ever look validators up.
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_json::json;
//! use specfetch_core::{GenericNotOkResponse, SchemaRegistry};
//! use utoipa::ToSchema;
//!
//! #[derive(Debug, Deserialize, ToSchema)]
//! struct Pong {
//!     message: String,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::builder()
//!     .register::<Pong>()
//!     .register_as::<GenericNotOkResponse>("NotOkResponse")
//!     .build()?;
//!
//! let validator = registry.compile("Pong")?;
//! let pong = json!({ "message": "hello" });
//! assert!(validator.validate::<Pong>(Some(&pong)).is_valid());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use tracing::debug;
use utoipa::ToSchema;
use utoipa::openapi::{RefOr, Schema};

mod error;
pub use self::error::SchemaError;

mod validator;
pub use self::validator::{UNDEFINED_REASON, ValidationReasons, ValidationResult, Validator};

/// Key under which referenced component schemas are embedded in a document.
const COMPONENTS_KEY: &str = "components";

/// Guards `$ref` cycles while collecting property names.
const MAX_REF_DEPTH: usize = 32;

/// Source of one registered schema, compiled by [`SchemaRegistryBuilder::build`].
enum SchemaSource {
    Json(Value),
    Type {
        schema: RefOr<Schema>,
        components: Vec<(String, RefOr<Schema>)>,
    },
}

impl SchemaSource {
    fn of<T>() -> Self
    where
        T: ToSchema,
    {
        let mut components = Vec::new();
        T::schemas(&mut components);
        Self::Type {
            schema: T::schema(),
            components,
        }
    }

    fn into_document(self, name: &str) -> Result<Value, SchemaError> {
        let to_json = |schema: &RefOr<Schema>| {
            serde_json::to_value(schema).map_err(|error| SchemaError::Serialization {
                name: name.to_string(),
                error,
            })
        };

        match self {
            Self::Json(document) => Ok(document),
            Self::Type { schema, components } => {
                let mut document = to_json(&schema)?;
                if components.is_empty() {
                    return Ok(document);
                }

                let mut schemas = Map::new();
                for (component, schema) in &components {
                    schemas.insert(component.clone(), to_json(schema)?);
                }
                if let Value::Object(object) = &mut document {
                    let mut wrapper = Map::new();
                    wrapper.insert("schemas".to_string(), Value::Object(schemas));
                    object.insert(COMPONENTS_KEY.to_string(), Value::Object(wrapper));
                }
                Ok(document)
            }
        }
    }
}

/// A registered and compiled schema.
#[derive(Debug, Clone)]
struct CompiledSchema {
    document: Value,
    validator: Validator,
}

/// Builder collecting schemas before compiling them all at once.
#[derive(Default)]
pub struct SchemaRegistryBuilder {
    sources: IndexMap<String, SchemaSource>,
}

impl SchemaRegistryBuilder {
    /// Registers the schema of `T` under its schema name ([`ToSchema::name`]).
    ///
    /// Schemas of nested types are embedded, so references to them resolve.
    #[must_use]
    pub fn register<T>(self) -> Self
    where
        T: ToSchema,
    {
        let name = T::name().into_owned();
        self.register_as::<T>(name)
    }

    /// Registers the schema of `T` under an explicit name.
    #[must_use]
    pub fn register_as<T>(mut self, name: impl Into<String>) -> Self
    where
        T: ToSchema,
    {
        self.sources.insert(name.into(), SchemaSource::of::<T>());
        self
    }

    /// Registers a raw JSON Schema document.
    #[must_use]
    pub fn register_json(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.sources.insert(name.into(), SchemaSource::Json(schema));
        self
    }

    /// Compiles every registered schema.
    ///
    /// # Errors
    ///
    /// Fails on the first schema that cannot be serialized or compiled.
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let mut schemas = IndexMap::with_capacity(self.sources.len());

        for (name, source) in self.sources {
            let document = source.into_document(&name)?;
            let compiled = jsonschema::validator_for(&document).map_err(|error| {
                SchemaError::InvalidSchema {
                    name: name.clone(),
                    message: error.to_string(),
                }
            })?;
            debug!(%name, "schema compiled");

            let validator = Validator::Schema {
                name: Arc::from(name.as_str()),
                compiled: Arc::new(compiled),
            };
            schemas.insert(
                name,
                CompiledSchema {
                    document,
                    validator,
                },
            );
        }

        Ok(SchemaRegistry { schemas })
    }
}

/// Read-only collection of compiled schemas, indexed by name.
///
/// Build it once with [`SchemaRegistry::builder`] and share it by reference.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, CompiledSchema>,
}

impl SchemaRegistry {
    /// Starts an empty registry.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Returns the validator compiled for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSchema`] if `name` was never registered.
    pub fn compile(&self, name: &str) -> Result<Validator, SchemaError> {
        self.get(name).map(|schema| schema.validator.clone())
    }

    /// Whether a schema is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered schema names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// The JSON document a schema was compiled from.
    pub fn document(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name).map(|schema| &schema.document)
    }

    /// Property names declared by an object schema.
    ///
    /// Properties of `allOf` members and of local `$ref` targets are included.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSchema`] if `name` was never registered.
    pub fn property_names(&self, name: &str) -> Result<IndexSet<String>, SchemaError> {
        let document = &self.get(name)?.document;
        let mut names = IndexSet::new();
        collect_properties(document, document, 0, &mut names);
        Ok(names)
    }

    fn get(&self, name: &str) -> Result<&CompiledSchema, SchemaError> {
        self.schemas
            .get(name)
            .ok_or_else(|| SchemaError::UnknownSchema {
                name: name.to_string(),
            })
    }
}

fn collect_properties(root: &Value, node: &Value, depth: usize, names: &mut IndexSet<String>) {
    if depth > MAX_REF_DEPTH {
        return;
    }

    if let Some(target) = node
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|reference| reference.strip_prefix('#'))
        .and_then(|pointer| root.pointer(pointer))
    {
        collect_properties(root, target, depth + 1, names);
    }

    if let Some(properties) = node.get("properties").and_then(Value::as_object) {
        names.extend(properties.keys().cloned());
    }

    if let Some(members) = node.get("allOf").and_then(Value::as_array) {
        for member in members {
            collect_properties(root, member, depth + 1, names);
        }
    }
}
