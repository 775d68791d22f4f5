//! Schema registry keyed by operator type name.
//!
//! Registration is write-once per name. Registering a name twice is a
//! programming error: the conflicting origins are logged and the call panics.

use crate::definition::OperatorDescriptor;
use crate::errors::SchemaError;
use crate::schema::{OpSchema, SchemaOrigin};
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error};

/// Registry of operator schemas.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<OpSchema>>>,
}

impl SchemaRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates, configures and registers a schema under `name`.
    ///
    /// `configure` receives a fresh schema tagged with `file` and `line` and
    /// returns the configured schema, which is published read-only.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    pub fn new_schema<F>(
        &self,
        name: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        configure: F,
    ) -> Arc<OpSchema>
    where
        F: FnOnce(OpSchema) -> OpSchema,
    {
        let schema = configure(OpSchema::at(file, line));
        self.register(name, schema)
    }

    /// Registers an already configured schema under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    pub fn register(&self, name: impl Into<String>, schema: OpSchema) -> Arc<OpSchema> {
        let name = name.into();
        match self.insert(name, schema) {
            Ok(schema) => schema,
            Err(err) => {
                error!(error = %err, "duplicate schema registration");
                panic!("{err}");
            }
        }
    }

    fn insert(&self, name: String, schema: OpSchema) -> Result<Arc<OpSchema>, SchemaError> {
        let mut schemas = self.schemas.write();
        match schemas.entry(name) {
            Entry::Occupied(existing) => Err(SchemaError::Duplicate {
                name: existing.key().clone(),
                origin: schema.origin().clone(),
                prior: existing.get().origin().clone(),
            }),
            Entry::Vacant(slot) => {
                debug!(name = %slot.key(), origin = %schema.origin(), "registered schema");
                Ok(Arc::clone(slot.insert(Arc::new(schema))))
            }
        }
    }

    /// Fetches the schema registered under `name`.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<Arc<OpSchema>> {
        self.schemas.read().get(name).cloned()
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Origin of the schema registered under `name`.
    #[must_use]
    pub fn origin(&self, name: &str) -> Option<SchemaOrigin> {
        self.schemas.read().get(name).map(|s| s.origin().clone())
    }

    /// Looks up the schema for `name` and checks `def` against it.
    pub fn verify<D>(&self, name: &str, def: &D) -> Result<(), SchemaError>
    where
        D: OperatorDescriptor + ?Sized,
    {
        let schema = self
            .schema(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;
        schema.check(def)?;
        Ok(())
    }

    /// Returns the number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }
}

/// Global schema registry.
pub static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::new);

/// Gets the global schema registry.
pub fn global_registry() -> &'static SchemaRegistry {
    &REGISTRY
}

/// Creates, configures and registers a schema in the global registry.
///
/// # Panics
///
/// Panics if `name` is already registered.
pub fn new_schema<F>(
    name: impl Into<String>,
    file: impl Into<String>,
    line: u32,
    configure: F,
) -> Arc<OpSchema>
where
    F: FnOnce(OpSchema) -> OpSchema,
{
    REGISTRY.new_schema(name, file, line, configure)
}

/// Fetches a schema from the global registry.
#[must_use]
pub fn schema(name: &str) -> Option<Arc<OpSchema>> {
    REGISTRY.schema(name)
}
