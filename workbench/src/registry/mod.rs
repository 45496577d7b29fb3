//! Type half of name resolution.
//!
//! Rust has no global constant table to evaluate names against, so the
//! global namespace is an explicit [`TypeRegistry`] populated at start-up.
//! Resolution never evaluates code; it only looks up registered handles.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{PersistenceError, Result, WorkbenchError};
use crate::naming::{Identifier, SEPARATOR, qualify};
use crate::record::{Model, Overrides, Record};

type Construct = fn() -> Box<dyn Record>;
type Query = fn(&Overrides) -> Option<Result<Vec<Box<dyn Record>>, PersistenceError>>;

/// Opaque handle to a concrete model type.
///
/// Two handles are equal exactly when they refer to the same Rust type.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    rust_name: &'static str,
    path: &'static str,
    construct: Construct,
    query: Query,
}

fn construct<T: Model>() -> Box<dyn Record> {
    Box::new(T::default())
}

fn query<T: Model>(filter: &Overrides) -> Option<Result<Vec<Box<dyn Record>>, PersistenceError>> {
    T::find_where(filter).map(|found| {
        found.map(|records| {
            records
                .into_iter()
                .map(|record| Box::new(record) as Box<dyn Record>)
                .collect()
        })
    })
}

impl TypeRef {
    /// Handle for the model type `T`.
    #[must_use]
    pub fn of<T: Model>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            rust_name: type_name::<T>(),
            path: T::PATH,
            construct: construct::<T>,
            query: query::<T>,
        }
    }

    /// Class path declared by the type, without the root marker.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Rust type name, for diagnostics.
    #[must_use]
    pub const fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    /// Returns `true` when this handle refers to `T`.
    #[must_use]
    pub fn is<T: Model>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Builds a fresh instance through the type's no-argument constructor.
    #[must_use]
    pub fn construct(&self) -> Box<dyn Record> {
        (self.construct)()
    }

    /// Runs the type's `where(filter)` query, or `None` when it has none.
    #[must_use]
    pub fn find_where(
        &self,
        filter: &Overrides,
    ) -> Option<Result<Vec<Box<dyn Record>>, PersistenceError>> {
        (self.query)(filter)
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("path", &self.path)
            .field("rust_name", &self.rust_name)
            .finish()
    }
}

/// The global namespace: fully-qualified class paths mapped to types.
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, TypeRef>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under its own [`Model::PATH`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::DuplicateType`] when another type already
    /// occupies the path. Registering the same type twice is a no-op.
    pub fn register<T: Model>(&self) -> Result<TypeRef> {
        self.register_as::<T>(T::PATH)
    }

    /// Registers `T` under an additional class path.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::DuplicateType`] when another type already
    /// occupies `path`.
    pub fn register_as<T: Model>(&self, path: &str) -> Result<TypeRef> {
        let ty = TypeRef::of::<T>();
        let key = anchored(path);
        let mut types = self.types.write();
        if let Some(existing) = types.get(&key) {
            if *existing == ty {
                return Ok(ty);
            }
            return Err(WorkbenchError::DuplicateType {
                path: key,
                existing: existing.rust_name(),
            });
        }
        debug!(path = %key, rust_type = ty.rust_name(), "registered model type");
        types.insert(key, ty);
        Ok(ty)
    }

    /// Resolves an identifier to a type handle.
    ///
    /// Handles are returned unchanged; names are [qualified](qualify) and
    /// looked up from the root of the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::UnresolvedName`] when nothing is registered
    /// under the qualified name.
    pub fn resolve(&self, identifier: impl Into<Identifier>) -> Result<TypeRef> {
        match identifier.into() {
            Identifier::Type(ty) => Ok(ty),
            Identifier::Name(name) => {
                let qualified = qualify(&name);
                self.types
                    .read()
                    .get(&qualified)
                    .copied()
                    .ok_or(WorkbenchError::UnresolvedName { name, qualified })
            }
        }
    }

    /// Returns `true` when `path` (anchored or not) is registered.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.types.read().contains_key(&anchored(path))
    }

    /// Number of registered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Returns `true` when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = self.types.read();
        let mut paths: Vec<&String> = types.keys().collect();
        paths.sort();
        f.debug_struct("TypeRegistry").field("paths", &paths).finish()
    }
}

fn anchored(path: &str) -> String {
    if path.starts_with(SEPARATOR) {
        path.to_owned()
    } else {
        format!("{SEPARATOR}{path}")
    }
}
