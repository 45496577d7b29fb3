//! Builder registration.
//!
//! A [`Builders`] value is a builder-producing context. Declaring a
//! defaults function named `<entity>_defaults` on it resolves the entity's
//! target type and counter scope, consumes any pending `use_class` /
//! `count_with` overrides, and records a [`BuilderSpec`] from which the
//! `new_`, `create_` and `find_or_create_` operations are dispatched.
//!
//! ```
//! use workbench::{Builders, Defaults, Model, Persistence, TypeRegistry, overrides};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Default, Model)]
//! struct User {
//!     name: Option<String>,
//! }
//!
//! impl Persistence for User {}
//!
//! # fn main() -> workbench::Result<()> {
//! let registry = Arc::new(TypeRegistry::new());
//! registry.register::<User>()?;
//! let builders = Builders::new(registry).with_sequences(Default::default());
//! builders.declare(
//!     "user_defaults",
//!     Defaults::counter(|u: &mut User, n| {
//!         u.name.get_or_insert_with(|| format!("User {n}"));
//!     }),
//! )?;
//! let user: User = builders.builder("user")?.build_as(&overrides! {})?;
//! assert_eq!(user.name.as_deref(), Some("User 1"));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::defaults::Defaults;
use crate::error::Result;
use crate::naming::{Identifier, entity_name};
use crate::registry::{TypeRef, TypeRegistry};
use crate::sequence::SequenceRegistry;
use crate::settings::{DroppedOverridePolicy, Settings};

/// One registered defaults function and the types it builds and counts with.
#[derive(Debug)]
pub struct BuilderSpec {
    entity: String,
    target: TypeRef,
    counter_scope: TypeRef,
    defaults: Defaults,
}

impl BuilderSpec {
    /// Entity name the operations are named after.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Type constructed by the builder.
    #[must_use]
    pub const fn target(&self) -> TypeRef {
        self.target
    }

    /// Type whose sequence supplies counter values.
    #[must_use]
    pub const fn counter_scope(&self) -> TypeRef {
        self.counter_scope
    }

    /// The defaults function.
    #[must_use]
    pub const fn defaults(&self) -> &Defaults {
        &self.defaults
    }
}

/// One-shot overrides awaiting the next declaration.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingOverrides {
    /// Class to build instead of the one named by the entity.
    pub target: Option<Identifier>,
    /// Class whose counter to share instead of the target's own.
    pub counter_scope: Option<Identifier>,
}

impl PendingOverrides {
    /// Returns `true` when neither slot is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.target.is_none() && self.counter_scope.is_none()
    }
}

#[derive(Default)]
struct State {
    pending: PendingOverrides,
    specs: HashMap<String, Arc<BuilderSpec>>,
}

/// A builder-producing context.
pub struct Builders {
    types: Arc<TypeRegistry>,
    sequences: Arc<SequenceRegistry>,
    settings: Settings,
    state: Mutex<State>,
}

/// Host contexts that expose generated builder operations.
///
/// Implemented by types carrying a [`macro@crate::builders`] impl block.
pub trait BuilderContext {
    /// The context's builders.
    fn builders(&self) -> &Builders;
}

impl Builders {
    /// Creates a context resolving names against `types` and counting with
    /// the process-wide [`SequenceRegistry`].
    #[must_use]
    pub fn new(types: Arc<TypeRegistry>) -> Self {
        Self {
            types,
            sequences: SequenceRegistry::global(),
            settings: Settings::default(),
            state: Mutex::default(),
        }
    }

    /// Counts with `sequences` instead of the process-wide registry.
    #[must_use]
    pub fn with_sequences(mut self, sequences: Arc<SequenceRegistry>) -> Self {
        self.sequences = sequences;
        self
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Registry names are resolved against.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Registry counter values are drawn from.
    #[must_use]
    pub fn sequences(&self) -> &SequenceRegistry {
        &self.sequences
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Builds the next declared entity as `identifier` instead of the class
    /// its name implies.
    pub fn use_class(&self, identifier: impl Into<Identifier>) -> &Self {
        let identifier = identifier.into();
        let mut state = self.state.lock();
        if let Some(previous) = state.pending.target.replace(identifier) {
            warn!(%previous, "replaced an unconsumed use_class override");
        }
        self
    }

    /// Counts the next declared entity with `identifier`'s sequence.
    pub fn count_with(&self, identifier: impl Into<Identifier>) -> &Self {
        let identifier = identifier.into();
        let mut state = self.state.lock();
        if let Some(previous) = state.pending.counter_scope.replace(identifier) {
            warn!(%previous, "replaced an unconsumed count_with override");
        }
        self
    }

    /// Snapshot of the overrides awaiting the next declaration.
    #[must_use]
    pub fn pending(&self) -> PendingOverrides {
        self.state.lock().pending.clone()
    }

    /// Drops any pending overrides, returning `true` when there were some.
    pub fn discard_pending(&self) -> bool {
        let pending = std::mem::take(&mut self.state.lock().pending);
        self.report_dropped(&pending);
        !pending.is_empty()
    }

    /// Declaration hook: registers `defaults` when `fn_name` follows the
    /// `<entity>_defaults` convention.
    ///
    /// Other names are ignored and leave pending overrides untouched.
    ///
    /// # Errors
    ///
    /// See [`Builders::define`].
    pub fn declare(&self, fn_name: &str, defaults: Defaults) -> Result<Option<Arc<BuilderSpec>>> {
        let Some(entity) = entity_name(fn_name) else {
            debug!(fn_name, "declaration is not a builder definition");
            return Ok(None);
        };
        self.define(entity, defaults).map(Some)
    }

    /// Registers `defaults` as the builder for `entity`.
    ///
    /// The target type is the pending `use_class` override or `entity`
    /// itself; the counter scope is the pending `count_with` override or the
    /// target type. Both pending slots are cleared before resolution, so a
    /// failed declaration never leaks its overrides into the next one.
    /// Declaring an entity again replaces its previous builder.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::UnresolvedName`](crate::WorkbenchError::UnresolvedName)
    /// when the target or counter scope does not resolve.
    pub fn define(&self, entity: &str, defaults: Defaults) -> Result<Arc<BuilderSpec>> {
        let mut state = self.state.lock();
        let pending = std::mem::take(&mut state.pending);
        let target = self
            .types
            .resolve(pending.target.unwrap_or_else(|| Identifier::from(entity)))?;
        let counter_scope = self
            .types
            .resolve(pending.counter_scope.unwrap_or(Identifier::Type(target)))?;
        let spec = Arc::new(BuilderSpec {
            entity: entity.to_owned(),
            target,
            counter_scope,
            defaults,
        });
        debug!(
            entity,
            target = target.path(),
            counter_scope = counter_scope.path(),
            arity = ?spec.defaults.arity(),
            "declared builder"
        );
        if state.specs.insert(entity.to_owned(), Arc::clone(&spec)).is_some() {
            debug!(entity, "replaced existing builder");
        }
        Ok(spec)
    }

    /// The spec registered for `entity`, if any.
    #[must_use]
    pub fn spec(&self, entity: &str) -> Option<Arc<BuilderSpec>> {
        self.state.lock().specs.get(entity).cloned()
    }

    /// Declared entity names, sorted.
    #[must_use]
    pub fn entities(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().specs.keys().cloned().collect();
        names.sort();
        names
    }

    fn report_dropped(&self, pending: &PendingOverrides) {
        if pending.is_empty() || self.settings.dropped_override == DroppedOverridePolicy::Ignore {
            return;
        }
        warn!(
            use_class = ?pending.target,
            count_with = ?pending.counter_scope,
            "dropping overrides that no builder declaration consumed"
        );
    }
}

impl Drop for Builders {
    fn drop(&mut self) {
        let pending = std::mem::take(&mut self.state.get_mut().pending);
        self.report_dropped(&pending);
    }
}

impl fmt::Debug for Builders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Builders")
            .field("entities", &state.specs.keys().collect::<Vec<_>>())
            .field("pending", &state.pending)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
