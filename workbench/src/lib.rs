//! Declarative test-fixture builders.
//!
//! Declare how to fill in one kind of domain object once, as a
//! `<entity>_defaults` function, and get three operations for it:
//!
//! - `new_<entity>` constructs an instance, applies caller overrides, then
//!   the defaults;
//! - `create_<entity>` does the same and persists the result;
//! - `find_or_create_<entity>` returns the first persisted match for the
//!   overrides, creating one when there is none.
//!
//! Defaults functions may take just the object, the object and a per-type
//! counter (for distinct sample values), or those plus the raw overrides.
//! The engine itself never persists, validates or queries anything; it calls
//! into the capabilities the domain type provides through [`Persistence`].
//!
//! The usual entry point is the [`macro@builders`] attribute over an `impl` block,
//! paired with [`derive@Model`] on the domain types:
//!
//! ```
//! use std::sync::Arc;
//! use workbench::{
//!     BuilderContext, Builders, Model, Persistence, TypeRegistry, builders, overrides,
//! };
//!
//! #[derive(Debug, Default, Model)]
//! struct User {
//!     name: Option<String>,
//!     phone: Option<String>,
//! }
//!
//! impl Persistence for User {}
//!
//! struct Fixtures {
//!     builders: Builders,
//! }
//!
//! impl BuilderContext for Fixtures {
//!     fn builders(&self) -> &Builders {
//!         &self.builders
//!     }
//! }
//!
//! #[builders]
//! impl Fixtures {
//!     fn user_defaults(u: &mut User, n: u64) {
//!         u.name.get_or_insert_with(|| format!("User {n}"));
//!         u.phone.get_or_insert_with(|| "999-999-9999".to_owned());
//!     }
//! }
//!
//! # fn main() -> workbench::Result<()> {
//! let registry = Arc::new(TypeRegistry::new());
//! registry.register::<User>()?;
//! let builders = Builders::new(registry).with_sequences(Default::default());
//! Fixtures::declare_builders(&builders)?;
//! let fixtures = Fixtures { builders };
//!
//! let bob = fixtures.new_user(&overrides! { "name" => "Bob" })?;
//! assert_eq!(bob.name.as_deref(), Some("Bob"));
//! assert_eq!(bob.phone.as_deref(), Some("999-999-9999"));
//! # Ok(())
//! # }
//! ```
//!
//! Counters are kept per type in a process-wide [`SequenceRegistry`] unless
//! a context is given its own; call [`reset_counters`] between tests.

extern crate self as workbench;

mod builders;
mod defaults;
mod dispatch;
mod error;
mod naming;
mod record;
mod registry;
mod sequence;
mod settings;

#[cfg(test)]
mod test_models;

pub use builders::{BuilderContext, BuilderSpec, Builders, PendingOverrides};
pub use defaults::{Arity, Defaults, DefaultsArgs};
pub use dispatch::Builder;
pub use error::{PersistenceError, Result, WorkbenchError};
pub use naming::{Identifier, SEPARATOR, classify, entity_name, qualify};
pub use record::{
    AttributeError, Attributes, Model, Overrides, Persistence, Record, downcast, downcast_mut,
};
pub use registry::{TypeRef, TypeRegistry};
pub use sequence::SequenceRegistry;
pub use settings::{DroppedOverridePolicy, ENV_PREFIX, SETTINGS_FILE, Settings};

pub use workbench_macros::{Model, builders};

#[doc(hidden)]
pub use serde_json;

/// Clears every counter in the process-wide [`SequenceRegistry`].
///
/// Nothing resets counters automatically; call this before or after each
/// test that depends on specific counter values.
pub fn reset_counters() {
    SequenceRegistry::global().reset_all();
}
