//! Capabilities the engine expects from the domain types it builds.
//!
//! None of these are implemented by the engine itself. Attribute setters are
//! normally derived with [`macro@crate::Model`]; persistence is supplied by
//! the domain model and every part of it is optional.

use std::any::Any;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::error::PersistenceError;

/// Caller-supplied attribute overrides, keyed by setter name.
pub type Overrides = serde_json::Map<String, Value>;

/// Builds an [`Overrides`] map from `key => value` pairs.
///
/// Values are converted with `serde_json::Value::from`, so string slices,
/// numbers, booleans and `Option`s all work.
///
/// ```
/// let overrides = workbench::overrides! { "name" => "Bob", "active" => false };
/// assert_eq!(overrides.len(), 2);
/// assert!(workbench::overrides! {}.is_empty());
/// ```
#[macro_export]
macro_rules! overrides {
    () => {
        $crate::Overrides::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Overrides::new();
        $(
            map.insert(
                ::std::string::String::from($key),
                $crate::serde_json::Value::from($value),
            );
        )+
        map
    }};
}

/// Failure raised by an attribute setter.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// The type has no setter with this name.
    #[error("unknown attribute '{key}'")]
    Unknown {
        /// Offending key.
        key: String,
    },
    /// The value could not be converted to the attribute's type.
    #[error("invalid value for '{key}': {source}")]
    Invalid {
        /// Attribute whose value was rejected.
        key: String,
        /// Conversion failure.
        #[source]
        source: serde_json::Error,
    },
}

impl AttributeError {
    /// Reports `key` as having no setter.
    #[must_use]
    pub fn unknown(key: &str) -> Self {
        Self::Unknown {
            key: key.to_owned(),
        }
    }

    /// Reports `key` as having received an unusable value.
    #[must_use]
    pub fn invalid(key: &str, source: serde_json::Error) -> Self {
        Self::Invalid {
            key: key.to_owned(),
            source,
        }
    }
}

/// Single-argument setters and readers named after attributes.
pub trait Attributes {
    /// Sets `key` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::Unknown`] when no attribute is named `key`
    /// and [`AttributeError::Invalid`] when `value` does not convert.
    fn assign(&mut self, key: &str, value: &Value) -> Result<(), AttributeError>;

    /// Reads `key` back as a JSON value, or `None` when there is no such
    /// attribute.
    fn attribute(&self, key: &str) -> Option<Value>;
}

/// Persistence capabilities of a domain type.
///
/// Every method defaults to `None`, meaning "capability absent".
pub trait Persistence {
    /// Raising save: persists the record or reports why it could not.
    fn save_strict(&mut self) -> Option<Result<(), PersistenceError>> {
        None
    }

    /// Ordinary save; the returned flag is the collaborator's business.
    fn save(&mut self) -> Option<bool> {
        None
    }

    /// Exact-match query over persisted records.
    fn find_where(_filter: &Overrides) -> Option<Result<Vec<Self>, PersistenceError>>
    where
        Self: Sized,
    {
        None
    }
}

/// A concrete type builders can construct.
pub trait Model: Attributes + Persistence + Default + fmt::Debug + Send + 'static {
    /// Class path without the root marker, e.g. `Admin::User`.
    const PATH: &'static str;
}

/// Object-safe view of a [`Model`] used by the dispatcher.
pub trait Record: Any + fmt::Debug + Send {
    /// Class path of the underlying type.
    fn class_path(&self) -> &'static str;

    /// Erased [`Attributes::assign`].
    ///
    /// # Errors
    ///
    /// Propagates the setter's [`AttributeError`].
    fn set_attribute(&mut self, key: &str, value: &Value) -> Result<(), AttributeError>;

    /// Erased [`Attributes::attribute`].
    fn get_attribute(&self, key: &str) -> Option<Value>;

    /// Erased [`Persistence::save_strict`].
    fn raising_save(&mut self) -> Option<Result<(), PersistenceError>>;

    /// Erased [`Persistence::save`].
    fn plain_save(&mut self) -> Option<bool>;

    /// Mutable [`Any`] view, for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Owned [`Any`] view, for downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Model> Record for T {
    fn class_path(&self) -> &'static str {
        T::PATH
    }

    fn set_attribute(&mut self, key: &str, value: &Value) -> Result<(), AttributeError> {
        Attributes::assign(self, key, value)
    }

    fn get_attribute(&self, key: &str) -> Option<Value> {
        Attributes::attribute(self, key)
    }

    fn raising_save(&mut self) -> Option<Result<(), PersistenceError>> {
        Persistence::save_strict(self)
    }

    fn plain_save(&mut self) -> Option<bool> {
        Persistence::save(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Borrows `record` as `T` when that is its concrete type.
pub fn downcast_mut<T: Model>(record: &mut dyn Record) -> Option<&mut T> {
    record.as_any_mut().downcast_mut::<T>()
}

/// Unboxes `record` as `T`.
///
/// # Errors
///
/// Returns the class path of the record when it is not a `T`.
pub fn downcast<T: Model>(record: Box<dyn Record>) -> Result<T, &'static str> {
    let found = record.class_path();
    record.into_any().downcast::<T>().map(|boxed| *boxed).map_err(|_| found)
}
