//! String half of name resolution.
//!
//! Identifiers arrive as bare names (`user`, `User`, `:User`), namespaced
//! paths (`admin/super_user`) or already-resolved [`TypeRef`] handles. This
//! module turns the textual forms into the canonical, root-anchored key the
//! [`TypeRegistry`](crate::TypeRegistry) is indexed by.

use std::fmt;

use crate::registry::TypeRef;
use crate::record::Model;

pub use workbench_naming::{SEPARATOR, classify, entity_name};

/// Something that can be resolved to a [`TypeRef`].
#[derive(Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Already-resolved handle; resolution returns it unchanged.
    Type(TypeRef),
    /// Symbolic or textual name, resolved against the global namespace.
    Name(String),
}

impl Identifier {
    /// Identifier for the model type `T`, bypassing name lookup.
    #[must_use]
    pub fn of<T: Model>() -> Self {
        Self::Type(TypeRef::of::<T>())
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(ty) => write!(f, "Type({})", ty.path()),
            Self::Name(name) => write!(f, "Name({name:?})"),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(ty) => f.write_str(ty.path()),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<TypeRef> for Identifier {
    fn from(value: TypeRef) -> Self {
        Self::Type(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<&String> for Identifier {
    fn from(value: &String) -> Self {
        Self::Name(value.clone())
    }
}

/// Produces the root-anchored lookup key for a textual identifier.
///
/// A leading single `:` (symbol spelling) is dropped. Names that do not
/// start with an upper-case letter are [classified](classify); names that
/// already do are taken literally, so `Foo_Bar` stays `Foo_Bar`. Finally the
/// `::` root marker is prepended unless the name already starts with `:`.
///
/// # Examples
///
/// ```
/// use workbench::qualify;
///
/// assert_eq!(qualify("user"), "::User");
/// assert_eq!(qualify(":User"), "::User");
/// assert_eq!(qualify("::Admin::User"), "::Admin::User");
/// assert_eq!(qualify("Foo_Bar"), "::Foo_Bar");
/// ```
#[must_use]
pub fn qualify(value: &str) -> String {
    let bare = match value.strip_prefix(':') {
        Some(rest) if !rest.starts_with(':') => rest,
        _ => value,
    };
    let name = if bare.starts_with(|c: char| c.is_ascii_uppercase()) {
        bare.to_owned()
    } else {
        classify(bare)
    };
    if name.starts_with(':') {
        name
    } else {
        format!("{SEPARATOR}{name}")
    }
}
