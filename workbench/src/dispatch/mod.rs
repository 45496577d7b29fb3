//! Invocation of declared builders.

use std::any::type_name;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::builders::{BuilderSpec, Builders};
use crate::error::{Result, WorkbenchError};
use crate::record::{AttributeError, Model, Overrides, Record, downcast};

/// The three operations generated for one entity.
#[derive(Debug, Clone)]
pub struct Builder<'a> {
    builders: &'a Builders,
    spec: Arc<BuilderSpec>,
}

impl Builders {
    /// Operations for `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::UnknownBuilder`] when nothing was declared
    /// for `entity`.
    pub fn builder(&self, entity: &str) -> Result<Builder<'_>> {
        let spec = self.spec(entity).ok_or_else(|| WorkbenchError::UnknownBuilder {
            entity: entity.to_owned(),
        })?;
        Ok(Builder {
            builders: self,
            spec,
        })
    }
}

impl Builder<'_> {
    /// The spec these operations are bound to.
    #[must_use]
    pub fn spec(&self) -> &BuilderSpec {
        &self.spec
    }

    /// `new_<entity>`: constructs, applies `overrides`, then the defaults.
    ///
    /// Never persists anything.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::UnknownAttribute`] or
    /// [`WorkbenchError::InvalidAttribute`] when an override is rejected,
    /// and propagates failures from the defaults function.
    pub fn build(&self, overrides: &Overrides) -> Result<Box<dyn Record>> {
        let spec = &*self.spec;
        let target = spec.target();
        trace!(entity = spec.entity(), class = target.path(), "building record");
        let mut record = target.construct();
        for (key, value) in overrides {
            record
                .set_attribute(key, value)
                .map_err(|err| attribute_error(target.path(), err))?;
        }
        let scope = spec.counter_scope();
        let sequences = self.builders.sequences();
        spec.defaults()
            .invoke(record.as_mut(), overrides, || sequences.next(&scope))?;
        Ok(record)
    }

    /// `create_<entity>`: builds, then persists through the record's raising
    /// save if it has one, or its ordinary save otherwise.
    ///
    /// # Errors
    ///
    /// As [`Builder::build`], plus whatever the raising save reports.
    pub fn create(&self, overrides: &Overrides) -> Result<Box<dyn Record>> {
        let mut record = self.build(overrides)?;
        match record.raising_save() {
            Some(saved) => saved.map_err(WorkbenchError::Persistence)?,
            None => {
                if record.plain_save().is_none() {
                    debug!(
                        class = record.class_path(),
                        "record has no save capability; nothing persisted"
                    );
                }
            }
        }
        Ok(record)
    }

    /// `find_or_create_<entity>`: returns the first record matching
    /// `overrides` exactly, creating one when there is none.
    ///
    /// The lookup and the creation are not atomic; concurrent callers may
    /// both create.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::MissingCapability`] when the target type has
    /// no query capability, propagates query failures, and otherwise fails
    /// as [`Builder::create`].
    pub fn find_or_create(&self, overrides: &Overrides) -> Result<Box<dyn Record>> {
        let target = self.spec.target();
        let found = target
            .find_where(overrides)
            .ok_or(WorkbenchError::MissingCapability {
                class: target.path(),
                capability: "where",
            })?
            .map_err(WorkbenchError::Persistence)?;
        match found.into_iter().next() {
            Some(record) => {
                trace!(entity = self.spec.entity(), "found existing record");
                Ok(record)
            }
            None => self.create(overrides),
        }
    }

    /// Typed [`Builder::build`].
    ///
    /// # Errors
    ///
    /// As [`Builder::build`], plus [`WorkbenchError::TypeMismatch`] when the
    /// target type is not `T`.
    pub fn build_as<T: Model>(&self, overrides: &Overrides) -> Result<T> {
        typed(self.build(overrides)?)
    }

    /// Typed [`Builder::create`].
    ///
    /// # Errors
    ///
    /// As [`Builder::create`], plus [`WorkbenchError::TypeMismatch`].
    pub fn create_as<T: Model>(&self, overrides: &Overrides) -> Result<T> {
        typed(self.create(overrides)?)
    }

    /// Typed [`Builder::find_or_create`].
    ///
    /// # Errors
    ///
    /// As [`Builder::find_or_create`], plus [`WorkbenchError::TypeMismatch`].
    pub fn find_or_create_as<T: Model>(&self, overrides: &Overrides) -> Result<T> {
        typed(self.find_or_create(overrides)?)
    }
}

fn typed<T: Model>(record: Box<dyn Record>) -> Result<T> {
    downcast::<T>(record).map_err(|found| WorkbenchError::TypeMismatch {
        expected: type_name::<T>(),
        found,
    })
}

fn attribute_error(class: &'static str, err: AttributeError) -> WorkbenchError {
    match err {
        AttributeError::Unknown { key } => WorkbenchError::UnknownAttribute { class, key },
        AttributeError::Invalid { key, source } => {
            WorkbenchError::InvalidAttribute { class, key, source }
        }
    }
}
