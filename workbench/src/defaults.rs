//! The declared contract of a defaults function.
//!
//! Rust closures cannot be asked for their parameter count at run time, so
//! each defaults function carries an explicit [`Arity`], either chosen by the
//! constructor used to wrap it or inferred from its signature by
//! [`macro@crate::builders`]. The arity is fixed when the builder is declared.

use std::any::type_name;
use std::fmt;

use crate::error::{Result, WorkbenchError};
use crate::record::{Model, Overrides, Record, downcast_mut};

/// Parameter shape of a defaults function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arity {
    required: u8,
    variadic: bool,
}

impl Arity {
    /// Takes only the object.
    pub const OBJECT: Self = Self::new(1, false);
    /// Takes the object and a counter value.
    pub const COUNTER: Self = Self::new(2, false);
    /// Takes the object, a counter value and the raw overrides.
    pub const FULL: Self = Self::new(3, false);

    /// `required` positional parameters, optionally accepting more.
    #[must_use]
    pub const fn new(required: u8, variadic: bool) -> Self {
        Self { required, variadic }
    }

    /// Minimum number of positional parameters.
    #[must_use]
    pub const fn required(self) -> u8 {
        self.required
    }

    /// Whether optional or variable-length parameters are declared.
    #[must_use]
    pub const fn is_variadic(self) -> bool {
        self.variadic
    }

    /// Whether a counter value is passed.
    #[must_use]
    pub const fn wants_counter(self) -> bool {
        self.required >= 2 || self.variadic
    }

    /// Whether the raw overrides map is passed.
    #[must_use]
    pub const fn wants_overrides(self) -> bool {
        self.required >= 3 || self.variadic
    }
}

/// Arguments handed to a defaults function after the object itself.
#[derive(Clone, Copy, Debug)]
pub struct DefaultsArgs<'a> {
    counter: Option<u64>,
    overrides: Option<&'a Overrides>,
}

impl<'a> DefaultsArgs<'a> {
    /// Bundles the arguments selected for a call.
    #[must_use]
    pub const fn new(counter: Option<u64>, overrides: Option<&'a Overrides>) -> Self {
        Self { counter, overrides }
    }

    /// The counter value.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::ArityMismatch`] when the arity withheld it.
    pub fn counter(&self) -> Result<u64> {
        self.counter
            .ok_or(WorkbenchError::ArityMismatch { argument: "counter" })
    }

    /// The raw overrides map exactly as the caller passed it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::ArityMismatch`] when the arity withheld it.
    pub fn overrides(&self) -> Result<&'a Overrides> {
        self.overrides
            .ok_or(WorkbenchError::ArityMismatch { argument: "overrides" })
    }

    /// The counter value if one was passed.
    #[must_use]
    pub const fn counter_opt(&self) -> Option<u64> {
        self.counter
    }

    /// The overrides map if it was passed.
    #[must_use]
    pub const fn overrides_opt(&self) -> Option<&'a Overrides> {
        self.overrides
    }
}

type Erased = dyn Fn(&mut dyn Record, DefaultsArgs<'_>) -> Result<()> + Send + Sync;

/// A defaults function together with its arity.
pub struct Defaults {
    arity: Arity,
    call: Box<Erased>,
}

impl Defaults {
    /// Wraps `f` with an explicit arity.
    ///
    /// The wrapper downcasts the record to `T` before calling `f` and fails
    /// with [`WorkbenchError::TypeMismatch`] when the builder's target type
    /// is not `T`.
    pub fn with_arity<T, F>(arity: Arity, f: F) -> Self
    where
        T: Model,
        F: Fn(&mut T, DefaultsArgs<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            arity,
            call: Box::new(move |record: &mut dyn Record, args: DefaultsArgs<'_>| {
                let found = record.class_path();
                let model = downcast_mut::<T>(record).ok_or(WorkbenchError::TypeMismatch {
                    expected: type_name::<T>(),
                    found,
                })?;
                f(model, args)
            }),
        }
    }

    /// Defaults function taking only the object.
    pub fn object<T, F>(f: F) -> Self
    where
        T: Model,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        Self::with_arity(Arity::OBJECT, move |model: &mut T, _| {
            f(model);
            Ok(())
        })
    }

    /// Defaults function taking the object and a counter value.
    pub fn counter<T, F>(f: F) -> Self
    where
        T: Model,
        F: Fn(&mut T, u64) + Send + Sync + 'static,
    {
        Self::with_arity(Arity::COUNTER, move |model: &mut T, args| {
            f(model, args.counter()?);
            Ok(())
        })
    }

    /// Defaults function taking the object, a counter value and the overrides.
    pub fn full<T, F>(f: F) -> Self
    where
        T: Model,
        F: Fn(&mut T, u64, &Overrides) + Send + Sync + 'static,
    {
        Self::with_arity(Arity::FULL, move |model: &mut T, args| {
            f(model, args.counter()?, args.overrides()?);
            Ok(())
        })
    }

    /// Defaults function whose counter and overrides parameters are optional.
    ///
    /// Optional parameters make the function variadic, so it always receives
    /// both.
    pub fn optional<T, F>(f: F) -> Self
    where
        T: Model,
        F: Fn(&mut T, Option<u64>, Option<&Overrides>) + Send + Sync + 'static,
    {
        Self::with_arity(Arity::new(1, true), move |model: &mut T, args| {
            f(model, args.counter_opt(), args.overrides_opt());
            Ok(())
        })
    }

    /// Declared arity.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    /// Calls the function with the arguments its arity selects.
    ///
    /// `next_counter` is only invoked when the arity wants a counter, so a
    /// one-parameter function never consumes a sequence value.
    ///
    /// # Errors
    ///
    /// Propagates failures from the wrapped function.
    pub fn invoke(
        &self,
        record: &mut dyn Record,
        overrides: &Overrides,
        next_counter: impl FnOnce() -> u64,
    ) -> Result<()> {
        let counter = self.arity.wants_counter().then(next_counter);
        let overrides = self.arity.wants_overrides().then_some(overrides);
        (self.call)(record, DefaultsArgs::new(counter, overrides))
    }
}

impl fmt::Debug for Defaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Defaults")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
