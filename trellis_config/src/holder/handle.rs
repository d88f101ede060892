//! Typed accessors for declared fields.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{TrellisError, TrellisResult};
use crate::manifest::ConfigType;
use crate::path::KeyPath;
use crate::source::Source;

use super::ConfigHolder;

/// Path-and-type-checked accessor for one declared field.
///
/// Obtained from [`ConfigHolder::handle`], which validates both once, so
/// repeated accesses skip path parsing and turbofish noise.
///
/// # Examples
///
/// ```rust
/// use trellis_config::{ConfigHolder, Field, MemorySource, Schema};
///
/// # fn main() -> trellis_config::TrellisResult<()> {
/// let schema = Schema::builder()
///     .group("database", |g| g.field(Field::<u16>::new("port").default(5432)))
///     .build();
/// let holder = ConfigHolder::builder(MemorySource::empty())
///     .schema(schema)
///     .build()?;
/// let port = holder.handle::<u16>("database.port")?;
/// assert_eq!(port.get(&holder)?, Some(5432));
/// port.set(&holder, 9000)?;
/// assert_eq!(port.get_or_default(&holder)?, 9000);
/// # Ok(())
/// # }
/// ```
pub struct FieldHandle<T> {
    path: KeyPath,
    _declared: PhantomData<fn() -> T>,
}

impl<T: ConfigType> FieldHandle<T> {
    pub(crate) fn new(path: KeyPath) -> Self {
        Self {
            path,
            _declared: PhantomData,
        }
    }

    /// The field's canonical path.
    #[must_use]
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    /// Reads the field through its cached value.
    ///
    /// # Errors
    ///
    /// Same failures as [`ConfigHolder::get`].
    pub fn get<S: Source>(&self, holder: &ConfigHolder<S>) -> TrellisResult<Option<T>> {
        holder.get_at(&self.path)
    }

    /// Reads the field, treating absence without a default as an error.
    ///
    /// # Errors
    ///
    /// Same failures as [`ConfigHolder::get_or_default`].
    pub fn get_or_default<S: Source>(&self, holder: &ConfigHolder<S>) -> TrellisResult<T> {
        holder
            .get_at(&self.path)?
            .ok_or_else(|| TrellisError::missing(&self.path).shared())
    }

    /// Writes the field through its cached value.
    ///
    /// # Errors
    ///
    /// Same failures as [`ConfigHolder::set`].
    pub fn set<S: Source>(&self, holder: &ConfigHolder<S>, value: T) -> TrellisResult<()> {
        holder.set_at(&self.path, value)
    }
}

impl<T> Clone for FieldHandle<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _declared: PhantomData,
        }
    }
}

impl<T> fmt::Debug for FieldHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("path", &self.path)
            .field("declared", &std::any::type_name::<T>())
            .finish()
    }
}
