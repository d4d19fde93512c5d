//! Typed handles on a single tag.

use std::fmt;

use flatprefs_storage::PreferenceStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::preferences::Preferences;

/// A typed handle on the value stored at one tag.
///
/// Created by [`Preferences::property`] or
/// [`Preferences::property_with_default`].
///
/// ```
/// use flatprefs::{MemoryStore, Preferences};
///
/// let prefs = Preferences::new(MemoryStore::new());
/// let volume = prefs.property_with_default("volume", 5u8);
///
/// assert_eq!(volume.get()?, 5);
/// volume.set(&9)?;
/// assert_eq!(volume.get()?, 9);
/// # Ok::<(), flatprefs::Error>(())
/// ```
pub struct Property<S, T> {
    prefs: Preferences<S>,
    tag: String,
    default: Option<T>,
}

impl<S, T> Property<S, T> {
    pub(crate) const fn new(prefs: Preferences<S>, tag: String, default: Option<T>) -> Self {
        Self { prefs, tag, default }
    }

    /// The tag this property reads and writes.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl<S, T: Clone> Clone for Property<S, T> {
    fn clone(&self) -> Self {
        Self { prefs: self.prefs.clone(), tag: self.tag.clone(), default: self.default.clone() }
    }
}

impl<S, T: fmt::Debug> fmt::Debug for Property<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("tag", &self.tag).field("default", &self.default).finish()
    }
}

impl<S, T> Property<S, T>
where
    S: PreferenceStore,
    T: Serialize + DeserializeOwned,
{
    /// Reads the value, falling back to the default if one was given.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ValueNotProvided`] if nothing is stored and
    /// there is no default, or any decoding error.
    pub fn get(&self) -> Result<T>
    where
        T: Clone,
    {
        match &self.default {
            Some(default) => self.prefs.decode_or_else(&self.tag, || default.clone()),
            None => self.prefs.decode(&self.tag),
        }
    }

    /// Stores a new value.
    ///
    /// # Errors
    ///
    /// Returns any encoding or store error.
    pub fn set(&self, value: &T) -> Result<()> {
        self.prefs.encode(&self.tag, value)
    }

    /// Removes the stored value, so reads see the default again.
    ///
    /// # Errors
    ///
    /// Returns any error of the store.
    pub fn remove(&self) -> Result<usize> {
        self.prefs.remove(&self.tag)
    }

    /// Returns `true` if a value is stored.
    ///
    /// # Errors
    ///
    /// Returns any error of the store.
    pub fn is_set(&self) -> Result<bool> {
        self.prefs.contains(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use flatprefs_storage::MemoryStore;

    use crate::error::Error;
    use crate::preferences::Preferences;

    #[test]
    fn test_property_without_default() {
        let prefs = Preferences::new(MemoryStore::new());
        let name = prefs.property::<String>("name");

        assert!(matches!(name.get(), Err(Error::MissingProperty { .. })));
        name.set(&"Abby".to_owned()).unwrap();
        assert_eq!(name.get().unwrap(), "Abby");
        assert!(name.is_set().unwrap());

        assert_eq!(name.remove().unwrap(), 1);
        assert!(!name.is_set().unwrap());
    }

    #[test]
    fn test_optional_property_reports_not_provided() {
        let prefs = Preferences::new(MemoryStore::new());
        let nickname = prefs.property::<Option<String>>("nickname");
        assert!(matches!(nickname.get(), Err(Error::ValueNotProvided { .. })));

        nickname.set(&None).unwrap();
        assert_eq!(nickname.get().unwrap(), None);
    }
}
