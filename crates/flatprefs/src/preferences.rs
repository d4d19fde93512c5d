//! The [`Preferences`] facade: one store plus one configuration.

use std::fmt;
use std::sync::Arc;

use flatprefs_storage::PreferenceStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Configuration, ConfigurationBuilder, DoubleRepresentation};
use crate::error::Result;
use crate::property::Property;
use crate::wrapper;

/// A codec bound to a store.
///
/// Cloning is cheap: clones share the store and copy the configuration.
///
/// # Example
///
/// ```
/// use flatprefs::{MemoryStore, Preferences};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Person {
///     name: String,
///     age: u8,
/// }
///
/// let prefs = Preferences::new(MemoryStore::new());
/// let abby = Person { name: "Abby".into(), age: 20 };
/// prefs.encode("person", &abby)?;
///
/// assert_eq!(prefs.decode::<Person>("person")?, abby);
/// assert_eq!(prefs.decode_or_default("nobody", 0u8)?, 0);
/// # Ok::<(), flatprefs::Error>(())
/// ```
pub struct Preferences<S> {
    store: Arc<S>,
    config: Configuration,
}

impl<S: PreferenceStore> Preferences<S> {
    /// Binds the default configuration to `store`.
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store), Configuration::default())
    }

    /// Binds an existing configuration to `store`.
    pub fn with_configuration(store: S, config: Configuration) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// Binds a configuration to a store shared with other owners.
    pub const fn from_shared(store: Arc<S>, config: Configuration) -> Self {
        Self { store, config }
    }

    /// Starts a builder seeded with the default configuration.
    pub fn builder(store: S) -> PreferencesBuilder<S> {
        PreferencesBuilder { store: Arc::new(store), config: ConfigurationBuilder::new() }
    }

    /// Starts a builder seeded with the store and configuration of
    /// `previous`. Either may be replaced before building.
    #[must_use]
    pub fn derive_from(previous: &Self) -> PreferencesBuilder<S> {
        PreferencesBuilder { store: Arc::clone(&previous.store), config: previous.config.to_builder() }
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The active configuration.
    #[must_use]
    pub const fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Stores `value` at `tag`. See [`crate::encode`].
    ///
    /// # Errors
    ///
    /// See [`crate::encode`].
    pub fn encode<T: Serialize + ?Sized>(&self, tag: &str, value: &T) -> Result<()> {
        wrapper::encode(&*self.store, &self.config, tag, value)
    }

    /// Reads the value at `tag`. See [`crate::decode`].
    ///
    /// # Errors
    ///
    /// See [`crate::decode`].
    pub fn decode<T: DeserializeOwned>(&self, tag: &str) -> Result<T> {
        wrapper::decode(&*self.store, &self.config, tag)
    }

    /// Reads the value at `tag`, or `default` if nothing is stored.
    ///
    /// # Errors
    ///
    /// See [`crate::decode_or_default`].
    pub fn decode_or_default<T: DeserializeOwned>(&self, tag: &str, default: T) -> Result<T> {
        wrapper::decode_or_default(&*self.store, &self.config, tag, default)
    }

    /// Reads the value at `tag`, or computes a default if nothing is stored.
    ///
    /// # Errors
    ///
    /// See [`crate::decode_or_default`].
    pub fn decode_or_else<T, F>(&self, tag: &str, default: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        wrapper::decode_or_else(&*self.store, &self.config, tag, default)
    }

    /// Removes everything stored at or beneath `tag`.
    ///
    /// # Errors
    ///
    /// Returns any error of the store.
    pub fn remove(&self, tag: &str) -> Result<usize> {
        wrapper::remove(&*self.store, &self.config, tag)
    }

    /// Returns `true` if anything is stored at or beneath `tag`.
    ///
    /// # Errors
    ///
    /// Returns any error of the store.
    pub fn contains(&self, tag: &str) -> Result<bool> {
        wrapper::contains(&*self.store, &self.config, tag)
    }

    /// A typed handle on the value at `tag`.
    pub fn property<T>(&self, tag: impl Into<String>) -> Property<S, T> {
        Property::new(self.clone(), tag.into(), None)
    }

    /// A typed handle on the value at `tag` that reads as `default` while
    /// nothing is stored.
    pub fn property_with_default<T>(&self, tag: impl Into<String>, default: T) -> Property<S, T> {
        Property::new(self.clone(), tag.into(), Some(default))
    }
}

impl<S> Clone for Preferences<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), config: self.config.clone() }
    }
}

impl<S> fmt::Debug for Preferences<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Builder for [`Preferences`].
#[must_use = "a builder does nothing until built"]
pub struct PreferencesBuilder<S> {
    store: Arc<S>,
    config: ConfigurationBuilder,
}

impl<S: PreferenceStore> PreferencesBuilder<S> {
    /// Replaces the store.
    pub fn store(self, store: S) -> Self {
        self.shared_store(Arc::new(store))
    }

    /// Replaces the store with one shared with other owners.
    pub fn shared_store(mut self, store: Arc<S>) -> Self {
        self.store = store;
        self
    }

    /// Replaces the whole configuration. Validation still happens in
    /// [`build`](Self::build), against the new configuration.
    pub fn configuration(mut self, config: &Configuration) -> Self {
        self.config = config.to_builder();
        self
    }

    /// See [`ConfigurationBuilder::double_representation`].
    pub fn double_representation(mut self, representation: DoubleRepresentation) -> Self {
        self.config = self.config.double_representation(representation);
        self
    }

    /// See [`ConfigurationBuilder::encode_empty_structure_marker`].
    pub fn encode_empty_structure_marker(mut self, enabled: bool) -> Self {
        self.config = self.config.encode_empty_structure_marker(enabled);
        self
    }

    /// See [`ConfigurationBuilder::encode_set_natively`].
    pub fn encode_set_natively(mut self, enabled: bool) -> Self {
        self.config = self.config.encode_set_natively(enabled);
        self
    }

    /// See [`ConfigurationBuilder::set_shape_recognition_names`].
    pub fn set_shape_recognition_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.config = self.config.set_shape_recognition_names(names);
        self
    }

    /// See [`ConfigurationBuilder::set_shape_recognition_names_mut`].
    pub fn set_shape_recognition_names_mut(&mut self) -> &mut Vec<String> {
        self.config.set_shape_recognition_names_mut()
    }

    /// See [`ConfigurationBuilder::synchronize_access`].
    pub fn synchronize_access(mut self, enabled: bool) -> Self {
        self.config = self.config.synchronize_access(enabled);
        self
    }

    /// Validates the configuration and binds it to the store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] as described in
    /// [`ConfigurationBuilder::build`].
    pub fn build(self) -> Result<Preferences<S>> {
        Ok(Preferences { store: self.store, config: self.config.build()? })
    }
}
