//! Codec configuration.
//!
//! A [`Configuration`] is immutable once built. New configurations are derived
//! through a [`ConfigurationBuilder`], seeded either from the defaults or from
//! an existing configuration, and validated in [`ConfigurationBuilder::build`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Serde name emitted by [`crate::set::hash_set`].
pub const HASH_SET_NAME: &str = "std::collections::HashSet";
/// Serde name emitted by [`crate::set::btree_set`].
pub const BTREE_SET_NAME: &str = "std::collections::BTreeSet";
/// Serde name emitted by [`crate::StringSet`].
pub const STRING_SET_NAME: &str = "flatprefs::StringSet";

/// Names of the newtype structs eligible for native string-set storage by
/// default.
pub const DEFAULT_SET_SHAPE_RECOGNITION_NAMES: [&str; 3] =
    [HASH_SET_NAME, BTREE_SET_NAME, STRING_SET_NAME];

/// How `f64` values are projected onto the store, which has no 64-bit float.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoubleRepresentation {
    /// Narrowed to a 32-bit float. Loses precision.
    Float,
    /// The IEEE-754 bit pattern, stored as a 64-bit integer. Lossless.
    #[default]
    LongBits,
    /// The shortest decimal text that parses back to the same value.
    String,
}

/// Behavior switches of the codec.
///
/// Deserialization reads the fields as stored, without rerunning builder
/// validation. Missing fields take their defaults.
///
/// # Example
///
/// ```
/// use flatprefs::{Configuration, DoubleRepresentation};
///
/// let config = Configuration::builder()
///     .double_representation(DoubleRepresentation::String)
///     .synchronize_access(true)
///     .build()?;
///
/// assert_eq!(config.double_representation(), DoubleRepresentation::String);
/// assert!(config.encode_set_natively());
/// # Ok::<(), flatprefs::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    double_representation: DoubleRepresentation,
    encode_empty_structure_marker: bool,
    encode_set_natively: bool,
    set_shape_recognition_names: Vec<String>,
    synchronize_access: bool,
}

impl Configuration {
    /// Starts a builder seeded with the defaults.
    #[must_use]
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Starts a builder seeded with this configuration.
    #[must_use]
    pub fn to_builder(&self) -> ConfigurationBuilder {
        ConfigurationBuilder::from(self)
    }

    /// How `f64` values are stored.
    #[must_use]
    pub const fn double_representation(&self) -> DoubleRepresentation {
        self.double_representation
    }

    /// Whether empty objects, lists and maps are stored as a `true` marker at
    /// their tag. When disabled, encoding one fails.
    #[must_use]
    pub const fn encode_empty_structure_marker(&self) -> bool {
        self.encode_empty_structure_marker
    }

    /// Whether recognised string-like sets are stored as one native string set.
    #[must_use]
    pub const fn encode_set_natively(&self) -> bool {
        self.encode_set_natively
    }

    /// Serde newtype-struct names treated as sets for the native fast path.
    #[must_use]
    pub fn set_shape_recognition_names(&self) -> &[String] {
        &self.set_shape_recognition_names
    }

    /// Returns `true` if `name` is one of the recognised set names.
    #[must_use]
    pub fn recognizes_set(&self, name: &str) -> bool {
        self.set_shape_recognition_names.iter().any(|n| n == name)
    }

    /// Whether each encode or decode call holds the store's access lock.
    #[must_use]
    pub const fn synchronize_access(&self) -> bool {
        self.synchronize_access
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            double_representation: DoubleRepresentation::default(),
            encode_empty_structure_marker: true,
            encode_set_natively: true,
            set_shape_recognition_names: default_names(),
            synchronize_access: false,
        }
    }
}

fn default_names() -> Vec<String> {
    DEFAULT_SET_SHAPE_RECOGNITION_NAMES.iter().map(|n| (*n).to_owned()).collect()
}

/// Builder for [`Configuration`].
///
/// The builder remembers the recognition names it was seeded with, so that
/// [`build`](Self::build) can tell whether the list was changed.
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    double_representation: DoubleRepresentation,
    encode_empty_structure_marker: bool,
    encode_set_natively: bool,
    set_shape_recognition_names: Vec<String>,
    synchronize_access: bool,
    seed_names: Vec<String>,
}

impl ConfigurationBuilder {
    /// Creates a builder seeded with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::from(&Configuration::default())
    }

    /// Sets how `f64` values are stored.
    #[must_use]
    pub const fn double_representation(mut self, representation: DoubleRepresentation) -> Self {
        self.double_representation = representation;
        self
    }

    /// Sets whether empty structures are stored as a marker.
    #[must_use]
    pub const fn encode_empty_structure_marker(mut self, enabled: bool) -> Self {
        self.encode_empty_structure_marker = enabled;
        self
    }

    /// Sets whether recognised sets use native string-set storage.
    #[must_use]
    pub const fn encode_set_natively(mut self, enabled: bool) -> Self {
        self.encode_set_natively = enabled;
        self
    }

    /// Replaces the recognised set names.
    #[must_use]
    pub fn set_shape_recognition_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.set_shape_recognition_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Gives in-place access to the recognised set names.
    pub fn set_shape_recognition_names_mut(&mut self) -> &mut Vec<String> {
        &mut self.set_shape_recognition_names
    }

    /// Sets whether encode and decode calls hold the store's access lock.
    #[must_use]
    pub const fn synchronize_access(mut self, enabled: bool) -> Self {
        self.synchronize_access = enabled;
        self
    }

    /// Validates the settings and produces a [`Configuration`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the recognised set names were
    /// changed while native set encoding is disabled.
    pub fn build(self) -> Result<Configuration> {
        if !self.encode_set_natively && self.set_shape_recognition_names != self.seed_names {
            return Err(Error::Configuration(
                "set_shape_recognition_names is only used when encode_set_natively is enabled; \
                 enable it or leave the names unchanged"
                    .to_owned(),
            ));
        }
        Ok(Configuration {
            double_representation: self.double_representation,
            encode_empty_structure_marker: self.encode_empty_structure_marker,
            encode_set_natively: self.encode_set_natively,
            set_shape_recognition_names: self.set_shape_recognition_names,
            synchronize_access: self.synchronize_access,
        })
    }
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Configuration> for ConfigurationBuilder {
    fn from(config: &Configuration) -> Self {
        Self {
            double_representation: config.double_representation,
            encode_empty_structure_marker: config.encode_empty_structure_marker,
            encode_set_natively: config.encode_set_natively,
            set_shape_recognition_names: config.set_shape_recognition_names.clone(),
            synchronize_access: config.synchronize_access,
            seed_names: config.set_shape_recognition_names.clone(),
        }
    }
}

impl TryFrom<ConfigurationBuilder> for Configuration {
    type Error = Error;

    fn try_from(builder: ConfigurationBuilder) -> Result<Self> {
        builder.build()
    }
}
