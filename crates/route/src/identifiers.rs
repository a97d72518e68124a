//! Route identifiers.
//!
//! A Route Engine names every route it returns. The name is opaque to the
//! navigation core: it is only compared, logged and handed back.

use std::fmt;
use std::sync::Arc;

/// Opaque name of a route, shared between snapshots without copying.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteIdentifier(Arc<str>);

impl RouteIdentifier {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RouteIdentifier {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

// Serialized as the bare string the engine produced.
#[cfg(feature = "serde")]
impl serde::Serialize for RouteIdentifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RouteIdentifier {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(feature = "uniffi")]
uniffi::custom_type!(RouteIdentifier, String, {
    lower: |id| id.as_str().to_owned(),
    try_lift: |id| Ok(RouteIdentifier::from(id)),
});
