//! Typed, non-owning links between instances
//!
//! A link stores only the target's name; it is resolved against a container,
//! never held as a direct reference. After a round trip the same name must
//! resolve against the reloaded container, which is what makes dangling
//! links detectable instead of silently stale.

use std::fmt;
use std::marker::PhantomData;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A by-name reference to an instance of type `T`.
pub struct Link<T> {
    target: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Link<T> {
    /// Create a link to the instance with the given name.
    #[must_use]
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            _marker: PhantomData,
        }
    }

    /// Name of the linked instance.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

// Manual impls: the marker must not impose bounds on T.

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Link").field(&self.target).finish()
    }
}

impl<T> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl<T> Serialize for Link<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.target)
    }
}

impl<'de, T> Deserialize<'de> for Link<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let target = String::deserialize(deserializer)?;
        Ok(Self::to(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::ExcitationSeries;

    #[test]
    fn test_link_serializes_as_target_name() {
        let link: Link<ExcitationSeries> = Link::to("exc-001");
        let json = serde_json::to_value(&link).expect("serializable");
        assert_eq!(json, serde_json::json!("exc-001"));

        let back: Link<ExcitationSeries> = serde_json::from_value(json).expect("deserializable");
        assert_eq!(back, link);
        assert_eq!(back.target(), "exc-001");
    }
}
