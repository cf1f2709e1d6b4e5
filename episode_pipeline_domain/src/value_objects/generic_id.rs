// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Generic ID Value Object
//!
//! A type-safe ID built on ULID (lexicographically sortable) with a
//! phantom category type, so `PipelineRunId` and `ContentArtifactId` are
//! distinct Rust types that cannot be mixed up at a call site, at zero
//! runtime cost over a bare `Ulid`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use ulid::Ulid;

use crate::PipelineError;

/// Per-entity category marker. Implementors are zero-sized types used only
/// as a phantom type parameter of [`GenericId`].
pub trait IdCategory {
    fn category_name() -> &'static str;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct GenericId<T: IdCategory> {
    value: Ulid,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: IdCategory> GenericId<T> {
    pub fn new() -> Self {
        Self {
            value: Ulid::new(),
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            value: ulid,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn from_string(s: &str) -> Result<Self, PipelineError> {
        let ulid = Ulid::from_str(s).map_err(|e| {
            PipelineError::invalid_config(format!("invalid {} id: {}", T::category_name(), e))
        })?;
        Ok(Self::from_ulid(ulid))
    }

    pub fn as_ulid(&self) -> Ulid {
        self.value
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.value.timestamp_ms()
    }
}

impl<T: IdCategory> Default for GenericId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IdCategory> Display for GenericId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T: IdCategory> Hash for GenericId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: IdCategory> FromStr for GenericId<T> {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl<T: IdCategory> Serialize for GenericId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.to_string().serialize(serializer)
    }
}

impl<'de, T: IdCategory> Deserialize<'de> for GenericId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_string(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestMarker;
    impl IdCategory for TestMarker {
        fn category_name() -> &'static str {
            "test"
        }
    }
    type TestId = GenericId<TestMarker>;

    #[test]
    fn round_trips_through_string() {
        let id = TestId::new();
        let parsed = TestId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_malformed_string() {
        assert!(TestId::from_string("not-a-ulid").is_err());
    }

    #[test]
    fn ids_generated_later_sort_after_earlier_ones() {
        let first = TestId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = TestId::new();
        assert!(first.timestamp_ms() <= second.timestamp_ms());
    }
}
