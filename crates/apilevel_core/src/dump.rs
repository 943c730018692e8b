//! Deterministic snapshots of resolved facades.
//!
//! A facade answers with version-specific values; [`dump`] captures them as a
//! [`Snapshot`] so two resolutions can be compared or logged. Capabilities
//! opt in by implementing [`Dump`], typically as a supertrait so the facade
//! (`dyn Trait`) can be dumped directly.
//!
//! ```
//! use apilevel_core::dump::{Dump, Snapshot, dump};
//!
//! trait JavaApi: Dump + Send + Sync {
//!     fn record_class(&self) -> &'static str;
//! }
//!
//! struct Java16;
//!
//! impl JavaApi for Java16 {
//!     fn record_class(&self) -> &'static str {
//!         "java.lang.Record"
//!     }
//! }
//!
//! impl Dump for Java16 {
//!     fn dump(&self, snapshot: &mut Snapshot) {
//!         snapshot.insert("record_class", self.record_class());
//!     }
//! }
//!
//! let facade: &dyn JavaApi = &Java16;
//! let snapshot = dump(facade);
//! assert_eq!(snapshot.to_json(), serde_json::json!({ "record_class": "java.lang.Record" }));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Captures the current values of a facade.
pub trait Dump {
    /// Writes this facade's values into `snapshot`.
    fn dump(&self, snapshot: &mut Snapshot);
}

/// Ordered key/value snapshot of a facade.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` under `key`, replacing any previous entry.
    ///
    /// Values that cannot be represented as JSON are recorded as `null`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) -> &mut Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.entries.insert(key.into(), value);
        self
    }

    /// Records a nested snapshot built by `build` under `key`.
    pub fn nested(&mut self, key: impl Into<String>, build: impl FnOnce(&mut Snapshot)) -> &mut Self {
        let mut child = Snapshot::new();
        build(&mut child);
        self.entries.insert(key.into(), child.to_json());
        self
    }

    /// Records the snapshot of another facade under `key`.
    pub fn insert_dump<D: ?Sized + Dump>(&mut self, key: impl Into<String>, facade: &D) -> &mut Self {
        self.nested(key, |child| facade.dump(child))
    }

    /// Returns the value recorded under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the recorded keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the snapshot into a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

/// Returns the snapshot of `facade`.
#[must_use]
pub fn dump<D: ?Sized + Dump>(facade: &D) -> Snapshot {
    let mut snapshot = Snapshot::new();
    facade.dump(&mut snapshot);
    snapshot
}
