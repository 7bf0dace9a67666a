use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::KvBackend;
use crate::error::Result;

/// Logical keys of the portal's persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Users,
    Faculties,
    Queries,
    Feedbacks,
    CurrentUser,
}

impl StoreKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Faculties => "faculties",
            Self::Queries => "queries",
            Self::Feedbacks => "feedbacks",
            Self::CurrentUser => "currentUser",
        }
    }

    /// Shape version of the value stored under this key. Bump when the
    /// record layout changes so older values are reseeded instead of misread.
    pub const fn schema_version(self) -> u32 {
        match self {
            Self::Users | Self::CurrentUser => 1,
            Self::Faculties | Self::Queries | Self::Feedbacks => 1,
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T: ?Sized> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    data: serde_json::Value,
}

/// Typed JSON store over any [`KvBackend`].
///
/// Values are written as `{"version": n, "data": ...}`. A value that does not
/// parse, carries another version, or does not fit the requested type is
/// logged and read back as absent, so `get_or_init` reseeds it.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KvBackend>,
}

impl Store {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    pub fn get<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<Vec<T>>> {
        self.get_value(key)
    }

    pub fn set<T: Serialize>(&self, key: StoreKey, items: &[T]) -> Result<()> {
        self.set_value(key, items)
    }

    /// Read `key`, or persist `default` and return it when the key is absent.
    pub fn get_or_init<T>(&self, key: StoreKey, default: Vec<T>) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(items) = self.get(key)? {
            return Ok(items);
        }

        debug!("Initialising '{}' with {} default entries", key, default.len());
        self.set(key, &default)?;
        Ok(default)
    }

    pub fn get_value<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>> {
        let Some(raw) = self.backend.get_raw(key.as_str())? else {
            return Ok(None);
        };

        match decode(key, &raw) {
            Ok(value) => Ok(Some(value)),
            Err(reason) => {
                warn!("Discarding unreadable value under '{}': {}", key, reason);
                Ok(None)
            }
        }
    }

    pub fn set_value<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<()> {
        let raw = serde_json::to_string(&EnvelopeRef {
            version: key.schema_version(),
            data: value,
        })?;
        self.backend.set_raw(key.as_str(), &raw)
    }

    pub fn remove(&self, key: StoreKey) -> Result<()> {
        self.backend.remove(key.as_str())
    }
}

fn decode<T: DeserializeOwned>(key: StoreKey, raw: &str) -> std::result::Result<T, String> {
    let envelope: RawEnvelope =
        serde_json::from_str(raw).map_err(|e| format!("malformed envelope: {}", e))?;

    if envelope.version != key.schema_version() {
        return Err(format!(
            "schema version {} (expected {})",
            envelope.version,
            key.schema_version()
        ));
    }

    serde_json::from_value(envelope.data).map_err(|e| format!("unexpected shape: {}", e))
}
