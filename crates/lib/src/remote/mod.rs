//! Remote transport boundary and record lifecycle verbs.
//!
//! [`Transport`] is the interface this crate consumes but does not
//! implement: five synchronous operations against a named resource, each
//! failing with a [`TransportError`]. [`Remote`] builds the record lifecycle
//! on top as pure orchestration over the core — there is no hidden state
//! beyond the entity's existence flag.
//!
//! Failure policy: a transport error degrades to the verb's documented
//! default (`0`, an empty collection, `None`, `false`) and is logged at
//! debug level. Shape errors in the returned data are never degraded; they
//! propagate like everywhere else in the crate.

use tracing::debug;

use crate::collection::Collection;
use crate::container::Value;
use crate::relations::{self, Record};

pub mod errors;

pub use errors::TransportError;

/// Request parameters passed through to the transport.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Synchronous transport for a remote record source.
///
/// Implementations map these calls onto whatever wire protocol backs the
/// resource; the crate only relies on the contract spelled out per method.
pub trait Transport {
    /// Total count of records of a resource
    fn count(&self, resource: &str, params: &Params) -> Result<u64, TransportError>;

    /// Fetches one record by id, or the full listing when `id` is `None`
    fn fetch(
        &self,
        resource: &str,
        id: Option<&str>,
        params: &Params,
    ) -> Result<serde_json::Value, TransportError>;

    /// Creates a record, returning its stored representation
    fn create(
        &self,
        resource: &str,
        data: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;

    /// Updates a record by id, returning its stored representation
    fn update(
        &self,
        resource: &str,
        id: &str,
        data: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;

    /// Deletes a record by id
    fn delete(&self, resource: &str, id: &str) -> Result<(), TransportError>;
}

/// Lifecycle verbs for records backed by a remote resource.
///
/// Everything here is a default method: implementors supply the resource
/// name and get the orchestration for free. The verbs take the transport as
/// an argument rather than owning one, which keeps the record types plain
/// data.
pub trait Remote: Record {
    /// The remote resource name this record type is stored under
    fn resource() -> &'static str;

    /// The record's unique id, read from the `id` key; integer and text ids
    /// are both accepted
    fn id(&self) -> Option<String> {
        match self.entity().get("id") {
            Some(Value::Int(n)) => Some(n.to_string()),
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Count of all remote records; `0` when the transport fails
    fn count(transport: &dyn Transport, params: &Params) -> u64 {
        match transport.count(Self::resource(), params) {
            Ok(count) => count,
            Err(err) => {
                debug!(resource = Self::resource(), error = %err, "count failed, defaulting to 0");
                0
            }
        }
    }

    /// All remote records as a collection; empty when the transport fails.
    ///
    /// A single-object response is treated as a one-record listing. Fetched
    /// records are marked as existing.
    fn all(transport: &dyn Transport, params: &Params) -> crate::Result<Collection<Self>> {
        let data = match transport.fetch(Self::resource(), None, params) {
            Ok(data) => data,
            Err(err) => {
                debug!(resource = Self::resource(), error = %err, "listing failed, defaulting to empty");
                return Ok(Collection::default());
            }
        };

        let items = match data {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Null => Vec::new(),
            other => vec![other],
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let record = Self::from_data(item)?;
            record.entity().set_exists(true);
            records.push(record);
        }
        Ok(Collection::new(records))
    }

    /// Finds one remote record by id; `None` when the transport fails
    fn find(transport: &dyn Transport, id: &str) -> crate::Result<Option<Self>> {
        let data = match transport.fetch(Self::resource(), Some(id), &Params::new()) {
            Ok(data) => data,
            Err(err) => {
                debug!(resource = Self::resource(), id = %id, error = %err, "find failed, defaulting to none");
                return Ok(None);
            }
        };

        let record = Self::from_data(data)?;
        record.entity().set_exists(true);
        Ok(Some(record))
    }

    /// Creates a remote record from `data`; `None` when the transport fails
    fn create(transport: &dyn Transport, data: serde_json::Value) -> crate::Result<Option<Self>> {
        let stored = match transport.create(Self::resource(), data) {
            Ok(stored) => stored,
            Err(err) => {
                debug!(resource = Self::resource(), error = %err, "create failed, defaulting to none");
                return Ok(None);
            }
        };

        let record = Self::from_data(stored)?;
        record.entity().set_exists(true);
        Ok(Some(record))
    }

    /// Fills this record with its remote data, merging over local state.
    ///
    /// `Ok(false)` without an id or when the transport fails. On success the
    /// record is marked existing and its auto-load relations are
    /// materialized.
    fn hydrate(&self, transport: &dyn Transport) -> crate::Result<bool> {
        let Some(id) = self.id() else {
            return Ok(false);
        };
        let data = match transport.fetch(Self::resource(), Some(&id), &Params::new()) {
            Ok(data) => data,
            Err(err) => {
                debug!(resource = Self::resource(), id = %id, error = %err, "hydrate failed");
                return Ok(false);
            }
        };

        self.entity().merge(data)?;
        self.entity().set_exists(true);
        relations::autoload(self)?;
        Ok(true)
    }

    /// Reloads this record from the remote source, discarding local-only
    /// data. The `id` key and the storage of loaded relations are preserved
    /// across the reload; everything else is replaced by the fetched state.
    ///
    /// `Ok(false)` when the record does not exist remotely, has no id, or
    /// the transport fails.
    fn refresh(&self, transport: &dyn Transport) -> crate::Result<bool> {
        if !self.entity().exists() {
            return Ok(false);
        }
        let Some(id) = self.id() else {
            return Ok(false);
        };
        let data = match transport.fetch(Self::resource(), Some(&id), &Params::new()) {
            Ok(data) => data,
            Err(err) => {
                debug!(resource = Self::resource(), id = %id, error = %err, "refresh failed");
                return Ok(false);
            }
        };

        self.entity().clear(&["id"]);
        self.entity().merge(data)?;
        self.entity().set_exists(true);
        relations::autoload(self)?;
        Ok(true)
    }

    /// Saves local state to the remote source: update when the record
    /// exists, create otherwise. The response is merged back and the record
    /// marked existing. `Ok(false)` when the transport fails or an existing
    /// record has lost its id.
    fn save(&self, transport: &dyn Transport) -> crate::Result<bool> {
        let payload = self.entity().to_structure();
        let response = if self.entity().exists() {
            let Some(id) = self.id() else {
                return Ok(false);
            };
            transport.update(Self::resource(), &id, payload)
        } else {
            transport.create(Self::resource(), payload)
        };

        match response {
            Ok(data) => {
                self.entity().merge(data)?;
                self.entity().set_exists(true);
                Ok(true)
            }
            Err(err) => {
                debug!(resource = Self::resource(), error = %err, "save failed");
                Ok(false)
            }
        }
    }

    /// Deletes the remote record and clears the existence flag.
    ///
    /// `Ok(false)` when the record does not exist remotely, has no id, or
    /// the transport fails. Local data is left untouched.
    fn delete(&self, transport: &dyn Transport) -> crate::Result<bool> {
        if !self.entity().exists() {
            return Ok(false);
        }
        let Some(id) = self.id() else {
            return Ok(false);
        };

        match transport.delete(Self::resource(), &id) {
            Ok(()) => {
                self.entity().set_exists(false);
                Ok(true)
            }
            Err(err) => {
                debug!(resource = Self::resource(), id = %id, error = %err, "delete failed");
                Ok(false)
            }
        }
    }
}
