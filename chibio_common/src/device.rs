//! Shared device-state table.
//!
//! The control application keeps one [`DeviceRecord`] per reactor module,
//! keyed by its slot identifier (`"M0"`, `"M1"`, ...). Logging code only
//! needs one thing from it: the human-readable display name, resolved
//! through [`DeviceLookup`]. Resolution never fails loudly; every miss is an
//! explicit [`NameLookup::NotFound`] carrying the reason.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use toml::Value;

/// Record field holding the device display name.
pub const DISPLAY_NAME_FIELD: &str = "DeviceID";

/// Why a display name could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No device table is attached.
    NoTable,
    /// The identifier has no entry in the table.
    UnknownDevice,
    /// The entry exists but has no display-name field.
    MissingField,
    /// The display-name field is not a string.
    NotAString,
    /// The table could not be read consistently.
    Unavailable,
}

/// Result of resolving a device display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameLookup {
    Found(String),
    NotFound(NotFoundReason),
}

impl NameLookup {
    /// The resolved name, if any.
    pub fn found(&self) -> Option<&str> {
        match self {
            Self::Found(name) => Some(name),
            Self::NotFound(_) => None,
        }
    }
}

/// Read-only display-name resolution.
///
/// Implementations must not panic; any inconsistency is reported as
/// [`NameLookup::NotFound`].
pub trait DeviceLookup: Send + Sync {
    fn display_name(&self, device_id: &str) -> NameLookup;
}

// ─── DeviceRecord ───────────────────────────────────────────────────

/// Per-device state, a bag of named TOML values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRecord {
    fields: toml::Table,
}

impl DeviceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record carrying only a display name.
    pub fn with_display_name(name: impl Into<String>) -> Self {
        let name: String = name.into();
        let mut record = Self::new();
        record.set(DISPLAY_NAME_FIELD, name);
        record
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Resolve the display-name field of this record.
    pub fn display_name(&self) -> NameLookup {
        match self.get(DISPLAY_NAME_FIELD) {
            None => NameLookup::NotFound(NotFoundReason::MissingField),
            Some(Value::String(name)) => NameLookup::Found(name.clone()),
            Some(_) => NameLookup::NotFound(NotFoundReason::NotAString),
        }
    }
}

impl DeviceLookup for BTreeMap<String, DeviceRecord> {
    fn display_name(&self, device_id: &str) -> NameLookup {
        self.get(device_id)
            .map_or(NameLookup::NotFound(NotFoundReason::UnknownDevice), |r| {
                r.display_name()
            })
    }
}

// ─── DeviceTable ────────────────────────────────────────────────────

/// Concurrent device-state table owned by the control application.
///
/// Shared as `Arc<DeviceTable>`: the application mutates it while loggers
/// hold it as `Arc<dyn DeviceLookup>`.
///
/// # TOML Example
///
/// ```toml
/// [devices.M0]
/// DeviceID = "Reactor1"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(from = "BTreeMap<String, DeviceRecord>")]
pub struct DeviceTable {
    devices: RwLock<BTreeMap<String, DeviceRecord>>,
}

impl DeviceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(
        &self,
        device_id: impl Into<String>,
        record: DeviceRecord,
    ) -> Option<DeviceRecord> {
        self.write().insert(device_id.into(), record)
    }

    pub fn remove(&self, device_id: &str) -> Option<DeviceRecord> {
        self.write().remove(device_id)
    }

    /// Set the display name, creating the record if needed.
    pub fn set_display_name(&self, device_id: impl Into<String>, name: impl Into<String>) {
        let name: String = name.into();
        self.write()
            .entry(device_id.into())
            .or_default()
            .set(DISPLAY_NAME_FIELD, name);
    }

    /// Snapshot of one record.
    pub fn get(&self, device_id: &str) -> Option<DeviceRecord> {
        self.read().get(device_id).cloned()
    }

    /// Device identifiers in sorted order.
    pub fn ids(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Owner-side access recovers from poisoning; lookups do not.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, DeviceRecord>> {
        self.devices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, DeviceRecord>> {
        self.devices.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceLookup for DeviceTable {
    fn display_name(&self, device_id: &str) -> NameLookup {
        // A poisoned lock means a writer panicked mid-update.
        match self.devices.read() {
            Ok(devices) => devices.display_name(device_id),
            Err(_) => NameLookup::NotFound(NotFoundReason::Unavailable),
        }
    }
}

impl From<BTreeMap<String, DeviceRecord>> for DeviceTable {
    fn from(devices: BTreeMap<String, DeviceRecord>) -> Self {
        Self {
            devices: RwLock::new(devices),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, DeviceRecord)> for DeviceTable {
    fn from_iter<I: IntoIterator<Item = (K, DeviceRecord)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(id, record)| (id.into(), record))
            .collect::<BTreeMap<_, _>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn lookup_found() {
        let table = DeviceTable::new();
        table.set_display_name("M0", "Reactor1");
        assert_eq!(
            table.display_name("M0"),
            NameLookup::Found("Reactor1".into())
        );
    }

    #[test]
    fn lookup_reports_each_miss() {
        let mut no_name = DeviceRecord::new();
        no_name.set("OD", 0.5);
        let mut numeric = DeviceRecord::new();
        numeric.set(DISPLAY_NAME_FIELD, 42_i64);

        let table: DeviceTable = [("M1", no_name), ("M2", numeric)].into_iter().collect();

        assert_eq!(
            table.display_name("M9"),
            NameLookup::NotFound(NotFoundReason::UnknownDevice)
        );
        assert_eq!(
            table.display_name("M1"),
            NameLookup::NotFound(NotFoundReason::MissingField)
        );
        assert_eq!(
            table.display_name("M2"),
            NameLookup::NotFound(NotFoundReason::NotAString)
        );
    }

    #[test]
    fn poisoned_table_is_unavailable() {
        let table = Arc::new(DeviceTable::new());
        table.set_display_name("M0", "Reactor1");

        let writer = Arc::clone(&table);
        let _ = std::thread::spawn(move || {
            let _guard = writer.devices.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert_eq!(
            table.display_name("M0"),
            NameLookup::NotFound(NotFoundReason::Unavailable)
        );
        // Owner-side access keeps working.
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn record_field_access() {
        let mut record = DeviceRecord::with_display_name("Reactor3");
        record.set("OD", 0.25);
        assert_eq!(record.get("OD").and_then(Value::as_float), Some(0.25));
        assert!(record.get("Missing").is_none());
        assert_eq!(record.display_name().found(), Some("Reactor3"));
    }

    #[test]
    fn insert_replace_remove() {
        let table = DeviceTable::new();
        assert!(table.is_empty());
        let first = table.insert("M0", DeviceRecord::with_display_name("A"));
        assert!(first.is_none());
        let old = table
            .insert("M0", DeviceRecord::with_display_name("B"))
            .map(|r| r.display_name());
        assert_eq!(old, Some(NameLookup::Found("A".into())));
        assert!(table.remove("M0").is_some());
        assert!(table.get("M0").is_none());
    }

    #[test]
    fn table_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            devices: DeviceTable,
        }

        let w: Wrapper = toml::from_str(
            r#"
[devices.M0]
DeviceID = "Reactor1"

[devices.M1]
OD = 0.4
"#,
        )
        .unwrap();
        assert_eq!(w.devices.ids(), vec!["M0".to_string(), "M1".to_string()]);
        assert_eq!(w.devices.display_name("M0").found(), Some("Reactor1"));
        assert_eq!(w.devices.display_name("M1").found(), None);
    }
}
