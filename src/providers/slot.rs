//! Defines the named-slot storage boundary used by the guest provider, the
//! server-side analogue of the browser's scoped local storage.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::Error;

/// Named string slots in scoped persistent storage.
///
/// Failures (quota, I/O, permissions) propagate to the caller as
/// [Error::StorageError] with no retry and no partial-state cleanup
/// guarantee.
pub trait SlotStore {
    /// Read the value of `slot`, or `None` if the slot has never been
    /// written.
    fn read(&self, slot: &str) -> Result<Option<String>, Error>;

    /// Write `value` to `slot`, replacing any previous value.
    fn write(&mut self, slot: &str, value: &str) -> Result<(), Error>;

    /// Remove `slot` entirely. Removing a slot that does not exist is not an
    /// error.
    fn remove(&mut self, slot: &str) -> Result<(), Error>;
}

/// Stores each slot as one file under a data directory.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    /// Create a slot store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(slot)
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>, Error> {
        match std::fs::read_to_string(self.slot_path(slot)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, slot: &str, value: &str) -> Result<(), Error> {
        std::fs::write(self.slot_path(slot), value)?;

        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), Error> {
        match std::fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Keeps slots in memory. Used as the test fake for the storage boundary and
/// for ephemeral demo sessions that should not outlive the process.
///
/// Clones share the same underlying slots, so a test can hold one clone to
/// inspect what the provider wrote through the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlotStore {
    /// Create an empty in-memory slot store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current value of `slot`, if any.
    pub fn get(&self, slot: &str) -> Option<String> {
        self.slots.lock().unwrap().get(slot).cloned()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>, Error> {
        Ok(self.slots.lock().unwrap().get(slot).cloned())
    }

    fn write(&mut self, slot: &str, value: &str) -> Result<(), Error> {
        self.slots
            .lock()
            .unwrap()
            .insert(slot.to_owned(), value.to_owned());

        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), Error> {
        self.slots.lock().unwrap().remove(slot);

        Ok(())
    }
}
