//! In-memory session repository

use super::SessionRepository;
use crate::error::{Error, Result};
use crate::session::SessionSnapshot;
use std::sync::{Mutex, MutexGuard};

/// Keeps the serialized snapshot in memory.
///
/// Stores the JSON text rather than the value so that corrupt content can be
/// injected with [`MemorySessionStore::with_raw`].
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
    fail_writes: bool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with raw snapshot text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
            fail_writes: false,
        }
    }

    /// A store whose `save` and `clear` always fail, like unavailable storage.
    pub fn failing() -> Self {
        Self {
            slot: Mutex::new(None),
            fail_writes: true,
        }
    }

    /// Raw stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.raw().is_none()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Storage("memory store is read-only".to_string()));
        }
        Ok(())
    }
}

impl SessionRepository for MemorySessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        self.check_writable()?;
        let json = snapshot.to_json()?;
        *self.lock()? = Some(json);
        Ok(())
    }

    fn load(&self) -> Result<Option<SessionSnapshot>> {
        match self.lock()?.as_deref() {
            Some(raw) => SessionSnapshot::from_json(raw).map(Some),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        self.check_writable()?;
        *self.lock()? = None;
        Ok(())
    }
}
