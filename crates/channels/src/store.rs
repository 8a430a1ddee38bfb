//! Durable device-identity storage.
//!
//! Absence of a device is a valid new-device state; only an unreadable store
//! is an error.

use std::path::Path;

use {
    serde::{Deserialize, Serialize},
    tracing::debug,
};

/// A paired device identity. Created on first successful pairing, loaded on
/// every restart, never explicitly destroyed by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSession {
    /// Fully-qualified backend address of this device.
    pub jid: String,
    /// Platform label advertised to the backend.
    pub platform: String,
}

/// Session store collaborator contract.
pub trait SessionStore: Send + Sync {
    /// Return the first stored device, or `None` for a new device.
    fn first_device(&self) -> anyhow::Result<Option<DeviceSession>>;

    /// Persist a device identity.
    fn save_device(&self, device: &DeviceSession) -> anyhow::Result<()>;
}

// ── Sled-backed store ────────────────────────────────────────────────────────

const DEVICE_KEY: &[u8] = b"device/first";

/// Device sessions persisted in a local sled database, postcard-encoded.
pub struct SledSessionStore {
    db: sled::Db,
}

impl SledSessionStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let db = sled::open(path)
            .map_err(|e| anyhow::anyhow!("failed to open session store {}: {e}", path.display()))?;
        debug!(path = %path.display(), "session store opened");
        Ok(Self { db })
    }
}

impl SessionStore for SledSessionStore {
    fn first_device(&self) -> anyhow::Result<Option<DeviceSession>> {
        let Some(raw) = self.db.get(DEVICE_KEY)? else {
            return Ok(None);
        };
        let device = postcard::from_bytes(&raw)
            .map_err(|e| anyhow::anyhow!("corrupt device session record: {e}"))?;
        Ok(Some(device))
    }

    fn save_device(&self, device: &DeviceSession) -> anyhow::Result<()> {
        let raw = postcard::to_allocvec(device)
            .map_err(|e| anyhow::anyhow!("failed to encode device session: {e}"))?;
        self.db.insert(DEVICE_KEY, raw)?;
        self.db.flush()?;
        debug!(jid = %device.jid, "device session saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, SledSessionStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SledSessionStore::open(&dir.path().join("session.db")).expect("open store");
        (dir, store)
    }

    #[test]
    fn fresh_store_has_no_device() {
        let (_dir, store) = open_temp();
        assert_eq!(store.first_device().expect("read"), None);
    }

    #[test]
    fn saved_device_round_trips() {
        let (_dir, store) = open_temp();
        let device = DeviceSession {
            jid: "15551234567@s.whatsapp.net".into(),
            platform: "wasend".into(),
        };
        store.save_device(&device).expect("save");
        assert_eq!(store.first_device().expect("read"), Some(device));
    }

    #[test]
    fn reopen_sees_persisted_device() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.db");
        let device = DeviceSession {
            jid: "15551234567@s.whatsapp.net".into(),
            platform: "wasend".into(),
        };
        {
            let store = SledSessionStore::open(&path).expect("open store");
            store.save_device(&device).expect("save");
        }
        let store = SledSessionStore::open(&path).expect("reopen store");
        assert_eq!(store.first_device().expect("read"), Some(device));
    }
}
