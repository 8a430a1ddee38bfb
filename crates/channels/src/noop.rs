//! Development backend.
//!
//! Stands in for a real wire-protocol client: pairing completes after one
//! rendered code, uploads fabricate deterministic media handles, and sends
//! are logged instead of transmitted. This is the seam where a production
//! backend implementation plugs in.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use {
    async_trait::async_trait,
    sha2::{Digest, Sha256},
    tokio::sync::mpsc,
    tracing::{info, warn},
    uuid::Uuid,
};

use crate::{
    backend::{BackendError, MediaKind, MessagingBackend, OutboundPayload, PairingEvent, UploadedMedia},
    store::{DeviceSession, SessionStore},
};

const PLATFORM: &str = "wasend-dev";

pub struct NoopBackend {
    store: Arc<dyn SessionStore>,
    connected: AtomicBool,
    /// Sender half of an open pairing channel, armed by `pairing_channel`
    /// and fired by the next `connect`.
    pairing: Mutex<Option<mpsc::Sender<PairingEvent>>>,
}

impl NoopBackend {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            connected: AtomicBool::new(false),
            pairing: Mutex::new(None),
        }
    }
}

#[async_trait]
impl MessagingBackend for NoopBackend {
    async fn connect(&self) -> Result<(), BackendError> {
        self.connected.store(true, Ordering::SeqCst);

        let pending = self
            .pairing
            .lock()
            .map_err(|_| BackendError::Connect("pairing state poisoned".into()))?
            .take();
        if let Some(tx) = pending {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                let code = format!("wasend-dev:{}", Uuid::new_v4());
                let _ = tx.send(PairingEvent::Code(code)).await;
                let device = DeviceSession {
                    jid: format!("{}@s.whatsapp.net", Uuid::new_v4().simple()),
                    platform: PLATFORM.into(),
                };
                if let Err(e) = store.save_device(&device) {
                    warn!(error = %e, "failed to persist paired device");
                }
                let _ = tx.send(PairingEvent::Connected).await;
            });
        }
        Ok(())
    }

    async fn pairing_channel(&self) -> Result<mpsc::Receiver<PairingEvent>, BackendError> {
        let (tx, rx) = mpsc::channel(8);
        *self
            .pairing
            .lock()
            .map_err(|_| BackendError::Connect("pairing state poisoned".into()))? = Some(tx);
        Ok(rx)
    }

    async fn upload(&self, bytes: &[u8], kind: MediaKind) -> Result<UploadedMedia, BackendError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(BackendError::Upload("not connected".into()));
        }
        let digest = Sha256::digest(bytes);
        let id = Uuid::new_v4().simple().to_string();
        Ok(UploadedMedia {
            url: format!("https://media.invalid/{}/{id}", kind.as_str()),
            direct_path: format!("/v/{id}"),
            media_key: digest[..16].to_vec(),
            file_enc_sha256: digest.to_vec(),
            file_sha256: digest.to_vec(),
            file_length: bytes.len() as u64,
        })
    }

    async fn send(&self, to: &str, payload: OutboundPayload) -> Result<(), BackendError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(BackendError::Send("not connected".into()));
        }
        info!(to = %to, kind = payload.kind(), "noop backend: message logged, not transmitted");
        Ok(())
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        info!("noop backend disconnected");
    }
}
