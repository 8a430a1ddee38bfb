//! Async driver for the bootstrap state machine.

use std::sync::Arc;

use {
    thiserror::Error,
    tracing::{debug, info},
};

use wasend_channels::{MessagingBackend, PairingEvent, SessionStore};

use crate::{
    machine::{BootstrapState, FailureReason},
    qr,
};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("session store unreadable: {0}")]
    Store(String),
    #[error("pairing failed: {0}")]
    Pairing(String),
    #[error("client outdated; upgrade required before pairing can proceed")]
    ClientOutdated,
    #[error("failed to restore persisted session: {0}")]
    Restore(String),
}

/// Brings the backend connection into a usable state: pairing for a new
/// device, a plain connect for a persisted one.
pub struct Bootstrapper {
    store: Arc<dyn SessionStore>,
    backend: Arc<dyn MessagingBackend>,
}

impl Bootstrapper {
    pub fn new(store: Arc<dyn SessionStore>, backend: Arc<dyn MessagingBackend>) -> Self {
        Self { store, backend }
    }

    /// Returns once the machine reaches `Connected`. Every error is fatal to
    /// process startup; there is no retry loop at this layer.
    pub async fn bootstrap(&self) -> Result<(), BootstrapError> {
        let device = self
            .store
            .first_device()
            .map_err(|e| BootstrapError::Store(e.to_string()))?;
        match device {
            Some(device) => {
                info!(jid = %device.jid, "restoring persisted device session");
                self.backend
                    .connect()
                    .await
                    .map_err(|e| BootstrapError::Restore(e.to_string()))?;
                info!("connected to messaging backend");
                Ok(())
            },
            None => {
                info!("no device session found; starting pairing");
                self.pair().await
            },
        }
    }

    async fn pair(&self) -> Result<(), BootstrapError> {
        // The channel must be open before connect so no link event is lost.
        let mut events = self
            .backend
            .pairing_channel()
            .await
            .map_err(|e| BootstrapError::Pairing(e.to_string()))?;

        let mut state = BootstrapState::Unpaired;
        let mut connect_detail = String::new();
        if let Err(e) = self.backend.connect().await {
            connect_detail = e.to_string();
            state = state.fail_connect();
        }

        while !state.is_terminal() {
            let Some(event) = events.recv().await else {
                return Err(BootstrapError::Pairing(
                    "pairing channel closed before a connection was established".into(),
                ));
            };
            match &event {
                PairingEvent::Code(code) => qr::render_terminal(code),
                PairingEvent::Other(name) => debug!(event = %name, "ignoring pairing event"),
                _ => {},
            }
            state = state.on_event(&event);
        }

        match state {
            BootstrapState::Connected => {
                info!("paired and connected to messaging backend");
                Ok(())
            },
            BootstrapState::Failed(FailureReason::ClientOutdated) => {
                Err(BootstrapError::ClientOutdated)
            },
            BootstrapState::Failed(FailureReason::ConnectError) => {
                Err(BootstrapError::Pairing(connect_detail))
            },
            // Unreachable: the loop only exits on a terminal state.
            BootstrapState::Unpaired | BootstrapState::AwaitingScan => {
                Err(BootstrapError::Pairing(
                    "pairing ended without a connection".into(),
                ))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use {async_trait::async_trait, tokio::sync::mpsc};

    use wasend_channels::{
        BackendError, DeviceSession, MediaKind, OutboundPayload, UploadedMedia,
    };

    use super::*;

    struct FixedStore {
        device: Option<DeviceSession>,
        unreadable: bool,
    }

    impl SessionStore for FixedStore {
        fn first_device(&self) -> anyhow::Result<Option<DeviceSession>> {
            if self.unreadable {
                anyhow::bail!("disk is on fire");
            }
            Ok(self.device.clone())
        }

        fn save_device(&self, _device: &DeviceSession) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// Backend whose pairing channel replays a fixed script of events.
    struct ScriptedBackend {
        script: Mutex<Vec<PairingEvent>>,
        connect_ok: bool,
        connects: AtomicUsize,
        channels_opened: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(script: Vec<PairingEvent>, connect_ok: bool) -> Self {
            Self {
                script: Mutex::new(script),
                connect_ok,
                connects: AtomicUsize::new(0),
                channels_opened: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MessagingBackend for ScriptedBackend {
        async fn connect(&self) -> Result<(), BackendError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.connect_ok {
                Ok(())
            } else {
                Err(BackendError::Connect("refused".into()))
            }
        }

        async fn pairing_channel(&self) -> Result<mpsc::Receiver<PairingEvent>, BackendError> {
            self.channels_opened.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = mpsc::channel(8);
            let script = std::mem::take(&mut *self.script.lock().expect("script lock"));
            tokio::spawn(async move {
                for event in script {
                    let _ = tx.send(event).await;
                }
            });
            Ok(rx)
        }

        async fn upload(
            &self,
            _bytes: &[u8],
            _kind: MediaKind,
        ) -> Result<UploadedMedia, BackendError> {
            Err(BackendError::Upload("not under test".into()))
        }

        async fn send(&self, _to: &str, _payload: OutboundPayload) -> Result<(), BackendError> {
            Err(BackendError::Send("not under test".into()))
        }

        async fn disconnect(&self) {}
    }

    fn store(device: Option<DeviceSession>) -> Arc<dyn SessionStore> {
        Arc::new(FixedStore {
            device,
            unreadable: false,
        })
    }

    fn paired_device() -> DeviceSession {
        DeviceSession {
            jid: "15551234567@s.whatsapp.net".into(),
            platform: "wasend".into(),
        }
    }

    #[tokio::test]
    async fn new_device_pairs_through_code_and_connected() {
        let backend = Arc::new(ScriptedBackend::new(
            vec![
                PairingEvent::Code("scan-me".into()),
                PairingEvent::Other("keepalive".into()),
                PairingEvent::Connected,
            ],
            true,
        ));
        let bootstrapper = Bootstrapper::new(store(None), Arc::clone(&backend) as _);

        bootstrapper.bootstrap().await.expect("bootstrap");
        assert_eq!(backend.channels_opened.load(Ordering::SeqCst), 1);
        assert_eq!(backend.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn client_outdated_aborts_pairing() {
        let backend = Arc::new(ScriptedBackend::new(
            vec![
                PairingEvent::Code("scan-me".into()),
                PairingEvent::ClientOutdated,
            ],
            true,
        ));
        let bootstrapper = Bootstrapper::new(store(None), backend as _);

        let err = bootstrapper.bootstrap().await.expect_err("must fail");
        assert!(matches!(err, BootstrapError::ClientOutdated));
    }

    #[tokio::test]
    async fn closed_channel_without_connect_is_a_pairing_failure() {
        let backend = Arc::new(ScriptedBackend::new(
            vec![PairingEvent::Code("scan-me".into())],
            true,
        ));
        let bootstrapper = Bootstrapper::new(store(None), backend as _);

        let err = bootstrapper.bootstrap().await.expect_err("must fail");
        assert!(matches!(err, BootstrapError::Pairing(_)));
    }

    #[tokio::test]
    async fn pairing_connect_failure_is_fatal() {
        let backend = Arc::new(ScriptedBackend::new(vec![], false));
        let bootstrapper = Bootstrapper::new(store(None), backend as _);

        let err = bootstrapper.bootstrap().await.expect_err("must fail");
        // The backend's connect error surfaces, not a generic message.
        match err {
            BootstrapError::Pairing(detail) => assert!(detail.contains("refused")),
            other => panic!("expected a pairing error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn persisted_device_restores_without_pairing() {
        let backend = Arc::new(ScriptedBackend::new(vec![], true));
        let bootstrapper =
            Bootstrapper::new(store(Some(paired_device())), Arc::clone(&backend) as _);

        bootstrapper.bootstrap().await.expect("bootstrap");
        assert_eq!(backend.connects.load(Ordering::SeqCst), 1);
        assert_eq!(backend.channels_opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn restore_connect_failure_is_fatal() {
        let backend = Arc::new(ScriptedBackend::new(vec![], false));
        let bootstrapper = Bootstrapper::new(store(Some(paired_device())), backend as _);

        let err = bootstrapper.bootstrap().await.expect_err("must fail");
        assert!(matches!(err, BootstrapError::Restore(_)));
    }

    #[tokio::test]
    async fn unreadable_store_is_fatal() {
        let backend = Arc::new(ScriptedBackend::new(vec![], true));
        let bad_store: Arc<dyn SessionStore> = Arc::new(FixedStore {
            device: None,
            unreadable: true,
        });
        let bootstrapper = Bootstrapper::new(bad_store, backend as _);

        let err = bootstrapper.bootstrap().await.expect_err("must fail");
        assert!(matches!(err, BootstrapError::Store(_)));
    }
}
