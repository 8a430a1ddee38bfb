use {async_trait::async_trait, thiserror::Error, tokio::sync::mpsc};

// ── Types ────────────────────────────────────────────────────────────────────

/// Media kinds the backend can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
        }
    }
}

/// Result of uploading media to the backend. Transient; consumed immediately
/// to build the send call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub url: String,
    pub direct_path: String,
    pub media_key: Vec<u8>,
    pub file_enc_sha256: Vec<u8>,
    pub file_sha256: Vec<u8>,
    pub file_length: u64,
}

/// One protocol-level outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundPayload {
    Text {
        body: String,
    },
    Image {
        media: UploadedMedia,
        mime_type: String,
        caption: String,
    },
    Document {
        media: UploadedMedia,
        mime_type: String,
        filename: String,
        caption: String,
    },
}

impl OutboundPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Document { .. } => "document",
        }
    }
}

/// Event emitted on the pairing channel while a first-time device link is in
/// progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingEvent {
    /// A scannable pairing code is ready to render out-of-band.
    Code(String),
    /// The backend rejected this client version. Terminal.
    ClientOutdated,
    /// The device is linked and the connection is usable.
    Connected,
    /// Anything else the backend emits; logged and ignored.
    Other(String),
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("media upload rejected: {0}")]
    Upload(String),
    #[error("send rejected: {0}")]
    Send(String),
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// The messaging backend collaborator. Implementations own the wire protocol,
/// multi-device cryptography, and media transport.
#[async_trait]
pub trait MessagingBackend: Send + Sync {
    /// Open the connection. For an unpaired device this must be called after
    /// [`MessagingBackend::pairing_channel`] so link events are not dropped.
    async fn connect(&self) -> Result<(), BackendError>;

    /// Stream of pairing events for a first-time device link.
    async fn pairing_channel(&self) -> Result<mpsc::Receiver<PairingEvent>, BackendError>;

    /// Upload media bytes, returning the handle to reference in a send call.
    async fn upload(&self, bytes: &[u8], kind: MediaKind) -> Result<UploadedMedia, BackendError>;

    /// Send one message to a fully-qualified backend address.
    async fn send(&self, to: &str, payload: OutboundPayload) -> Result<(), BackendError>;

    /// Tear down the connection.
    async fn disconnect(&self);
}
