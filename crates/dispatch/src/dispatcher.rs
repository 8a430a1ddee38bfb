use std::{path::Path, sync::Arc};

use {thiserror::Error, tracing::debug};

use {
    wasend_channels::{BackendError, MediaKind, MessagingBackend, OutboundPayload},
    wasend_media::mime,
};

use crate::{jid::to_jid, request::OutboundRequest};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to read staged artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("media upload failed: {0}")]
    Upload(#[source] BackendError),
    #[error("send failed: {0}")]
    Send(#[source] BackendError),
}

/// Maps a validated [`OutboundRequest`] to exactly one protocol send call.
/// Media kinds run read → upload → send strictly in order, with no
/// compensation: a failed send after a successful upload leaves the remote
/// media object orphaned, an accepted tradeoff.
pub struct Dispatcher {
    backend: Arc<dyn MessagingBackend>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn MessagingBackend>) -> Self {
        Self { backend }
    }

    pub async fn dispatch(&self, request: OutboundRequest) -> Result<(), DispatchError> {
        debug!(to = request.to(), kind = request.kind(), "dispatching");
        match request {
            OutboundRequest::Text { to, text } => {
                let jid = to_jid(&to);
                self.backend
                    .send(&jid, OutboundPayload::Text { body: text })
                    .await
                    .map_err(DispatchError::Send)
            },
            OutboundRequest::Image { to, caption, path } => {
                self.send_media(&to, MediaKind::Image, &path, caption, None)
                    .await
            },
            OutboundRequest::Document {
                to,
                caption,
                filename,
                path,
            } => {
                self.send_media(&to, MediaKind::Document, &path, caption, Some(filename))
                    .await
            },
        }
    }

    async fn send_media(
        &self,
        to: &str,
        kind: MediaKind,
        path: &Path,
        caption: Option<String>,
        filename: Option<String>,
    ) -> Result<(), DispatchError> {
        let jid = to_jid(to);
        let bytes = tokio::fs::read(path).await?;
        let media = self
            .backend
            .upload(&bytes, kind)
            .await
            .map_err(DispatchError::Upload)?;
        let mime_type = mime::detect(&bytes);
        // Absent captions become the empty string, never an omitted field.
        let caption = caption.unwrap_or_default();
        let payload = match kind {
            MediaKind::Image => OutboundPayload::Image {
                media,
                mime_type,
                caption,
            },
            MediaKind::Document => OutboundPayload::Document {
                media,
                mime_type,
                filename: filename.unwrap_or_default(),
                caption,
            },
        };
        self.backend
            .send(&jid, payload)
            .await
            .map_err(DispatchError::Send)
    }
}
