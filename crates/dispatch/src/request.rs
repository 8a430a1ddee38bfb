use std::path::PathBuf;

/// One validated outbound request. Created per HTTP call, consumed
/// synchronously within that call, never persisted. Media kinds carry the
/// staged artifact's path; bytes are read back at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    Text {
        to: String,
        text: String,
    },
    Image {
        to: String,
        caption: Option<String>,
        path: PathBuf,
    },
    Document {
        to: String,
        caption: Option<String>,
        /// Caller-supplied name, attached verbatim to the send call.
        filename: String,
        path: PathBuf,
    },
}

impl OutboundRequest {
    pub fn to(&self) -> &str {
        match self {
            Self::Text { to, .. } | Self::Image { to, .. } | Self::Document { to, .. } => to,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Document { .. } => "document",
        }
    }
}
