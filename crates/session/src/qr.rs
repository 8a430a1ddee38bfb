//! Terminal rendering of pairing codes.

use {
    qrcode::{QrCode, render::unicode},
    tracing::{info, warn},
};

/// Render a pairing code as unicode half-block QR art in the log stream.
/// A code the encoder cannot fit is logged raw so the operator can still
/// pair by hand.
pub fn render_terminal(code: &str) {
    match QrCode::new(code.as_bytes()) {
        Ok(qr) => {
            let art = qr
                .render::<unicode::Dense1x2>()
                .quiet_zone(true)
                .build();
            info!("scan the code below to pair this device\n{art}");
        },
        Err(e) => warn!(error = %e, code = %code, "failed to render pairing code"),
    }
}
