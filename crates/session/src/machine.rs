//! Pairing state machine, driven one event at a time.

use wasend_channels::PairingEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The backend rejected this client version. No retry helps.
    ClientOutdated,
    /// The connection itself failed.
    ConnectError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    /// No device identity yet; pairing has not produced a code.
    Unpaired,
    /// A code has been rendered and awaits an out-of-band scan.
    AwaitingScan,
    /// The connection is usable; the gateway may start.
    Connected,
    /// Terminal failure; the process must exit.
    Failed(FailureReason),
}

impl BootstrapState {
    /// Consume one pairing event. Terminal states absorb all further events.
    pub fn on_event(self, event: &PairingEvent) -> Self {
        if self.is_terminal() {
            return self;
        }
        match event {
            PairingEvent::Code(_) => Self::AwaitingScan,
            PairingEvent::ClientOutdated => Self::Failed(FailureReason::ClientOutdated),
            PairingEvent::Connected => Self::Connected,
            PairingEvent::Other(_) => self,
        }
    }

    /// Record a failed transport connect. Terminal states are unaffected.
    pub fn fail_connect(self) -> Self {
        if self.is_terminal() {
            return self;
        }
        Self::Failed(FailureReason::ConnectError)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Connected | Self::Failed(_))
    }
}
