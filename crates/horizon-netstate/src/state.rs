//! Shared connectivity state.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{LinkProperties, NetworkCapabilities, NetworkHandle};

/// Current known connectivity, as last reported by the platform.
///
/// Pure storage: every field reflects the most recent event that touched it,
/// last event wins. `network` is retained after a loss so readers can tell
/// *which* network went away; only `is_connected` distinguishes the two
/// cases. Capability and link descriptors may lag `network` during a
/// handover until the platform delivers fresh ones for the new network.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectivityState {
    /// Handle of the most recently available (or lost) network.
    pub network: Option<NetworkHandle>,
    /// True between an availability event and the next loss event.
    pub is_connected: bool,
    /// Capabilities of the tracked network, replaced wholesale on change.
    pub capabilities: Option<NetworkCapabilities>,
    /// Link configuration of the tracked network, replaced wholesale on change.
    pub link_properties: Option<LinkProperties>,
}

impl ConnectivityState {
    /// Empty state: no network seen yet, not connected.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shared, mutex-guarded holder for [`ConnectivityState`].
///
/// Writes come from the platform watcher thread; reads can come from
/// anywhere. Reads go through [`snapshot`](Self::snapshot), which copies the
/// whole state under the lock, so a reader never observes a torn state where
/// only some fields of a multi-field update have landed.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityStateHolder {
    inner: Arc<Mutex<ConnectivityState>>,
}

impl ConnectivityStateHolder {
    /// Create a holder with empty initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state, taken atomically.
    pub fn snapshot(&self) -> ConnectivityState {
        self.inner.lock().clone()
    }

    /// Whether the platform currently reports a connected network.
    pub fn is_connected(&self) -> bool {
        self.inner.lock().is_connected
    }

    /// Run `f` with the state locked for writing.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut ConnectivityState) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
