//! Platform subscription and event derivation.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::callback::ConnectivityCallback;
use crate::error::{ConnectivityError, Result};
use crate::event::{
    ConnectivityEvent, LinkProperties, NetworkCapabilities, NetworkHandle, Transport,
};
use crate::state::{ConnectivityState, ConnectivityStateHolder};

/// Watches the platform for connectivity changes and keeps a shared
/// [`ConnectivityStateHolder`] current.
///
/// The monitor owns the register/unregister boundary: [`start`](Self::start)
/// subscribes to the platform's interface watcher, translates each update
/// into [`ConnectivityEvent`]s, and feeds them through a
/// [`ConnectivityCallback`]. Events are delivered on the watcher's own
/// thread; the monitor never spawns work of its own.
///
/// # Example
///
/// ```ignore
/// use horizon_netstate::ConnectivityMonitor;
///
/// let monitor = ConnectivityMonitor::new();
/// monitor.start()?;
///
/// let state = monitor.snapshot();
/// if state.is_connected {
///     println!("online via {:?}", state.capabilities);
/// }
/// ```
pub struct ConnectivityMonitor {
    holder: ConnectivityStateHolder,
    inner: Arc<Mutex<MonitorInner>>,
}

struct MonitorInner {
    /// Whether monitoring is active.
    is_running: bool,
    /// Network currently considered the tracked one; loss of any other
    /// interface is logged but not applied.
    tracked: Option<NetworkHandle>,
    /// Handle to stop the watcher (drop to stop).
    _watcher_handle: Option<netwatcher::WatchHandle>,
}

impl ConnectivityMonitor {
    /// Create a monitor with empty initial state. No platform subscription
    /// is made until [`start`](Self::start).
    pub fn new() -> Self {
        Self {
            holder: ConnectivityStateHolder::new(),
            inner: Arc::new(Mutex::new(MonitorInner {
                is_running: false,
                tracked: None,
                _watcher_handle: None,
            })),
        }
    }

    /// The shared state holder. Clone it to hand read access to other
    /// components; it stays valid until the monitor is dropped.
    pub fn holder(&self) -> &ConnectivityStateHolder {
        &self.holder
    }

    /// Copy of the current connectivity state.
    pub fn snapshot(&self) -> ConnectivityState {
        self.holder.snapshot()
    }

    /// Whether the platform currently reports a connected network.
    pub fn is_connected(&self) -> bool {
        self.holder.is_connected()
    }

    /// Check if the monitor is currently running.
    pub fn is_running(&self) -> bool {
        self.inner.lock().is_running
    }

    /// Register with the platform and start applying connectivity events.
    ///
    /// The watcher's first update enumerates every current interface; it is
    /// used to prime the state, preferring the default-route interface.
    /// Subsequent updates are applied as availability changes. Idempotent:
    /// calling `start` on a running monitor is a no-op.
    pub fn start(&self) -> Result<()> {
        {
            let mut inner = self.inner.lock();
            if inner.is_running {
                return Ok(());
            }
            // Claim the running slot up front so a concurrent start()
            // cannot register a second watcher.
            inner.is_running = true;
        }

        let callback = ConnectivityCallback::new(self.holder.clone());
        let inner_clone = Arc::clone(&self.inner);
        let mut primed = false;

        // The watcher invokes the closure synchronously on this thread for
        // the initial enumeration, before registration returns. The inner
        // lock must not be held here: the closure takes it.
        let registration = netwatcher::watch_interfaces(move |update| {
            // Enumerate once per update; capability details come from the
            // system snapshot rather than the watcher's sparse diff.
            let system_ifaces = netdev::get_interfaces();
            let is_loopback = |ifindex: u32| {
                system_ifaces
                    .iter()
                    .find(|i| i.index == ifindex)
                    .is_some_and(|i| i.is_loopback())
            };

            if !primed {
                primed = true;

                // The first update lists every current interface as added.
                // Prime from exactly one of them instead of replaying the
                // whole set in hash-map order.
                let mut candidates: Vec<u32> = update
                    .interfaces
                    .iter()
                    .filter(|(_, iface)| !iface.ips.is_empty())
                    .map(|(&ifindex, _)| ifindex)
                    .filter(|&ifindex| !is_loopback(ifindex))
                    .collect();
                candidates.sort_unstable();

                let default_index = netdev::get_default_interface().ok().map(|i| i.index);
                match initial_interface(&candidates, default_index) {
                    Some(ifindex) => {
                        let handle = NetworkHandle(ifindex);
                        inner_clone.lock().tracked = Some(handle);
                        if let Some(watched) = update.interfaces.get(&ifindex) {
                            announce_available(
                                &callback,
                                handle,
                                &watched.name,
                                &watched.ips,
                                system_ifaces.iter().find(|i| i.index == ifindex),
                            );
                        }
                    }
                    None => callback.handle_event(ConnectivityEvent::Unavailable),
                }
                return;
            }

            for &ifindex in &update.diff.added {
                let Some(watched) = update.interfaces.get(&ifindex) else {
                    continue;
                };
                if watched.ips.is_empty() || is_loopback(ifindex) {
                    continue;
                }

                let handle = NetworkHandle(ifindex);
                inner_clone.lock().tracked = Some(handle);
                announce_available(
                    &callback,
                    handle,
                    &watched.name,
                    &watched.ips,
                    system_ifaces.iter().find(|i| i.index == ifindex),
                );
            }

            for &ifindex in &update.diff.removed {
                let handle = NetworkHandle(ifindex);
                let mut guard = inner_clone.lock();
                if guard.tracked == Some(handle) {
                    guard.tracked = None;
                    drop(guard);
                    callback.handle_event(ConnectivityEvent::Lost(handle));
                } else {
                    tracing::debug!(
                        target: "horizon_netstate::monitor",
                        "[{handle}] - untracked interface removed"
                    );
                }
            }
        });

        match registration {
            Ok(handle) => {
                let mut inner = self.inner.lock();
                // stop() may have raced registration; in that case let the
                // handle drop here instead of resurrecting the watcher.
                if inner.is_running {
                    inner._watcher_handle = Some(handle);
                }
                Ok(())
            }
            Err(e) => {
                self.inner.lock().is_running = false;
                Err(ConnectivityError::Watch(e.to_string()))
            }
        }
    }

    /// Unregister from the platform. Events already delivered stay applied;
    /// the holder keeps its last state.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        inner._watcher_handle = None;
        inner.is_running = false;
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Pick the interface to prime state from: the default-route interface when
/// it is among the candidates, otherwise the lowest index for a
/// deterministic choice. `candidates` must be sorted.
fn initial_interface(candidates: &[u32], default_index: Option<u32>) -> Option<u32> {
    default_index
        .filter(|index| candidates.contains(index))
        .or_else(|| candidates.first().copied())
}

fn announce_available(
    callback: &ConnectivityCallback,
    handle: NetworkHandle,
    name: &str,
    ips: &[std::net::IpAddr],
    details: Option<&netdev::Interface>,
) {
    callback.handle_event(ConnectivityEvent::Available(handle));
    callback.handle_event(ConnectivityEvent::CapabilitiesChanged {
        network: handle,
        capabilities: details
            .map(capabilities_for)
            .unwrap_or(NetworkCapabilities {
                transport: Transport::Unknown,
                metered: false,
                validated: !ips.is_empty(),
            }),
    });
    callback.handle_event(ConnectivityEvent::LinkChanged {
        network: handle,
        link: details.map(link_for).unwrap_or(LinkProperties {
            interface_name: name.to_string(),
            addresses: ips.to_vec(),
            dns_servers: Vec::new(),
        }),
    });
}

fn capabilities_for(iface: &netdev::Interface) -> NetworkCapabilities {
    let transport = if iface.is_loopback() {
        Transport::Loopback
    } else if iface.is_tun() {
        Transport::Virtual
    } else {
        // netdev doesn't distinguish WiFi from Ethernet directly
        Transport::Ethernet
    };

    NetworkCapabilities {
        transport,
        // Metered status is not exposed by the enumeration layer.
        metered: false,
        validated: !iface.ipv4.is_empty() || !iface.ipv6.is_empty(),
    }
}

fn link_for(iface: &netdev::Interface) -> LinkProperties {
    let mut addresses: Vec<std::net::IpAddr> = iface
        .ipv4
        .iter()
        .map(|net| std::net::IpAddr::V4(net.addr()))
        .collect();
    addresses.extend(iface.ipv6.iter().map(|net| std::net::IpAddr::V6(net.addr())));

    LinkProperties {
        interface_name: iface.name.clone(),
        addresses,
        dns_servers: iface.dns_servers.clone(),
    }
}
