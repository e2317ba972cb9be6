//! Callback adapter: platform notifications to state writes.

use crate::event::{ConnectivityEvent, NetworkHandle};
use crate::state::ConnectivityStateHolder;

/// Translates each platform connectivity notification into a field update on
/// the shared [`ConnectivityStateHolder`], plus one diagnostic trace line.
///
/// The adapter is write-only with respect to the holder: it never reads
/// state back, never branches on prior state, and never fails. It also does
/// not validate that a capability or link update refers to the network
/// currently marked connected; stale updates from a superseded network are
/// written just as eagerly as current ones, matching platform delivery
/// order. `Losing`, `Unavailable`, and `BlockedStatusChanged` are advisory
/// and leave state untouched.
#[derive(Debug, Clone)]
pub struct ConnectivityCallback {
    holder: ConnectivityStateHolder,
}

impl ConnectivityCallback {
    /// Create an adapter writing into `holder`.
    pub fn new(holder: ConnectivityStateHolder) -> Self {
        Self { holder }
    }

    fn update_connectivity(&self, is_available: bool, network: NetworkHandle) {
        self.holder.update(|state| {
            state.network = Some(network);
            state.is_connected = is_available;
        });
    }

    /// Apply one platform notification.
    ///
    /// Safe to call from whatever thread the platform delivers events on;
    /// each write takes the holder's lock for the duration of the field
    /// assignment only.
    pub fn handle_event(&self, event: ConnectivityEvent) {
        match event {
            ConnectivityEvent::Available(network) => {
                tracing::info!(target: "horizon_netstate::callback", "[{network}] - new network");
                self.update_connectivity(true, network);
            }
            ConnectivityEvent::CapabilitiesChanged {
                network,
                capabilities,
            } => {
                tracing::info!(
                    target: "horizon_netstate::callback",
                    "[{network}] - network capability changed: {capabilities:?}"
                );
                self.holder.update(|state| state.capabilities = Some(capabilities));
            }
            ConnectivityEvent::LinkChanged { network, link } => {
                tracing::info!(
                    target: "horizon_netstate::callback",
                    "[{network}] - link changed: {}",
                    link.interface_name
                );
                self.holder.update(|state| state.link_properties = Some(link));
            }
            ConnectivityEvent::Lost(network) => {
                tracing::info!(target: "horizon_netstate::callback", "[{network}] - network lost");
                self.update_connectivity(false, network);
            }
            ConnectivityEvent::Losing {
                network,
                grace_period,
            } => {
                tracing::info!(
                    target: "horizon_netstate::callback",
                    "[{network}] - losing within {}ms",
                    grace_period.as_millis()
                );
            }
            ConnectivityEvent::Unavailable => {
                tracing::info!(target: "horizon_netstate::callback", "unavailable");
            }
            ConnectivityEvent::BlockedStatusChanged { network, blocked } => {
                tracing::info!(
                    target: "horizon_netstate::callback",
                    "[{network}] - blocked status changed: {blocked}"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use super::*;
    use crate::event::{LinkProperties, NetworkCapabilities, Transport};

    fn setup() -> (ConnectivityCallback, ConnectivityStateHolder) {
        let holder = ConnectivityStateHolder::new();
        (ConnectivityCallback::new(holder.clone()), holder)
    }

    fn wifi_caps() -> NetworkCapabilities {
        NetworkCapabilities {
            transport: Transport::WiFi,
            metered: false,
            validated: true,
        }
    }

    fn link(name: &str) -> LinkProperties {
        LinkProperties {
            interface_name: name.to_string(),
            addresses: vec![IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10))],
            dns_servers: vec![IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1))],
        }
    }

    #[test]
    fn test_available_sets_network_and_connected() {
        let (callback, holder) = setup();
        callback.handle_event(ConnectivityEvent::Available(NetworkHandle(1)));
        let state = holder.snapshot();
        assert_eq!(state.network, Some(NetworkHandle(1)));
        assert!(state.is_connected);
    }

    #[test]
    fn test_connected_strictly_between_available_and_lost() {
        let (callback, holder) = setup();
        assert!(!holder.is_connected());
        callback.handle_event(ConnectivityEvent::Available(NetworkHandle(1)));
        assert!(holder.is_connected());
        callback.handle_event(ConnectivityEvent::Lost(NetworkHandle(1)));
        assert!(!holder.is_connected());
    }

    #[test]
    fn test_lost_retains_handle() {
        let (callback, holder) = setup();
        callback.handle_event(ConnectivityEvent::Available(NetworkHandle(7)));
        callback.handle_event(ConnectivityEvent::Lost(NetworkHandle(7)));
        let state = holder.snapshot();
        assert_eq!(state.network, Some(NetworkHandle(7)));
        assert!(!state.is_connected);
    }

    #[test]
    fn test_capabilities_are_replaced_not_merged() {
        let (callback, holder) = setup();
        callback.handle_event(ConnectivityEvent::CapabilitiesChanged {
            network: NetworkHandle(1),
            capabilities: NetworkCapabilities {
                transport: Transport::Ethernet,
                metered: true,
                validated: false,
            },
        });
        callback.handle_event(ConnectivityEvent::CapabilitiesChanged {
            network: NetworkHandle(1),
            capabilities: wifi_caps(),
        });
        assert_eq!(holder.snapshot().capabilities, Some(wifi_caps()));
    }

    #[test]
    fn test_link_properties_are_replaced_not_merged() {
        let (callback, holder) = setup();
        callback.handle_event(ConnectivityEvent::LinkChanged {
            network: NetworkHandle(1),
            link: link("eth0"),
        });
        callback.handle_event(ConnectivityEvent::LinkChanged {
            network: NetworkHandle(1),
            link: link("wlan0"),
        });
        assert_eq!(holder.snapshot().link_properties, Some(link("wlan0")));
    }

    #[test]
    fn test_advisory_events_do_not_mutate_state() {
        let (callback, holder) = setup();
        callback.handle_event(ConnectivityEvent::Available(NetworkHandle(2)));
        callback.handle_event(ConnectivityEvent::CapabilitiesChanged {
            network: NetworkHandle(2),
            capabilities: wifi_caps(),
        });
        callback.handle_event(ConnectivityEvent::LinkChanged {
            network: NetworkHandle(2),
            link: link("wlan0"),
        });
        let before = holder.snapshot();

        callback.handle_event(ConnectivityEvent::Losing {
            network: NetworkHandle(2),
            grace_period: Duration::from_millis(500),
        });
        callback.handle_event(ConnectivityEvent::Unavailable);
        callback.handle_event(ConnectivityEvent::BlockedStatusChanged {
            network: NetworkHandle(2),
            blocked: true,
        });

        assert_eq!(holder.snapshot(), before);
    }

    #[test]
    fn test_events_are_idempotent() {
        let (callback, holder) = setup();
        let events = [
            ConnectivityEvent::Available(NetworkHandle(1)),
            ConnectivityEvent::CapabilitiesChanged {
                network: NetworkHandle(1),
                capabilities: wifi_caps(),
            },
            ConnectivityEvent::LinkChanged {
                network: NetworkHandle(1),
                link: link("wlan0"),
            },
            ConnectivityEvent::Lost(NetworkHandle(1)),
        ];
        for event in events {
            callback.handle_event(event.clone());
            let once = holder.snapshot();
            callback.handle_event(event);
            assert_eq!(holder.snapshot(), once);
        }
    }

    #[test]
    fn test_wifi_session_scenario() {
        let (callback, holder) = setup();

        callback.handle_event(ConnectivityEvent::Available(NetworkHandle(1)));
        let state = holder.snapshot();
        assert!(state.is_connected);
        assert_eq!(state.network, Some(NetworkHandle(1)));

        callback.handle_event(ConnectivityEvent::CapabilitiesChanged {
            network: NetworkHandle(1),
            capabilities: wifi_caps(),
        });
        assert_eq!(holder.snapshot().capabilities, Some(wifi_caps()));

        callback.handle_event(ConnectivityEvent::Lost(NetworkHandle(1)));
        let state = holder.snapshot();
        assert!(!state.is_connected);
        assert_eq!(state.network, Some(NetworkHandle(1)));
    }

    #[test]
    fn test_handover_keeps_stale_descriptors_until_updated() {
        let (callback, holder) = setup();

        callback.handle_event(ConnectivityEvent::Available(NetworkHandle(1)));
        callback.handle_event(ConnectivityEvent::CapabilitiesChanged {
            network: NetworkHandle(1),
            capabilities: wifi_caps(),
        });
        callback.handle_event(ConnectivityEvent::LinkChanged {
            network: NetworkHandle(1),
            link: link("wlan0"),
        });

        // Handover: network 2 becomes current before its descriptors arrive.
        callback.handle_event(ConnectivityEvent::Available(NetworkHandle(2)));
        let state = holder.snapshot();
        assert_eq!(state.network, Some(NetworkHandle(2)));
        assert!(state.is_connected);
        assert_eq!(state.capabilities, Some(wifi_caps()));
        assert_eq!(state.link_properties, Some(link("wlan0")));

        callback.handle_event(ConnectivityEvent::LinkChanged {
            network: NetworkHandle(2),
            link: link("eth0"),
        });
        assert_eq!(holder.snapshot().link_properties, Some(link("eth0")));
    }
}
