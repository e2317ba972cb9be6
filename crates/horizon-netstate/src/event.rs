//! Connectivity event and descriptor types.

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Opaque handle identifying a specific active network.
///
/// On this platform layer the handle wraps the interface index reported by
/// the operating system. It identifies a network *session*: the same
/// physical interface coming back up after a loss is delivered with the
/// same index, and the last-received handle is what the state holder keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkHandle(pub u32);

impl fmt::Display for NetworkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "net#{}", self.0)
    }
}

/// Transport kind carried by a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transport {
    /// Wired Ethernet.
    Ethernet,
    /// Wireless (WiFi).
    WiFi,
    /// Loopback (localhost).
    Loopback,
    /// Virtual or tunnel interface.
    Virtual,
    /// Transport could not be determined.
    #[default]
    Unknown,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Ethernet => write!(f, "Ethernet"),
            Transport::WiFi => write!(f, "WiFi"),
            Transport::Loopback => write!(f, "Loopback"),
            Transport::Virtual => write!(f, "Virtual"),
            Transport::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Summary of a network's transport and quality attributes.
///
/// Replaced wholesale on every capabilities change; fields are never merged
/// with a previous descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkCapabilities {
    /// Transport the network rides on.
    pub transport: Transport,
    /// Whether the platform reports the network as metered.
    pub metered: bool,
    /// Whether the network has at least one usable address assigned.
    pub validated: bool,
}

/// Link-layer configuration of a network.
///
/// Replaced wholesale on every link change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkProperties {
    /// Interface name (e.g., "eth0", "en0", "Wi-Fi").
    pub interface_name: String,
    /// IP addresses assigned to the interface.
    pub addresses: Vec<IpAddr>,
    /// DNS servers configured for the interface, when the platform exposes them.
    pub dns_servers: Vec<IpAddr>,
}

/// A platform connectivity notification.
///
/// All notification kinds are modeled as one tagged enum and dispatched
/// through a single handler, rather than one hook per kind. Each variant
/// carries the opaque handle and/or descriptor payload the platform
/// delivered with it.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectivityEvent {
    /// A network became reachable. For a brand-new network this fires
    /// before its capability and link events.
    Available(NetworkHandle),
    /// Capabilities of a tracked network changed. May fire several times
    /// in a row while capabilities are negotiated incrementally.
    CapabilitiesChanged {
        network: NetworkHandle,
        capabilities: NetworkCapabilities,
    },
    /// Link configuration of a tracked network changed.
    LinkChanged {
        network: NetworkHandle,
        link: LinkProperties,
    },
    /// A tracked network became unreachable. Delivered after the network
    /// is actually gone.
    Lost(NetworkHandle),
    /// Advisory: the network is about to be lost.
    Losing {
        network: NetworkHandle,
        grace_period: Duration,
    },
    /// No network could be established within the request window.
    Unavailable,
    /// Platform-level blocking policy toggled for a tracked network.
    BlockedStatusChanged {
        network: NetworkHandle,
        blocked: bool,
    },
}
