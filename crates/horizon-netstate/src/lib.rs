//! Network connectivity observer for Horizon applications.
//!
//! This crate subscribes to low-level connectivity change notifications from
//! the host platform, normalizes them into a small queryable state object,
//! and exposes that state to any component holding a reference to it. It is
//! a thin observation shim: no reconnection strategy, no multi-network
//! prioritization, no quality estimation.
//!
//! # Architecture
//!
//! - [`ConnectivityStateHolder`] — shared, lock-guarded record of current
//!   known connectivity. Reads return a consistent snapshot.
//! - [`ConnectivityCallback`] — translates each platform notification into a
//!   single field update on the holder plus a diagnostic trace.
//! - [`ConnectivityMonitor`] — owns the platform subscription and derives
//!   [`ConnectivityEvent`]s from interface changes.
//!
//! Control flow is one-way: platform → callback → holder. The callback never
//! reads state back.
//!
//! # Example
//!
//! ```ignore
//! use horizon_netstate::ConnectivityMonitor;
//!
//! let monitor = ConnectivityMonitor::new();
//! monitor.start()?;
//!
//! // Hand read access to another component.
//! let holder = monitor.holder().clone();
//! std::thread::spawn(move || {
//!     if holder.is_connected() {
//!         let state = holder.snapshot();
//!         println!("online: {:?}", state.link_properties);
//!     }
//! });
//! ```
//!
//! # Driving events directly
//!
//! Embedders with their own platform bindings can skip the monitor and feed
//! notifications straight through the adapter:
//!
//! ```
//! use horizon_netstate::{
//!     ConnectivityCallback, ConnectivityEvent, ConnectivityStateHolder, NetworkHandle,
//! };
//!
//! let holder = ConnectivityStateHolder::new();
//! let callback = ConnectivityCallback::new(holder.clone());
//!
//! callback.handle_event(ConnectivityEvent::Available(NetworkHandle(1)));
//! assert!(holder.is_connected());
//! ```

mod callback;
mod error;
mod event;
mod monitor;
mod state;

pub use callback::ConnectivityCallback;
pub use error::{ConnectivityError, Result};
pub use event::{
    ConnectivityEvent, LinkProperties, NetworkCapabilities, NetworkHandle, Transport,
};
pub use monitor::ConnectivityMonitor;
pub use state::{ConnectivityState, ConnectivityStateHolder};
