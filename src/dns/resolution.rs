//! Resolution handles, requests and the receiver capability set

use parking_lot::Mutex;
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Address family of a resolved address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn of(address: &SocketAddr) -> Self {
        if address.is_ipv6() {
            AddressFamily::V6
        } else {
            AddressFamily::V4
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Transport the caller intends to use; advisory only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportSemantics {
    #[default]
    Tcp,
    Udp,
}

impl fmt::Display for TransportSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportSemantics::Tcp => write!(f, "TCP"),
            TransportSemantics::Udp => write!(f, "UDP"),
        }
    }
}

/// A single hostname lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Hostname, also the cache key (case-sensitive)
    pub host_name: String,
    /// Port stamped on resolved addresses
    pub port: u16,
    /// Restrict results to these families; `None` accepts all
    pub address_types: Option<Vec<AddressFamily>>,
    pub transport: TransportSemantics,
}

impl ResolutionRequest {
    pub fn new<S: Into<String>>(host_name: S) -> Self {
        ResolutionRequest {
            host_name: host_name.into(),
            port: 0,
            address_types: None,
            transport: TransportSemantics::Tcp,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_address_types(mut self, types: Vec<AddressFamily>) -> Self {
        self.address_types = Some(types);
        self
    }

    pub fn with_transport(mut self, transport: TransportSemantics) -> Self {
        self.transport = transport;
        self
    }

    /// Check whether an address passes the family filter
    pub fn accepts(&self, address: &SocketAddr) -> bool {
        match &self.address_types {
            Some(types) => types.contains(&AddressFamily::of(address)),
            None => true,
        }
    }
}

/// Handle for one multi-address lookup.
///
/// Created by the resolution primitive when the lookup begins. The caching
/// receiver records every address it observes on the handle, so a handle taken
/// from the cache can be replayed to a new receiver.
pub struct HostResolution {
    name: String,
    addresses: Mutex<Vec<SocketAddr>>,
    complete: AtomicBool,
}

impl HostResolution {
    pub fn new<S: Into<String>>(name: S) -> Arc<Self> {
        Arc::new(HostResolution {
            name: name.into(),
            addresses: Mutex::new(Vec::new()),
            complete: AtomicBool::new(false),
        })
    }

    /// Hostname this lookup was issued for
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every address recorded so far, in delivery order
    pub fn addresses(&self) -> Vec<SocketAddr> {
        self.addresses.lock().clone()
    }

    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    pub(crate) fn record(&self, address: SocketAddr) {
        self.addresses.lock().push(address);
    }

    pub(crate) fn finish(&self) {
        self.complete.store(true, Ordering::Release);
    }

    /// Drive `receiver` through began, every recorded address, then complete
    pub fn replay(self: &Arc<Self>, receiver: &mut dyn ResolutionReceiver) {
        let addresses = self.addresses().into_iter().map(ResolutionEvent::AddressResolved);
        std::iter::once(ResolutionEvent::Began(Arc::clone(self)))
            .chain(addresses)
            .chain(std::iter::once(ResolutionEvent::Complete))
            .for_each(|event| event.deliver(receiver));
    }
}

impl fmt::Debug for HostResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostResolution")
            .field("name", &self.name)
            .field("addresses", &*self.addresses.lock())
            .field("complete", &self.is_complete())
            .finish()
    }
}

/// Capability set a caller implements to observe a streaming lookup.
///
/// A well-behaved primitive calls `resolution_began` once, then
/// `address_resolved` any number of times, then `resolution_complete` once.
pub trait ResolutionReceiver: Send {
    fn resolution_began(&mut self, resolution: Arc<HostResolution>);

    fn address_resolved(&mut self, address: SocketAddr);

    fn resolution_complete(&mut self);
}

pub type BoxResolutionReceiver = Box<dyn ResolutionReceiver>;

/// One receiver callback as a value
#[derive(Debug, Clone)]
pub enum ResolutionEvent {
    Began(Arc<HostResolution>),
    AddressResolved(SocketAddr),
    Complete,
}

impl ResolutionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ResolutionEvent::Began(_) => "began",
            ResolutionEvent::AddressResolved(_) => "address",
            ResolutionEvent::Complete => "complete",
        }
    }

    /// Deliver this event to a receiver
    pub fn deliver(self, receiver: &mut dyn ResolutionReceiver) {
        match self {
            ResolutionEvent::Began(resolution) => receiver.resolution_began(resolution),
            ResolutionEvent::AddressResolved(address) => receiver.address_resolved(address),
            ResolutionEvent::Complete => receiver.resolution_complete(),
        }
    }
}
