//! Caching resolution receiver
//!
//! Wraps the caller's receiver for one streaming lookup. IPv6 addresses are
//! forwarded as they arrive; IPv4 addresses are held back until completion and
//! only the first one is forwarded, and only if no IPv6 address was seen. The
//! resolution handle is cached at completion when at least one address was
//! observed.

use super::{
    AddressFamily, BoxResolutionReceiver, CachedHost, HostCache, HostResolution,
    ResolutionEvent, ResolutionReceiver,
};
use crate::{Error, Result};
use std::mem;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

enum ReceiverState {
    Idle,
    Began {
        resolution: Arc<HostResolution>,
        ipv4_addresses: Vec<SocketAddr>,
        ipv6_forwarded: bool,
    },
    Completed,
}

impl ReceiverState {
    fn name(&self) -> &'static str {
        match self {
            ReceiverState::Idle => "idle",
            ReceiverState::Began { .. } => "began",
            ReceiverState::Completed => "completed",
        }
    }
}

/// Receiver adapter installed in place of the caller's receiver on a cache miss
pub struct CachingResolutionReceiver {
    inner: BoxResolutionReceiver,
    host_name: String,
    cache: Arc<HostCache>,
    state: ReceiverState,
}

impl CachingResolutionReceiver {
    pub fn new(inner: BoxResolutionReceiver, host_name: String, cache: Arc<HostCache>) -> Self {
        CachingResolutionReceiver {
            inner,
            host_name,
            cache,
            state: ReceiverState::Idle,
        }
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, ReceiverState::Completed)
    }

    /// Apply one event.
    ///
    /// Events out of order are rejected with `Error::Receiver` and leave both
    /// the state and the wrapped receiver untouched.
    pub fn handle_event(&mut self, event: ResolutionEvent) -> Result<()> {
        match event {
            ResolutionEvent::Began(resolution) => self.began(resolution),
            ResolutionEvent::AddressResolved(address) => self.address_seen(address),
            ResolutionEvent::Complete => self.complete(),
        }
    }

    fn began(&mut self, resolution: Arc<HostResolution>) -> Result<()> {
        if !matches!(self.state, ReceiverState::Idle) {
            return Err(self.out_of_order("began"));
        }

        self.inner.resolution_began(Arc::clone(&resolution));
        self.state = ReceiverState::Began {
            resolution,
            ipv4_addresses: Vec::new(),
            ipv6_forwarded: false,
        };
        Ok(())
    }

    fn address_seen(&mut self, address: SocketAddr) -> Result<()> {
        let ReceiverState::Began {
            resolution,
            ipv4_addresses,
            ipv6_forwarded,
        } = &mut self.state
        else {
            return Err(self.out_of_order("address"));
        };

        resolution.record(address);
        match AddressFamily::of(&address) {
            AddressFamily::V6 => {
                debug!("{} -> {} forwarded", self.host_name, address);
                self.inner.address_resolved(address);
                *ipv6_forwarded = true;
            }
            AddressFamily::V4 => {
                debug!("{} -> {} held back", self.host_name, address);
                ipv4_addresses.push(address);
            }
        }
        Ok(())
    }

    fn complete(&mut self) -> Result<()> {
        if !matches!(self.state, ReceiverState::Began { .. }) {
            return Err(self.out_of_order("complete"));
        }
        let ReceiverState::Began {
            resolution,
            ipv4_addresses,
            ipv6_forwarded,
        } = mem::replace(&mut self.state, ReceiverState::Completed)
        else {
            return Err(Error::internal("receiver state changed during completion"));
        };

        resolution.finish();
        if ipv6_forwarded {
            self.store(resolution);
        } else if let Some(first) = ipv4_addresses.first() {
            debug!("{} -> {} forwarded (IPv4 fallback)", self.host_name, first);
            self.inner.address_resolved(*first);
            self.store(resolution);
        } else {
            debug!("{} resolved to no address, not cached", self.host_name);
        }

        self.inner.resolution_complete();
        Ok(())
    }

    fn store(&self, resolution: Arc<HostResolution>) {
        debug!("DNS cache store {}", self.host_name);
        self.cache
            .put(self.host_name.clone(), CachedHost::Resolution(resolution));
    }

    fn out_of_order(&self, event: &str) -> Error {
        Error::receiver(format!(
            "{} event for {} while {}",
            event,
            self.host_name,
            self.state.name()
        ))
    }
}

impl ResolutionReceiver for CachingResolutionReceiver {
    fn resolution_began(&mut self, resolution: Arc<HostResolution>) {
        if let Err(e) = self.began(resolution) {
            warn!("Dropped resolution event: {}", e);
        }
    }

    fn address_resolved(&mut self, address: SocketAddr) {
        if let Err(e) = self.address_seen(address) {
            warn!("Dropped resolution event: {}", e);
        }
    }

    fn resolution_complete(&mut self) {
        if let Err(e) = self.complete() {
            warn!("Dropped resolution event: {}", e);
        }
    }
}
