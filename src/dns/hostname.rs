//! Streaming hostname resolution with caching

use super::{
    BoxResolutionReceiver, CachedHost, CachingResolutionReceiver, HostCache, HostResolution,
    ResolutionRequest,
};
use crate::config::DnsCacheConfig;
use crate::reactor::Reactor;
use std::sync::Arc;
use tokio::net::lookup_host;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// Multi-address resolution primitive.
///
/// Returns the lookup handle immediately and drives `receiver` through
/// began, zero or more addresses, then complete.
pub trait HostnameResolver: Send + Sync {
    fn resolve_host_name(
        &self,
        receiver: BoxResolutionReceiver,
        request: ResolutionRequest,
    ) -> Arc<HostResolution>;
}

/// System resolver: getaddrinfo on tokio's blocking pool
pub struct SystemHostnameResolver {
    handle: Handle,
}

impl SystemHostnameResolver {
    pub fn new(handle: Handle) -> Self {
        SystemHostnameResolver { handle }
    }
}

impl HostnameResolver for SystemHostnameResolver {
    fn resolve_host_name(
        &self,
        mut receiver: BoxResolutionReceiver,
        request: ResolutionRequest,
    ) -> Arc<HostResolution> {
        let resolution = HostResolution::new(request.host_name.clone());
        receiver.resolution_began(Arc::clone(&resolution));

        self.handle.spawn(async move {
            match lookup_host((request.host_name.as_str(), request.port)).await {
                Ok(addrs) => {
                    for address in addrs.filter(|a| request.accepts(a)) {
                        receiver.address_resolved(address);
                    }
                }
                Err(e) => {
                    debug!("System lookup failed for {}: {}", request.host_name, e);
                }
            }
            receiver.resolution_complete();
        });

        resolution
    }
}

/// Hostname resolver that serves repeated lookups from the shared cache
pub struct CachingHostnameResolver {
    original_resolver: Arc<dyn HostnameResolver>,
    cache: Arc<HostCache>,
}

impl CachingHostnameResolver {
    /// Wrap the reactor's current name resolver and set the cache limit
    pub fn new(reactor: &Reactor, cache: Arc<HostCache>, cache_size: usize) -> Self {
        cache.set_limit(cache_size);
        CachingHostnameResolver {
            original_resolver: reactor.name_resolver(),
            cache,
        }
    }

    pub fn from_config(config: &DnsCacheConfig, reactor: &Reactor, cache: Arc<HostCache>) -> Self {
        Self::new(reactor, cache, config.cache_size())
    }

    /// Make this resolver the reactor's active name resolver
    pub fn install_on_reactor(self: &Arc<Self>, reactor: &Reactor) {
        reactor.install_name_resolver(Arc::clone(self) as Arc<dyn HostnameResolver>);
        info!(
            "Caching hostname resolver installed (cache limit {})",
            self.cache.limit()
        );
    }

    pub fn cache(&self) -> &Arc<HostCache> {
        &self.cache
    }

    pub fn original_resolver(&self) -> &Arc<dyn HostnameResolver> {
        &self.original_resolver
    }
}

impl HostnameResolver for CachingHostnameResolver {
    /// On a hit the cached handle is returned and `receiver` is never called.
    ///
    /// Concurrent misses for one hostname are not merged; each reaches the
    /// original resolver and the last completion wins the cache slot.
    fn resolve_host_name(
        &self,
        receiver: BoxResolutionReceiver,
        request: ResolutionRequest,
    ) -> Arc<HostResolution> {
        if let Some(CachedHost::Resolution(resolution)) = self.cache.get(&request.host_name) {
            debug!("DNS {} (cache)", request.host_name);
            return resolution;
        }

        debug!(
            "DNS {} cache miss, resolving port {} over {}",
            request.host_name, request.port, request.transport
        );
        let receiver = CachingResolutionReceiver::new(
            receiver,
            request.host_name.clone(),
            Arc::clone(&self.cache),
        );
        self.original_resolver
            .resolve_host_name(Box::new(receiver), request)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Primitive that replays a fixed address list synchronously
    pub struct ScriptedHostnameResolver {
        pub addresses: Vec<SocketAddr>,
        pub calls: AtomicUsize,
    }

    impl ScriptedHostnameResolver {
        pub fn new(addresses: Vec<SocketAddr>) -> Arc<Self> {
            Arc::new(ScriptedHostnameResolver {
                addresses,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HostnameResolver for ScriptedHostnameResolver {
        fn resolve_host_name(
            &self,
            mut receiver: BoxResolutionReceiver,
            request: ResolutionRequest,
        ) -> Arc<HostResolution> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let resolution = HostResolution::new(request.host_name.clone());
            receiver.resolution_began(Arc::clone(&resolution));
            for address in self.addresses.iter().filter(|a| request.accepts(a)) {
                receiver.address_resolved(*address);
            }
            receiver.resolution_complete();
            resolution
        }
    }
}
