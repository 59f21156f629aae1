//! Hostname resolution through hickory-resolver

use super::{BoxResolutionReceiver, HostResolution, HostnameResolver, ResolutionRequest};
use crate::Result;
use hickory_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// Streaming primitive backed by an async DNS client instead of getaddrinfo
pub struct HickoryHostnameResolver {
    resolver: TokioAsyncResolver,
    handle: Handle,
}

impl HickoryHostnameResolver {
    /// Build from explicit upstream configuration
    pub fn new(handle: Handle, config: ResolverConfig, timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        Self::tune(&mut opts, timeout);
        Self::build(handle, config, opts)
    }

    /// Build from the system's resolv.conf (or platform equivalent)
    pub fn from_system_conf(handle: Handle, timeout: Duration) -> Result<Self> {
        let (config, mut opts) = hickory_resolver::system_conf::read_system_conf()?;
        Self::tune(&mut opts, timeout);
        Ok(Self::build(handle, config, opts))
    }

    fn tune(opts: &mut ResolverOpts, timeout: Duration) {
        opts.cache_size = 0; // We use our own cache
        opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
        opts.timeout = timeout;
    }

    fn build(handle: Handle, config: ResolverConfig, opts: ResolverOpts) -> Self {
        let _guard = handle.enter();
        let resolver = TokioAsyncResolver::tokio(config, opts);
        HickoryHostnameResolver { resolver, handle }
    }
}

impl HostnameResolver for HickoryHostnameResolver {
    fn resolve_host_name(
        &self,
        mut receiver: BoxResolutionReceiver,
        request: ResolutionRequest,
    ) -> Arc<HostResolution> {
        let resolution = HostResolution::new(request.host_name.clone());
        receiver.resolution_began(Arc::clone(&resolution));

        let resolver = self.resolver.clone();
        self.handle.spawn(async move {
            match resolver.lookup_ip(request.host_name.as_str()).await {
                Ok(lookup) => {
                    for ip in lookup.iter() {
                        let address = SocketAddr::new(ip, request.port);
                        if request.accepts(&address) {
                            receiver.address_resolved(address);
                        }
                    }
                }
                Err(e) => {
                    debug!("Hickory lookup failed for {}: {}", request.host_name, e);
                }
            }
            receiver.resolution_complete();
        });

        resolution
    }
}
