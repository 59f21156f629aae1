//! Single-address resolution with caching and an enforced timeout

use super::{CachedHost, HostCache};
use crate::config::DnsCacheConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::lookup_host;
use tracing::{debug, info};

/// Timeout used when a caller passes none
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(60);

/// Single-address resolution primitive
#[async_trait]
pub trait SimpleResolver: Send + Sync {
    async fn get_host_by_name(&self, name: &str, timeout: Option<Duration>) -> Result<IpAddr>;
}

/// Blocking getaddrinfo on tokio's worker pool, first IPv4 address wins
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadedResolver;

#[async_trait]
impl SimpleResolver for ThreadedResolver {
    async fn get_host_by_name(&self, name: &str, timeout: Option<Duration>) -> Result<IpAddr> {
        let timeout = timeout.unwrap_or(DEFAULT_LOOKUP_TIMEOUT);
        let addrs = tokio::time::timeout(timeout, lookup_host((name, 0u16)))
            .await
            .map_err(|_| Error::timeout(format!("Lookup of {} exceeded {:?}", name, timeout)))?
            .map_err(|e| Error::dns(format!("Failed to resolve {}: {}", name, e)))?;

        addrs
            .map(|addr| addr.ip())
            .find(IpAddr::is_ipv4)
            .ok_or_else(|| Error::dns(format!("No IPv4 address found for {}", name)))
    }
}

/// Threaded resolver fronted by the shared host cache
pub struct CachingThreadedResolver {
    inner: Arc<dyn SimpleResolver>,
    cache: Arc<HostCache>,
    timeout: Duration,
}

impl CachingThreadedResolver {
    pub fn new(cache: Arc<HostCache>, cache_size: usize, timeout: Duration) -> Self {
        Self::with_resolver(Arc::new(ThreadedResolver), cache, cache_size, timeout)
    }

    pub fn with_resolver(
        inner: Arc<dyn SimpleResolver>,
        cache: Arc<HostCache>,
        cache_size: usize,
        timeout: Duration,
    ) -> Self {
        cache.set_limit(cache_size);
        info!("Caching threaded resolver ready (timeout {:?})", timeout);
        CachingThreadedResolver {
            inner,
            cache,
            timeout,
        }
    }

    pub fn from_config(config: &DnsCacheConfig, cache: Arc<HostCache>) -> Self {
        Self::new(cache, config.cache_size(), config.timeout())
    }

    /// Resolve `name` to one address
    pub async fn resolve(&self, name: &str) -> Result<IpAddr> {
        self.get_host_by_name(name, None).await
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cache(&self) -> &Arc<HostCache> {
        &self.cache
    }
}

#[async_trait]
impl SimpleResolver for CachingThreadedResolver {
    /// The caller's `timeout` is ignored; the configured timeout always applies.
    async fn get_host_by_name(&self, name: &str, _timeout: Option<Duration>) -> Result<IpAddr> {
        if let Some(CachedHost::Address(ip)) = self.cache.get(name) {
            debug!("DNS {} -> {} (cache)", name, ip);
            return Ok(ip);
        }

        let ip = self.inner.get_host_by_name(name, Some(self.timeout)).await?;

        if self.cache.is_enabled() {
            self.cache.put(name.to_string(), CachedHost::Address(ip));
        }
        debug!("DNS {} -> {}", name, ip);
        Ok(ip)
    }
}
