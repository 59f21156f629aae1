//! Crawl DNS cache - caching layer in front of hostname resolution
//!
//! Serves repeated lookups for hosts a crawler revisits from a bounded,
//! process-wide in-memory cache:
//! - `HostCache`: FIFO-bounded hostname cache shared by both resolvers
//! - `CachingThreadedResolver`: single address, cache first, enforced timeout
//! - `CachingHostnameResolver`: multi-address streaming lookups, IPv6 preferred,
//!   installed on the `Reactor` in place of its original name resolver
//!
//! # Architecture
//!
//! ```text
//!   caller ──> CachingHostnameResolver ──hit──> cached HostResolution
//!                     │ miss
//!                     v
//!          CachingResolutionReceiver (wraps caller receiver)
//!                     │
//!                     v
//!          original resolver (system / hickory) ──events──> receiver
//!                                                             │
//!                                        HostCache <──────────┘ on complete
//! ```
//!
//! The cache is meant to be built once and shared by every facade:
//!
//! ```no_run
//! use std::sync::Arc;
//! use crawl_dnscache::{CachingHostnameResolver, DnsCacheConfig, HostCache, Reactor};
//!
//! # async fn run() -> crawl_dnscache::Result<()> {
//! let config = DnsCacheConfig::default();
//! let reactor = Reactor::current()?;
//! let cache = Arc::new(HostCache::default());
//! let resolver = Arc::new(CachingHostnameResolver::from_config(&config, &reactor, cache));
//! resolver.install_on_reactor(&reactor);
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod dns;
pub mod reactor;

pub use common::error::{Error, Result};
pub use config::DnsCacheConfig;
pub use dns::{
    AddressFamily, BoxResolutionReceiver, CacheStats, CachedHost, CachingHostnameResolver,
    CachingResolutionReceiver, CachingThreadedResolver, HickoryHostnameResolver, HostCache,
    HostResolution, HostnameResolver, ResolutionEvent, ResolutionReceiver, ResolutionRequest,
    SimpleResolver, SystemHostnameResolver, ThreadedResolver, TransportSemantics,
};
pub use reactor::Reactor;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.3.0");
    }
}
