//! Minimal event-loop abstraction
//!
//! Holds the tokio runtime handle that schedules lookups and the name
//! resolver currently installed for the crawl.

use crate::dns::{HostnameResolver, SystemHostnameResolver};
use crate::{Error, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::runtime::Handle;

pub struct Reactor {
    handle: Handle,
    name_resolver: RwLock<Arc<dyn HostnameResolver>>,
}

impl Reactor {
    /// Create a reactor using the system resolver
    pub fn new(handle: Handle) -> Self {
        let resolver = Arc::new(SystemHostnameResolver::new(handle.clone()));
        Self::with_resolver(handle, resolver)
    }

    pub fn with_resolver(handle: Handle, resolver: Arc<dyn HostnameResolver>) -> Self {
        Reactor {
            handle,
            name_resolver: RwLock::new(resolver),
        }
    }

    /// Create a reactor bound to the runtime of the calling task
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current()
            .map_err(|e| Error::internal(format!("No tokio runtime: {}", e)))?;
        Ok(Self::new(handle))
    }

    /// Runtime handle lookups are scheduled on
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Currently installed name resolver
    pub fn name_resolver(&self) -> Arc<dyn HostnameResolver> {
        Arc::clone(&self.name_resolver.read())
    }

    /// Install a new name resolver, returning the previous one
    pub fn install_name_resolver(
        &self,
        resolver: Arc<dyn HostnameResolver>,
    ) -> Arc<dyn HostnameResolver> {
        std::mem::replace(&mut *self.name_resolver.write(), resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{CachingHostnameResolver, HostCache};

    #[test]
    fn test_current_outside_runtime() {
        assert!(matches!(Reactor::current(), Err(Error::Internal(_))));
    }

    #[tokio::test]
    async fn test_handle_schedules_on_runtime() {
        let reactor = Reactor::current().unwrap();
        let joined = reactor.handle().spawn(async { 7 }).await.unwrap();
        assert_eq!(joined, 7);
    }

    #[tokio::test]
    async fn test_install_returns_previous() {
        let reactor = Reactor::current().unwrap();
        let original = reactor.name_resolver();

        let cache = Arc::new(HostCache::new(10));
        let caching = Arc::new(CachingHostnameResolver::new(&reactor, cache, 10));
        assert!(Arc::ptr_eq(caching.original_resolver(), &original));

        let previous = reactor.install_name_resolver(caching.clone());
        assert!(Arc::ptr_eq(&previous, &original));

        let installed = reactor.name_resolver();
        assert!(std::ptr::eq(
            Arc::as_ptr(&installed) as *const u8,
            Arc::as_ptr(&caching) as *const u8
        ));
    }
}
