//! DNS caching module

mod cache;
mod hickory;
mod hostname;
mod receiver;
pub(crate) mod resolution;
mod threaded;

pub use cache::{CacheStats, CachedHost, HostCache};
pub use hickory::HickoryHostnameResolver;
pub use hostname::{CachingHostnameResolver, HostnameResolver, SystemHostnameResolver};
pub use receiver::CachingResolutionReceiver;
pub use resolution::{
    AddressFamily, BoxResolutionReceiver, HostResolution, ResolutionEvent, ResolutionReceiver,
    ResolutionRequest, TransportSemantics,
};
pub use threaded::{
    CachingThreadedResolver, SimpleResolver, ThreadedResolver, DEFAULT_LOOKUP_TIMEOUT,
};
