//! Host cache benchmarks
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use crawl_dnscache::{CachedHost, HostCache};
use std::net::{IpAddr, Ipv4Addr};

fn bench_host_cache(c: &mut Criterion) {
    let cache = HostCache::new(10000);
    for i in 0..10000u32 {
        let ip = IpAddr::V4(Ipv4Addr::from(i));
        cache.put(format!("host{}.example.com", i), CachedHost::Address(ip));
    }

    let mut group = c.benchmark_group("host_cache");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit", |b| {
        b.iter(|| black_box(cache.get("host4242.example.com")))
    });

    group.bench_function("get_miss", |b| {
        b.iter(|| black_box(cache.get("unknown.example.net")))
    });

    // Every put evicts the oldest entry once the cache is full
    group.bench_function("put_evict", |b| {
        let mut i = 10000u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            cache.put(
                format!("host{}.example.com", i),
                CachedHost::Address(IpAddr::V4(Ipv4Addr::from(i))),
            );
        })
    });

    group.finish();
}

criterion_group!(benches, bench_host_cache);
criterion_main!(benches);
