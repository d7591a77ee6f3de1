// src/infrastructure/net.rs
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, ToSocketAddrs};

use tracing::{debug, instrument};
use url::{Host, Url};

use crate::domain::metadata::ReachabilityGuard;
use crate::domain::url::is_fetchable_scheme;

/// Fail-closed reachability guard. A URL passes only when its scheme is
/// http(s), a host is present, and every address that host stands for is
/// globally routable. Hostnames are resolved to ALL their addresses; a
/// name that round-robins between a public and an internal address must
/// not slip through on a lucky draw.
#[derive(Debug, Clone, Default)]
pub struct DnsReachabilityGuard;

impl DnsReachabilityGuard {
    pub fn new() -> Self {
        Self
    }
}

impl ReachabilityGuard for DnsReachabilityGuard {
    #[instrument(skip(self), level = "debug")]
    fn is_safe(&self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Rejecting unparseable URL: {}", e);
                return false;
            }
        };

        if !is_fetchable_scheme(parsed.scheme()) {
            debug!("Rejecting scheme {:?}", parsed.scheme());
            return false;
        }

        match parsed.host() {
            Some(Host::Ipv4(addr)) => ipv4_is_global(&addr),
            Some(Host::Ipv6(addr)) => ipv6_is_global(&addr),
            Some(Host::Domain(domain)) => resolves_only_to_global(domain),
            None => false,
        }
    }
}

fn resolves_only_to_global(domain: &str) -> bool {
    // Port 0: the lookup is about addresses, not services.
    match (domain, 0u16).to_socket_addrs() {
        Ok(addrs) => {
            let mut resolved_any = false;
            for addr in addrs {
                resolved_any = true;
                if !ip_is_global(&addr.ip()) {
                    debug!("Rejecting {}: resolves to {}", domain, addr.ip());
                    return false;
                }
            }
            resolved_any
        }
        Err(e) => {
            debug!("Rejecting {}: resolution failed: {}", domain, e);
            false
        }
    }
}

pub(crate) fn ip_is_global(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => ipv4_is_global(v4),
        IpAddr::V6(v6) => ipv6_is_global(v6),
    }
}

/// Standard-allocation classification on stable Rust (`IpAddr::is_global`
/// is not stabilized). Rejects everything that is not publicly routable,
/// multicast included.
fn ipv4_is_global(addr: &Ipv4Addr) -> bool {
    let octets = addr.octets();
    !(octets[0] == 0 // "this network", includes 0.0.0.0
        || addr.is_private()
        || addr.is_loopback()
        || addr.is_link_local()
        || addr.is_multicast()
        || addr.is_documentation()
        // shared address space for CGNAT, 100.64.0.0/10
        || (octets[0] == 100 && (octets[1] & 0b1100_0000) == 0b0100_0000)
        // protocol assignments, 192.0.0.0/24
        || (octets[0] == 192 && octets[1] == 0 && octets[2] == 0)
        // benchmarking, 198.18.0.0/15
        || (octets[0] == 198 && (octets[1] & 0xfe) == 18)
        // reserved 240.0.0.0/4 and the broadcast address
        || octets[0] >= 240)
}

fn ipv6_is_global(addr: &Ipv6Addr) -> bool {
    if let Some(mapped) = addr.to_ipv4_mapped() {
        return ipv4_is_global(&mapped);
    }

    let segments = addr.segments();
    !(addr.is_unspecified()
        || addr.is_loopback()
        || addr.is_multicast()
        // unique local, fc00::/7
        || (segments[0] & 0xfe00) == 0xfc00
        // unicast link local, fe80::/10
        || (segments[0] & 0xffc0) == 0xfe80
        // documentation, 2001:db8::/32
        || (segments[0] == 0x2001 && segments[1] == 0xdb8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> DnsReachabilityGuard {
        DnsReachabilityGuard::new()
    }

    #[test]
    fn given_private_and_special_ipv4_literals_when_checked_then_rejected() {
        let unsafe_urls = [
            "http://127.0.0.1/x",
            "http://10.0.0.1/",
            "http://192.168.1.10/admin",
            "http://172.16.5.5/",
            "http://169.254.169.254/latest/meta-data",
            "http://0.0.0.0/",
            "http://100.64.1.1/",
            "http://192.0.0.1/",
            "http://198.18.0.1/",
            "http://224.0.0.1/",
            "http://240.0.0.1/",
            "http://255.255.255.255/",
        ];
        for url in unsafe_urls {
            assert!(!guard().is_safe(url), "expected unsafe: {}", url);
        }
    }

    #[test]
    fn given_public_ipv4_literal_when_checked_then_accepted() {
        assert!(guard().is_safe("http://93.184.216.34/sample"));
        assert!(guard().is_safe("https://8.8.8.8/"));
    }

    #[test]
    fn given_special_ipv6_literals_when_checked_then_rejected() {
        let unsafe_urls = [
            "http://[::1]/x",
            "http://[::]/",
            "http://[fe80::1]/",
            "http://[fc00::1]/",
            "http://[fd12:3456::1]/",
            "http://[2001:db8::1]/",
            "http://[ff02::1]/",
            "http://[::ffff:10.0.0.1]/",
        ];
        for url in unsafe_urls {
            assert!(!guard().is_safe(url), "expected unsafe: {}", url);
        }
    }

    #[test]
    fn given_public_ipv6_literal_when_checked_then_accepted() {
        assert!(guard().is_safe("http://[2606:4700:4700::1111]/"));
        assert!(guard().is_safe("http://[::ffff:8.8.8.8]/"));
    }

    #[test]
    fn given_non_http_scheme_when_checked_then_rejected() {
        assert!(!guard().is_safe("file:///etc/passwd"));
        assert!(!guard().is_safe("ftp://93.184.216.34/"));
        assert!(!guard().is_safe("javascript:alert(1)"));
    }

    #[test]
    fn given_garbage_or_hostless_url_when_checked_then_rejected() {
        assert!(!guard().is_safe("not a url"));
        assert!(!guard().is_safe("http://"));
    }

    #[test]
    fn given_unresolvable_hostname_when_checked_then_rejected() {
        // .invalid never resolves (RFC 2606), so this exercises the
        // fail-closed resolution path without real DNS data.
        assert!(!guard().is_safe("http://definitely-not-a-host.invalid/x"));
    }

    #[test]
    fn given_raw_addresses_when_classified_then_matches_allocation_tables() {
        assert!(ip_is_global(&"93.184.216.34".parse().unwrap()));
        assert!(!ip_is_global(&"10.255.255.255".parse().unwrap()));
        assert!(!ip_is_global(&"172.31.0.1".parse().unwrap()));
        assert!(!ip_is_global(&"198.19.255.1".parse().unwrap()));
        assert!(!ip_is_global(&"203.0.113.7".parse().unwrap()));
        assert!(ip_is_global(&"2606:4700:4700::1001".parse().unwrap()));
        assert!(!ip_is_global(&"fe80::dead:beef".parse().unwrap()));
    }
}
