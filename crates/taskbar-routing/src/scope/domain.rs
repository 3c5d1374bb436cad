//! Public-suffix-aware domain helpers.

use url::Url;

/// Registrable domain (eTLD+1) of `host`, e.g. `mail.google.co.uk` ->
/// `google.co.uk`. `None` for hosts without one (`localhost`, bare suffixes).
pub fn registrable_domain(host: &str) -> Option<&str> {
    psl::domain_str(host)
}

/// Labels in front of the registrable domain, e.g. `["a", "b"]` for
/// `a.b.example.com`. Hosts without a registrable domain have none.
pub fn subdomain_labels(host: &str) -> Vec<&str> {
    let Some(domain) = registrable_domain(host) else {
        return Vec::new();
    };
    match host.strip_suffix(domain).and_then(|s| s.strip_suffix('.')) {
        Some(prefix) if !prefix.is_empty() => prefix.split('.').collect(),
        _ => Vec::new(),
    }
}

/// Whether two URLs share a registrable domain, ignoring subdomains.
///
/// Hosts without a registrable domain are compared verbatim.
pub fn domains_equal(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => match (registrable_domain(ha), registrable_domain(hb)) {
            (Some(da), Some(db)) => da == db,
            _ => ha == hb,
        },
        _ => false,
    }
}
