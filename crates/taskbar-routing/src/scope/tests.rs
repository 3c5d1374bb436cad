use super::*;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn scope(s: &str) -> Scope {
    Scope::parse(s).unwrap()
}

fn strict() -> MatchOptions {
    MatchOptions::strict()
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parse_splits_wildcard_host_and_path() {
    let s = scope("*.Example.com/app");
    assert!(s.is_wildcard());
    assert_eq!(s.host(), "example.com");
    assert_eq!(s.path(), Some("/app"));
    assert_eq!(s.as_str(), "*.example.com/app");
}

#[test]
fn parse_rejects_malformed_scopes() {
    for bad in ["", "*.", "/path", "exa mple.com", "a..b.com", ".b.com", "b.com/x?y", "*.*.b.com"] {
        assert!(Scope::parse(bad).is_err(), "{bad:?} should be rejected");
    }
}

#[test]
fn scope_serializes_as_string() {
    let s = scope("*.b.com/x");
    assert_eq!(serde_json::to_string(&s).unwrap(), "\"*.b.com/x\"");
    let back: Scope = serde_json::from_str("\"*.b.com/x\"").unwrap();
    assert_eq!(back, s);
    assert!(serde_json::from_str::<Scope>("\"\"").is_err());
}

// =============================================================================
// Matching
// =============================================================================

#[test]
fn wildcard_with_path_matches_subdomain() {
    assert!(scope("*.b.com/x").matches(&url("https://sub.b.com/x/y"), strict()));
}

#[test]
fn strict_wildcard_requires_a_subdomain() {
    let s = scope("*.b.com/x");
    assert!(!s.matches(&url("https://b.com/x"), strict()));
}

#[test]
fn default_wildcard_also_matches_apex() {
    let s = scope("*.b.com/x");
    assert!(s.matches(&url("https://b.com/x"), MatchOptions::default()));
    assert!(!s.matches(&url("https://b.com/y"), MatchOptions::default()));
}

#[test]
fn wildcard_requires_label_boundary() {
    let s = scope("*.b.com");
    assert!(!s.matches(&url("https://evilb.com/"), strict()));
    assert!(s.matches(&url("https://deep.sub.b.com/"), strict()));
}

#[test]
fn exact_host_requires_equality() {
    let s = scope("b.com");
    assert!(s.matches(&url("https://b.com/anything"), strict()));
    assert!(!s.matches(&url("https://www.b.com/"), strict()));
}

#[test]
fn path_prefix_must_match() {
    let s = scope("b.com/x");
    assert!(s.matches(&url("https://b.com/xyz"), strict()));
    assert!(!s.matches(&url("https://b.com/y"), strict()));
}

#[test]
fn unparseable_url_never_matches() {
    assert!(!scope("b.com").matches_str("not a url", strict()));
    assert!(!scope("b.com").matches_str("about:blank", strict()));
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn rank_orders_most_specific_first() {
    let entries: Vec<(SiteId, Scope)> = ["*.b.com", "b.com", "b.com/x", "a.b.com"]
        .iter()
        .map(|s| {
            let sc = scope(s);
            (sc.site_id(), sc)
        })
        .collect();

    let ranked = rank(entries.iter().map(|(id, sc)| (id, sc)));
    let order: Vec<&str> = ranked.iter().map(|(_, s)| s.as_str()).collect();
    assert_eq!(order, vec!["a.b.com", "b.com/x", "b.com", "*.b.com"]);
}

#[test]
fn first_match_picks_ranked_winner_and_is_stable() {
    let broad = scope("*.b.com");
    let narrow = scope("app.b.com");
    let ids = [broad.site_id(), narrow.site_id()];
    let ranked = rank([(&ids[0], &broad), (&ids[1], &narrow)]);

    let target = url("https://app.b.com/home");
    let first = first_match(&target, &ranked, strict()).cloned();
    let second = first_match(&target, &ranked, strict()).cloned();
    assert_eq!(first, Some(narrow.site_id()));
    assert_eq!(first, second);

    assert_eq!(
        first_match(&url("https://other.b.com/"), &ranked, strict()),
        Some(&broad.site_id())
    );
    assert_eq!(first_match(&url("https://c.com/"), &ranked, strict()), None);
}

// =============================================================================
// Derived values
// =============================================================================

#[test]
fn site_id_is_deterministic_and_distinct() {
    assert_eq!(scope("*.b.com").site_id(), scope("*.B.com").site_id());
    assert_ne!(scope("*.b.com").site_id(), scope("*.c.com").site_id());
    assert!(scope("*.b.com").site_id().as_str().parse::<u32>().is_ok());
}

#[test]
fn default_scope_strips_www() {
    let s = Scope::for_url(&url("https://www.example.com/path")).unwrap();
    assert_eq!(s.as_str(), "*.example.com");
    assert_eq!(s.homepage(), "https://example.com");

    let s = Scope::for_url(&url("https://mail.example.com/")).unwrap();
    assert_eq!(s.as_str(), "*.mail.example.com");
    assert!(Scope::for_url(&url("about:blank")).is_none());
}

#[test]
fn homepage_keeps_path() {
    assert_eq!(scope("*.b.com/app").homepage(), "https://b.com/app");
}

#[test]
fn display_name_from_host_and_path() {
    assert_eq!(scope("*.example.com").display_name(), "Example");
    assert_eq!(scope("*.mail.google.com/inbox").display_name(), "Google Mail Inbox");
    assert_eq!(scope("www.example.co.uk").display_name(), "Example");
    assert_eq!(scope("b.com/my-app").display_name(), "B My-App");
}

#[test]
fn domains_equal_ignores_subdomains() {
    assert!(domains_equal(&url("https://login.b.com/"), &url("https://b.com/home")));
    assert!(!domains_equal(&url("https://b.com/"), &url("https://c.com/")));
    assert!(domains_equal(&url("http://localhost:8080/"), &url("http://localhost/x")));
}

#[test]
fn subdomain_labels_respect_public_suffix() {
    assert_eq!(subdomain_labels("a.b.example.co.uk"), vec!["a", "b"]);
    assert!(subdomain_labels("example.com").is_empty());
    assert!(subdomain_labels("localhost").is_empty());
}
