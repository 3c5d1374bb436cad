use std::sync::LazyLock;

use regex::Regex;

use super::domain::{registrable_domain, subdomain_labels};
use super::Scope;

static RESERVED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).unwrap());
static WORD_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w").unwrap());

/// `*.mail.example.com/inbox` -> `Example Mail Inbox`.
pub(super) fn display_name(scope: &Scope) -> String {
    let host = scope.host();
    let mut parts: Vec<&str> = subdomain_labels(host);
    match registrable_domain(host) {
        Some(domain) => parts.push(domain.split('.').next().unwrap_or(domain)),
        None => parts.push(host),
    }
    if parts.first() == Some(&"www") {
        parts.remove(0);
    }

    let mut name = parts
        .iter()
        .rev()
        .map(|part| capitalize(part))
        .collect::<Vec<_>>()
        .join(" ");
    name.push_str(scope.path().unwrap_or("/"));

    let name = RESERVED_RE.replace_all(&name, " ");
    let name = WORD_START_RE.replace_all(&name, |caps: &regex::Captures| caps[0].to_uppercase());
    name.trim().to_string()
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
