//! Scope patterns: an optional `*.` wildcard, a hostname, and an optional
//! path prefix. A scope defines the URL territory of an installed site.

mod domain;
mod naming;
mod rank;

#[cfg(test)]
mod tests;

pub use domain::{domains_equal, registrable_domain, subdomain_labels};
pub use rank::{first_match, rank};

use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taskbar_common::{SiteError, SiteId};
use twox_hash::XxHash32;
use url::Url;

/// Knobs that change how a scope's hostname part is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Let `*.example.com` also match `example.com` itself.
    pub wildcard_includes_apex: bool,
}

impl MatchOptions {
    /// Wildcards match proper subdomains only.
    pub fn strict() -> Self {
        Self {
            wildcard_includes_apex: false,
        }
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            wildcard_includes_apex: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope {
    /// Normalized text form; the site id is derived from it.
    raw: String,
    wildcard: bool,
    host: String,
    path: Option<String>,
}

impl Scope {
    /// Parse and normalize a scope pattern. The hostname is lowercased; the
    /// path prefix is kept verbatim.
    pub fn parse(input: &str) -> Result<Self, SiteError> {
        let trimmed = input.trim();
        let invalid = |reason: &str| SiteError::InvalidScope {
            scope: input.to_string(),
            reason: reason.to_string(),
        };

        let (wildcard, rest) = match trimmed.strip_prefix("*.") {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (host, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], Some(&rest[idx..])),
            None => (rest, None),
        };

        let host = host.to_ascii_lowercase();
        if host.is_empty() {
            return Err(invalid("missing hostname"));
        }
        if host.starts_with('.') || host.ends_with('.') || host.contains("..") {
            return Err(invalid("malformed hostname"));
        }
        if !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
        {
            return Err(invalid("hostname contains invalid characters"));
        }
        if let Some(path) = path {
            if path.chars().any(|c| c.is_whitespace() || c == '?' || c == '#') {
                return Err(invalid("path contains invalid characters"));
            }
        }

        let mut raw = String::with_capacity(trimmed.len());
        if wildcard {
            raw.push_str("*.");
        }
        raw.push_str(&host);
        if let Some(path) = path {
            raw.push_str(path);
        }

        Ok(Self {
            raw,
            wildcard,
            host,
            path: path.map(str::to_string),
        })
    }

    /// Default scope for a page: `*.` plus its hostname without `www.`.
    pub fn for_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        Self::parse(&format!("*.{host}")).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Hostname part with the wildcard stripped.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Whether `url` falls inside this scope.
    ///
    /// A wildcard scope matches proper subdomains of its hostname, and the
    /// hostname itself only when `wildcard_includes_apex` is set. A path prefix must match the start of
    /// the URL path; without one any path matches.
    pub fn matches(&self, url: &Url, options: MatchOptions) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };

        let host_matches = if self.wildcard {
            match host.strip_suffix(self.host.as_str()) {
                Some("") => options.wildcard_includes_apex,
                Some(prefix) => prefix.ends_with('.'),
                None => false,
            }
        } else {
            host == self.host
        };

        host_matches
            && self
                .path
                .as_deref()
                .map_or(true, |prefix| url.path().starts_with(prefix))
    }

    /// Like [`Scope::matches`] for an unparsed URL; unparseable URLs never match.
    pub fn matches_str(&self, url: &str, options: MatchOptions) -> bool {
        Url::parse(url).is_ok_and(|url| self.matches(&url, options))
    }

    /// Root page of the scope, used as the homepage of a new site.
    pub fn homepage(&self) -> String {
        format!("https://{}{}", self.host, self.path.as_deref().unwrap_or(""))
    }

    /// Stable identifier: 32-bit xxHash of the normalized text, in decimal.
    pub fn site_id(&self) -> SiteId {
        let mut hasher = XxHash32::with_seed(0);
        hasher.write(self.raw.as_bytes());
        SiteId::from((hasher.finish() as u32).to_string())
    }

    /// Human readable name derived from the hostname and path.
    pub fn display_name(&self) -> String {
        naming::display_name(self)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Scope {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Scope {
    type Error = SiteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.raw
    }
}
