use std::cmp::Ordering;

use taskbar_common::SiteId;
use url::Url;

use super::domain::subdomain_labels;
use super::{MatchOptions, Scope};

/// Order scopes most-specific-first:
/// more subdomain labels, then non-wildcard before wildcard, then longer path
/// prefix. Ties keep their input order.
pub fn rank<'a, I>(scopes: I) -> Vec<(SiteId, Scope)>
where
    I: IntoIterator<Item = (&'a SiteId, &'a Scope)>,
{
    let mut ranked: Vec<(SiteId, Scope)> = scopes
        .into_iter()
        .map(|(id, scope)| (id.clone(), scope.clone()))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| specificity(a, b));
    ranked
}

fn specificity(a: &Scope, b: &Scope) -> Ordering {
    let labels_a = subdomain_labels(a.host()).len();
    let labels_b = subdomain_labels(b.host()).len();
    labels_b
        .cmp(&labels_a)
        .then_with(|| a.is_wildcard().cmp(&b.is_wildcard()))
        .then_with(|| {
            let len_a = a.path().map_or(0, str::len);
            let len_b = b.path().map_or(0, str::len);
            len_b.cmp(&len_a)
        })
}

/// First site in `ranked` whose scope contains `url`.
pub fn first_match<'a>(
    url: &Url,
    ranked: &'a [(SiteId, Scope)],
    options: MatchOptions,
) -> Option<&'a SiteId> {
    ranked
        .iter()
        .find(|(_, scope)| scope.matches(url, options))
        .map(|(id, _)| id)
}
