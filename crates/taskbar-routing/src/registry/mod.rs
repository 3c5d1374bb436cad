//! The Site Registry: installed sites plus their specificity-ranked index.

use std::collections::BTreeMap;

use taskbar_common::{SiteError, SiteId};
use tracing::debug;
use url::Url;

use crate::scope::{self, MatchOptions, Scope};
use crate::site::{validate_display_name, Site, SitePatch};

/// Owns every installed [`Site`]. The ranked index is rebuilt on each
/// mutation and never computed per lookup.
#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: BTreeMap<SiteId, Site>,
    ranked: Vec<(SiteId, Scope)>,
    options: MatchOptions,
}

impl SiteRegistry {
    pub fn new(options: MatchOptions) -> Self {
        Self {
            sites: BTreeMap::new(),
            ranked: Vec::new(),
            options,
        }
    }

    /// Replace the whole registry, e.g. with the persisted set at startup.
    /// Later entries with a duplicate id are dropped.
    pub fn load(&mut self, sites: Vec<Site>) {
        self.sites.clear();
        for site in sites {
            if self.sites.contains_key(&site.id) {
                debug!(site = %site.id, "dropping duplicate persisted site");
                continue;
            }
            self.sites.insert(site.id.clone(), site);
        }
        self.rerank();
    }

    // -- Accessors --

    pub fn get(&self, id: &SiteId) -> Option<&Site> {
        self.sites.get(id)
    }

    pub fn contains(&self, id: &SiteId) -> bool {
        self.sites.contains_key(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Site ids, most specific scope first.
    pub fn ranked_ids(&self) -> impl Iterator<Item = &SiteId> {
        self.ranked.iter().map(|(id, _)| id)
    }

    /// The most specific installed site whose scope contains `url`.
    pub fn first_match(&self, url: &Url) -> Option<&Site> {
        scope::first_match(url, &self.ranked, self.options).and_then(|id| self.sites.get(id))
    }

    /// Whether `url` is inside the scope of site `id`.
    pub fn in_scope(&self, id: &SiteId, url: &Url) -> bool {
        self.sites
            .get(id)
            .is_some_and(|site| site.scope.matches(url, self.options))
    }

    /// Check that `scope` could be installed: its id must be free, and an id
    /// held by a different scope is a hash collision.
    pub fn check_available(&self, scope: &Scope) -> Result<SiteId, SiteError> {
        let id = scope.site_id();
        match self.sites.get(&id) {
            None => Ok(id),
            Some(existing) if existing.scope == *scope => Err(SiteError::AlreadyInstalled(id)),
            Some(existing) => Err(SiteError::IdCollision {
                scope: scope.to_string(),
                existing: id,
                existing_scope: existing.scope.to_string(),
            }),
        }
    }

    // -- Mutations --

    pub fn install(&mut self, site: Site) -> Result<(), SiteError> {
        self.check_available(&site.scope)?;
        validate_display_name(&site.display_name)?;
        debug!(site = %site.id, scope = %site.scope, "installing site");
        self.sites.insert(site.id.clone(), site);
        self.rerank();
        Ok(())
    }

    /// Apply an allow-listed patch. Every field is validated before any is
    /// written, so a rejected patch leaves the site untouched.
    pub fn update(&mut self, id: &SiteId, patch: SitePatch) -> Result<&Site, SiteError> {
        let site = self
            .sites
            .get(id)
            .ok_or_else(|| SiteError::NotInstalled(id.clone()))?;

        if let Some(name) = &patch.display_name {
            validate_display_name(name)?;
        }
        let homepage = match &patch.homepage {
            Some(homepage) => {
                let trimmed = homepage.trim();
                let in_scope = Url::parse(trimmed)
                    .is_ok_and(|url| site.scope.matches(&url, self.options));
                if !in_scope {
                    return Err(SiteError::HomepageOutOfScope {
                        homepage: homepage.clone(),
                        scope: site.scope.to_string(),
                    });
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let Some(site) = self.sites.get_mut(id) else {
            return Err(SiteError::NotInstalled(id.clone()));
        };
        if let Some(name) = patch.display_name {
            site.display_name = name.trim().to_string();
        }
        if let Some(homepage) = homepage {
            site.homepage = homepage;
        }
        if let Some(behavior) = patch.link_behavior {
            site.link_behavior = behavior;
        }
        if let Some(launch) = patch.launch_with_host {
            site.launch_with_host = launch;
        }
        if let Some(new_tab) = patch.new_tab_homepage {
            site.new_tab_homepage = new_tab;
        }

        self.rerank();
        self.sites
            .get(id)
            .ok_or_else(|| SiteError::NotInstalled(id.clone()))
    }

    pub fn set_pinned(&mut self, id: &SiteId, pinned: bool) -> bool {
        match self.sites.get_mut(id) {
            Some(site) if site.pinned != pinned => {
                site.pinned = pinned;
                true
            }
            _ => false,
        }
    }

    pub fn set_icon(&mut self, id: &SiteId, icon: Option<String>) {
        if let Some(site) = self.sites.get_mut(id) {
            site.icon = icon;
        }
    }

    pub fn uninstall(&mut self, id: &SiteId) -> Option<Site> {
        let removed = self.sites.remove(id);
        if removed.is_some() {
            debug!(site = %id, "uninstalled site");
            self.rerank();
        }
        removed
    }

    fn rerank(&mut self) {
        self.ranked = scope::rank(self.sites.iter().map(|(id, site)| (id, &site.scope)));
    }
}
