use std::collections::HashMap;

use url::Url;

use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::sites::builtin::builtin_profiles;
use crate::sites::profile::SiteProfile;

/// Read-only lookup table of site profiles, built once at startup.
pub struct SiteRegistry {
    profiles: Vec<SiteProfile>,
    by_id: HashMap<String, usize>,
}

impl SiteRegistry {
    /// Registry holding the profiles shipped with the binary.
    pub fn builtin() -> SiteFeedResult<Self> {
        Self::from_profiles(builtin_profiles()?)
    }

    /// Build a registry from `profiles`, in the order given.
    pub fn from_profiles(profiles: Vec<SiteProfile>) -> SiteFeedResult<Self> {
        let mut by_id = HashMap::with_capacity(profiles.len());

        for (index, profile) in profiles.iter().enumerate() {
            let key = profile.id.to_lowercase();
            if by_id.insert(key, index).is_some() {
                return Err(SiteFeedError::Config(format!(
                    "Duplicate site profile: {}",
                    profile.id
                )));
            }
        }

        Ok(Self { profiles, by_id })
    }

    pub fn empty() -> Self {
        Self {
            profiles: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn lookup(&self, site_id: &str) -> SiteFeedResult<&SiteProfile> {
        self.by_id
            .get(&site_id.trim().to_lowercase())
            .map(|&index| &self.profiles[index])
            .ok_or_else(|| SiteFeedError::UnknownSite(site_id.to_string()))
    }

    /// Find the profile whose site matches the host of `url`.
    pub fn find_for_url(&self, url: &str) -> Option<&SiteProfile> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);

        self.by_id.get(host).map(|&index| &self.profiles[index])
    }

    pub fn profiles(&self) -> impl Iterator<Item = &SiteProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::profile::SelectorRules;

    fn profile(id: &str) -> SiteProfile {
        SiteProfile::new(
            id.to_string(),
            format!("{} news", id),
            format!("https://{}", id),
            String::new(),
            SelectorRules::new("article", "h2", "p", "a").unwrap(),
        )
    }

    #[test]
    fn test_lookup_builtin() {
        let registry = SiteRegistry::builtin().unwrap();

        let profile = registry.lookup("a16z.com").unwrap();
        assert_eq!(profile.name, "Andreessen Horowitz");

        let profile = registry.lookup("TechCrunch.com").unwrap();
        assert_eq!(profile.name, "TechCrunch");
    }

    #[test]
    fn test_lookup_unknown_site() {
        let registry = SiteRegistry::builtin().unwrap();
        let result = registry.lookup("example.org");
        assert!(matches!(result, Err(SiteFeedError::UnknownSite(ref s)) if s == "example.org"));
    }

    #[test]
    fn test_find_for_url_matches_host() {
        let registry = SiteRegistry::builtin().unwrap();

        let profile = registry.find_for_url("https://techcrunch.com/latest/").unwrap();
        assert_eq!(profile.id, "techcrunch.com");

        let profile = registry.find_for_url("https://www.a16z.com/news-content/").unwrap();
        assert_eq!(profile.id, "a16z.com");

        assert!(registry.find_for_url("https://example.org/").is_none());
        assert!(registry.find_for_url("not a url").is_none());
    }

    #[test]
    fn test_profiles_keep_registration_order() {
        let registry =
            SiteRegistry::from_profiles(vec![profile("b.example"), profile("a.example")]).unwrap();
        let ids: Vec<&str> = registry.profiles().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b.example", "a.example"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_profiles_rejected() {
        let result = SiteRegistry::from_profiles(vec![profile("a.example"), profile("A.example")]);
        assert!(matches!(result, Err(SiteFeedError::Config(_))));
    }

    #[test]
    fn test_substitute_registry() {
        let registry = SiteRegistry::from_profiles(vec![profile("blog.example")]).unwrap();
        assert!(registry.lookup("blog.example").is_ok());
        assert!(registry.lookup("a16z.com").is_err());
        assert!(SiteRegistry::empty().is_empty());
    }

    #[test]
    fn test_concurrent_lookups() {
        let registry = SiteRegistry::builtin().unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let registry = &registry;
                    scope.spawn(move || {
                        let id = if i % 2 == 0 { "a16z.com" } else { "techcrunch.com" };
                        registry.lookup(id).map(|p| p.id.clone()).unwrap()
                    })
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                let expected = if i % 2 == 0 { "a16z.com" } else { "techcrunch.com" };
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
