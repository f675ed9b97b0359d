use std::time::Duration;

use log::info;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::cache::IdCache;
use crate::error::ExportError;

const LOOKUP_URL: &str = "https://lookup-id.com/";
const ID_OPEN_TAG: &str = "<span id=\"code\">";
const ID_CLOSE_TAG: &str = "</span>";

/// External id-lookup service. A trait so tests can stub the network.
pub trait IdLookup {
    fn lookup(&self, link: &str) -> Result<String, ExportError>;
}

pub struct LookupClient {
    client: Client,
}

impl LookupClient {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        // lookup-id.com rejects the default reqwest agent.
        headers.insert(USER_AGENT, HeaderValue::from_static("PostmanRuntime/7.29.0"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()
            .expect("Failed to build lookup client");

        LookupClient { client }
    }
}

impl Default for LookupClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IdLookup for LookupClient {
    fn lookup(&self, link: &str) -> Result<String, ExportError> {
        let transport = |e: reqwest::Error| ExportError::LookupTransport {
            link: link.to_string(),
            source: e,
        };

        let response = self
            .client
            .post(LOOKUP_URL)
            .form(&[("fburl", link), ("check", "Lookup")])
            .send()
            .map_err(transport)?;
        let html = response.text().map_err(transport)?;

        let missing = || ExportError::IdMissing {
            link: link.to_string(),
        };
        let open = html.find(ID_OPEN_TAG).ok_or_else(missing)?;
        let start = open + ID_OPEN_TAG.len();
        let len = html[start..].find(ID_CLOSE_TAG).ok_or_else(missing)?;
        Ok(html[start..start + len].to_string())
    }
}

/// Resolves a profile link to its numeric id: cache hit, then inline
/// canonical-URL parse, then network lookup. Only the network path writes
/// to the cache; canonical links never need a second resolution, so caching
/// them would only grow the file.
pub struct IdResolver<L: IdLookup> {
    cache: IdCache,
    lookup: L,
    canonical_id: Regex,
}

impl<L: IdLookup> IdResolver<L> {
    pub fn new(cache: IdCache, lookup: L) -> Self {
        IdResolver {
            cache,
            lookup,
            canonical_id: Regex::new(r"^https://www\.facebook\.com/profile\.php\?id=(\d+)$")
                .unwrap(),
        }
    }

    pub fn resolve(&mut self, link: &str) -> Result<String, ExportError> {
        if let Some(id) = self.cache.get(link) {
            return Ok(id.to_string());
        }

        if let Some(captures) = self.canonical_id.captures(link) {
            return Ok(captures[1].to_string());
        }

        info!("Looking up id for '{}'...", link);
        let id = self.lookup.lookup(link)?;
        self.cache.append(link, &id)?;
        Ok(id)
    }

    pub fn cache(&self) -> &IdCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write as _;

    /// Fails the test if the network path is ever taken.
    struct PanicLookup;

    impl IdLookup for PanicLookup {
        fn lookup(&self, link: &str) -> Result<String, ExportError> {
            panic!("unexpected network lookup for '{}'", link);
        }
    }

    struct FixedLookup {
        id: &'static str,
        calls: Cell<usize>,
    }

    impl FixedLookup {
        fn new(id: &'static str) -> Self {
            FixedLookup {
                id,
                calls: Cell::new(0),
            }
        }
    }

    impl IdLookup for FixedLookup {
        fn lookup(&self, _link: &str) -> Result<String, ExportError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.id.to_string())
        }
    }

    fn cache_with(contents: &str) -> (tempfile::NamedTempFile, IdCache) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        let cache = IdCache::load(file.path()).unwrap();
        (file, cache)
    }

    #[test]
    fn cached_link_never_hits_the_network() {
        let (_file, cache) = cache_with("https://www.facebook.com/some.profile,1001\n");
        let mut resolver = IdResolver::new(cache, PanicLookup);

        let id = resolver
            .resolve("https://www.facebook.com/some.profile")
            .unwrap();
        assert_eq!(id, "1001");
    }

    #[test]
    fn canonical_link_is_parsed_inline_without_caching() {
        let (file, cache) = cache_with("");
        let mut resolver = IdResolver::new(cache, PanicLookup);

        let id = resolver
            .resolve("https://www.facebook.com/profile.php?id=424242")
            .unwrap();
        assert_eq!(id, "424242");
        assert!(resolver.cache().is_empty());

        let reloaded = IdCache::load(file.path()).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn non_canonical_link_with_extra_query_goes_to_lookup() {
        let (_file, cache) = cache_with("");
        let lookup = FixedLookup::new("5005");
        let mut resolver = IdResolver::new(cache, lookup);

        let id = resolver
            .resolve("https://www.facebook.com/profile.php?id=1&sk=about")
            .unwrap();
        assert_eq!(id, "5005");
    }

    #[test]
    fn network_resolution_is_appended_to_the_cache() {
        let (file, cache) = cache_with("");
        let lookup = FixedLookup::new("7007");
        let mut resolver = IdResolver::new(cache, lookup);

        let link = "https://www.facebook.com/vanity.name";
        assert_eq!(resolver.resolve(link).unwrap(), "7007");
        // Second resolution inside the same run is served from memory.
        assert_eq!(resolver.resolve(link).unwrap(), "7007");
        assert_eq!(resolver.lookup.calls.get(), 1);

        let reloaded = IdCache::load(file.path()).unwrap();
        assert_eq!(reloaded.get(link), Some("7007"));
    }

    #[test]
    fn lookup_failure_propagates() {
        struct FailingLookup;
        impl IdLookup for FailingLookup {
            fn lookup(&self, link: &str) -> Result<String, ExportError> {
                Err(ExportError::IdMissing {
                    link: link.to_string(),
                })
            }
        }

        let (_file, cache) = cache_with("");
        let mut resolver = IdResolver::new(cache, FailingLookup);
        let result = resolver.resolve("https://www.facebook.com/vanity.name");
        assert!(matches!(result, Err(ExportError::IdMissing { .. })));
        assert!(resolver.cache().is_empty());
    }
}
