use crate::structs::*;

/// Something that can search the video platform
pub trait SearchBackend: Send + Sync {
    fn search<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> futures::future::BoxFuture<'a, Result<Vec<SearchEntry>, Error>>;
}

pub struct Resolver {
    backend: std::sync::Arc<dyn SearchBackend>,
}

impl Resolver {
    pub fn new(backend: std::sync::Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Searches for `query` and picks the first hit. Search errors are reported to `notices` and
    /// yield an empty candidate.
    pub async fn resolve(&self, query: &str, notices: &mut Notices) -> SearchCandidate {
        let request = SearchRequest { query: query.to_string(), limit: SEARCH_LIMIT, flat: true };

        let entries = match self.backend.search(&request).await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("search for {:?} failed: {}", query, e);
                notices.error(format!("Error while searching: {}", e));
                return SearchCandidate::empty();
            }
        };
        log::debug!("search for {:?} returned {} entries", query, entries.len());

        match entries.into_iter().next() {
            Some(SearchEntry { url, title }) => SearchCandidate { locator: url, title },
            None => SearchCandidate::empty(),
        }
    }
}
