use crate::fetcher::Fetcher;
use crate::resolver::Resolver;
use crate::sanitize::sanitize;
use crate::structs::*;

/// Search → pick first hit → download, once per submission
pub struct Workflow {
    resolver: Resolver,
    fetcher: Fetcher,
}

impl Workflow {
    pub fn new(resolver: Resolver, fetcher: Fetcher) -> Self {
        Self { resolver, fetcher }
    }

    pub async fn submit(&self, query: &str, mode: Mode) -> Submission {
        let mut notices = Notices::default();

        if query.trim().is_empty() {
            notices.warning("Please enter a song or video title.");
            return finish(Phase::Idle, None, None, notices);
        }

        transition(Phase::Idle, Phase::Searching);
        let candidate = self.resolver.resolve(query, &mut notices).await;
        let (Some(locator), Some(title)) = (candidate.locator.clone(), candidate.title.clone()) else {
            transition(Phase::Searching, Phase::NoResults);
            notices.error("No results found. Try a different search term.");
            return finish(Phase::NoResults, Some(candidate), None, notices);
        };

        transition(Phase::Searching, Phase::Found);
        notices.success(format!("Found: {}", title));
        notices.info(format!("Downloading from: {}", locator));

        transition(Phase::Found, Phase::Fetching);
        let result = self.fetcher.fetch(&locator, &sanitize(&title), mode, &mut notices).await;
        let file_exists = match &result.output_path {
            Some(path) => tokio::fs::metadata(path).await.is_ok(),
            None => false,
        };
        match result.output_path {
            Some(path) if file_exists => {
                transition(Phase::Fetching, Phase::Done);
                notices.success("Processed! Click download");
                finish(Phase::Done, Some(candidate), Some(Download { path, mode }), notices)
            }
            _ => {
                transition(Phase::Fetching, Phase::Failed);
                notices.error("Download failed. Please try again.");
                finish(Phase::Failed, Some(candidate), None, notices)
            }
        }
    }
}

fn transition(from: Phase, to: Phase) {
    log::debug!("workflow {:?} -> {:?}", from, to);
}

fn finish(
    phase: Phase,
    candidate: Option<SearchCandidate>,
    download: Option<Download>,
    notices: Notices,
) -> Submission {
    Submission { phase, candidate, download, notices: notices.into_vec() }
}
