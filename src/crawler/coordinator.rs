//! Crawler coordinator - main crawl orchestration logic
//!
//! One crawl session turns a seed query into a set of result entries:
//!
//! 1. The seed request is admitted to the frontier and fetched
//! 2. Each fetched page is handed to the pagination and result extractors,
//!    each running as its own task
//! 3. Forward links are admitted through the frontier and fetched in turn
//! 4. Result batches are accumulated until the total reported by the first
//!    page is reached
//!
//! Every task resolves to one [`CrawlEvent`]; the coordinator drains them from
//! a `JoinSet` in completion order, so there is exactly one place that reacts
//! to whichever event is ready first.

use crate::config::{Config, CrawlerConfig, DrainPolicy, FailurePolicy};
use crate::crawler::document::{Document, PageSelectors};
use crate::crawler::fetcher::{Fetcher, ProxyFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::pagination::{extract_links, PageLinks};
use crate::crawler::report::{AbandonedBranch, BranchId, CrawlReport};
use crate::crawler::results::{extract_results, inspect_first_page, FirstPage, ResultEntry};
use crate::query::{QueryBuilder, SearchRequest};
use crate::state::{CrawlState, SessionState};
use crate::SiftError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::Instrument;

/// Outcome of one crawl task
#[derive(Debug)]
enum CrawlEvent {
    DocumentFetched {
        branch: BranchId,
        document: Document,
    },
    FirstPageRead {
        branch: BranchId,
        document: Document,
        first: FirstPage,
    },
    FetchFailed {
        branch: BranchId,
        request: SearchRequest,
        error: SiftError,
    },
    LinksDiscovered {
        branch: BranchId,
        links: PageLinks,
    },
    ResultsExtracted {
        branch: BranchId,
        entries: Vec<ResultEntry>,
    },
    /// The session ended before this fetch was started
    Cancelled {
        branch: BranchId,
        request: SearchRequest,
    },
}

/// Whether the event loop keeps going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Main crawler coordinator structure
///
/// Holds everything that is shared across sessions. Each call to
/// [`Coordinator::run`] starts a fresh session with an empty frontier.
pub struct Coordinator<F: Fetcher> {
    fetcher: Arc<F>,
    builder: QueryBuilder,
    selectors: Arc<PageSelectors>,
    crawler: CrawlerConfig,
}

impl Coordinator<ProxyFetcher> {
    /// Creates a coordinator that fetches through the configured proxy
    pub fn from_config(config: &Config) -> Result<Self, SiftError> {
        let fetcher = ProxyFetcher::new(&config.endpoint)?;
        Self::new(config, fetcher)
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator around any [`Fetcher`]
    ///
    /// # Errors
    ///
    /// Returns `SiftError::Config` if a configured selector does not compile.
    pub fn new(config: &Config, fetcher: F) -> Result<Self, SiftError> {
        let selectors = PageSelectors::compile(&config.selectors)?;

        Ok(Self {
            fetcher: Arc::new(fetcher),
            builder: QueryBuilder::new(&config.query),
            selectors: Arc::new(selectors),
            crawler: config.crawler.clone(),
        })
    }

    /// Runs one crawl session for `query`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The session reached `Done`
    /// * `Err(SiftError::NoResults)` - The first page reported no results
    /// * `Err(SiftError::Transport | SiftError::Parse)` - A fetch failed and the
    ///   failure policy made it fatal
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deepsift::config::Config;
    /// use deepsift::crawler::Coordinator;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let coordinator = Coordinator::from_config(&Config::default())?;
    /// let report = coordinator.run("nginx").await?;
    /// println!("{} results", report.entries.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, query: &str) -> Result<CrawlReport, SiftError> {
        let span = tracing::info_span!("crawl", query = %query);
        self.run_session(query).instrument(span).await
    }

    async fn run_session(&self, query: &str) -> Result<CrawlReport, SiftError> {
        let mut session = Session::new(self, query);

        if let Err(error) = session.seed() {
            return session.fail(error);
        }

        while let Some(joined) = session.tasks.join_next().await {
            let event = match joined {
                Ok(event) => event,
                Err(e) => return session.fail(SiftError::TaskFailed(e.to_string())),
            };

            match session.handle_event(event) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => break,
                Err(error) => return session.fail(error),
            }
        }

        session.finish()
    }
}

/// Mutable state of one crawl session
struct Session<'a, F: Fetcher> {
    coordinator: &'a Coordinator<F>,
    query: String,
    request: SearchRequest,
    state: SessionState,
    frontier: Frontier,
    permits: Arc<Semaphore>,
    tasks: JoinSet<CrawlEvent>,
    expected_total: Option<u64>,
    entries: Vec<ResultEntry>,
    seen_urls: HashSet<String>,
    pages_fetched: usize,
    abandoned: Vec<AbandonedBranch>,
    first_page_seen: bool,
    next_branch: u64,
    next_dispatch_at: Instant,
    dispatch_delay: Duration,
    started_at: DateTime<Utc>,
}

impl<'a, F: Fetcher> Session<'a, F> {
    fn new(coordinator: &'a Coordinator<F>, query: &str) -> Self {
        let crawler = &coordinator.crawler;

        Self {
            coordinator,
            query: query.to_string(),
            request: coordinator.builder.build(query),
            state: SessionState::new(),
            frontier: Frontier::new(),
            permits: Arc::new(Semaphore::new(crawler.max_in_flight as usize)),
            tasks: JoinSet::new(),
            expected_total: None,
            entries: Vec::new(),
            seen_urls: HashSet::new(),
            pages_fetched: 0,
            abandoned: Vec::new(),
            first_page_seen: false,
            next_branch: 0,
            next_dispatch_at: Instant::now(),
            dispatch_delay: Duration::from_millis(crawler.dispatch_delay_ms),
            started_at: Utc::now(),
        }
    }

    /// Admits and dispatches the seed request
    fn seed(&mut self) -> Result<(), SiftError> {
        let request = self.request.clone();
        tracing::info!("Starting crawl with {}", request);

        self.frontier.try_admit(&request);
        self.dispatch_fetch(request);
        self.state.transition(CrawlState::Running)
    }

    fn handle_event(&mut self, event: CrawlEvent) -> Result<Flow, SiftError> {
        match event {
            CrawlEvent::DocumentFetched { branch, document } => {
                self.on_document(branch, document);
                Ok(Flow::Continue)
            }
            CrawlEvent::FirstPageRead {
                branch,
                document,
                first,
            } => self.on_first_page(branch, document, first),
            CrawlEvent::FetchFailed {
                branch,
                request,
                error,
            } => self.on_fetch_failed(branch, request, error),
            CrawlEvent::LinksDiscovered { branch, links } => {
                self.on_links(branch, links);
                Ok(Flow::Continue)
            }
            CrawlEvent::ResultsExtracted { branch, entries } => self.on_results(branch, entries),
            CrawlEvent::Cancelled { branch, request } => {
                tracing::debug!("Branch {} ({}) was never started", branch, request);
                Ok(Flow::Continue)
            }
        }
    }

    fn on_document(&mut self, branch: BranchId, document: Document) {
        self.pages_fetched += 1;
        tracing::info!("Handled {} (branch {})", document.request(), branch);

        if self.first_page_seen {
            self.spawn_extraction(branch, document);
            return;
        }

        // The first page also carries the no-results marker and the total
        self.first_page_seen = true;
        let selectors = Arc::clone(&self.coordinator.selectors);
        self.tasks.spawn_blocking(move || {
            let first = inspect_first_page(&document, &selectors);
            CrawlEvent::FirstPageRead {
                branch,
                document,
                first,
            }
        });
    }

    fn on_first_page(
        &mut self,
        branch: BranchId,
        document: Document,
        first: FirstPage,
    ) -> Result<Flow, SiftError> {
        if first.no_results {
            return Err(SiftError::NoResults {
                query: self.query.clone(),
            });
        }

        match first.total {
            Some(total) => {
                tracing::info!("Hosts found: {}", total);
                self.expected_total = Some(total);
            }
            None => tracing::warn!(
                "First page reports no result count; crawling until the frontier is exhausted"
            ),
        }

        self.spawn_extraction(branch, document);
        Ok(Flow::Continue)
    }

    fn on_fetch_failed(
        &mut self,
        branch: BranchId,
        request: SearchRequest,
        error: SiftError,
    ) -> Result<Flow, SiftError> {
        let draining = self.state.current() == CrawlState::Draining;

        if branch == BranchId::SEED
            || (!draining && self.coordinator.crawler.failure_policy == FailurePolicy::AbortSession)
        {
            return Err(error);
        }

        // While draining the total is already met, so only this page is lost
        tracing::warn!("Abandoning branch {} ({}): {}", branch, request, error);
        self.abandoned.push(AbandonedBranch {
            branch,
            request,
            reason: error.to_string(),
        });
        Ok(Flow::Continue)
    }

    fn on_links(&mut self, branch: BranchId, links: PageLinks) {
        if links.last_page {
            tracing::debug!("Branch {} is on the last page", branch);
        }

        if !self.state.current().is_admitting() {
            tracing::debug!(
                "Draining; dropping {} links from branch {}",
                links.links.len(),
                branch
            );
            return;
        }

        for link in links.links {
            if self.frontier.try_admit(&link) {
                tracing::info!("{} in processing", link);
                self.dispatch_fetch(link);
            }
        }
    }

    fn on_results(&mut self, branch: BranchId, entries: Vec<ResultEntry>) -> Result<Flow, SiftError> {
        tracing::debug!("Branch {} yielded {} results", branch, entries.len());

        for entry in entries {
            if self.coordinator.crawler.dedup_results && !self.seen_urls.insert(entry.url.clone()) {
                tracing::trace!("Skipping repeated result {}", entry.url);
                continue;
            }
            tracing::debug!("parsed {}", entry.url);
            self.entries.push(entry);
        }

        self.check_threshold()
    }

    /// Enters `Draining` once the expected total is collected
    fn check_threshold(&mut self) -> Result<Flow, SiftError> {
        let Some(total) = self.expected_total else {
            return Ok(Flow::Continue);
        };

        if self.state.current() == CrawlState::Running && self.entries.len() as u64 >= total {
            tracing::info!(
                "Collected {} of {} expected results",
                self.entries.len(),
                total
            );
            self.state.transition(CrawlState::Draining)?;
        }

        if self.state.current() == CrawlState::Draining
            && self.coordinator.crawler.drain_policy == DrainPolicy::Immediate
        {
            return Ok(Flow::Stop);
        }

        Ok(Flow::Continue)
    }

    /// Schedules a fetch, spaced `dispatch_delay` after the previous one
    fn dispatch_fetch(&mut self, request: SearchRequest) {
        let branch = BranchId(self.next_branch);
        self.next_branch += 1;

        let start_at = self.next_dispatch_at.max(Instant::now());
        self.next_dispatch_at = start_at + self.dispatch_delay;

        let fetcher = Arc::clone(&self.coordinator.fetcher);
        let permits = Arc::clone(&self.permits);

        self.tasks.spawn(async move {
            tokio::time::sleep_until(start_at).await;

            // Closed once the session has ended
            let Ok(_permit) = permits.acquire_owned().await else {
                return CrawlEvent::Cancelled { branch, request };
            };

            match fetcher.fetch(&request).await {
                Ok(document) => CrawlEvent::DocumentFetched { branch, document },
                Err(error) => CrawlEvent::FetchFailed {
                    branch,
                    request,
                    error,
                },
            }
        });
    }

    /// Runs both extractors on `document` as separate blocking tasks
    fn spawn_extraction(&mut self, branch: BranchId, document: Document) {
        let selectors = Arc::clone(&self.coordinator.selectors);
        let builder = self.coordinator.builder.clone();
        let page = document.clone();
        self.tasks.spawn_blocking(move || CrawlEvent::LinksDiscovered {
            branch,
            links: extract_links(&page, &selectors, &builder),
        });

        let selectors = Arc::clone(&self.coordinator.selectors);
        self.tasks.spawn_blocking(move || CrawlEvent::ResultsExtracted {
            branch,
            entries: extract_results(&document, &selectors),
        });
    }

    /// Stops fetches that have not started yet
    ///
    /// Fetches already holding a permit and running extractions complete in the
    /// background; their output is discarded.
    fn release_tasks(&mut self) {
        self.permits.close();

        if !self.tasks.is_empty() {
            tracing::debug!("Detaching {} in-flight tasks", self.tasks.len());
            self.tasks.detach_all();
        }
    }

    fn finish(mut self) -> Result<CrawlReport, SiftError> {
        self.release_tasks();

        let complete = match self.expected_total {
            Some(_) => self.state.current() == CrawlState::Draining,
            None => self.abandoned.is_empty(),
        };

        if let (Some(total), false) = (self.expected_total, complete) {
            tracing::warn!(
                "Frontier exhausted with {} of {} expected results",
                self.entries.len(),
                total
            );
        }

        self.state.transition(CrawlState::Done)?;

        Ok(CrawlReport {
            query: self.query,
            request: self.request,
            expected_total: self.expected_total,
            entries: self.entries,
            pages_fetched: self.pages_fetched,
            pages_admitted: self.frontier.len(),
            abandoned: self.abandoned,
            complete,
            started_at: self.started_at,
            finished_at: Utc::now(),
        })
    }

    fn fail(mut self, error: SiftError) -> Result<CrawlReport, SiftError> {
        self.release_tasks();

        if let Err(e) = self.state.transition(CrawlState::Failed) {
            tracing::debug!("{}", e);
        }

        Err(error)
    }
}
