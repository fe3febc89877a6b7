use serde::Deserialize;

/// Main configuration structure for Deepsift
///
/// Every section is optional; missing keys fall back to the defaults for the
/// public search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub crawler: CrawlerConfig,
    pub query: QueryConfig,
    pub selectors: SelectorConfig,
}

/// Where the search endpoint lives and how to reach it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Host name of the search service (usually an onion address)
    pub host: String,

    /// TCP port of the search service
    pub port: u16,

    /// URL scheme used to address the endpoint
    pub scheme: String,

    /// Proxy URL every request is routed through; empty disables the proxy
    pub proxy: String,

    /// Total time allowed for one page request (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Time allowed to establish the proxied connection (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "ichidanv34wrx7m7.onion".to_string(),
            port: 80,
            scheme: "http".to_string(),
            proxy: "socks5h://127.0.0.1:9050".to_string(),
            timeout_secs: 60,
            connect_timeout_secs: 30,
        }
    }
}

impl EndpointConfig {
    /// Base URL of the endpoint, e.g. `http://host:80`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Returns the proxy URL, or None when requests go out directly
    pub fn proxy_url(&self) -> Option<&str> {
        let proxy = self.proxy.trim();
        if proxy.is_empty() {
            None
        } else {
            Some(proxy)
        }
    }
}

/// What to do once the expected total has been collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrainPolicy {
    /// Stop as soon as the threshold is met; in-flight work is abandoned
    #[default]
    Immediate,

    /// Stop admitting pages but wait for in-flight work and keep its results
    FinishInFlight,
}

/// How a failed page fetch affects the rest of the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Any fetch or parse failure fails the whole session
    #[default]
    AbortSession,

    /// Only the failing page's branch is abandoned
    IsolateBranch,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Fixed pause between consecutive fetch dispatches (milliseconds)
    #[serde(rename = "dispatch-delay-ms")]
    pub dispatch_delay_ms: u64,

    /// Maximum number of page fetches running at the same time
    #[serde(rename = "max-in-flight")]
    pub max_in_flight: u32,

    #[serde(rename = "drain-policy")]
    pub drain_policy: DrainPolicy,

    #[serde(rename = "failure-policy")]
    pub failure_policy: FailurePolicy,

    /// Count result entries by unique URL instead of raw occurrences
    #[serde(rename = "dedup-results")]
    pub dedup_results: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            dispatch_delay_ms: 1000,
            max_in_flight: 8,
            drain_policy: DrainPolicy::default(),
            failure_policy: FailurePolicy::default(),
            dedup_results: false,
        }
    }
}

/// Shape of the requests sent to the search endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Path template the search term is appended to
    #[serde(rename = "search-path")]
    pub search_path: String,

    /// Separates a search term from a trailing page fragment in user input
    #[serde(rename = "fragment-delimiter")]
    pub fragment_delimiter: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search_path: "/search?query=".to_string(),
            fragment_delimiter: "&".to_string(),
        }
    }
}

/// CSS selectors describing the search result page markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Pagination control region
    pub pagination: String,

    /// Current page marker, relative to the pagination region
    pub current_page: String,

    /// Page links, relative to the pagination region
    pub page_link: String,

    /// Disabled navigation marker, relative to the pagination region
    pub disabled: String,

    /// Marker shown when a search has no results
    pub no_results: String,

    /// Element holding the reported result count
    pub total: String,

    /// One result block
    pub result: String,

    /// Result link, relative to a result block
    pub result_url: String,

    /// Result title, relative to a result block
    pub result_title: String,

    /// Result snippet, relative to a result block
    pub result_snippet: String,

    /// Visible text of the "previous page" link
    pub previous_label: String,

    /// Visible text of the "next page" link
    pub next_label: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            pagination: "ul.pagination".to_string(),
            current_page: "li.active".to_string(),
            page_link: "a[href]".to_string(),
            disabled: "li.disabled".to_string(),
            no_results: "div.no-results".to_string(),
            total: "div.search-info strong".to_string(),
            result: "div.search-result".to_string(),
            result_url: "a.result-url".to_string(),
            result_title: ".result-title".to_string(),
            result_snippet: ".result-snippet".to_string(),
            previous_label: "Previous".to_string(),
            next_label: "Next".to_string(),
        }
    }
}
