use serde::Deserialize;

/// Default seed film
pub const DEFAULT_ROOT: &str = "shawshank_redemption";

/// Default prefix film identities are appended to
pub const DEFAULT_BASE_URL: &str = "https://www.rottentomatoes.com/m/";

/// Default client identification, a desktop browser string
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Main configuration structure for Reel-Ripple
///
/// Every section is optional in the TOML file; missing keys take the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub source: SourceConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub quality: QualityConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of depth levels to expand from the seeds
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent workers per depth level
    pub workers: u32,

    /// Delay each worker waits after every fetch (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Give up on a single fetch after this long (seconds)
    #[serde(rename = "fetch-timeout")]
    pub fetch_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            workers: 20,
            request_delay: 2000,
            fetch_timeout: 30,
        }
    }
}

/// Where film pages live and where the crawl starts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Prefix a film identity is appended to (must end with '/')
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Identity of the seed film
    pub root: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            root: DEFAULT_ROOT.to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Value sent in the User-Agent header
    pub header: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            header: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Thresholds a film must meet to appear in the ranked output
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    #[serde(rename = "min-ratings")]
    pub min_ratings: u64,

    #[serde(rename = "min-audience-score")]
    pub min_audience_score: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_ratings: 1000,
            min_audience_score: 70,
        }
    }
}

/// Input and output corpus locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prior corpus to resume from; a missing file is not an error
    #[serde(rename = "input-path")]
    pub input_path: Option<String>,

    /// Where the ranked corpus is written
    #[serde(rename = "output-path")]
    pub output_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            input_path: Some("input.json".to_string()),
            output_path: "output.json".to_string(),
        }
    }
}

/// Values supplied on the command line, applied over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<String>,
    pub input_path: Option<String>,
    pub no_input: bool,
    pub output_path: Option<String>,
    pub max_depth: Option<u32>,
    pub workers: Option<u32>,
    pub request_delay: Option<u64>,
}

impl Config {
    /// Applies command-line overrides in place
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(root) = overrides.root {
            self.source.root = root;
        }
        if overrides.no_input {
            self.output.input_path = None;
        } else if let Some(input) = overrides.input_path {
            self.output.input_path = Some(input);
        }
        if let Some(output) = overrides.output_path {
            self.output.output_path = output;
        }
        if let Some(depth) = overrides.max_depth {
            self.crawler.max_depth = depth;
        }
        if let Some(workers) = overrides.workers {
            self.crawler.workers = workers;
        }
        if let Some(delay) = overrides.request_delay {
            self.crawler.request_delay = delay;
        }
    }
}
