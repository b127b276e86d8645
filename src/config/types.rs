use serde::Deserialize;

/// Main configuration structure for Job-Relink
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub rediscovery: RediscoveryConfig,
    pub scoring: ScoringConfig,
    pub confidence: ConfidenceConfig,
    pub application: ApplicationConfig,
    pub vocabulary: VocabularyConfig,
    #[serde(rename = "vendor-fallback")]
    pub vendor_fallback: VendorFallbackConfig,
}

/// HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Total request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// User agent presented to target sites
    pub user_agent: String,

    /// Verify TLS certificates
    pub verify_tls: bool,

    /// Delay applied after every outbound request (milliseconds)
    pub politeness_delay_ms: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 25,
            connect_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            verify_tls: true,
            politeness_delay_ms: 250,
            max_redirects: 10,
        }
    }
}

/// Gating and search breadth for a rediscovery attempt
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RediscoveryConfig {
    /// Status codes that mark the employment link as broken (-1 means unknown)
    pub rediscover_statuses: Vec<i64>,

    /// Status codes that are likely bot blocks; such records are never touched
    pub do_not_touch_statuses: Vec<i64>,

    /// Attempt rediscovery when the soft-404 flag is set
    pub rediscover_if_soft404: bool,

    /// Number of top-scored candidates validated per record
    pub validate_top_n: usize,

    /// Number of body bytes scanned for soft-404 signatures
    pub body_scan_limit: usize,
}

impl Default for RediscoveryConfig {
    fn default() -> Self {
        Self {
            rediscover_statuses: vec![404, 410, -1],
            do_not_touch_statuses: vec![401, 403],
            rediscover_if_soft404: true,
            validate_top_n: 40,
            body_scan_limit: 250_000,
        }
    }
}

/// Candidate scoring weights
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScoringConfig {
    pub social_veto: i64,
    pub same_site: i64,
    pub vendor: i64,
    pub template_path: i64,
    pub keyword: i64,
    pub strong_label: i64,
    pub page_id: i64,
    pub pdf_penalty: i64,
    pub path_token: i64,
    pub module_file: i64,
    pub negative_url: i64,
    pub negative_label: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            social_veto: -10_000,
            same_site: 40,
            vendor: 45,
            template_path: 20,
            keyword: 50,
            strong_label: 15,
            page_id: 30,
            pdf_penalty: -25,
            path_token: 10,
            module_file: 20,
            negative_url: -15,
            negative_label: -10,
        }
    }
}

/// Confidence assigned to an accepted replacement link
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConfidenceConfig {
    pub base: u8,
    pub keyword_bonus: u8,
    pub page_id_bonus: u8,
    pub vendor_floor: u8,
    pub pdf_cap: u8,
    pub max: u8,
    pub ephemeral: u8,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            base: 70,
            keyword_bonus: 15,
            page_id_bonus: 10,
            vendor_floor: 85,
            pdf_cap: 75,
            max: 95,
            ephemeral: 60,
        }
    }
}

/// Application form PDF search
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApplicationConfig {
    pub same_site_bonus: i64,
    pub hint_bonus: i64,
    pub literal_bonus: i64,
    pub min_score: i64,
    pub confidence: u8,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            same_site_bonus: 20,
            hint_bonus: 25,
            literal_bonus: 10,
            min_score: 35,
            confidence: 85,
        }
    }
}

/// Keyword and domain tables shared by every component
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct VocabularyConfig {
    pub employment_keywords: Vec<String>,
    pub strong_labels: Vec<String>,
    pub negative_keywords: Vec<String>,
    /// Tokens whose presence in a URL earns the path-token bonus
    pub path_tokens: Vec<String>,
    /// Tokens that must accompany a numeric page-id path
    pub page_id_tokens: Vec<String>,
    pub module_filenames: Vec<String>,
    pub vendor_domains: Vec<String>,
    pub social_domains: Vec<String>,
    pub block_signatures: Vec<String>,
    /// Block signatures ignored on vendor pages
    pub vendor_benign_signatures: Vec<String>,
    pub soft404_patterns: Vec<String>,
    pub page_id_pattern: String,
    pub application_hints: Vec<String>,
    pub splash_params: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            employment_keywords: strings(&[
                "employment",
                "employment opportunities",
                "jobs",
                "job",
                "job openings",
                "job opportunities",
                "careers",
                "career opportunities",
                "human resources",
                "hr",
                "vacancies",
                "openings",
                "apply",
                "application",
            ]),
            strong_labels: strings(&[
                "employment opportunities",
                "job openings",
                "career opportunities",
                "human resources",
            ]),
            negative_keywords: strings(&[
                "departments",
                "department",
                "about",
                "contact",
                "news",
                "calendar",
                "events",
                "agenda",
                "minutes",
                "meetings",
                "boards",
                "commissions",
            ]),
            path_tokens: strings(&["employment", "jobs", "careers", "human-resources"]),
            page_id_tokens: strings(&["employment", "job", "career"]),
            module_filenames: strings(&["jobs.aspx"]),
            vendor_domains: strings(&[
                "governmentjobs.com",
                "neogov.com",
                "appone.com",
                "paycomonline.net",
                "jobapscloud.com",
                "frontlineeducation.com",
                "applitrack.com",
            ]),
            social_domains: strings(&[
                "facebook.com",
                "twitter.com",
                "x.com",
                "instagram.com",
                "youtube.com",
                "linkedin.com",
            ]),
            block_signatures: strings(&[
                "checking your browser",
                "ddos protection",
                "attention required",
                "cloudflare",
                "please enable javascript",
                "enable javascript",
                "enable cookies",
                "access denied",
                "temporarily unavailable",
                "verify you are human",
            ]),
            vendor_benign_signatures: strings(&["please enable javascript", "enable javascript"]),
            soft404_patterns: strings(&[
                r"\bpage not found\b",
                r"\b404\b",
                r"\bthe page you requested\b",
                r"\bdoes not exist\b",
                r"\bnot be found\b",
            ]),
            page_id_pattern: r"^/\d{2,6}/".to_string(),
            application_hints: strings(&[
                "application for employment",
                "employment application",
                "job application",
                "application",
                "fillable",
                "empapp",
                "employment-app",
            ]),
            splash_params: strings(&["splash"]),
        }
    }
}

/// Guessed applicant-tracking vendor URLs built from the organization name
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct VendorFallbackConfig {
    /// URL templates containing a `{slug}` placeholder
    pub url_templates: Vec<String>,

    /// State abbreviation appended to the slug on the first guess
    pub state_suffix: String,
}

impl Default for VendorFallbackConfig {
    fn default() -> Self {
        Self {
            url_templates: strings(&["https://www.governmentjobs.com/careers/{slug}"]),
            state_suffix: "ct".to_string(),
        }
    }
}
