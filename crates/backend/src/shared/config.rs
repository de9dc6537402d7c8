use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub kpi: KpiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Sales API the dashboard pulls rows from
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Groups kept by the magnitude tier of the top-N reducer
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Yearly axis, in display order
    #[serde(default = "default_years")]
    pub years: Vec<i32>,
    /// Known group keys stacked first, in this order
    #[serde(default = "default_region_order")]
    pub region_order: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KpiConfig {
    #[serde(default = "default_regions")]
    pub regions: Vec<RegionRoster>,
}

/// Salesmen reported under one region in the KPI table
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RegionRoster {
    pub code: String,
    pub salesmen: Vec<String>,
}

// Per-key fallbacks read the embedded defaults. `DEFAULT_CONFIG` sets every
// key, so none of these runs while `EMBEDDED` itself is being parsed.
fn default_port() -> u16 {
    EMBEDDED.server.port
}

fn default_base_url() -> String {
    EMBEDDED.upstream.base_url.clone()
}

fn default_timeout_secs() -> u64 {
    EMBEDDED.upstream.timeout_secs
}

fn default_top_n() -> usize {
    EMBEDDED.dashboard.top_n
}

fn default_years() -> Vec<i32> {
    EMBEDDED.dashboard.years.clone()
}

fn default_region_order() -> Vec<String> {
    EMBEDDED.dashboard.region_order.clone()
}

fn default_regions() -> Vec<RegionRoster> {
    EMBEDDED.kpi.regions.clone()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000

[upstream]
base_url = "http://127.0.0.1:5000"
timeout_secs = 30

[dashboard]
top_n = 10
years = [2021, 2022, 2023, 2024, 2025]
region_order = ["NSW", "QLD", "VIC", "SA", "WA", "COMMON"]

[[kpi.regions]]
code = "NSW"
salesmen = ["Hamid Jallis", "LUTTRELL STEVE", "Cummings Mark", "Lee Don"]

[[kpi.regions]]
code = "QLD"
salesmen = ["Maclure Adam", "Spires Steven", "Sampson Kieren", "Marsh Aaron"]

[[kpi.regions]]
code = "VIC"
salesmen = ["Bellotto Nicola", "Bilston Kelley", "Gultjaeff Jason", "Hobkirk Calvin"]

[[kpi.regions]]
code = "WA"
salesmen = ["Fruci Davide", "Gilbert Michael"]
"#;

/// Parsed embedded defaults. Every key is present in `DEFAULT_CONFIG`,
/// so parsing never falls back to the defaults above or below.
static EMBEDDED: Lazy<Config> = Lazy::new(|| {
    toml::from_str(DEFAULT_CONFIG).expect("embedded DEFAULT_CONFIG must be valid TOML")
});

impl Default for Config {
    fn default() -> Self {
        EMBEDDED.clone()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        EMBEDDED.server.clone()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        EMBEDDED.upstream.clone()
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        EMBEDDED.dashboard.clone()
    }
}

impl Default for KpiConfig {
    fn default() -> Self {
        EMBEDDED.kpi.clone()
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Sections missing from the file take their embedded defaults.
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    Ok(Config::default())
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.dashboard.years.is_empty() {
        anyhow::bail!("dashboard.years must list at least one year");
    }
    Ok(config)
}
