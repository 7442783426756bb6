pub mod chart;
pub mod dashboard;
pub mod domain;
pub mod ingest;
pub mod query;
pub mod series;
pub mod table;
pub mod time;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_CDC_BASE_URL: &str = "https://data.cdc.gov/resource/";
    /// "United States COVID-19 Cases and Deaths by State over Time".
    pub const DEFAULT_CASES_AND_DEATHS_DATASET: &str = "9mfq-cb36";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub cdc_base_url: String,
        pub cdc_dataset_id: String,
        pub cdc_app_token: Option<String>,
        pub cdc_timeout_secs: u64,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let cdc_timeout_secs = match std::env::var("CDC_TIMEOUT_SECS") {
                Ok(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("CDC_TIMEOUT_SECS must be an integer (got {s:?})"))?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            };

            Ok(Self {
                cdc_base_url: non_empty_var("CDC_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_CDC_BASE_URL.to_string()),
                cdc_dataset_id: non_empty_var("CDC_DATASET_ID")
                    .unwrap_or_else(|| DEFAULT_CASES_AND_DEATHS_DATASET.to_string()),
                cdc_app_token: non_empty_var("CDC_APP_TOKEN"),
                cdc_timeout_secs,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                cdc_base_url: DEFAULT_CDC_BASE_URL.to_string(),
                cdc_dataset_id: DEFAULT_CASES_AND_DEATHS_DATASET.to_string(),
                cdc_app_token: None,
                cdc_timeout_secs: DEFAULT_TIMEOUT_SECS,
                sentry_dsn: None,
            }
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
