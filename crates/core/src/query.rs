use crate::config::Settings;
use crate::time::calendar::previous_month_start;
use chrono::NaiveDate;

/// Builds the Socrata request for one state's series starting at `window_start`,
/// ascending by submission date. Without an app token the request goes out
/// unauthenticated, which Socrata serves at a lower rate limit.
///
/// The URL is assembled as plain text; the HTTP layer percent-encodes the spaces
/// and quotes when it parses it.
pub fn build_url(
    base_url: &str,
    dataset_id: &str,
    app_token: Option<&str>,
    state_abbreviation: &str,
    window_start: NaiveDate,
) -> String {
    let token = match app_token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!("$$app_token={t}&"),
        None => String::new(),
    };
    format!(
        "{base_url}{dataset_id}.json?{token}state={state}&$order=submission_date ASC&$where=submission_date >= '{start}T00:00:00.000'",
        state = state_abbreviation.trim().to_ascii_uppercase(),
        start = window_start.format("%Y-%m-01"),
    )
}

/// First day of the previous calendar month; the series covers the trailing
/// one to two months.
pub fn window_start_date(today: NaiveDate) -> NaiveDate {
    previous_month_start(today)
}

#[derive(Debug, Clone)]
pub struct SeriesQuery {
    base_url: String,
    dataset_id: String,
    app_token: Option<String>,
}

impl SeriesQuery {
    pub fn new(base_url: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            dataset_id: dataset_id.into(),
            app_token: None,
        }
    }

    pub fn with_app_token(mut self, app_token: impl Into<String>) -> Self {
        self.app_token = Some(app_token.into());
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let query = Self::new(
            normalize_base_url(&settings.cdc_base_url),
            settings.cdc_dataset_id.trim(),
        );
        match settings.cdc_app_token.as_deref() {
            Some(token) => query.with_app_token(token),
            None => {
                tracing::warn!("CDC_APP_TOKEN not set; requests will be unauthenticated");
                query
            }
        }
    }

    pub fn url_for(&self, state_abbreviation: &str, today: NaiveDate) -> String {
        build_url(
            &self.base_url,
            &self.dataset_id,
            self.app_token.as_deref(),
            state_abbreviation,
            window_start_date(today),
        )
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
