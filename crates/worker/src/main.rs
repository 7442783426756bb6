use anyhow::Context;
use clap::Parser;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use covid_dash_core::chart::CanvasBoard;
use covid_dash_core::dashboard::{select_and_load, Dashboard, Outcome};
use covid_dash_core::domain::UsState;
use covid_dash_core::ingest::HttpSeriesClient;
use covid_dash_core::query::SeriesQuery;
use covid_dash_core::time::calendar::resolve_today;

mod report;

#[derive(Debug, Parser)]
#[command(name = "covid_dash_cli")]
struct Args {
    /// State to report on: abbreviation ("CA"), name ("California"), or "California,CA".
    #[arg(long)]
    state: String,

    /// Date the query window is computed from (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    today: Option<String>,

    /// Print the dashboard snapshot as JSON instead of text charts and table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = covid_dash_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let state = UsState::lookup(&args.state)
        .with_context(|| format!("unknown US state or territory: {:?}", args.state))?;
    let today = resolve_today(args.today.as_deref())?;

    let query = SeriesQuery::from_settings(&settings);
    let client = HttpSeriesClient::from_settings(&settings)?;
    let dashboard = Mutex::new(Dashboard::new(CanvasBoard::new()));

    match select_and_load(&dashboard, &client, &query, state, today).await {
        Outcome::Applied { records } => {
            tracing::info!(state = state.abbreviation, %today, records, "report ready");
        }
        Outcome::Failed(err) => {
            let err = anyhow::Error::new(err)
                .context(format!("fetching series for {}", state.abbreviation));
            sentry_anyhow::capture_anyhow(&err);
            return Err(err);
        }
        Outcome::Stale { latest } => {
            anyhow::bail!("selection superseded by request {latest}");
        }
    }

    let dashboard = dashboard.into_inner();
    if args.json {
        let snapshot = serde_json::to_string_pretty(&dashboard.snapshot())
            .context("failed to serialize dashboard snapshot")?;
        println!("{snapshot}");
    } else {
        print!("{}", report::render(&dashboard));
    }

    Ok(())
}

fn init_sentry(settings: &covid_dash_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
