use axum::Router;
use clap::{Parser, Subcommand};
use snipetracker::{
    config::AppConfig,
    pubg::HttpPubgClient,
    refresh::{start_refresh_task, RefreshService},
    shared::AppState,
    stats::{self, InMemoryStatsRepository, PostgresStatsRepository, StatsRepository},
};
use std::{error::Error, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "snipetracker")]
#[command(about = "Tracks who killed forsen in PUBG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the read API and refresh on a schedule (default)
    Serve,
    /// Run a single refresh and exit
    Refresh,
    /// Rescore every recorded kill on forsen, then rebuild player totals
    RecomputeKillscores,
    /// Rebuild every player's totals from their stats rows
    RecomputeStats,
    /// Replay the stored telemetry of one match
    Replay {
        /// Match id
        match_id: String,
    },
}

async fn build_repository(config: &AppConfig) -> Result<Arc<dyn StatsRepository>, Box<dyn Error>> {
    match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Using PostgreSQL storage");
            Ok(Arc::new(PostgresStatsRepository::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage");
            Ok(Arc::new(InMemoryStatsRepository::new()))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snipetracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    if config.api_key.is_empty() {
        warn!("PUBG_API_KEY is empty, API requests will be rejected");
    }

    let repository = build_repository(&config).await?;
    let api = Arc::new(HttpPubgClient::new(
        &config.api_url,
        &config.api_key,
        config.http_timeout,
    )?);
    let refresh_service = Arc::new(RefreshService::new(
        api,
        repository.clone(),
        config.tracked_player_id.clone(),
        config.retry,
    ));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!(tracked_player_id = %config.tracked_player_id, "Starting snipe tracker");
            tokio::spawn(start_refresh_task(
                refresh_service,
                config.refresh_interval,
            ));

            let app = Router::new()
                .merge(stats::routes())
                .layer(CorsLayer::permissive())
                .layer(TraceLayer::new_for_http())
                .with_state(AppState::new(repository));

            let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
            info!("Server running on http://{}", config.bind_addr);
            axum::serve(listener, app).await?;
        }
        Command::Refresh => {
            let report = refresh_service.run_refresh().await?;
            info!(
                ingested = report.ingested_matches.len(),
                failed = report.failed_matches.len(),
                players_recomputed = report.players_recomputed,
                "Refresh finished"
            );
        }
        Command::RecomputeKillscores => {
            let report = refresh_service.player_stats().recompute_killscores().await?;
            info!(
                rows_rescored = report.rows_rescored,
                players_recomputed = report.players_recomputed,
                "Kill scores recomputed"
            );
        }
        Command::RecomputeStats => {
            let recomputed = refresh_service.player_stats().recompute_all_players().await?;
            info!(recomputed, "Player stats recomputed");
        }
        Command::Replay { match_id } => {
            match refresh_service
                .ingestion()
                .replay_cached_telemetry(&match_id)
                .await?
            {
                Some(summary) => info!(
                    match_id = %match_id,
                    events_applied = summary.events_applied,
                    tracked_player_died = summary.tracked_player_died,
                    "Telemetry replayed"
                ),
                None => warn!(match_id = %match_id, "Match has no stored telemetry"),
            }
        }
    }

    Ok(())
}
