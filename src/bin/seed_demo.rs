//! Seeds (or with `--cleanup`, removes) the `test-user-mcp` demo account.

use std::process::ExitCode;

use clap::Parser;
use skill_analytics::config::Config;
use skill_analytics::logging::{init_tracing, LogConfig};
use skill_analytics::services::demo_seed::{cleanup_demo, seed_demo, DEMO_ACCOUNT_ID};
use skill_analytics::store::Store;

#[derive(Debug, Parser)]
#[command(name = "seed-demo")]
#[command(about = "Seed or remove the test-user-mcp demo account", long_about = None)]
#[command(version)]
struct Args {
    /// Only remove the demo documents
    #[arg(long)]
    cleanup: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&LogConfig::from(&config));

    let store = match Store::open(&config.sled_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(path = %config.sled_path, error = %e, "Failed to open sled database");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = store.run_migrations() {
        tracing::error!(error = %e, "Failed to run migrations");
        return ExitCode::FAILURE;
    }

    let result = if args.cleanup {
        cleanup_demo(&store)
    } else {
        seed_demo(&store)
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(account_id = DEMO_ACCOUNT_ID, error = %e, "Demo seeding failed");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = store.flush() {
        tracing::error!(error = %e, "Failed to flush store");
        return ExitCode::FAILURE;
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "Failed to render summary"),
    }
    ExitCode::SUCCESS
}
