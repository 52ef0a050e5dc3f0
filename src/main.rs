use arb_translate::config::BatchConfig;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("arb_translate=info".parse()?),
        )
        .init();

    let matches = BatchConfig::command().get_matches();
    let outcome = match BatchConfig::from_matches(&matches) {
        Ok(config) => arb_translate::run(&config).await,
        Err(e) => Err(e.into()),
    };

    match &outcome {
        Ok(report) => info!(
            written = report.written().count(),
            failed = report.failed().count(),
            fallbacks = report.total_fallbacks(),
            peak_concurrency = report.peak_concurrency,
            "All translations done"
        ),
        Err(e) => error!("{}", e),
    }

    Ok(ExitCode::from(arb_translate::exit_status(&outcome)))
}
