use clap::Parser;
use shodan_report::utils::{error::ReportError, logger};
use shodan_report::{report, CliConfig, ReportEngine, Settings, ShodanClient};
use std::io::Write;

fn fail(e: &ReportError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?})",
        e,
        e.category()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Hint: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

async fn run(settings: &Settings) -> Result<(), ReportError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    report::write_search_banner(&mut out, &settings.query, settings.max_results)?;
    out.flush()?;

    let client = ShodanClient::from_config(settings, settings.api_key.clone());
    let engine = ReportEngine::new(client, settings.max_results);
    let search = engine.run(&settings.query).await?;

    if let Some(diagnostic) = search.aggregation.diagnostic() {
        eprintln!("{}", diagnostic);
    }

    report::write_report(&mut out, &search, &settings.student)?;
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting shodan-report");

    let settings = match config.load_settings() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };
    tracing::debug!("Resolved settings: {:?}", settings);

    if let Err(e) = run(&settings).await {
        fail(&e);
    }

    tracing::info!("✅ Report complete");
}
