use catalog_etl::config::toml_config::TomlConfig;
use catalog_etl::core::{ConfigProvider, RunOutcome, SinkKind};
use catalog_etl::utils::error::CatalogError;
use catalog_etl::utils::{logger, validation::Validate};
use catalog_etl::{build_sink, CatalogScraper, CliConfig, EtlEngine};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先載入設定檔，日誌格式可能由檔案決定
    let file_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(mut config) => {
                cli.apply_overrides(&mut config);
                Some(config)
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(e.exit_code());
            }
        },
        None => None,
    };

    // 初始化日誌
    let json_logs = file_config
        .as_ref()
        .map_or(cli.json_logs, TomlConfig::json_logs);
    if json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting catalog-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let dry_run = cli.dry_run;
    let result = match file_config {
        Some(config) => {
            if let Some(path) = &cli.config {
                tracing::info!("📁 Loaded configuration from: {}", path);
            }
            let monitor = config.monitoring_enabled();
            scrape(config, monitor, dry_run).await
        }
        None => {
            let monitor = cli.monitor;
            scrape(cli, monitor, dry_run).await
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Catalog scrape failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn scrape<C>(config: C, monitor: bool, dry_run: bool) -> Result<(), CatalogError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    tracing::info!("✅ Configuration validated");

    if dry_run {
        print_config_summary(&config);
        return Ok(());
    }

    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let sink = build_sink(&config);
    let scraper = CatalogScraper::new(sink, config)?;
    let engine = EtlEngine::new_with_monitoring(scraper, monitor);

    let report = engine.run().await?;
    if report.outcome == RunOutcome::StoppedAfterFirstCourse {
        tracing::info!(
            "ℹ️ Re-run with --stop-after-first-course false to emit every course"
        );
    }
    Ok(())
}

fn print_config_summary<C: ConfigProvider>(config: &C) {
    println!("📋 Configuration Summary:");
    println!("  Catalog URL: {}", config.catalog_url());
    match config.timeout() {
        Some(timeout) => println!("  Timeout: {:?}", timeout),
        None => println!("  Timeout: none"),
    }
    if let Some(user_agent) = config.user_agent() {
        println!("  User-Agent: {}", user_agent);
    }
    println!(
        "  Stop after first course: {}",
        config.stop_after_first_course()
    );
    println!("  Sink: {:?}", config.sink());
    if config.sink() == SinkKind::File {
        println!("  Output: {}", config.output_path());
        println!("  Formats: {}", config.output_formats().join(", "));
        println!("  Compression: {}", config.compress());
    }
    println!("🔍 DRY RUN - nothing was fetched");
}
