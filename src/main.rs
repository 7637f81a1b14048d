use clap::Parser;
use knowcode_leaderboard::utils::{logger, validation::Validate};
use knowcode_leaderboard::{
    CliConfig, FirestoreSource, LeaderboardConfig, LeaderboardEngine, LeaderboardPipeline,
    LocalStorage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting knowcode-leaderboard");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.severity().exit_code());
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - configuration is valid, nothing fetched");
        return Ok(());
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = FirestoreSource::new(&config.source)?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = LeaderboardPipeline::new(source, storage, config);
    let engine = LeaderboardEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Leaderboard built successfully!");
            println!("✅ Leaderboard built successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Leaderboard build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &LeaderboardConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!(
        "  Source: {} (project: {}, database: {})",
        config.source.base_url,
        config.source.project_id.as_deref().unwrap_or("-"),
        config.source.database
    );
    tracing::info!(
        "  Collections: {} / {}",
        config.source.ratings_collection,
        config.source.projects_collection
    );
    tracing::info!("  Merge mode: {:?}", config.ranking.merge);
    tracing::info!("  Output: {} ({})", config.output.path, config.output.formats.join(", "));
    if config.output.bundle {
        tracing::info!("  Bundle: {}", config.output.bundle_filename);
    }
}
