use clap::Parser;
use module_stats::utils::error::{ErrorSeverity, StatsError};
use module_stats::utils::logger;
use module_stats::{app, CliConfig};

fn exit_with(e: &StatsError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_logger(cli.verbose, "info", Default::default());
            exit_with(&e);
        }
    };

    logger::init_logger(cli.verbose, &config.logging.level, config.logging.format);
    tracing::info!("Starting module-stats");
    tracing::debug!("Resolved config: {:?}", config);

    if cli.check {
        match app::load_service(&config) {
            Ok((_, summary)) => {
                println!("✅ {} modules loaded from {} file(s)", summary.modules, summary.files.len());
                for (group, count) in &summary.groups {
                    println!("  {}: {}", group, count);
                }
                return;
            }
            Err(e) => exit_with(&e),
        }
    }

    if let Err(e) = app::serve(config).await {
        exit_with(&e);
    }
}
