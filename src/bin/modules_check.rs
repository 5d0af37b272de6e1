use anyhow::Context;
use clap::Parser;
use module_stats::config::TomlConfig;
use module_stats::domain::model::Lang;
use module_stats::utils::logger;
use module_stats::utils::validation::Validate;
use module_stats::{CoefficientStore, LocalModuleSource};

#[derive(Parser)]
#[command(name = "modules-check")]
#[command(about = "Validate module data files and print their contents")]
struct Args {
    /// Module data files; defaults to data.files from the configuration
    files: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Language used for display names
    #[arg(long, default_value = "en")]
    lang: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_lang(value: &str) -> Option<Lang> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_logger(args.verbose, "info", Default::default());

    let lang = parse_lang(&args.lang)
        .with_context(|| format!("unsupported language '{}', use ru, en, es or fr", args.lang))?;

    let source = if args.files.is_empty() {
        let config = match &args.config {
            Some(path) => TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?,
            None => TomlConfig::default(),
        };
        config.validate().context("invalid configuration")?;
        config.module_source()
    } else {
        LocalModuleSource::new(args.files.clone())
    };

    let store = CoefficientStore::load(&source).map_err(|e| {
        eprintln!("💡 {}", e.recovery_suggestion());
        anyhow::Error::new(e).context("module data is invalid")
    })?;

    println!("📋 Module Data Summary:");
    println!("  Files: {}", source.files().join(", "));
    println!("  Modules: {}", store.len());
    for (group, count) in store.group_counts() {
        println!("  Group '{}': {}", group, count);
    }
    println!();

    for (key, module) in store.iter() {
        let name = module.display_name(lang).unwrap_or_default();
        println!("{} [{} / {}] {}", key, module.group, module.module_type, name);
        for (stat, c) in &module.stats {
            println!("    {} = {} + {} * q", stat, c.a, c.b);
        }
    }

    Ok(())
}
