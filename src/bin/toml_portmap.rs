use clap::Parser;
use compose_portmap::config::toml_config::TomlConfig;
use compose_portmap::console::{exit_with, print_summary};
use compose_portmap::core::generator::Rendered;
use compose_portmap::core::ConfigProvider;
use compose_portmap::utils::logger::{self, LogFormat};
use compose_portmap::utils::validation::Validate;
use compose_portmap::{LocalProbe, LocalStorage, PortMapEngine, PortPipeline};

#[derive(Parser)]
#[command(name = "toml-portmap")]
#[command(about = "Port mapping generator driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "portmap.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the scan.skip setting from config
    #[arg(long)]
    skip_scan: Option<bool>,

    /// Override the output path from config
    #[arg(short, long)]
    output: Option<String>,

    /// Dry run - render everything but write nothing
    #[arg(long)]
    dry_run: bool,

    #[arg(long, value_enum, default_value = "compact")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose, args.log_format);

    tracing::info!("🚀 Starting TOML-based port mapper");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    if let Some(skip) = args.skip_scan {
        config.scan.skip = skip;
        tracing::info!("🔧 Port scan skip overridden to: {}", skip);
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
        tracing::info!("🔧 Output path overridden to: {}", output);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    let storage = LocalStorage::new(config.output_path().to_string());
    let probe = LocalProbe::new(config.bind_host(), config.skip_scan());
    let pipeline = PortPipeline::new(storage, config, probe);
    let engine = PortMapEngine::new(pipeline);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        match engine.preview().await {
            Ok(rendered) => display_dry_run(&rendered),
            Err(e) => exit_with(&e),
        }
        return;
    }

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Port configuration generated");
            print_summary(&summary.report);
            println!();
            println!("📁 Files written:");
            for file in &summary.files {
                println!("  {}", file);
            }
        }
        Err(e) => exit_with(&e),
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let settings = config.registry_settings();

    println!("📋 Configuration Summary:");
    println!("  Output: {}", config.output_path());
    println!("  Report: {}", config.report_file());
    println!("  Formats: {}", config.output_formats().join(", "));
    if let Some(bundle) = config.bundle_file() {
        println!("  Bundle: {} (ZIP)", bundle);
    }
    println!(
        "  Port Scan: {}",
        if config.skip_scan() {
            "skipped".to_string()
        } else {
            format!("bind probe on {}", config.bind_host())
        }
    );
    println!("  Frontend Projects: {}", settings.frontend_project_count);
    println!("  Strict Ranges: {}", settings.strict_ranges);
    if !settings.extra_services.is_empty() {
        println!("  Extra Services: {}", settings.extra_services.len());
    }
    if !settings.group_overrides.is_empty() {
        println!("  Group Overrides: {}", settings.group_overrides.len());
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn display_dry_run(rendered: &Rendered) {
    print_summary(&rendered.report);

    println!();
    println!("💾 Files that would be written:");
    for artifact in &rendered.artifacts {
        println!(
            "  {} ({} bytes, {})",
            artifact.file_name,
            artifact.data.len(),
            artifact.target
        );
    }
}
