use clap::Parser;
use compose_portmap::console::{exit_with, print_summary};
use compose_portmap::core::ConfigProvider;
use compose_portmap::utils::{logger, validation::Validate};
use compose_portmap::{CliConfig, LocalProbe, LocalStorage, PortMapEngine, PortPipeline};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose, config.log_format);

    tracing::info!("Starting compose-portmap");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let probe = LocalProbe::new(config.bind_host(), config.skip_scan());
    let pipeline = PortPipeline::new(storage, config, probe);

    let engine = PortMapEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Port configuration generated");
            print_summary(&summary.report);
            println!();
            println!("📁 Output saved to: {}", engine.pipeline().config().output_path());
            for file in &summary.files {
                println!("  {}", file);
            }
        }
        Err(e) => exit_with(&e),
    }
}
