use anyhow::Context;
use clap::Parser;
use ec2_port_rule::utils::{logger, validation::Validate};
use ec2_port_rule::{CliConfig, RuleEngine, RuleEvent, RuleInvocation, SnapshotDirectory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting ec2-port-rule CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let raw_event = std::fs::read_to_string(&config.event)
        .with_context(|| format!("reading event file {}", config.event))?;
    let event: RuleEvent =
        serde_json::from_str(&raw_event).context("parsing rule event")?;
    let invocation = RuleInvocation::from_event(&event)?;

    let directory = SnapshotDirectory::from_file(&config.snapshot)
        .with_context(|| format!("loading snapshot {}", config.snapshot))?;
    let engine = RuleEngine::new(&directory, &directory);

    match engine.run(&invocation).await {
        Ok(records) => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Err(e) => {
            tracing::error!("Evaluation failed: {}", e);
            eprintln!("Evaluation failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
