use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Compact human-readable output for local runs.
pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        env_filter("ec2_port_rule=debug,info")
    } else {
        env_filter("ec2_port_rule=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

/// JSON lines, the format CloudWatch ingests.
pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(env_filter("ec2_port_rule=info"))
        .with(tracing_subscriber::fmt::layer().with_target(false).json())
        .init();
}
