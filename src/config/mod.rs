#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "ec2-port-rule")]
#[command(about = "Evaluate EC2 instances for forbidden open ports")]
pub struct CliConfig {
    /// Recorded rule event (JSON file)
    #[arg(long)]
    pub event: String,

    /// Account snapshot with instances and security groups (JSON file)
    #[arg(long)]
    pub snapshot: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("event", &self.event)?;
        validate_non_empty_string("snapshot", &self.snapshot)?;
        Ok(())
    }
}
