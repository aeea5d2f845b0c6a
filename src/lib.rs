pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{
    cli::{AccountSnapshot, SnapshotDirectory},
    CliConfig,
};

#[cfg(feature = "lambda")]
pub use crate::config::lambda::{ConfigServiceSink, Ec2Directory, LambdaConfig};

pub use crate::core::engine::RuleEngine;
pub use crate::domain::event::RuleEvent;
pub use crate::domain::model::{
    ComplianceRecord, ComplianceStatus, RuleInvocation, TriggerResource,
};
pub use crate::domain::ports::{EvaluationSink, InstanceDirectory, SecurityGroupDirectory};
pub use crate::utils::error::{Result, RuleError};
