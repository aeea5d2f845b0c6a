pub mod engine;
pub mod evaluate;
pub mod portspec;
pub mod report;
pub mod scope;

pub use crate::domain::model::{
    ComplianceRecord, ComplianceStatus, EvaluationScope, ForbiddenPorts, IngressRule,
    RuleInvocation, TriggerResource,
};
pub use crate::domain::ports::{EvaluationSink, InstanceDirectory, SecurityGroupDirectory};
pub use crate::utils::error::Result;
