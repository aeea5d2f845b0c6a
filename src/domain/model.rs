use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type InstanceId = String;
pub type SecurityGroupId = String;

/// The CIDR range matching any IPv4 source.
pub const UNRESTRICTED_SOURCE: &str = "0.0.0.0/0";

pub const INSTANCE_RESOURCE_TYPE: &str = "AWS::EC2::Instance";
pub const SECURITY_GROUP_RESOURCE_TYPE: &str = "AWS::EC2::SecurityGroup";

/// One ingress permission entry on a security group. Ports are an inclusive
/// range; sources are IPv4 CIDR strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressRule {
    pub from_port: u16,
    pub to_port: u16,
    pub ip_ranges: Vec<String>,
}

/// Rule parameters: arbitrary label mapped to a port spec, either a single
/// port ("80") or an inclusive range ("0-1024").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForbiddenPorts(pub BTreeMap<String, String>);

impl ForbiddenPorts {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The closure of resources one invocation must consider: each affected
/// instance with its current group attachments (first-seen order,
/// deduplicated) and the union of all groups that need a rule check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationScope {
    pub instances: BTreeMap<InstanceId, Vec<SecurityGroupId>>,
    pub groups_to_check: BTreeSet<SecurityGroupId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    NotApplicable,
}

/// One output row, shaped for the Config service put-evaluations call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComplianceRecord {
    pub compliance_resource_type: String,
    pub compliance_resource_id: String,
    pub compliance_type: ComplianceStatus,
    pub annotation: String,
    pub ordering_timestamp: DateTime<Utc>,
}

/// The resource that triggered this invocation, classified at the adapter
/// boundary. Unsupported kinds never reach the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerResource {
    SecurityGroup(SecurityGroupId),
    Instance(InstanceId),
    Unsupported {
        resource_type: String,
        resource_id: String,
    },
}

/// A fully parsed and validated invocation, the only input the core takes.
#[derive(Debug, Clone)]
pub struct RuleInvocation {
    pub trigger: TriggerResource,
    pub forbidden: ForbiddenPorts,
    pub capture_time: DateTime<Utc>,
    pub result_token: String,
}
