use crate::domain::model::{ComplianceRecord, IngressRule, InstanceId, SecurityGroupId};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read-only view of instances and their current group attachments.
#[async_trait]
pub trait InstanceDirectory: Send + Sync {
    /// Ids of every instance currently attached to the given security group.
    async fn instances_with_group(&self, group_id: &str) -> Result<Vec<InstanceId>>;

    /// The instance's complete current group membership.
    async fn groups_for_instance(&self, instance_id: &str) -> Result<Vec<SecurityGroupId>>;
}

#[async_trait]
pub trait SecurityGroupDirectory: Send + Sync {
    /// Ingress permissions of the given security group.
    async fn ingress_rules(&self, group_id: &str) -> Result<Vec<IngressRule>>;
}

/// Outbound submission to the policy engine. Called once per invocation with
/// the complete record batch.
#[async_trait]
pub trait EvaluationSink: Send + Sync {
    async fn submit(&self, records: &[ComplianceRecord], result_token: &str) -> Result<()>;
}
