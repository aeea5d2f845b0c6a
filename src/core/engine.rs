use crate::core::scope::ScopeResolver;
use crate::core::{evaluate, report};
use crate::domain::model::{ComplianceRecord, RuleInvocation, TriggerResource};
use crate::domain::ports::{InstanceDirectory, SecurityGroupDirectory};
use crate::utils::error::Result;

/// Runs one evaluation start to finish: resolve the scope, find violating
/// groups, map them onto instances, build the records. Nothing is submitted
/// here; the caller hands the complete batch to its sink once, so an
/// externally imposed timeout between lookups never leaves partial output
/// submitted.
pub struct RuleEngine<'a, I, G> {
    instances: &'a I,
    groups: &'a G,
}

impl<'a, I: InstanceDirectory, G: SecurityGroupDirectory> RuleEngine<'a, I, G> {
    pub fn new(instances: &'a I, groups: &'a G) -> Self {
        Self { instances, groups }
    }

    pub async fn run(&self, invocation: &RuleInvocation) -> Result<Vec<ComplianceRecord>> {
        let resolver = ScopeResolver::new(self.instances);

        let scope = match &invocation.trigger {
            TriggerResource::SecurityGroup(group_id) => {
                tracing::info!("Resolving scope from security group {}", group_id);
                resolver.from_security_group(group_id).await?
            }
            TriggerResource::Instance(instance_id) => {
                tracing::info!("Resolving scope from instance {}", instance_id);
                resolver.from_instance(instance_id).await?
            }
            TriggerResource::Unsupported {
                resource_type,
                resource_id,
            } => {
                tracing::info!("Resource type {} is not applicable", resource_type);
                return Ok(vec![report::not_applicable_record(
                    resource_type,
                    resource_id,
                    invocation.capture_time,
                )]);
            }
        };

        tracing::info!(
            "Scope resolved: {} instance(s), {} security group(s) to check",
            scope.instances.len(),
            scope.groups_to_check.len()
        );

        let violating = evaluate::find_violating_groups(
            self.groups,
            &scope.groups_to_check,
            &invocation.forbidden,
        )
        .await?;
        tracing::info!("{} violating security group(s)", violating.len());

        let violations = evaluate::map_violations_to_instances(&scope, &violating);
        Ok(report::instance_records(&violations, invocation.capture_time))
    }
}
