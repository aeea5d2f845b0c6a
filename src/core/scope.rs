use std::collections::BTreeSet;

use crate::domain::model::{EvaluationScope, SecurityGroupId};
use crate::domain::ports::InstanceDirectory;
use crate::utils::error::Result;

/// Expands a triggering resource into the full set of instances and security
/// groups one invocation must re-evaluate.
pub struct ScopeResolver<'a, D: InstanceDirectory> {
    directory: &'a D,
}

impl<'a, D: InstanceDirectory> ScopeResolver<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// A group change can only affect instances attached to that group, but
    /// each affected instance must be re-checked against its complete
    /// current group set: any one violating group makes the instance
    /// non-compliant no matter which group changed. The per-instance group
    /// set comes from a fresh detail lookup, never a cached view.
    pub async fn from_security_group(&self, group_id: &str) -> Result<EvaluationScope> {
        let mut scope = EvaluationScope::default();
        for instance_id in self.directory.instances_with_group(group_id).await? {
            let groups =
                dedup_in_order(self.directory.groups_for_instance(&instance_id).await?);
            scope.groups_to_check.extend(groups.iter().cloned());
            scope.instances.insert(instance_id, groups);
        }
        Ok(scope)
    }

    /// An instance change scopes to that instance alone; the groups to check
    /// are exactly its current attachments.
    pub async fn from_instance(&self, instance_id: &str) -> Result<EvaluationScope> {
        let groups = dedup_in_order(self.directory.groups_for_instance(instance_id).await?);
        let mut scope = EvaluationScope::default();
        scope.groups_to_check.extend(groups.iter().cloned());
        scope.instances.insert(instance_id.to_string(), groups);
        Ok(scope)
    }
}

// Group membership is a set; keep first-seen order so annotations stay
// deterministic.
fn dedup_in_order(groups: Vec<SecurityGroupId>) -> Vec<SecurityGroupId> {
    let mut seen = BTreeSet::new();
    groups
        .into_iter()
        .filter(|group| seen.insert(group.clone()))
        .collect()
}
