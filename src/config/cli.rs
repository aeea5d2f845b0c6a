use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

use crate::domain::model::{IngressRule, InstanceId, SecurityGroupId};
use crate::domain::ports::{InstanceDirectory, SecurityGroupDirectory};
use crate::utils::error::{Result, RuleError};

/// A recorded account view: instance → attached groups, group → ingress
/// rules. Lets the rule run offline against fixture data instead of live
/// EC2.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountSnapshot {
    #[serde(default)]
    pub instances: BTreeMap<InstanceId, Vec<SecurityGroupId>>,
    #[serde(default)]
    pub security_groups: BTreeMap<SecurityGroupId, Vec<IngressRule>>,
}

#[derive(Debug, Clone)]
pub struct SnapshotDirectory {
    snapshot: AccountSnapshot,
}

impl SnapshotDirectory {
    pub fn new(snapshot: AccountSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&data)?))
    }
}

#[async_trait]
impl InstanceDirectory for SnapshotDirectory {
    async fn instances_with_group(&self, group_id: &str) -> Result<Vec<InstanceId>> {
        Ok(self
            .snapshot
            .instances
            .iter()
            .filter(|(_, groups)| groups.iter().any(|g| g == group_id))
            .map(|(instance_id, _)| instance_id.clone())
            .collect())
    }

    async fn groups_for_instance(&self, instance_id: &str) -> Result<Vec<SecurityGroupId>> {
        self.snapshot
            .instances
            .get(instance_id)
            .cloned()
            .ok_or_else(|| RuleError::DirectoryLookup {
                context: format!("instance {} not found in snapshot", instance_id),
            })
    }
}

#[async_trait]
impl SecurityGroupDirectory for SnapshotDirectory {
    async fn ingress_rules(&self, group_id: &str) -> Result<Vec<IngressRule>> {
        self.snapshot
            .security_groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| RuleError::DirectoryLookup {
                context: format!("security group {} not found in snapshot", group_id),
            })
    }
}
