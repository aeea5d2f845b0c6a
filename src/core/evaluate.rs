use std::collections::{BTreeMap, BTreeSet};

use crate::core::portspec::{exposed_ports, has_violation};
use crate::domain::model::{EvaluationScope, ForbiddenPorts, InstanceId, SecurityGroupId};
use crate::domain::ports::SecurityGroupDirectory;
use crate::utils::error::Result;

/// Fetches every group in the check set and keeps the ones exposing a
/// forbidden port to the unrestricted source. Groups are independent; a
/// lookup failure aborts the whole evaluation rather than skipping a group.
pub async fn find_violating_groups<G: SecurityGroupDirectory>(
    directory: &G,
    group_ids: &BTreeSet<SecurityGroupId>,
    forbidden: &ForbiddenPorts,
) -> Result<BTreeSet<SecurityGroupId>> {
    let mut violating = BTreeSet::new();
    for group_id in group_ids {
        let rules = directory.ingress_rules(group_id).await?;
        let exposed = exposed_ports(&rules);
        if has_violation(&exposed, forbidden)? {
            tracing::debug!("Security group {} exposes forbidden ports", group_id);
            violating.insert(group_id.clone());
        }
    }
    Ok(violating)
}

/// For every instance in scope, the subset of its attached groups that
/// violate, in the order the groups were discovered. An empty list means the
/// instance is compliant.
pub fn map_violations_to_instances(
    scope: &EvaluationScope,
    violating: &BTreeSet<SecurityGroupId>,
) -> BTreeMap<InstanceId, Vec<SecurityGroupId>> {
    scope
        .instances
        .iter()
        .map(|(instance_id, groups)| {
            let bad: Vec<SecurityGroupId> = groups
                .iter()
                .filter(|group| violating.contains(*group))
                .cloned()
                .collect();
            (instance_id.clone(), bad)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{IngressRule, UNRESTRICTED_SOURCE};
    use crate::utils::error::RuleError;
    use async_trait::async_trait;

    struct FixedGroups {
        groups: BTreeMap<SecurityGroupId, Vec<IngressRule>>,
    }

    #[async_trait]
    impl SecurityGroupDirectory for FixedGroups {
        async fn ingress_rules(&self, group_id: &str) -> Result<Vec<IngressRule>> {
            self.groups.get(group_id).cloned().ok_or_else(|| {
                RuleError::DirectoryLookup {
                    context: format!("unknown security group {}", group_id),
                }
            })
        }
    }

    fn open_to_world(from: u16, to: u16) -> IngressRule {
        IngressRule {
            from_port: from,
            to_port: to,
            ip_ranges: vec![UNRESTRICTED_SOURCE.to_string()],
        }
    }

    fn forbidden_web() -> ForbiddenPorts {
        ForbiddenPorts(BTreeMap::from([("web".to_string(), "80".to_string())]))
    }

    #[tokio::test]
    async fn keeps_only_groups_with_forbidden_exposure() {
        let directory = FixedGroups {
            groups: BTreeMap::from([
                ("sg-open".to_string(), vec![open_to_world(1, 100)]),
                (
                    "sg-internal".to_string(),
                    vec![IngressRule {
                        from_port: 80,
                        to_port: 80,
                        ip_ranges: vec!["10.0.0.0/8".to_string()],
                    }],
                ),
                ("sg-empty".to_string(), vec![]),
            ]),
        };
        let check: BTreeSet<SecurityGroupId> = directory.groups.keys().cloned().collect();

        let violating = find_violating_groups(&directory, &check, &forbidden_web())
            .await
            .unwrap();

        assert_eq!(violating, BTreeSet::from(["sg-open".to_string()]));
    }

    #[tokio::test]
    async fn missing_group_aborts_the_evaluation() {
        let directory = FixedGroups {
            groups: BTreeMap::new(),
        };
        let check = BTreeSet::from(["sg-ghost".to_string()]);

        let err = find_violating_groups(&directory, &check, &forbidden_web())
            .await
            .unwrap_err();
        assert!(matches!(err, RuleError::DirectoryLookup { .. }));
    }

    #[test]
    fn maps_violations_back_onto_each_instance() {
        let mut scope = EvaluationScope::default();
        scope.instances.insert(
            "i-1".to_string(),
            vec!["sg-1".to_string(), "sg-2".to_string()],
        );
        scope
            .instances
            .insert("i-2".to_string(), vec!["sg-2".to_string()]);
        scope.groups_to_check =
            BTreeSet::from(["sg-1".to_string(), "sg-2".to_string()]);

        let violating = BTreeSet::from(["sg-1".to_string()]);
        let violations = map_violations_to_instances(&scope, &violating);

        assert_eq!(violations["i-1"], vec!["sg-1"]);
        assert!(violations["i-2"].is_empty());
    }
}
