use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::domain::model::{
    ComplianceRecord, ComplianceStatus, InstanceId, SecurityGroupId, INSTANCE_RESOURCE_TYPE,
};

pub const COMPLIANT_ANNOTATION: &str = "This resource is compliant with the rule.";

/// One record per evaluated instance, stamped with the capture time of the
/// triggering configuration item.
pub fn instance_records(
    violations: &BTreeMap<InstanceId, Vec<SecurityGroupId>>,
    capture_time: DateTime<Utc>,
) -> Vec<ComplianceRecord> {
    violations
        .iter()
        .map(|(instance_id, groups)| {
            let (status, annotation) = if groups.is_empty() {
                (ComplianceStatus::Compliant, COMPLIANT_ANNOTATION.to_string())
            } else {
                (
                    ComplianceStatus::NonCompliant,
                    format!("Instance has non compliant groups {}", groups.join(",")),
                )
            };
            ComplianceRecord {
                compliance_resource_type: INSTANCE_RESOURCE_TYPE.to_string(),
                compliance_resource_id: instance_id.clone(),
                compliance_type: status,
                annotation,
                ordering_timestamp: capture_time,
            }
        })
        .collect()
}

/// The single record emitted when the triggering resource kind is not one
/// the rule evaluates.
pub fn not_applicable_record(
    resource_type: &str,
    resource_id: &str,
    capture_time: DateTime<Utc>,
) -> ComplianceRecord {
    ComplianceRecord {
        compliance_resource_type: resource_type.to_string(),
        compliance_resource_id: resource_id.to_string(),
        compliance_type: ComplianceStatus::NotApplicable,
        annotation: format!(
            "The rule doesn't apply to resources of type {}.",
            resource_type
        ),
        ordering_timestamp: capture_time,
    }
}
