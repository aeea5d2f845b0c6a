use async_trait::async_trait;
use aws_sdk_config::types::{ComplianceType, Evaluation};
use aws_sdk_config::Client as ConfigClient;
use aws_sdk_ec2::types::{Filter, IpPermission};
use aws_sdk_ec2::Client as Ec2Client;
use std::env;

use crate::domain::model::{ComplianceRecord, ComplianceStatus, IngressRule, InstanceId, SecurityGroupId};
use crate::domain::ports::{EvaluationSink, InstanceDirectory, SecurityGroupDirectory};
use crate::utils::error::{Result, RuleError};

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub region: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Self {
        Self {
            region: env::var("RULE_REGION").ok(),
        }
    }
}

/// Directory backed by the EC2 API. Every SDK failure maps to
/// [`RuleError::DirectoryLookup`] so a transient fault aborts the
/// evaluation instead of reading as an empty account.
#[derive(Debug, Clone)]
pub struct Ec2Directory {
    client: Ec2Client,
}

impl Ec2Directory {
    pub fn new(client: Ec2Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InstanceDirectory for Ec2Directory {
    async fn instances_with_group(&self, group_id: &str) -> Result<Vec<InstanceId>> {
        let filter = Filter::builder()
            .name("instance.group-id")
            .values(group_id)
            .build();

        let mut instance_ids = Vec::new();
        let mut pages = self
            .client
            .describe_instances()
            .filters(filter)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| RuleError::DirectoryLookup {
                context: format!("describe-instances for group {}: {}", group_id, e),
            })?;
            for reservation in page.reservations() {
                for instance in reservation.instances() {
                    if let Some(instance_id) = instance.instance_id() {
                        instance_ids.push(instance_id.to_string());
                    }
                }
            }
        }
        Ok(instance_ids)
    }

    async fn groups_for_instance(&self, instance_id: &str) -> Result<Vec<SecurityGroupId>> {
        let output = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| RuleError::DirectoryLookup {
                context: format!("describe-instances for {}: {}", instance_id, e),
            })?;

        let instance = output
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .find(|instance| instance.instance_id() == Some(instance_id))
            .ok_or_else(|| RuleError::DirectoryLookup {
                context: format!("instance {} not found", instance_id),
            })?;

        Ok(instance
            .security_groups()
            .iter()
            .filter_map(|group| group.group_id())
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl SecurityGroupDirectory for Ec2Directory {
    async fn ingress_rules(&self, group_id: &str) -> Result<Vec<IngressRule>> {
        let output = self
            .client
            .describe_security_groups()
            .group_ids(group_id)
            .send()
            .await
            .map_err(|e| RuleError::DirectoryLookup {
                context: format!("describe-security-groups for {}: {}", group_id, e),
            })?;

        let group = output
            .security_groups()
            .first()
            .ok_or_else(|| RuleError::DirectoryLookup {
                context: format!("security group {} not found", group_id),
            })?;

        Ok(group
            .ip_permissions()
            .iter()
            .map(|permission| {
                let (from_port, to_port) = port_bounds(permission);
                IngressRule {
                    from_port,
                    to_port,
                    ip_ranges: permission
                        .ip_ranges()
                        .iter()
                        .filter_map(|range| range.cidr_ip())
                        .map(str::to_string)
                        .collect(),
                }
            })
            .collect())
    }
}

// All-traffic permissions (protocol "-1") carry no port bounds; they open
// every port.
fn port_bounds(permission: &IpPermission) -> (u16, u16) {
    match (permission.from_port(), permission.to_port()) {
        (Some(from), Some(to)) => (clamp_port(from), clamp_port(to)),
        _ => (0, u16::MAX),
    }
}

fn clamp_port(port: i32) -> u16 {
    port.clamp(0, i32::from(u16::MAX)) as u16
}

/// Submits the record batch to the Config service with the invocation's
/// result token.
#[derive(Debug, Clone)]
pub struct ConfigServiceSink {
    client: ConfigClient,
}

impl ConfigServiceSink {
    pub fn new(client: ConfigClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EvaluationSink for ConfigServiceSink {
    async fn submit(&self, records: &[ComplianceRecord], result_token: &str) -> Result<()> {
        let mut evaluations = Vec::with_capacity(records.len());
        for record in records {
            let evaluation = Evaluation::builder()
                .compliance_resource_type(record.compliance_resource_type.clone())
                .compliance_resource_id(record.compliance_resource_id.clone())
                .compliance_type(compliance_type(record.compliance_type))
                .annotation(record.annotation.clone())
                .ordering_timestamp(aws_sdk_config::primitives::DateTime::from_millis(
                    record.ordering_timestamp.timestamp_millis(),
                ))
                .build()
                .map_err(|e| RuleError::Submission {
                    message: format!("invalid evaluation: {}", e),
                })?;
            evaluations.push(evaluation);
        }

        let output = self
            .client
            .put_evaluations()
            .set_evaluations(Some(evaluations))
            .result_token(result_token)
            .send()
            .await
            .map_err(|e| RuleError::Submission {
                message: format!("put-evaluations: {}", e),
            })?;

        let failed = output.failed_evaluations();
        if !failed.is_empty() {
            return Err(RuleError::Submission {
                message: format!("{} evaluation(s) rejected by the Config service", failed.len()),
            });
        }
        Ok(())
    }
}

fn compliance_type(status: ComplianceStatus) -> ComplianceType {
    match status {
        ComplianceStatus::Compliant => ComplianceType::Compliant,
        ComplianceStatus::NonCompliant => ComplianceType::NonCompliant,
        ComplianceStatus::NotApplicable => ComplianceType::NotApplicable,
    }
}
