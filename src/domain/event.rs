use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::model::{
    ForbiddenPorts, RuleInvocation, TriggerResource, INSTANCE_RESOURCE_TYPE,
    SECURITY_GROUP_RESOURCE_TYPE,
};
use crate::utils::error::{Result, RuleError};
use crate::utils::validation::Validate;

/// Placeholder used when the invoking payload carries no result token.
pub const DEFAULT_RESULT_TOKEN: &str = "No token found.";

/// Raw AWS Config rule event. `invokingEvent` and `ruleParameters` arrive as
/// embedded JSON strings and are unpacked by [`RuleInvocation::from_event`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvent {
    pub invoking_event: String,
    #[serde(default)]
    pub rule_parameters: Option<String>,
    #[serde(default)]
    pub result_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokingEvent {
    pub configuration_item: ConfigurationItem,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    pub resource_type: String,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub configuration: ResourceConfiguration,
    #[serde(default)]
    pub configuration_item_capture_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfiguration {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl RuleInvocation {
    /// Unpacks and validates the raw event before anything enters the core.
    /// Unsupported resource types classify as [`TriggerResource::Unsupported`]
    /// rather than erroring; a supported type missing its id is a malformed
    /// event.
    pub fn from_event(event: &RuleEvent) -> Result<Self> {
        let invoking: InvokingEvent =
            serde_json::from_str(&event.invoking_event).map_err(|e| RuleError::InvalidEvent {
                message: format!("invokingEvent is not valid JSON: {}", e),
            })?;
        let item = invoking.configuration_item;

        let trigger = match item.resource_type.as_str() {
            SECURITY_GROUP_RESOURCE_TYPE => {
                let group_id =
                    item.configuration
                        .group_id
                        .clone()
                        .ok_or_else(|| RuleError::InvalidEvent {
                            message: "security group configuration item has no groupId".to_string(),
                        })?;
                TriggerResource::SecurityGroup(group_id)
            }
            INSTANCE_RESOURCE_TYPE => {
                let instance_id =
                    item.configuration
                        .instance_id
                        .clone()
                        .ok_or_else(|| RuleError::InvalidEvent {
                            message: "instance configuration item has no instanceId".to_string(),
                        })?;
                TriggerResource::Instance(instance_id)
            }
            other => TriggerResource::Unsupported {
                resource_type: other.to_string(),
                resource_id: item.resource_id.clone().unwrap_or_default(),
            },
        };

        let forbidden: ForbiddenPorts = match &event.rule_parameters {
            Some(raw) => serde_json::from_str(raw).map_err(|e| RuleError::InvalidEvent {
                message: format!("ruleParameters is not valid JSON: {}", e),
            })?,
            None => ForbiddenPorts::default(),
        };
        forbidden.validate()?;

        let capture_time = parse_capture_time(item.configuration_item_capture_time.as_deref());

        Ok(Self {
            trigger,
            forbidden,
            capture_time,
            result_token: event
                .result_token
                .clone()
                .unwrap_or_else(|| DEFAULT_RESULT_TOKEN.to_string()),
        })
    }
}

/// The capture time only orders evaluations, so a missing or unparseable
/// value falls back to the invocation time instead of failing the run.
fn parse_capture_time(raw: Option<&str>) -> DateTime<Utc> {
    match raw {
        Some(value) => match DateTime::parse_from_rfc3339(value) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!(
                    "Unparseable capture time '{}' ({}), using invocation time",
                    value,
                    e
                );
                Utc::now()
            }
        },
        None => {
            tracing::warn!("Configuration item has no capture time, using invocation time");
            Utc::now()
        }
    }
}
