use crate::core::portspec::expand_port_spec;
use crate::domain::model::ForbiddenPorts;
use crate::utils::error::{Result, RuleError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Every forbidden-port spec must expand before any directory lookup runs.
/// A spec skipped as malformed would surface as a false COMPLIANT result.
impl Validate for ForbiddenPorts {
    fn validate(&self) -> Result<()> {
        for (_label, spec) in self.iter() {
            expand_port_spec(spec)?;
        }
        Ok(())
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RuleError::ConfigError {
            field: field_name.to_string(),
            reason: "value cannot be empty".to_string(),
        });
    }
    Ok(())
}
