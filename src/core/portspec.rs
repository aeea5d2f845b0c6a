use std::collections::BTreeSet;

use crate::domain::model::{ForbiddenPorts, IngressRule, UNRESTRICTED_SOURCE};
use crate::utils::error::{Result, RuleError};

/// Expand a port spec into the concrete set of ports: "0-1024" is the
/// inclusive range, "80" the single port.
pub fn expand_port_spec(spec: &str) -> Result<BTreeSet<u16>> {
    match spec.split_once('-') {
        Some((lower, upper)) => {
            let lower = parse_port(spec, lower)?;
            let upper = parse_port(spec, upper)?;
            if lower > upper {
                return Err(RuleError::InvalidPortSpec {
                    spec: spec.to_string(),
                    reason: format!("lower bound {} is above upper bound {}", lower, upper),
                });
            }
            Ok((lower..=upper).collect())
        }
        None => Ok(BTreeSet::from([parse_port(spec, spec)?])),
    }
}

fn parse_port(spec: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| RuleError::InvalidPortSpec {
            spec: spec.to_string(),
            reason: format!("'{}' is not a valid port number", value),
        })
}

/// Every port an unrestricted source can reach through the given rules.
/// Rules without a 0.0.0.0/0 source contribute nothing.
pub fn exposed_ports(rules: &[IngressRule]) -> BTreeSet<u16> {
    let mut exposed = BTreeSet::new();
    for rule in rules {
        if rule.ip_ranges.iter().any(|cidr| cidr == UNRESTRICTED_SOURCE) {
            exposed.extend(rule.from_port..=rule.to_port);
        }
    }
    exposed
}

/// True iff some forbidden spec intersects the exposed set. Stops at the
/// first intersecting spec; a malformed spec reached before any match
/// propagates as [`RuleError::InvalidPortSpec`].
pub fn has_violation(exposed: &BTreeSet<u16>, forbidden: &ForbiddenPorts) -> Result<bool> {
    for (_label, spec) in forbidden.iter() {
        let ports = expand_port_spec(spec)?;
        if ports.iter().any(|port| exposed.contains(port)) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn forbidden(pairs: &[(&str, &str)]) -> ForbiddenPorts {
        ForbiddenPorts(
            pairs
                .iter()
                .map(|(label, spec)| (label.to_string(), spec.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn open_rule(from: u16, to: u16) -> IngressRule {
        IngressRule {
            from_port: from,
            to_port: to,
            ip_ranges: vec![UNRESTRICTED_SOURCE.to_string()],
        }
    }

    #[test]
    fn expands_single_port() {
        assert_eq!(expand_port_spec("80").unwrap(), BTreeSet::from([80]));
    }

    #[test]
    fn expands_inclusive_range() {
        let ports = expand_port_spec("20-25").unwrap();
        assert_eq!(ports, (20u16..=25).collect::<BTreeSet<u16>>());
    }

    #[test]
    fn single_port_range_is_allowed() {
        assert_eq!(expand_port_spec("443-443").unwrap(), BTreeSet::from([443]));
    }

    #[test]
    fn rejects_non_numeric_bounds() {
        assert!(matches!(
            expand_port_spec("http").unwrap_err(),
            RuleError::InvalidPortSpec { .. }
        ));
        assert!(matches!(
            expand_port_spec("80-http").unwrap_err(),
            RuleError::InvalidPortSpec { .. }
        ));
    }

    #[test]
    fn rejects_negative_port() {
        assert!(matches!(
            expand_port_spec("-1").unwrap_err(),
            RuleError::InvalidPortSpec { .. }
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(matches!(
            expand_port_spec("1024-80").unwrap_err(),
            RuleError::InvalidPortSpec { .. }
        ));
    }

    #[test]
    fn no_unrestricted_source_exposes_nothing() {
        let rules = vec![IngressRule {
            from_port: 1,
            to_port: 100,
            ip_ranges: vec!["10.0.0.0/8".to_string(), "192.168.0.0/16".to_string()],
        }];
        assert!(exposed_ports(&rules).is_empty());
    }

    #[test]
    fn empty_rule_list_exposes_nothing() {
        assert!(exposed_ports(&[]).is_empty());
    }

    #[test]
    fn unrestricted_rule_exposes_its_whole_range() {
        let exposed = exposed_ports(&[open_rule(1, 100)]);
        assert_eq!(exposed.len(), 100);
        assert!(exposed.contains(&1));
        assert!(exposed.contains(&100));
        assert!(!exposed.contains(&101));
    }

    #[test]
    fn mixed_rules_only_expose_unrestricted_ranges() {
        let rules = vec![
            IngressRule {
                from_port: 22,
                to_port: 22,
                ip_ranges: vec!["10.0.0.0/8".to_string()],
            },
            open_rule(443, 443),
        ];
        assert_eq!(exposed_ports(&rules), BTreeSet::from([443]));
    }

    #[test]
    fn violation_iff_intersection_is_non_empty() {
        let exposed = exposed_ports(&[open_rule(1, 100)]);
        assert!(has_violation(&exposed, &forbidden(&[("web", "80")])).unwrap());
        assert!(!has_violation(&exposed, &forbidden(&[("high", "8080")])).unwrap());
        assert!(has_violation(&exposed, &forbidden(&[("range", "90-200")])).unwrap());
        assert!(!has_violation(&exposed, &forbidden(&[("range", "101-200")])).unwrap());
    }

    #[test]
    fn no_forbidden_specs_means_no_violation() {
        let exposed = exposed_ports(&[open_rule(1, 100)]);
        assert!(!has_violation(&exposed, &ForbiddenPorts::default()).unwrap());
    }

    #[test]
    fn malformed_spec_propagates_instead_of_passing() {
        let exposed = exposed_ports(&[open_rule(1, 100)]);
        let err = has_violation(&exposed, &forbidden(&[("bad", "9999999")])).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPortSpec { .. }));
    }
}
