//! The desired-state specification of an event-bus rule.

use events_api::{PutRuleInput, RuleState, Target};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Desired state of one rule, as handed over by the host runtime.
///
/// `name` is the rule's stable identity. `event_pattern` is the structured
/// mapping form of the pattern; the remote stores it serialized, so string
/// formatting never participates in equality (see the diff engine).
/// `targets` is a set keyed by target id; [`ResourceModel::validate`]
/// rejects duplicate ids before any remote call is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceModel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_pattern: Option<serde_json::Value>,
    pub state: RuleState,
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// A desired model the engine refuses to reconcile.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Two targets share an id; the convergence delta would be ambiguous.
    #[error("duplicate target id: {0}")]
    DuplicateTargetId(String),
}

impl ResourceModel {
    /// The pattern in the serialized form the remote stores.
    pub fn serialized_pattern(&self) -> Option<String> {
        self.event_pattern.as_ref().map(|pattern| pattern.to_string())
    }

    /// The rule's scalar attributes as the one atomic record `put_rule`
    /// accepts: name, description, pattern, and state always travel
    /// together, never as a partial patch.
    pub fn attribute_record(&self) -> PutRuleInput {
        PutRuleInput {
            name: self.name.clone(),
            description: self.description.clone(),
            event_pattern: self.serialized_pattern(),
            state: self.state,
        }
    }

    /// Target ids must be unique within one rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.id.as_str()) {
                return Err(ValidationError::DuplicateTargetId(target.id.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model_with_targets(targets: Vec<Target>) -> ResourceModel {
        ResourceModel {
            name: "TestRule".to_string(),
            description: None,
            event_pattern: None,
            state: RuleState::Enabled,
            targets,
        }
    }

    #[test]
    fn duplicate_target_ids_are_rejected() {
        let model = model_with_targets(vec![
            Target::new("same", "arn:a"),
            Target::new("same", "arn:b"),
        ]);
        assert_eq!(
            model.validate(),
            Err(ValidationError::DuplicateTargetId("same".to_string()))
        );
    }

    #[test]
    fn unique_target_ids_pass_validation() {
        let model = model_with_targets(vec![Target::new("a", "arn:a"), Target::new("b", "arn:b")]);
        assert_eq!(model.validate(), Ok(()));
    }

    #[test]
    fn model_round_trips_camel_case_json() {
        let json = json!({
            "name": "TestRule",
            "description": "d",
            "eventPattern": {"source": ["aws.ec2"]},
            "state": "ENABLED",
            "targets": [{"id": "t1", "arn": "arn:x"}]
        });
        let model: ResourceModel = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(model.targets[0].id, "t1");
        assert_eq!(serde_json::to_value(&model).unwrap(), json);
    }
}
