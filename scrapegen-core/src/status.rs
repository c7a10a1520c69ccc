//! Status reported back on a monitoring-target resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condition types a monitoring target can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionType {
    /// The scrape configuration generated from the resource was created successfully.
    ConfigurationCreateSuccess,
}

/// Tri-state condition status, as used by Kubernetes conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

/// One observed condition of a monitoring target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringCondition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub status: ConditionStatus,
    pub last_update_time: DateTime<Utc>,
    /// Last time `status` changed value.
    pub last_transition_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Most recently observed status of a monitoring target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStatus {
    pub observed_generation: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<MonitoringCondition>,
}

/// Conditions for a resource that has never been processed.
pub fn default_conditions(now: DateTime<Utc>) -> Vec<MonitoringCondition> {
    vec![MonitoringCondition {
        condition_type: ConditionType::ConfigurationCreateSuccess,
        status: ConditionStatus::Unknown,
        last_update_time: now,
        last_transition_time: now,
        reason: String::new(),
        message: String::new(),
    }]
}

impl MonitoringStatus {
    /// Record `condition`, replacing any earlier condition of the same type.
    ///
    /// The transition time of the earlier condition survives when the status
    /// value did not change.
    pub fn set_condition(&mut self, mut condition: MonitoringCondition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.condition_type == condition.condition_type)
        {
            Some(existing) => {
                if existing.status == condition.status {
                    condition.last_transition_time = existing.last_transition_time;
                }
                *existing = condition;
            }
            None => self.conditions.push(condition),
        }
    }

    pub fn condition(&self, condition_type: ConditionType) -> Option<&MonitoringCondition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
    }
}
