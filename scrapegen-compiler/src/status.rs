//! Maps compile outcomes onto status conditions.

use chrono::{DateTime, Utc};
use scrapegen_core::{
    CompileResult, ConditionStatus, ConditionType, MonitoringCondition, MonitoringStatus,
    MonitoringTarget,
};

pub const REASON_COMPILED: &str = "ScrapeConfigCompiled";
pub const REASON_INVALID: &str = "ScrapeConfigInvalid";

/// `ConfigurationCreateSuccess` condition for a compile outcome.
///
/// The transition time is taken from `previous` when the status value is
/// unchanged.
pub fn condition_from_result<T>(
    result: &CompileResult<T>,
    previous: Option<&MonitoringCondition>,
    now: DateTime<Utc>,
) -> MonitoringCondition {
    let (status, reason, message) = match result {
        Ok(_) => (ConditionStatus::True, REASON_COMPILED, String::new()),
        Err(e) => (ConditionStatus::False, REASON_INVALID, e.to_string()),
    };
    let last_transition_time = match previous {
        Some(p) if p.status == status => p.last_transition_time,
        _ => now,
    };
    MonitoringCondition {
        condition_type: ConditionType::ConfigurationCreateSuccess,
        status,
        last_update_time: now,
        last_transition_time,
        reason: reason.to_string(),
        message,
    }
}

/// Status to report after compiling `target`, building on `previous`.
pub fn observe<T>(
    target: &MonitoringTarget,
    result: &CompileResult<T>,
    previous: &MonitoringStatus,
    now: DateTime<Utc>,
) -> MonitoringStatus {
    let mut status = previous.clone();
    status.observed_generation = target.generation;
    let condition = condition_from_result(
        result,
        previous.condition(ConditionType::ConfigurationCreateSuccess),
        now,
    );
    status.set_condition(condition);
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use scrapegen_core::{default_conditions, CompileError};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_success_condition() {
        let c = condition_from_result(&Ok::<(), CompileError>(()), None, at(5));
        assert_eq!(c.status, ConditionStatus::True);
        assert_eq!(c.reason, REASON_COMPILED);
        assert!(c.message.is_empty());
        assert_eq!(c.last_transition_time, at(5));
    }

    #[test]
    fn test_failure_carries_message() {
        let result: CompileResult<()> = Err(CompileError::NoEndpoints);
        let c = condition_from_result(&result, None, at(5));
        assert_eq!(c.status, ConditionStatus::False);
        assert_eq!(c.message, "at least one endpoint is required");
    }

    #[test]
    fn test_transition_time_only_moves_on_flip() {
        let ok: CompileResult<()> = Ok(());
        let first = condition_from_result(&ok, None, at(10));
        let second = condition_from_result(&ok, Some(&first), at(20));
        assert_eq!(second.last_update_time, at(20));
        assert_eq!(second.last_transition_time, at(10));

        let failed: CompileResult<()> = Err(CompileError::NoEndpoints);
        let third = condition_from_result(&failed, Some(&second), at(30));
        assert_eq!(third.last_transition_time, at(30));
    }

    #[test]
    fn test_observe_sets_generation() {
        let target = MonitoringTarget {
            generation: 7,
            ..Default::default()
        };
        let previous = MonitoringStatus {
            observed_generation: 3,
            conditions: default_conditions(at(0)),
        };
        let status = observe(&target, &Ok::<(), CompileError>(()), &previous, at(40));
        assert_eq!(status.observed_generation, 7);
        assert_eq!(status.conditions.len(), 1);
        assert_eq!(status.conditions[0].status, ConditionStatus::True);
        assert_eq!(status.conditions[0].last_transition_time, at(40));
    }
}
