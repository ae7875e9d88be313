// ==========================================
// Manufacturing Scheduler - Interpretation payloads
// ==========================================
// Wire shape of the external interpretation service's structured
// change suggestions. Serialized as camelCase to match the service's
// JSON responses.
// ==========================================

use crate::domain::types::ScheduleItemStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One suggested change to a scheduled order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleChange {
    pub order_id: i64,
    #[serde(default)]
    pub new_start_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub new_end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub new_machine_id: Option<i64>,
    #[serde(default)]
    pub new_status: Option<ScheduleItemStatus>,
    #[serde(default)]
    pub reason: String,
}

/// Structured result of interpreting a natural-language request
/// against the current schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingInterpretation {
    pub suggested_changes: Vec<ScheduleChange>,
    pub explanation_text: String,
    pub is_valid: bool,
}

impl SchedulingInterpretation {
    /// Empty, invalid interpretation carrying only an explanation.
    /// Used when the external service is unavailable or returns
    /// something non-actionable.
    pub fn invalid(explanation: impl Into<String>) -> Self {
        Self {
            suggested_changes: Vec::new(),
            explanation_text: explanation.into(),
            is_valid: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn interpretation_json_round_trip_uses_camel_case() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let interpretation = SchedulingInterpretation {
            suggested_changes: vec![ScheduleChange {
                order_id: 7,
                new_start_time: Some(start),
                new_end_time: None,
                new_machine_id: Some(2),
                new_status: Some(ScheduleItemStatus::InProgress),
                reason: "expedite".to_string(),
            }],
            explanation_text: "Order 7 moved up.".to_string(),
            is_valid: true,
        };

        let json = serde_json::to_value(&interpretation).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["explanationText"], "Order 7 moved up.");
        let change = &json["suggestedChanges"][0];
        assert_eq!(change["orderId"], 7);
        assert_eq!(change["newMachineId"], 2);
        assert_eq!(change["newStatus"], "IN_PROGRESS");

        let back: SchedulingInterpretation = serde_json::from_value(json).unwrap();
        assert_eq!(back.suggested_changes[0].order_id, 7);
        assert_eq!(back.suggested_changes[0].new_start_time, Some(start));
        assert!(back.is_valid);
    }

    #[test]
    fn change_fields_default_when_absent() {
        let change: ScheduleChange =
            serde_json::from_str(r#"{"orderId": 3}"#).unwrap();

        assert_eq!(change.order_id, 3);
        assert!(change.new_start_time.is_none());
        assert!(change.new_status.is_none());
        assert!(change.reason.is_empty());
    }
}
