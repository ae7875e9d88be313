// ==========================================
// Manufacturing Scheduler - Domain type definitions
// ==========================================
// Closed status enums; serialized as SCREAMING_SNAKE_CASE
// to match the database text columns
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Order lifecycle status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Active orders are the allocator's input set.
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Planned | OrderStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Planned => "PLANNED",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PLANNED" => Some(OrderStatus::Planned),
            "IN_PROGRESS" => Some(OrderStatus::InProgress),
            "COMPLETED" => Some(OrderStatus::Completed),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Schedule item execution status
// ==========================================
// Completed and Cancelled are terminal: items in those states are
// historical and must never be moved by recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleItemStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
    Delayed,
}

impl ScheduleItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleItemStatus::Planned => "PLANNED",
            ScheduleItemStatus::InProgress => "IN_PROGRESS",
            ScheduleItemStatus::Completed => "COMPLETED",
            ScheduleItemStatus::Cancelled => "CANCELLED",
            ScheduleItemStatus::Delayed => "DELAYED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PLANNED" => Some(ScheduleItemStatus::Planned),
            "IN_PROGRESS" => Some(ScheduleItemStatus::InProgress),
            "COMPLETED" => Some(ScheduleItemStatus::Completed),
            "CANCELLED" => Some(ScheduleItemStatus::Cancelled),
            "DELAYED" => Some(ScheduleItemStatus::Delayed),
            _ => None,
        }
    }

    /// Terminal states carry historical data and accept no further
    /// transitions (re-applying the same status is tolerated).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScheduleItemStatus::Completed | ScheduleItemStatus::Cancelled
        )
    }

    /// Items counted against the remaining timeline.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Transition table: anything may leave a non-terminal state,
    /// terminal states only accept themselves.
    pub fn can_transition_to(&self, next: ScheduleItemStatus) -> bool {
        !self.is_terminal() || *self == next
    }

    /// Statuses whose application affects the remaining timeline and
    /// therefore triggers a recalculation pass.
    pub fn triggers_recalc(&self) -> bool {
        matches!(
            self,
            ScheduleItemStatus::Completed
                | ScheduleItemStatus::Cancelled
                | ScheduleItemStatus::InProgress
                | ScheduleItemStatus::Delayed
        )
    }
}

impl fmt::Display for ScheduleItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_reject_transitions() {
        assert!(!ScheduleItemStatus::Completed.can_transition_to(ScheduleItemStatus::Planned));
        assert!(!ScheduleItemStatus::Cancelled.can_transition_to(ScheduleItemStatus::InProgress));
        // idempotent re-application stays legal
        assert!(ScheduleItemStatus::Completed.can_transition_to(ScheduleItemStatus::Completed));
    }

    #[test]
    fn non_terminal_states_are_open() {
        assert!(ScheduleItemStatus::Planned.can_transition_to(ScheduleItemStatus::Completed));
        assert!(ScheduleItemStatus::Delayed.can_transition_to(ScheduleItemStatus::InProgress));
        assert!(ScheduleItemStatus::InProgress.can_transition_to(ScheduleItemStatus::Cancelled));
    }

    #[test]
    fn recalc_triggers() {
        assert!(ScheduleItemStatus::Completed.triggers_recalc());
        assert!(ScheduleItemStatus::Delayed.triggers_recalc());
        assert!(!ScheduleItemStatus::Planned.triggers_recalc());
    }

    #[test]
    fn status_round_trip() {
        for s in [
            ScheduleItemStatus::Planned,
            ScheduleItemStatus::InProgress,
            ScheduleItemStatus::Completed,
            ScheduleItemStatus::Cancelled,
            ScheduleItemStatus::Delayed,
        ] {
            assert_eq!(ScheduleItemStatus::parse(s.as_str()), Some(s));
        }
    }
}
