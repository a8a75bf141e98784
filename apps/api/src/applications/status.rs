//! Application lifecycle state machine.
//!
//! The transition table is fixed and directed, with no self-loops. `hired`
//! and `rejected` are terminal. Kept as a pure function over an enumerated
//! type so it is unit-testable in isolation from I/O.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Submitted,
    Screening,
    Interview,
    Offered,
    Hired,
    Rejected,
}

pub const ALL_STATUSES: [ApplicationStatus; 6] = [
    ApplicationStatus::Submitted,
    ApplicationStatus::Screening,
    ApplicationStatus::Interview,
    ApplicationStatus::Offered,
    ApplicationStatus::Hired,
    ApplicationStatus::Rejected,
];

impl ApplicationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "submitted" => Some(ApplicationStatus::Submitted),
            "screening" => Some(ApplicationStatus::Screening),
            "interview" => Some(ApplicationStatus::Interview),
            "offered" => Some(ApplicationStatus::Offered),
            "hired" => Some(ApplicationStatus::Hired),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Screening => "screening",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// The allowed next states for this status.
    pub fn allowed_transitions(&self) -> &'static [ApplicationStatus] {
        match self {
            ApplicationStatus::Submitted => {
                &[ApplicationStatus::Screening, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Screening => {
                &[ApplicationStatus::Interview, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Interview => {
                &[ApplicationStatus::Offered, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Offered => &[ApplicationStatus::Hired, ApplicationStatus::Rejected],
            ApplicationStatus::Hired | ApplicationStatus::Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn test_transition_table_is_exact() {
        let expect = |from: ApplicationStatus, to: &[ApplicationStatus]| {
            assert_eq!(from.allowed_transitions(), to, "from {from}");
        };
        expect(Submitted, &[Screening, Rejected]);
        expect(Screening, &[Interview, Rejected]);
        expect(Interview, &[Offered, Rejected]);
        expect(Offered, &[Hired, Rejected]);
        expect(Hired, &[]);
        expect(Rejected, &[]);
    }

    #[test]
    fn test_no_self_loops() {
        for status in ALL_STATUSES {
            assert!(
                !status.can_transition_to(status),
                "{status} must not transition to itself"
            );
        }
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for terminal in [Hired, Rejected] {
            assert!(terminal.is_terminal());
            for target in ALL_STATUSES {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_skipping_stages_is_rejected() {
        assert!(!Submitted.can_transition_to(Interview));
        assert!(!Submitted.can_transition_to(Offered));
        assert!(!Submitted.can_transition_to(Hired));
        assert!(!Screening.can_transition_to(Offered));
        assert!(!Interview.can_transition_to(Hired));
    }

    #[test]
    fn test_rejection_reachable_from_every_active_state() {
        for active in [Submitted, Screening, Interview, Offered] {
            assert!(active.can_transition_to(Rejected), "{active} -> rejected");
        }
    }

    #[test]
    fn test_full_pipeline_to_hired() {
        let pipeline = [Submitted, Screening, Interview, Offered, Hired];
        for pair in pipeline.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]));
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("withdrawn"), None);
        assert_eq!(ApplicationStatus::parse("Submitted"), None);
    }
}
