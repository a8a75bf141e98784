//! Job posting gate: decides whether a posting accepts applications and
//! whether it is visible on public read paths.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Draft,
    Open,
    Closed,
}

impl JobStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(JobStatus::Draft),
            "open" => Some(JobStatus::Open),
            "closed" => Some(JobStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
        }
    }
}

/// True only when the job exists and is open. A missing job and a non-open
/// job are deliberately indistinguishable to callers: both surface as 404 so
/// draft postings cannot be probed.
pub fn accepts_applications(status: Option<&str>) -> bool {
    matches!(status.and_then(JobStatus::parse), Some(JobStatus::Open))
}

/// Public read paths only see open postings; admin read paths see all.
pub fn visible_to_public(status: &str) -> bool {
    JobStatus::parse(status) == Some(JobStatus::Open)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_open_jobs_accept_applications() {
        assert!(accepts_applications(Some("open")));
        assert!(!accepts_applications(Some("draft")));
        assert!(!accepts_applications(Some("closed")));
    }

    #[test]
    fn test_missing_job_does_not_accept_applications() {
        assert!(!accepts_applications(None));
    }

    #[test]
    fn test_unknown_status_does_not_accept_applications() {
        assert!(!accepts_applications(Some("archived")));
        assert!(!accepts_applications(Some("")));
        assert!(!accepts_applications(Some("OPEN")));
    }

    #[test]
    fn test_public_visibility() {
        assert!(visible_to_public("open"));
        assert!(!visible_to_public("draft"));
        assert!(!visible_to_public("closed"));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [JobStatus::Draft, JobStatus::Open, JobStatus::Closed] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
    }
}
