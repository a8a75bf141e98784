/// Canonical form for stored email addresses: surrounding whitespace
/// stripped, lowercased. Applied before every store and uniqueness check so
/// `Ada@Example.com` and ` ada@example.com ` resolve to the same applicant.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_lowercases() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
        assert_eq!(normalize_email("ada@example.com"), "ada@example.com");
    }

    #[test]
    fn test_empty_and_whitespace_collapse_to_empty() {
        assert_eq!(normalize_email(""), "");
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_email(" Grace@Navy.MIL ");
        assert_eq!(normalize_email(&once), once);
    }
}
