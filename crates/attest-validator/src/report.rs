//! Report assembly.

use std::collections::BTreeMap;

use attest_core::{SectionReport, ValidationReport};

use crate::error::TerminalError;

/// The report for a request that ended in a terminal error: invalid, one
/// top-level error, no sections.
pub fn terminal(error: &TerminalError, is_authenticated: bool) -> ValidationReport {
    ValidationReport {
        is_valid: false,
        is_authenticated,
        errors: vec![error.to_report_error()],
        per_section: BTreeMap::new(),
    }
}

/// The report for a fully scored request. Valid iff every section is valid;
/// a request with no sections is valid.
pub fn aggregate(
    is_authenticated: bool,
    per_section: BTreeMap<String, SectionReport>,
) -> ValidationReport {
    ValidationReport {
        is_valid: per_section.values().all(|s| s.is_valid),
        is_authenticated,
        errors: Vec::new(),
        per_section,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_core::{ErrorCode, ReportError};

    fn section(valid: bool) -> SectionReport {
        SectionReport {
            is_valid: valid,
            errors: if valid {
                vec![]
            } else {
                vec![ReportError::new(ErrorCode::RevokedSection)]
            },
        }
    }

    #[test]
    fn terminal_report_has_single_error_and_no_sections() {
        let r = terminal(&TerminalError::UnsupportedDid("0x1".into()), false);
        assert!(!r.is_valid);
        assert_eq!(r.errors.len(), 1);
        assert_eq!(r.errors[0].code, ErrorCode::UnsupportedDid);
        assert!(r.per_section.is_empty());
    }

    #[test]
    fn validity_is_and_of_sections() {
        let mut sections = BTreeMap::new();
        sections.insert("a".to_string(), section(true));
        sections.insert("b".to_string(), section(false));
        let r = aggregate(true, sections.clone());
        assert!(!r.is_valid);
        assert!(r.is_authenticated);
        assert!(r.errors.is_empty());

        sections.insert("b".to_string(), section(true));
        assert!(aggregate(false, sections).is_valid);
    }

    #[test]
    fn no_sections_is_valid() {
        assert!(aggregate(true, BTreeMap::new()).is_valid);
    }
}
