//! Validation of candidate client records.
//!
//! Every draft passes through [`validate`] before the repository writes it.
//! The individual rules are exposed as separate functions so each one can be
//! checked on its own.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::client::ClientDraft;

/// Pattern an email address must match: `local@domain.tld`, no whitespace.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// A single reason a draft was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationIssue {
    /// Full name is empty or whitespace.
    MissingFullName,
    /// Email is empty.
    MissingEmail,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail,
    /// Start date is empty or whitespace.
    MissingStartDate,
}

impl ValidationIssue {
    /// Name of the draft field this issue refers to.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::MissingFullName => "fullName",
            Self::MissingEmail | Self::InvalidEmail => "email",
            Self::MissingStartDate => "startDate",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFullName => write!(f, "full name is required"),
            Self::MissingEmail => write!(f, "email is required"),
            Self::InvalidEmail => write!(f, "email must look like name@example.com"),
            Self::MissingStartDate => write!(f, "start date is required"),
        }
    }
}

/// All reasons a draft was rejected, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    /// The issue to show the user: the first rule that failed.
    #[must_use]
    pub fn first(&self) -> ValidationIssue {
        // Never constructed empty; see `validate`.
        self.issues[0]
    }

    /// Every failing rule, in order.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Whether a specific rule failed.
    #[must_use]
    pub fn contains(&self, issue: ValidationIssue) -> bool {
        self.issues.contains(&issue)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first())?;
        let more = self.issues.len() - 1;
        if more > 0 {
            write!(f, " (and {more} more)")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Rule 1: the full name must be non-empty after trimming.
#[must_use]
pub fn check_full_name(draft: &ClientDraft) -> Option<ValidationIssue> {
    draft
        .full_name
        .trim()
        .is_empty()
        .then_some(ValidationIssue::MissingFullName)
}

/// Rule 2: the email must be present and match [`EMAIL_PATTERN`].
#[must_use]
pub fn check_email(draft: &ClientDraft) -> Option<ValidationIssue> {
    if draft.email.is_empty() {
        Some(ValidationIssue::MissingEmail)
    } else if email_regex().is_match(&draft.email) {
        None
    } else {
        Some(ValidationIssue::InvalidEmail)
    }
}

/// Rule 3: the start date must be non-empty after trimming.
#[must_use]
pub fn check_start_date(draft: &ClientDraft) -> Option<ValidationIssue> {
    draft
        .start_date
        .trim()
        .is_empty()
        .then_some(ValidationIssue::MissingStartDate)
}

/// Check a draft against every rule.
///
/// Optional fields (`age`, `gender`, `phone`, `fitness_goal`) are never
/// rejected.
///
/// # Errors
///
/// Returns every failing rule, in rule order, when the draft is invalid.
pub fn validate(draft: &ClientDraft) -> Result<(), ValidationErrors> {
    let rules: [fn(&ClientDraft) -> Option<ValidationIssue>; 3] =
        [check_full_name, check_email, check_start_date];
    let issues: Vec<ValidationIssue> = rules
        .iter()
        .filter_map(|rule| rule(draft))
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { issues })
    }
}
