//! Customer validation and defaulting pipeline.
//!
//! A candidate record moves through a fixed conceptual ordering per
//! persistence attempt: field rules, then the cross-field rule, then the
//! uniqueness rule, and only after all of those pass does defaulting run,
//! immediately before the write. Defaulting never runs against a record
//! that failed validation, and validation always sees caller intent, not
//! generated values.
//!
//! All rules except uniqueness are pure functions of the candidate record.
//! Uniqueness needs a look at the store and is delegated to a
//! [`UniquenessProbe`]; it is a fast-reject optimization layered on top of
//! the store's own unique indexes, which remain the final guarantee.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use super::CustomerDraft;
use crate::config::{
    MAX_DISPLAY_NAME_LENGTH, MAX_EMAIL_LENGTH, MAX_FIRST_NAME_LENGTH, MAX_LAST_NAME_LENGTH,
    MAX_USERNAME_LENGTH, MIN_LAST_NAME_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Letters, hyphen, apostrophe, space. No digits, no other punctuation.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z-' ]+$").expect("name pattern is a valid regex")
});

/// Superficial `local@domain.tld` shape; not an RFC-grade check.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

const NAME_PATTERN_REASON: &str = "Please use a name without numbers or special characters";
const EMAIL_PATTERN_REASON: &str = "The email address must be in the format of name@domain.com";
const MISSING_REASON: &str = "may not be null";
const PAST_REASON: &str = "must be in the past";
const USERNAME_OR_EMAIL_REASON: &str = "Either username or email must be given";

/// One violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    /// A field-level rule failed; quotes the offending field.
    Field { field: &'static str, reason: String },
    /// The rule spanning username and email failed.
    CrossField { reason: String },
}

impl Violation {
    fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Violation::Field {
            field,
            reason: reason.into(),
        }
    }

    fn size(field: &'static str, min: usize, max: usize) -> Self {
        Violation::Field {
            field,
            reason: format!("size must be between {} and {}", min, max),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Field { field, reason } => write!(f, "{}: {}", field, reason),
            Violation::CrossField { reason } => write!(f, "{}", reason),
        }
    }
}

/// All rule violations found for one candidate record.
///
/// Rules fail independently and are all collected, so a caller gets the
/// complete picture in one pass rather than fixing fields one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// True if any violation names the given field.
    pub fn names_field(&self, field: &str) -> bool {
        self.0
            .iter()
            .any(|v| matches!(v, Violation::Field { field: f, .. } if *f == field))
    }
}

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(Violation::to_string).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

/// Fields carrying a store-level uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        }
    }
}

/// Store lookup used by the uniqueness rule, the pipeline's only I/O.
///
/// `exclude` carries the candidate's own id on update, so a record never
/// conflicts with itself.
#[async_trait]
pub trait UniquenessProbe: Send + Sync {
    async fn is_taken(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool>;
}

/// Run the field-level rules, collecting every violation.
pub fn check_fields(draft: &CustomerDraft, now: DateTime<Utc>) -> Vec<Violation> {
    let mut violations = Vec::new();

    // last_name is the only mandatory field
    match draft.last_name.as_deref() {
        None => violations.push(Violation::field("last_name", MISSING_REASON)),
        Some(value) => check_name_field(
            "last_name",
            value,
            MIN_LAST_NAME_LENGTH,
            MAX_LAST_NAME_LENGTH,
            &mut violations,
        ),
    }

    if let Some(value) = draft.first_name.as_deref() {
        check_name_field("first_name", value, 0, MAX_FIRST_NAME_LENGTH, &mut violations);
    }

    if let Some(value) = draft.display_name.as_deref() {
        check_name_field(
            "display_name",
            value,
            0,
            MAX_DISPLAY_NAME_LENGTH,
            &mut violations,
        );
    }

    if let Some(value) = draft.email.as_deref() {
        if value.chars().count() > MAX_EMAIL_LENGTH {
            violations.push(Violation::size("email", 0, MAX_EMAIL_LENGTH));
        }
        if !value.is_empty() && !EMAIL_PATTERN.is_match(value) {
            violations.push(Violation::field("email", EMAIL_PATTERN_REASON));
        }
    }

    if let Some(value) = draft.username.as_deref() {
        if value.chars().count() > MAX_USERNAME_LENGTH {
            violations.push(Violation::size("username", 0, MAX_USERNAME_LENGTH));
        }
    }

    // Only matters for data supplied out-of-band; the creation flow
    // overwrites created_at after validation anyway.
    if let Some(created_at) = draft.created_at {
        if created_at >= now {
            violations.push(Violation::field("created_at", PAST_REASON));
        }
    }

    violations
}

fn check_name_field(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    violations: &mut Vec<Violation>,
) {
    let length = value.chars().count();
    if length < min || length > max {
        violations.push(Violation::size(field, min, max));
    }
    if !value.is_empty() && !NAME_PATTERN.is_match(value) {
        violations.push(Violation::field(field, NAME_PATTERN_REASON));
    }
}

/// Cross-field rule: at least one of username/email must be non-empty.
///
/// Reads both fields of the same candidate, so it cannot be split into two
/// independent field rules. Evaluated against the original values, after
/// the individual field checks.
pub fn check_username_or_email(draft: &CustomerDraft) -> Option<Violation> {
    let has = |value: &Option<String>| value.as_deref().map_or(false, |v| !v.is_empty());

    if has(&draft.username) || has(&draft.email) {
        None
    } else {
        Some(Violation::CrossField {
            reason: USERNAME_OR_EMAIL_REASON.to_string(),
        })
    }
}

/// Uniqueness rule: reject when username or email collides with a stored
/// record other than the one identified by `exclude`.
pub async fn check_uniqueness(
    draft: &CustomerDraft,
    probe: &dyn UniquenessProbe,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    for (field, value) in [
        (UniqueField::Username, draft.username.as_deref()),
        (UniqueField::Email, draft.email.as_deref()),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            if probe.is_taken(field, value, exclude).await? {
                return Err(AppError::conflict(field.as_str()));
            }
        }
    }
    Ok(())
}

/// Run the full validation sequence: field rules, cross-field rule,
/// uniqueness. Returns all field/cross-field violations at once; the
/// uniqueness probe only runs on an otherwise-valid candidate.
pub async fn validate(
    draft: &CustomerDraft,
    probe: &dyn UniquenessProbe,
    exclude: Option<Uuid>,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let mut violations = check_fields(draft, now);
    if let Some(cross) = check_username_or_email(draft) {
        violations.push(cross);
    }
    if !violations.is_empty() {
        return Err(Violations(violations).into());
    }

    check_uniqueness(draft, probe, exclude).await
}

/// Compute the display name when it is null or empty.
///
/// Literal single-space join of first and last name. A caller-supplied
/// value is never overwritten. When first_name is absent the result starts
/// with a space (" Shephard"); preserved observed behavior, see DESIGN.md.
pub fn default_display_name(draft: &mut CustomerDraft) {
    if draft.display_name.as_deref().map_or(true, str::is_empty) {
        let first = draft.first_name.as_deref().unwrap_or_default();
        let last = draft.last_name.as_deref().unwrap_or_default();
        draft.display_name = Some(format!("{} {}", first, last));
    }
}

/// Defaulting for the creation path, applied between validation success and
/// the write: stamp created_at unconditionally, then fill display_name.
pub fn apply_creation_defaults(draft: &mut CustomerDraft, now: DateTime<Utc>) {
    draft.created_at = Some(now);
    default_display_name(draft);
}

/// Validate a creation candidate and, on success, apply the creation
/// defaults. The returned draft is ready for the write.
pub async fn validate_and_default(
    mut draft: CustomerDraft,
    probe: &dyn UniquenessProbe,
    now: DateTime<Utc>,
) -> AppResult<CustomerDraft> {
    validate(&draft, probe, None, now).await?;
    apply_creation_defaults(&mut draft, now);
    Ok(draft)
}
