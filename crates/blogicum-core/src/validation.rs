//! Field-level checks for submitted forms.
//!
//! Each check reports every failing field at once so the client can fix the
//! whole form in one round trip.

use crate::domain::{PostDraft, Profile};
use crate::error::DomainError;

pub const USERNAME_MAX_LEN: usize = 150;
pub const TITLE_MAX_LEN: usize = 256;
pub const SLUG_MAX_LEN: usize = 64;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Collected field errors.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl AsRef<str>) {
        self.0.push(format!("{}: {}", field, message.as_ref()));
    }

    fn required(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, "This field is required");
            false
        } else {
            true
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("Must be at most {} characters", max));
        }
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}

pub fn check_profile(errors: &mut FieldErrors, profile: &Profile) {
    if errors.required("username", &profile.username) {
        errors.max_len("username", &profile.username, USERNAME_MAX_LEN);
        let allowed = |c: char| c.is_alphanumeric() || "@.+-_".contains(c);
        if !profile.username.chars().all(allowed) {
            errors.add(
                "username",
                "Only letters, digits and @/./+/-/_ are allowed",
            );
        }
    }

    errors.max_len("first_name", &profile.first_name, USERNAME_MAX_LEN);
    errors.max_len("last_name", &profile.last_name, USERNAME_MAX_LEN);

    if !profile.email.is_empty() {
        let valid = profile
            .email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !valid {
            errors.add("email", "Enter a valid email address");
        }
    }
}

pub fn check_registration(errors: &mut FieldErrors, profile: &Profile, password: &str) {
    check_profile(errors, profile);
    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.add(
            "password",
            format!("Must be at least {} characters", PASSWORD_MIN_LEN),
        );
    }
}

pub fn check_post(errors: &mut FieldErrors, draft: &PostDraft) {
    if errors.required("title", &draft.title) {
        errors.max_len("title", &draft.title, TITLE_MAX_LEN);
    }
    errors.required("text", &draft.text);
}

pub fn validate_comment(text: &str) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();
    errors.required("text", text);
    errors.into_result()
}

pub fn check_category(errors: &mut FieldErrors, title: &str, slug: &str) {
    if errors.required("title", title) {
        errors.max_len("title", title, TITLE_MAX_LEN);
    }
    if errors.required("slug", slug) {
        errors.max_len("slug", slug, SLUG_MAX_LEN);
        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.add("slug", "Only latin letters, digits, hyphens and underscores");
        }
    }
}

pub fn validate_location(name: &str) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();
    if errors.required("name", name) {
        errors.max_len("name", name, TITLE_MAX_LEN);
    }
    errors.into_result()
}
