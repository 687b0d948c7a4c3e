//! Validation of the "new user" draft.
//!
//! Errors are field-scoped values shown inline in the dialog; nothing here
//! returns `Err`. [`DraftForm::is_valid`] reads the errors already recorded by
//! the two validators instead of re-running them, so callers must run
//! [`DraftForm::validate_email`] before trusting it for the duplicate check.

use regex_lite::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use crate::model::{NewUserDraft, Role, UserRecord};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

pub const NAME_MIN_LEN: usize = 3;

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_email_format(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    NameRequired,
    NameTooShort,
    EmailRequired,
    EmailInvalid,
    EmailTaken,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::NameRequired => f.write_str("Name is required"),
            FieldError::NameTooShort => {
                write!(f, "Name must be at least {NAME_MIN_LEN} characters")
            }
            FieldError::EmailRequired => f.write_str("Email is required"),
            FieldError::EmailInvalid => f.write_str("Invalid email format"),
            FieldError::EmailTaken => f.write_str("A user with this email already exists"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<FieldError>,
    pub email: Option<FieldError>,
}

/// A single change to the draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftField {
    Name(String),
    Email(String),
    Role(Role),
    SendWelcomeEmail(bool),
}

/// Draft, its errors, and whether the dialog is showing.
#[derive(Clone, Debug, Default)]
pub struct DraftForm {
    draft: NewUserDraft,
    errors: FieldErrors,
    visible: bool,
}

impl DraftForm {
    /// Reset to a blank draft and show the dialog.
    pub fn open(&mut self) {
        self.draft = NewUserDraft::default();
        self.errors = FieldErrors::default();
        self.visible = true;
    }

    /// Hide the dialog. The draft stays until the next `open`.
    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn draft(&self) -> &NewUserDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn update_field(&mut self, field: DraftField) {
        match field {
            DraftField::Name(v) => self.draft.name = v,
            DraftField::Email(v) => self.draft.email = v,
            DraftField::Role(r) => self.draft.role = r,
            DraftField::SendWelcomeEmail(b) => self.draft.send_welcome_email = b,
        }
    }

    pub fn validate_name(&mut self) {
        let value = self.draft.name.trim();
        self.errors.name = if value.is_empty() {
            Some(FieldError::NameRequired)
        } else if value.chars().count() < NAME_MIN_LEN {
            Some(FieldError::NameTooShort)
        } else {
            None
        };
    }

    pub fn validate_email<'a>(&mut self, existing: impl IntoIterator<Item = &'a UserRecord>) {
        let value = self.draft.email.trim();
        self.errors.email = if value.is_empty() {
            Some(FieldError::EmailRequired)
        } else if !is_email_format(value) {
            Some(FieldError::EmailInvalid)
        } else if existing.into_iter().any(|u| u.email == value) {
            Some(FieldError::EmailTaken)
        } else {
            None
        };
    }

    /// Whether the draft may be submitted, based on the errors recorded so far.
    pub fn is_valid(&self) -> bool {
        !self.draft.name.trim().is_empty()
            && !self.draft.email.trim().is_empty()
            && is_email_format(&self.draft.email)
            && self.errors.name.is_none()
            && self.errors.email.is_none()
    }
}
