//! Record types shared by the view pipeline, the draft validator and the store.

use chrono::{DateTime, Utc};
use std::fmt::{Display, Formatter};

/// Access level of a user.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Admin,
    User,
    Moderator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::User, Role::Moderator];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Moderator => "moderator",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Next role in display order, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            Role::Admin => Role::User,
            Role::User => Role::Moderator,
            Role::Moderator => Role::Admin,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an account is enabled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Active, Status::Inactive];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn toggled(self) -> Self {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user row. Never mutated in place: the store hands out a fresh value per revision.
#[derive(Clone, Debug, PartialEq)]
pub struct UserRecord {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: Status,
    pub registration_date: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub avatar: Option<String>,
    pub login_count: u32,
    pub posts_count: u32,
    pub comments_count: u32,
}

impl UserRecord {
    pub fn editable_fields(&self) -> EditableFields {
        EditableFields {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Fields that can be changed from the inline editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditableFields {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Default for EditableFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: Role::User,
        }
    }
}

/// A not-yet-created user as typed into the "new user" dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUserDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub send_welcome_email: bool,
}

impl Default for NewUserDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: Role::User,
            send_welcome_email: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_and_status_parse_case_insensitively() {
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" moderator "), Some(Role::Moderator));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Status::parse("INACTIVE"), Some(Status::Inactive));
        assert_eq!(Status::Active.toggled(), Status::Inactive);
    }

    #[test]
    fn role_cycle_visits_every_role() {
        let mut r = Role::Admin;
        let mut seen = vec![r];
        for _ in 0..2 {
            r = r.cycle();
            seen.push(r);
        }
        assert_eq!(seen, Role::ALL.to_vec());
        assert_eq!(r.cycle(), Role::Admin);
    }

    #[test]
    fn blank_templates_default_to_user_role() {
        assert_eq!(EditableFields::default().role, Role::User);
        let draft = NewUserDraft::default();
        assert_eq!(draft.role, Role::User);
        assert!(draft.send_welcome_email);
        assert!(draft.name.is_empty() && draft.email.is_empty());
    }
}
