//! Display labels, date formatting and placeholder avatars.

use chrono::{DateTime, Local, Utc};
use ratatui::style::Color;

use crate::model::{Role, Status};

/// Visual weight of a badge; the theme maps each to a color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BadgeStyle {
    Neutral,
    Positive,
    Warning,
    Negative,
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administrator",
        Role::User => "User",
        Role::Moderator => "Moderator",
    }
}

pub fn role_badge(role: Role) -> BadgeStyle {
    match role {
        Role::Admin => BadgeStyle::Negative,
        Role::User => BadgeStyle::Neutral,
        Role::Moderator => BadgeStyle::Warning,
    }
}

/// Plural label used by the status filter.
pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Active => "Active",
        Status::Inactive => "Inactive",
    }
}

/// Short label shown in the status column.
pub fn status_badge_label(status: Status) -> &'static str {
    match status {
        Status::Active => "✓ Active",
        Status::Inactive => "✗ Inactive",
    }
}

pub fn status_badge(status: Status) -> BadgeStyle {
    match status {
        Status::Active => BadgeStyle::Positive,
        Status::Inactive => BadgeStyle::Negative,
    }
}

/// Long local date, e.g. `15 March 2020`.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%-d %B %Y").to_string()
}

pub fn format_date_short(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Coarse "time ago" text; falls back to the date after 30 days.
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(at);
    let mins = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();
    if mins < 1 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{mins} min ago")
    } else if hours < 24 {
        format!("{hours} h ago")
    } else if days < 30 {
        format!("{days} d ago")
    } else {
        format_date(at)
    }
}

/// How recently a user was seen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Activity {
    Recent,
    Week,
    Month,
    Old,
}

pub fn activity_class(at: DateTime<Utc>, now: DateTime<Utc>) -> Activity {
    let days = now.signed_duration_since(at).num_days();
    if days < 1 {
        Activity::Recent
    } else if days < 7 {
        Activity::Week
    } else if days < 30 {
        Activity::Month
    } else {
        Activity::Old
    }
}

pub const AVATAR_PALETTE: [Color; 5] = [
    Color::Rgb(0xFF, 0x6B, 0x6B),
    Color::Rgb(0x4E, 0xCD, 0xC4),
    Color::Rgb(0x45, 0xB7, 0xD1),
    Color::Rgb(0xFF, 0xA0, 0x7A),
    Color::Rgb(0x98, 0xD8, 0xC8),
];

/// Placeholder avatar: an uppercase initial on a color picked from the name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Avatar {
    pub initial: char,
    pub color: Color,
}

pub fn default_avatar(name: &str) -> Avatar {
    let first = name.trim().chars().next().unwrap_or('U');
    let initial = first.to_uppercase().next().unwrap_or(first);
    let color = AVATAR_PALETTE[(first as u32 as usize) % AVATAR_PALETTE.len()];
    Avatar { initial, color }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now - TimeDelta::seconds(30), now), "just now");
        assert_eq!(format_relative_time(now - TimeDelta::minutes(5), now), "5 min ago");
        assert_eq!(format_relative_time(now - TimeDelta::minutes(150), now), "2 h ago");
        assert_eq!(format_relative_time(now - TimeDelta::days(3), now), "3 d ago");
        let old = now - TimeDelta::days(45);
        assert_eq!(format_relative_time(old, now), format_date(old));
    }

    #[test]
    fn activity_buckets() {
        let now = Utc::now();
        assert_eq!(activity_class(now - TimeDelta::hours(3), now), Activity::Recent);
        assert_eq!(activity_class(now - TimeDelta::days(2), now), Activity::Week);
        assert_eq!(activity_class(now - TimeDelta::days(10), now), Activity::Month);
        assert_eq!(activity_class(now - TimeDelta::days(31), now), Activity::Old);
    }

    #[test]
    fn avatar_color_follows_first_char() {
        // 'a' = 97, 97 % 5 = 2
        let a = default_avatar("alice");
        assert_eq!(a.initial, 'A');
        assert_eq!(a.color, AVATAR_PALETTE[2]);
        assert_eq!(default_avatar("  alex").color, a.color);

        // blank names fall back to 'U' (85 % 5 = 0)
        let blank = default_avatar("   ");
        assert_eq!(blank.initial, 'U');
        assert_eq!(blank.color, AVATAR_PALETTE[0]);
    }

    #[test]
    fn labels() {
        assert_eq!(role_label(Role::Admin), "Administrator");
        assert_eq!(role_badge(Role::Moderator), BadgeStyle::Warning);
        assert_eq!(status_badge_label(Status::Inactive), "✗ Inactive");
        assert_eq!(status_badge(Status::Active), BadgeStyle::Positive);
    }
}
