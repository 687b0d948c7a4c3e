//! Dialogs specific to the users table: filters, date input, new user,
//! details and delete confirmation.

use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};

use crate::app::{AddUserField, AppState, DateField, FILTER_MENU_ITEMS};
use crate::form::FieldError;
use crate::format::{
    default_avatar, format_date, format_relative_time, role_badge, role_label, status_badge,
    status_badge_label, status_label,
};
use crate::model::UserRecord;
use crate::ui::components::{badge_span, centered_rect, modal_block};

fn marker(active: bool) -> &'static str {
    if active { "▶ " } else { "  " }
}

pub fn render_filter_modal(f: &mut Frame, area: Rect, app: &AppState, selected: usize) {
    let rect = centered_rect(48, FILTER_MENU_ITEMS.len() as u16 + 4, area);
    let view = &app.view;
    let any = || "any".to_string();
    let values = [
        view.filter_role().map_or_else(|| "All".to_string(), |r| role_label(r).to_string()),
        view.filter_status().map_or_else(|| "All".to_string(), |s| status_label(s).to_string()),
        view.date_from().map_or_else(any, |d| d.to_string()),
        view.date_to().map_or_else(any, |d| d.to_string()),
        String::new(),
        String::new(),
    ];
    let mut lines: Vec<Line> = Vec::with_capacity(FILTER_MENU_ITEMS.len() + 2);
    for (idx, (label, value)) in FILTER_MENU_ITEMS.iter().zip(values).enumerate() {
        let style = if idx == selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let text = if value.is_empty() {
            format!("{}{label}", marker(idx == selected))
        } else {
            format!("{}{label}: {value}", marker(idx == selected))
        };
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Enter/Left/Right: change  Esc: close",
        Style::default().fg(app.theme.muted),
    )));
    let p = Paragraph::new(lines).block(modal_block("Filter users", &app.theme));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_date_modal(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    field: DateField,
    value: &str,
    error: Option<&str>,
) {
    let rect = centered_rect(46, 7, area);
    let title = match field {
        DateField::From => "Registered from",
        DateField::To => "Registered to",
    };
    let mut lines = vec![
        Line::raw("YYYY-MM-DD, empty to clear"),
        Line::from(Span::styled(
            format!("{value}_"),
            Style::default().fg(app.theme.highlight_fg),
        )),
    ];
    if let Some(err) = error {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(app.theme.negative),
        )));
    }
    let p = Paragraph::new(lines).block(modal_block(title, &app.theme));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_add_user_modal(f: &mut Frame, area: Rect, app: &AppState, focus: AddUserField) {
    let rect = centered_rect(58, 15, area);
    let theme = &app.theme;
    let draft = app.form.draft();
    let errors = app.form.errors();

    let field_line = |label: &str, value: &str, this: AddUserField| {
        let focused = focus == this;
        let cursor = if focused { "_" } else { "" };
        let style = if focused {
            Style::default().fg(theme.highlight_fg)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(format!("{}{label:<7}", marker(focused))),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    };
    let error_line = |err: Option<FieldError>| match err {
        Some(e) => Line::from(Span::styled(
            format!("         {e}"),
            Style::default().fg(theme.negative),
        )),
        None => Line::raw(""),
    };

    let can_submit = app.form.is_valid() && !app.is_saving;
    let submit_style = if !can_submit {
        Style::default().fg(theme.muted)
    } else if focus == AddUserField::Submit {
        Style::default()
            .fg(theme.highlight_fg)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(theme.positive)
    };
    let submit_label = if app.is_saving { "[ Saving... ]" } else { "[ Create ]" };

    let mut lines = vec![
        field_line("Name", &draft.name, AddUserField::Name),
        error_line(errors.name),
        field_line("Email", &draft.email, AddUserField::Email),
        error_line(errors.email),
        Line::from(vec![
            Span::raw(format!("{}{:<7}", marker(focus == AddUserField::Role), "Role")),
            Span::raw("< "),
            badge_span(role_label(draft.role), role_badge(draft.role), theme),
            Span::raw(" >"),
        ]),
        Line::raw(""),
        Line::raw(format!(
            "{}{} Send welcome email",
            marker(focus == AddUserField::WelcomeEmail),
            if draft.send_welcome_email { "[x]" } else { "[ ]" }
        )),
        Line::raw(""),
        Line::from(vec![
            Span::raw(marker(focus == AddUserField::Submit)),
            Span::styled(submit_label, submit_style),
        ]),
    ];
    if let Some(err) = &app.error {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(theme.negative),
        )));
    }
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(modal_block("New user (Tab: next field, Esc: cancel)", theme));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_details_modal(f: &mut Frame, area: Rect, app: &AppState, user: &UserRecord) {
    let rect = centered_rect(56, 14, area);
    let theme = &app.theme;
    let avatar = default_avatar(&user.name);
    let now = Utc::now();
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<15}"), Style::default().fg(theme.muted)),
            Span::raw(value),
        ])
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", avatar.initial),
                Style::default().fg(theme.header_bg).bg(avatar.color),
            ),
            Span::styled(
                format!("  {}", user.name),
                Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::raw(""),
        row("Id", user.id.to_string()),
        row("Email", user.email.clone()),
        Line::from(vec![
            Span::styled(format!("{:<15}", "Role"), Style::default().fg(theme.muted)),
            badge_span(role_label(user.role), role_badge(user.role), theme),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<15}", "Status"), Style::default().fg(theme.muted)),
            badge_span(status_badge_label(user.status), status_badge(user.status), theme),
        ]),
        row("Registered", format_date(user.registration_date)),
        row("Last activity", format_relative_time(user.last_activity, now)),
        row("Logins", user.login_count.to_string()),
        row("Posts", user.posts_count.to_string()),
        row("Comments", user.comments_count.to_string()),
    ];
    let p = Paragraph::new(lines).block(modal_block("User details", theme));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, ids: &[u32], selected: usize) {
    let rect = centered_rect(52, 7, area);
    let question = match ids {
        [id] => match app.view.record(*id) {
            Some(u) => format!("Delete user '{}' (#{id})?", u.name),
            None => format!("Delete user #{id}?"),
        },
        _ => format!("Delete {} selected users?", ids.len()),
    };
    let yes = if selected == 0 { "[Yes]" } else { " Yes " };
    let no = if selected == 1 { "[No]" } else { " No " };
    let body = format!("{question}\n\n  {yes}    {no}\n\ny: yes  n/Esc: no");
    let p = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(modal_block("Confirm delete", &app.theme));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
