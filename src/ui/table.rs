use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, EditFocus, InputMode, Theme};
use crate::format::{
    Activity, activity_class, default_avatar, format_date_short, format_relative_time,
    role_badge, role_label, status_badge, status_badge_label,
};
use crate::model::UserRecord;
use crate::ui::components::badge_span;
use crate::view::SortColumn;

const HEADERS: [(&str, Option<SortColumn>); 9] = [
    ("", None),
    ("ID", Some(SortColumn::Id)),
    ("", None),
    ("NAME", Some(SortColumn::Name)),
    ("EMAIL", Some(SortColumn::Email)),
    ("ROLE", None),
    ("STATUS", None),
    ("REGISTERED", Some(SortColumn::RegistrationDate)),
    ("LAST ACTIVE", Some(SortColumn::LastActivity)),
];

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let rows = app.page_rows();
    if rows.is_empty() {
        let message = if app.is_loading {
            "Loading users..."
        } else if app.view.has_active_filters() {
            "No users match the current filters (c to clear)"
        } else {
            "No users"
        };
        let p = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        app.table_state.select(None);
        return;
    }

    let now = Utc::now();
    let editing = app.view.editing_id();
    let edit_focus = match app.input_mode {
        InputMode::Edit(focus) => Some(focus),
        _ => None,
    };
    let theme = app.theme;

    let body: Vec<Row> = rows
        .iter()
        .map(|u| {
            let selected = app.view.selected_ids().contains(&u.id);
            if editing == Some(u.id) {
                edit_row(u, app, edit_focus, selected)
            } else {
                record_row(u, selected, now, &theme)
            }
        })
        .collect();

    let header_cells = HEADERS.iter().enumerate().map(|(i, (label, column))| {
        let text = match column {
            Some(c) if *c == app.view.sort_column() => {
                format!("{label} {}", app.view.sort_direction().arrow())
            }
            _ if i == 0 => checkbox(app.view.is_all_selected()).to_string(),
            _ => label.to_string(),
        };
        Cell::from(text)
    });
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(theme.header_fg)
            .bg(theme.header_bg)
            .add_modifier(Modifier::BOLD),
    );

    let widths = [
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Length(3),
        Constraint::Percentage(22),
        Constraint::Percentage(28),
        Constraint::Length(14),
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Length(13),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .style(Style::default().fg(theme.text))
        .row_highlight_style(
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    app.clamp_cursor();
    app.table_state.select(Some(app.cursor));
    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn record_row<'a>(
    u: &UserRecord,
    selected: bool,
    now: chrono::DateTime<Utc>,
    theme: &Theme,
) -> Row<'a> {
    let avatar = default_avatar(&u.name);
    let activity_color = match activity_class(u.last_activity, now) {
        Activity::Recent => theme.positive,
        Activity::Week => theme.neutral,
        Activity::Month => theme.warning,
        Activity::Old => theme.muted,
    };
    Row::new(vec![
        Cell::from(checkbox(selected)),
        Cell::from(u.id.to_string()),
        Cell::from(Span::styled(
            format!(" {} ", avatar.initial),
            Style::default().fg(theme.header_bg).bg(avatar.color),
        )),
        Cell::from(u.name.clone()),
        Cell::from(u.email.clone()),
        Cell::from(Line::from(badge_span(role_label(u.role), role_badge(u.role), theme))),
        Cell::from(Line::from(badge_span(
            status_badge_label(u.status),
            status_badge(u.status),
            theme,
        ))),
        Cell::from(format_date_short(u.registration_date)),
        Cell::from(Span::styled(
            format_relative_time(u.last_activity, now),
            Style::default().fg(activity_color),
        )),
    ])
}

fn edit_row<'a>(
    u: &UserRecord,
    app: &AppState,
    focus: Option<EditFocus>,
    selected: bool,
) -> Row<'a> {
    let form = app.view.edit_form();
    let field = |value: String, this: EditFocus| {
        let focused = focus == Some(this);
        let text = if focused { format!("{value}_") } else { value };
        let mut style = Style::default().fg(app.theme.highlight_fg);
        if focused {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        Cell::from(Span::styled(text, style))
    };
    let saving = if app.is_saving { "saving..." } else { "Enter/Esc" };
    Row::new(vec![
        Cell::from(checkbox(selected)),
        Cell::from(u.id.to_string()),
        Cell::from(" ~ "),
        field(form.name.clone(), EditFocus::Name),
        field(form.email.clone(), EditFocus::Email),
        field(format!("< {} >", role_label(form.role)), EditFocus::Role),
        Cell::from(status_badge_label(u.status)),
        Cell::from(Span::styled(saving, Style::default().fg(app.theme.muted))),
        Cell::from(""),
    ])
    .style(Style::default().bg(app.theme.header_bg))
}
