pub mod components;
pub mod modals;
pub mod pagination;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};
use crate::format::{role_label, status_label};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, root[0], app);
    table::render_users_table(f, root[1], app);
    pagination::render_pagination(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    if let Some(state) = app.modal.clone() {
        render_modal(f, f.area(), app, &state);
    }
}

/// Title and counts on the first line; search, filters, selection and
/// busy/error state on the second.
fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let view = &app.view;

    let mut first = vec![
        Span::styled(
            "usertable",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  users: {}  shown: {}",
            view.records().len(),
            view.total_count()
        )),
    ];
    let selected = view.selected_ids().len();
    if selected > 0 {
        first.push(Span::styled(
            format!("  selected: {selected}"),
            Style::default().fg(theme.highlight_fg),
        ));
    }
    if app.is_loading {
        first.push(Span::styled("  Loading...", Style::default().fg(theme.warning)));
    }
    if app.is_saving {
        first.push(Span::styled("  Saving...", Style::default().fg(theme.warning)));
    }

    let searching = app.input_mode == InputMode::Search;
    let query = view.search_query();
    let mut second = Vec::new();
    if searching || !query.is_empty() {
        let cursor = if searching { "_" } else { "" };
        second.push(Span::raw("Search: "));
        second.push(Span::styled(
            format!("{query}{cursor}"),
            Style::default().fg(theme.highlight_fg),
        ));
        second.push(Span::raw("  "));
    }
    let mut chips = Vec::new();
    if let Some(role) = view.filter_role() {
        chips.push(format!("role={}", role_label(role)));
    }
    if let Some(status) = view.filter_status() {
        chips.push(format!("status={}", status_label(status)));
    }
    if let Some(from) = view.date_from() {
        chips.push(format!("from={from}"));
    }
    if let Some(to) = view.date_to() {
        chips.push(format!("to={to}"));
    }
    if !chips.is_empty() {
        second.push(Span::styled(
            format!("filters:[{}]  ", chips.join(",")),
            Style::default().fg(theme.neutral),
        ));
    }
    if let Some(err) = &app.error {
        second.push(Span::styled(
            err.clone(),
            Style::default().fg(theme.negative).add_modifier(Modifier::BOLD),
        ));
    }

    let p = Paragraph::new(vec![Line::from(first), Line::from(second)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().fg(theme.header_fg).bg(theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    match state {
        ModalState::FilterMenu { selected } => modals::render_filter_modal(f, area, app, *selected),
        ModalState::DateInput {
            field,
            value,
            error,
        } => modals::render_date_modal(f, area, app, *field, value, error.as_deref()),
        ModalState::AddUser { focus } => modals::render_add_user_modal(f, area, app, *focus),
        ModalState::Details { record } => modals::render_details_modal(f, area, app, record),
        ModalState::DeleteConfirm { ids, selected } => {
            modals::render_delete_modal(f, area, app, ids, *selected)
        }
        ModalState::Info { message } => components::render_info_modal(f, area, app, message),
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
    }
}
