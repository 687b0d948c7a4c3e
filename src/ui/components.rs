//! Shared UI components (status bar, badges, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, describe_action};
use crate::app::{AppState, InputMode, Theme};
use crate::format::BadgeStyle;

/// Render the bottom status bar with mode, sort and page.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Edit(_) => "EDIT",
        InputMode::Modal => "MODAL",
    };
    let hint = match app.input_mode {
        InputMode::Normal => "?: help  q: quit",
        InputMode::Search => "Enter: keep  Esc: clear",
        InputMode::Edit(_) => "Tab: next field  Enter: save  Esc: cancel",
        InputMode::Modal => "Esc: close",
    };
    let msg = format!(
        "mode: {mode}  sort: {} {}  page {}/{}  rows/page: {}  {hint}",
        app.view.sort_column().as_str(),
        app.view.sort_direction().arrow(),
        app.view.current_page(),
        app.view.total_pages(),
        app.view.page_size(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Bordered block in the theme's colors, used by every modal.
pub fn modal_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().fg(theme.text))
}

/// Bold label colored by its badge style.
pub fn badge_span(label: &str, style: BadgeStyle, theme: &Theme) -> Span<'static> {
    Span::styled(
        label.to_string(),
        Style::default()
            .fg(theme.badge(style))
            .add_modifier(Modifier::BOLD),
    )
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let max_w = area.width.saturating_sub(6).max(30);
    let min_w = 44u16.min(max_w);
    let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(min_w, height, area);
    let p = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: false })
        .block(modal_block("Info", &app.theme));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Help modal listing every bound action with its keys.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let key_style = Style::default()
        .fg(app.theme.highlight_fg)
        .add_modifier(Modifier::ITALIC);
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines: Vec<Line> = vec![section("Table"), Line::raw("")];
    for action in KeyAction::ALL {
        if action == KeyAction::Ignore {
            continue;
        }
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<44}", describe_action(action))),
            Span::styled(keys.join(", "), key_style),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(section("Search / edit / dialogs"));
    for (label, keys) in [
        ("Type to filter live; keep the query", "Enter"),
        ("Clear the search or cancel an edit", "Esc"),
        ("Next field", "Tab, Down"),
        ("Previous field", "BackTab, Up"),
        ("Cycle role", "Left, Right, Space"),
        ("Save edit / submit", "Enter"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:<44}")),
            Span::styled(keys, key_style),
        ]));
    }

    let p = Paragraph::new(lines)
        .scroll((scroll, 0))
        .block(modal_block("Help (Esc to close, j/k to scroll)", &app.theme));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
