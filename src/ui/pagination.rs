use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::AppState;
use crate::view::PageItem;

/// `Showing a-b of n`, the compact page list with the current page marked, and the page size.
pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState) {
    let view = &app.view;
    let theme = &app.theme;
    let total = view.total_count();

    let summary = if total == 0 {
        "No results".to_string()
    } else {
        format!(
            "Showing {}-{} of {}",
            view.pagination_start(),
            view.pagination_end(),
            total
        )
    };

    let mut spans = vec![
        Span::styled(summary, Style::default().fg(theme.text)),
        Span::raw("   "),
    ];
    let can_prev = view.current_page() > 1;
    let can_next = view.current_page() < view.total_pages();
    spans.push(arrow("<", can_prev, app));
    for item in view.visible_pages() {
        spans.push(Span::raw(" "));
        spans.push(match item {
            PageItem::Page(p) if p == view.current_page() => Span::styled(
                format!("[{p}]"),
                Style::default()
                    .fg(theme.highlight_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            other => Span::styled(other.to_string(), Style::default().fg(theme.text)),
        });
    }
    spans.push(Span::raw(" "));
    spans.push(arrow(">", can_next, app));
    spans.push(Span::styled(
        format!("   Page size: {}", view.page_size()),
        Style::default().fg(theme.muted),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn arrow(symbol: &'static str, enabled: bool, app: &AppState) -> Span<'static> {
    let color = if enabled { app.theme.text } else { app.theme.muted };
    Span::styled(symbol, Style::default().fg(color))
}
