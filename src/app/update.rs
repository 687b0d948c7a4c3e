use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::app::ops::{PendingOp, run_pending};
use crate::app::{
    AddUserField, AppState, DateField, EditFocus, FILTER_MENU_ITEMS, InputMode, KeyAction,
    ModalState,
};
use crate::form::DraftField;
use crate::model::{Role, Status};
use crate::ui;
use crate::view::{EditField, PAGE_SIZE_OPTIONS, SortColumn};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    app.queue(PendingOp::Load);

    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        // the frame above showed the busy flag; now do the work
        if run_pending(app) {
            continue;
        }

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, key)
        {
            break;
        }
    }

    tracing::info!(uptime_s = app.started_at.elapsed().as_secs(), "exiting");
    Ok(())
}

/// Apply one key press. Returns `true` when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key.code),
        InputMode::Edit(focus) => handle_edit_key(app, focus, key.code),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
    false
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> bool {
    let Some(action) = app.keymap.resolve(&key) else {
        return false;
    };
    tracing::debug!(?action, "key action");
    match action {
        KeyAction::Quit => return true,
        KeyAction::Ignore => {}
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::OpenFilterMenu => app.open_modal(ModalState::FilterMenu { selected: 0 }),
        KeyAction::ClearFilters => {
            app.view.clear_all_filters();
            app.cursor = 0;
        }
        KeyAction::NewUser => {
            app.form.open();
            app.open_modal(ModalState::AddUser {
                focus: AddUserField::Name,
            });
        }
        KeyAction::EditUser => {
            if let Some(record) = app.cursor_record() {
                app.view.start_edit(&record);
                app.input_mode = InputMode::Edit(EditFocus::Name);
            }
        }
        KeyAction::ToggleStatus => {
            if let Some(record) = app.cursor_record() {
                app.queue(PendingOp::ToggleStatus { id: record.id });
            }
        }
        KeyAction::DeleteUser => {
            if let Some(record) = app.cursor_record() {
                app.open_modal(ModalState::DeleteConfirm {
                    ids: vec![record.id],
                    selected: 1,
                });
            }
        }
        KeyAction::DeleteSelection => {
            let ids: Vec<u32> = app.view.selected_ids().iter().copied().collect();
            if ids.is_empty() {
                app.open_modal(ModalState::Info {
                    message: "No users selected. Press Space to select rows.".to_string(),
                });
            } else {
                app.open_modal(ModalState::DeleteConfirm { ids, selected: 1 });
            }
        }
        KeyAction::ToggleSelect => {
            if let Some(record) = app.cursor_record() {
                app.view.toggle_select(record.id);
            }
        }
        KeyAction::ToggleSelectAll => app.view.toggle_select_all(),
        KeyAction::OpenDetails => {
            if let Some(record) = app.cursor_record() {
                app.open_modal(ModalState::Details { record });
            }
        }
        KeyAction::MoveUp => app.cursor = app.cursor.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.cursor + 1 < app.page_rows().len() {
                app.cursor += 1;
            }
        }
        KeyAction::PrevPage => move_page(app, |v| v.prev_page()),
        KeyAction::NextPage => move_page(app, |v| v.next_page()),
        KeyAction::FirstPage => move_page(app, |v| v.first_page()),
        KeyAction::LastPage => move_page(app, |v| v.last_page()),
        KeyAction::CyclePageSize => {
            let current = app.view.page_size();
            let next = PAGE_SIZE_OPTIONS
                .iter()
                .position(|&s| s == current)
                .map_or(PAGE_SIZE_OPTIONS[0], |i| {
                    PAGE_SIZE_OPTIONS[(i + 1) % PAGE_SIZE_OPTIONS.len()]
                });
            app.view.set_page_size(next);
            app.cursor = 0;
        }
        KeyAction::SortById => app.view.sort_by(SortColumn::Id),
        KeyAction::SortByName => app.view.sort_by(SortColumn::Name),
        KeyAction::SortByEmail => app.view.sort_by(SortColumn::Email),
        KeyAction::SortByRegistered => app.view.sort_by(SortColumn::RegistrationDate),
        KeyAction::SortByLastActivity => app.view.sort_by(SortColumn::LastActivity),
        KeyAction::Reload => {
            app.queue(PendingOp::Load);
        }
    }
    app.clamp_cursor();
    false
}

fn move_page(app: &mut AppState, step: impl FnOnce(&mut crate::view::ViewState) -> bool) {
    if step(&mut app.view) {
        app.cursor = 0;
    }
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.view.set_search_query(String::new());
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            let mut query = app.view.search_query().to_string();
            query.pop();
            app.view.set_search_query(query);
        }
        KeyCode::Char(c) => {
            let mut query = app.view.search_query().to_string();
            query.push(c);
            app.view.set_search_query(query);
        }
        _ => return,
    }
    app.cursor = 0;
}

fn handle_edit_key(app: &mut AppState, focus: EditFocus, code: KeyCode) {
    if app.is_busy() {
        return;
    }
    let form = app.view.edit_form().clone();
    match (code, focus) {
        (KeyCode::Esc, _) => {
            app.view.cancel_edit();
            app.input_mode = InputMode::Normal;
        }
        (KeyCode::Tab | KeyCode::Down, _) => app.input_mode = InputMode::Edit(focus.next()),
        (KeyCode::Enter, _) => match app.view.editing_id() {
            Some(id) => {
                app.queue(PendingOp::Update { id, fields: form });
            }
            None => app.input_mode = InputMode::Normal,
        },
        (KeyCode::Left | KeyCode::Right | KeyCode::Char(' '), EditFocus::Role) => {
            app.view.update_edit_field(EditField::Role(form.role.cycle()));
        }
        (KeyCode::Backspace, EditFocus::Name) => {
            let mut name = form.name;
            name.pop();
            app.view.update_edit_field(EditField::Name(name));
        }
        (KeyCode::Backspace, EditFocus::Email) => {
            let mut email = form.email;
            email.pop();
            app.view.update_edit_field(EditField::Email(email));
        }
        (KeyCode::Char(c), EditFocus::Name) => {
            app.view.update_edit_field(EditField::Name(format!("{}{c}", form.name)));
        }
        (KeyCode::Char(c), EditFocus::Email) => {
            app.view.update_edit_field(EditField::Email(format!("{}{c}", form.email)));
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    let Some(modal) = app.modal.take() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    let next = match modal {
        ModalState::Info { message } => match code {
            KeyCode::Esc | KeyCode::Enter => None,
            _ => Some(ModalState::Info { message }),
        },
        ModalState::Help { scroll } => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => None,
            KeyCode::Up | KeyCode::Char('k') => Some(ModalState::Help {
                scroll: scroll.saturating_sub(1),
            }),
            KeyCode::Down | KeyCode::Char('j') => Some(ModalState::Help {
                scroll: scroll.saturating_add(1),
            }),
            _ => Some(ModalState::Help { scroll }),
        },
        ModalState::Details { record } => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => None,
            _ => Some(ModalState::Details { record }),
        },
        ModalState::FilterMenu { selected } => filter_menu_key(app, selected, code),
        ModalState::DateInput {
            field,
            value,
            error,
        } => date_input_key(app, field, value, error, code),
        ModalState::DeleteConfirm { ids, selected } => delete_confirm_key(app, ids, selected, code),
        ModalState::AddUser { focus } => add_user_key(app, focus, code),
    };
    match next {
        Some(modal) => app.open_modal(modal),
        None => app.close_modal(),
    }
}

fn filter_menu_key(app: &mut AppState, selected: usize, code: KeyCode) -> Option<ModalState> {
    let last = FILTER_MENU_ITEMS.len() - 1;
    match code {
        KeyCode::Esc | KeyCode::Char('q') => return None,
        KeyCode::Up | KeyCode::Char('k') => {
            return Some(ModalState::FilterMenu {
                selected: selected.saturating_sub(1),
            });
        }
        KeyCode::Down | KeyCode::Char('j') => {
            return Some(ModalState::FilterMenu {
                selected: (selected + 1).min(last),
            });
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {}
        _ => return Some(ModalState::FilterMenu { selected }),
    }
    let back = code == KeyCode::Left;
    app.cursor = 0;
    match selected {
        0 => app.view.set_filter_role(cycle_option(app.view.filter_role(), &Role::ALL, back)),
        1 => app
            .view
            .set_filter_status(cycle_option(app.view.filter_status(), &Status::ALL, back)),
        2 | 3 => {
            let field = if selected == 2 { DateField::From } else { DateField::To };
            let current = match field {
                DateField::From => app.view.date_from(),
                DateField::To => app.view.date_to(),
            };
            return Some(ModalState::DateInput {
                field,
                value: current.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default(),
                error: None,
            });
        }
        4 => app.view.clear_date_filter(),
        _ => {
            app.view.clear_all_filters();
            return None;
        }
    }
    Some(ModalState::FilterMenu { selected })
}

/// `None -> first -> ... -> last -> None`, or the reverse when `back`.
fn cycle_option<T: Copy + PartialEq>(current: Option<T>, all: &[T], back: bool) -> Option<T> {
    let pos = current.and_then(|c| all.iter().position(|x| *x == c));
    match (pos, back) {
        (None, false) => all.first().copied(),
        (None, true) => all.last().copied(),
        (Some(i), false) => all.get(i + 1).copied(),
        (Some(0), true) => None,
        (Some(i), true) => all.get(i - 1).copied(),
    }
}

fn date_input_key(
    app: &mut AppState,
    field: DateField,
    mut value: String,
    error: Option<String>,
    code: KeyCode,
) -> Option<ModalState> {
    let menu_row = match field {
        DateField::From => 2,
        DateField::To => 3,
    };
    match code {
        KeyCode::Esc => Some(ModalState::FilterMenu { selected: menu_row }),
        KeyCode::Backspace => {
            value.pop();
            Some(ModalState::DateInput { field, value, error: None })
        }
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
            value.push(c);
            Some(ModalState::DateInput { field, value, error: None })
        }
        KeyCode::Enter => {
            let parsed = if value.trim().is_empty() {
                Ok(None)
            } else {
                NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map(Some)
            };
            match parsed {
                Ok(date) => {
                    match field {
                        DateField::From => app.view.set_date_from(date),
                        DateField::To => app.view.set_date_to(date),
                    }
                    app.cursor = 0;
                    Some(ModalState::FilterMenu { selected: menu_row })
                }
                Err(_) => Some(ModalState::DateInput {
                    field,
                    value,
                    error: Some("Use YYYY-MM-DD".to_string()),
                }),
            }
        }
        _ => Some(ModalState::DateInput { field, value, error }),
    }
}

fn delete_confirm_key(
    app: &mut AppState,
    ids: Vec<u32>,
    selected: usize,
    code: KeyCode,
) -> Option<ModalState> {
    let confirm = match code {
        KeyCode::Esc | KeyCode::Char('n') => return None,
        KeyCode::Left
        | KeyCode::Right
        | KeyCode::Tab
        | KeyCode::Char('h')
        | KeyCode::Char('l') => {
            return Some(ModalState::DeleteConfirm {
                ids,
                selected: 1 - selected.min(1),
            });
        }
        KeyCode::Char('y') => true,
        KeyCode::Enter => selected == 0,
        _ => return Some(ModalState::DeleteConfirm { ids, selected }),
    };
    if confirm {
        let op = if ids.len() == 1 {
            PendingOp::Delete { id: ids[0] }
        } else {
            PendingOp::DeleteMany { ids }
        };
        if !app.queue(op) {
            return Some(ModalState::Info {
                message: "Another operation is in progress.".to_string(),
            });
        }
    }
    None
}

fn add_user_key(app: &mut AppState, focus: AddUserField, code: KeyCode) -> Option<ModalState> {
    let keep = |focus| Some(ModalState::AddUser { focus });
    match (code, focus) {
        (KeyCode::Esc, _) => {
            app.form.close();
            None
        }
        (KeyCode::Tab | KeyCode::Down, _) | (KeyCode::Enter, AddUserField::Name | AddUserField::Email) => {
            blur(app, focus);
            keep(focus.next())
        }
        (KeyCode::BackTab | KeyCode::Up, _) => {
            blur(app, focus);
            keep(focus.prev())
        }
        (KeyCode::Enter, AddUserField::Submit) => {
            submit_new_user(app);
            keep(focus)
        }
        (KeyCode::Left | KeyCode::Right | KeyCode::Char(' '), AddUserField::Role) => {
            let role = app.form.draft().role.cycle();
            app.form.update_field(DraftField::Role(role));
            keep(focus)
        }
        (KeyCode::Char(' ') | KeyCode::Enter, AddUserField::WelcomeEmail) => {
            let send = !app.form.draft().send_welcome_email;
            app.form.update_field(DraftField::SendWelcomeEmail(send));
            keep(focus)
        }
        (KeyCode::Backspace, AddUserField::Name) => {
            let mut name = app.form.draft().name.clone();
            name.pop();
            app.form.update_field(DraftField::Name(name));
            keep(focus)
        }
        (KeyCode::Backspace, AddUserField::Email) => {
            let mut email = app.form.draft().email.clone();
            email.pop();
            app.form.update_field(DraftField::Email(email));
            keep(focus)
        }
        (KeyCode::Char(c), AddUserField::Name) => {
            let name = format!("{}{c}", app.form.draft().name);
            app.form.update_field(DraftField::Name(name));
            keep(focus)
        }
        (KeyCode::Char(c), AddUserField::Email) => {
            let email = format!("{}{c}", app.form.draft().email);
            app.form.update_field(DraftField::Email(email));
            keep(focus)
        }
        _ => keep(focus),
    }
}

/// Leaving a text field validates it.
fn blur(app: &mut AppState, focus: AddUserField) {
    match focus {
        AddUserField::Name => app.form.validate_name(),
        AddUserField::Email => app.form.validate_email(app.view.iter_records()),
        _ => {}
    }
}

fn submit_new_user(app: &mut AppState) {
    app.form.validate_name();
    app.form.validate_email(app.view.iter_records());
    if !app.form.is_valid() {
        tracing::debug!(errors = ?app.form.errors(), "new user rejected by validation");
        return;
    }
    let draft = app.form.draft().clone();
    app.queue(PendingOp::Create(draft));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_option_wraps_through_none() {
        let all = [1, 2, 3];
        assert_eq!(cycle_option(None, &all, false), Some(1));
        assert_eq!(cycle_option(Some(3), &all, false), None);
        assert_eq!(cycle_option(None, &all, true), Some(3));
        assert_eq!(cycle_option(Some(1), &all, true), None);
        assert_eq!(cycle_option(Some(2), &all, true), Some(1));
    }
}
