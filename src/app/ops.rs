//! Store operations queued by key handlers and executed by the event loop.
//!
//! Queuing raises the loading/saving flag so the next frame shows it; the
//! operation then runs synchronously and both flags are cleared whatever the
//! outcome.

use crate::app::{AppState, ModalState};
use crate::error::{Context, Result};
use crate::model::{EditableFields, NewUserDraft};

#[derive(Clone, Debug, PartialEq)]
pub enum PendingOp {
    Load,
    Create(NewUserDraft),
    Update { id: u32, fields: EditableFields },
    Delete { id: u32 },
    DeleteMany { ids: Vec<u32> },
    ToggleStatus { id: u32 },
}

impl PendingOp {
    /// Prefix of the message shown when the operation fails.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            PendingOp::Load => "Failed to load users",
            PendingOp::Create(_) => "Failed to create user",
            PendingOp::Update { .. } => "Failed to update user",
            PendingOp::Delete { .. } => "Failed to delete user",
            PendingOp::DeleteMany { .. } => "Failed to delete users",
            PendingOp::ToggleStatus { .. } => "Failed to change status",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PendingOp::Load => "load",
            PendingOp::Create(_) => "create",
            PendingOp::Update { .. } => "update",
            PendingOp::Delete { .. } => "delete",
            PendingOp::DeleteMany { .. } => "delete_many",
            PendingOp::ToggleStatus { .. } => "toggle_status",
        }
    }
}

/// Run the queued operation, if any. Returns whether one ran.
pub fn run_pending(app: &mut AppState) -> bool {
    match app.pending.take() {
        Some(op) => {
            execute(app, op);
            true
        }
        None => false,
    }
}

pub fn execute(app: &mut AppState, op: PendingOp) {
    let started = std::time::Instant::now();
    let result = call_store(app, &op).with_ctx(|| op.failure_prefix().to_string());
    app.is_loading = false;
    app.is_saving = false;

    if let Err(err) = result {
        tracing::warn!(op = op.name(), %err, "store operation failed");
        app.error = Some(err.to_string());
        return;
    }
    tracing::debug!(op = op.name(), elapsed_ms = started.elapsed().as_millis() as u64, "store operation done");

    app.view.set_records(app.store.snapshot());
    match op {
        PendingOp::Create(_) => {
            app.form.close();
            if matches!(app.modal, Some(ModalState::AddUser { .. })) {
                app.close_modal();
            }
        }
        PendingOp::Update { id, .. } => {
            if app.view.editing_id() == Some(id) {
                app.view.cancel_edit();
            }
            app.input_mode = crate::app::InputMode::Normal;
        }
        PendingOp::Delete { id } => app.view.deselect(&[id]),
        PendingOp::DeleteMany { ids } => app.view.deselect(&ids),
        PendingOp::Load | PendingOp::ToggleStatus { .. } => {}
    }
    if app.view.current_page() > app.view.total_pages() {
        app.view.last_page();
    }
    app.clamp_cursor();
}

fn call_store(app: &mut AppState, op: &PendingOp) -> Result<()> {
    let store = app.store.as_mut();
    match op {
        PendingOp::Load => store.load_all().map(drop),
        PendingOp::Create(draft) => store.create(draft).map(drop),
        PendingOp::Update { id, fields } => store.update(*id, fields).map(drop),
        PendingOp::Delete { id } => store.delete(*id),
        PendingOp::DeleteMany { ids } => store.delete_many(ids),
        PendingOp::ToggleStatus { id } => store.toggle_status(*id).map(drop),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::model::Role;
    use crate::store::{MockOptions, MockStore};

    fn app_with(options: MockOptions) -> AppState {
        AppState::new(Box::new(MockStore::new(options)), Config::default())
    }

    #[test]
    fn load_fills_the_view_and_clears_flags() {
        let mut app = app_with(MockOptions {
            record_count: 30,
            seed: Some(5),
            ..MockOptions::default()
        });
        assert!(app.queue(PendingOp::Load));
        assert!(app.is_loading);
        assert!(!app.queue(PendingOp::Delete { id: 1 }));
        assert!(run_pending(&mut app));
        assert!(!app.is_loading && !app.is_saving);
        assert_eq!(app.view.records().len(), 30);
        assert!(!run_pending(&mut app));
    }

    #[test]
    fn failure_sets_prefixed_message_and_clears_flags() {
        let mut app = app_with(MockOptions {
            fail_rate: 1.0,
            seed: Some(1),
            ..MockOptions::default()
        });
        app.queue(PendingOp::Create(NewUserDraft {
            name: "Someone".into(),
            email: "someone@example.com".into(),
            role: Role::User,
            send_welcome_email: false,
        }));
        assert!(app.is_saving);
        run_pending(&mut app);
        assert!(!app.is_saving);
        assert_eq!(
            app.error.as_deref(),
            Some("Failed to create user: service unavailable during create")
        );

        // a new load clears the previous error as soon as it is queued
        app.queue(PendingOp::Load);
        assert_eq!(app.error, None);
        run_pending(&mut app);
        assert!(app.error.as_deref().is_some_and(|e| e.starts_with("Failed to load users")));
    }

    #[test]
    fn bulk_delete_deselects_and_clamps_page() {
        let mut app = app_with(MockOptions {
            record_count: 12,
            seed: Some(9),
            ..MockOptions::default()
        });
        execute(&mut app, PendingOp::Load);
        app.view.set_page_size(10);
        app.view.go_to_page(2);
        app.view.toggle_select_all();
        let ids: Vec<u32> = app.view.selected_ids().iter().copied().collect();
        assert_eq!(ids, vec![11, 12]);

        execute(&mut app, PendingOp::DeleteMany { ids });
        assert!(app.view.selected_ids().is_empty());
        assert_eq!(app.view.total_pages(), 1);
        assert_eq!(app.view.current_page(), 1);
    }

    #[test]
    fn update_ends_matching_edit_session() {
        let mut app = app_with(MockOptions {
            record_count: 3,
            seed: Some(2),
            ..MockOptions::default()
        });
        execute(&mut app, PendingOp::Load);
        let first = app.view.record(1).unwrap();
        app.view.start_edit(&first);
        let mut fields = first.editable_fields();
        fields.name = "Changed Name".into();
        execute(&mut app, PendingOp::Update { id: 1, fields });
        assert_eq!(app.view.editing_id(), None);
        assert_eq!(app.view.record(1).unwrap().name, "Changed Name");
    }
}
