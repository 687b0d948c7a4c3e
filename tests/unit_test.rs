// Unit tests for usertable
// These tests work with the public API without modifying the main codebase

#[cfg(test)]
mod view_tests {
    use chrono::{TimeZone, Utc};
    use usertable::model::{Role, Status, UserRecord};
    use usertable::view::{PageItem, SortColumn, SortDirection, ViewState, visible_pages};

    fn create_test_user(id: u32, name: &str, role: Role, status: Status) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role,
            status,
            registration_date: Utc.with_ymd_and_hms(2020, 5, 10, 12, 0, 0).unwrap(),
            last_activity: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            avatar: None,
            login_count: id,
            posts_count: 0,
            comments_count: 0,
        }
    }

    fn create_test_view(n: u32) -> ViewState {
        let names = ["delta", "alpha", "charlie", "bravo", "alpha"];
        let mut view = ViewState::new(10);
        view.set_records(
            (1..=n)
                .map(|i| {
                    let role = if i % 3 == 0 { Role::Admin } else { Role::User };
                    let status = if i % 2 == 0 { Status::Inactive } else { Status::Active };
                    create_test_user(i, names[(i as usize - 1) % names.len()], role, status)
                })
                .collect(),
        );
        view
    }

    #[test]
    fn test_equal_keys_keep_input_order_both_ways() {
        let mut view = create_test_view(10);
        view.sort_by(SortColumn::Name);
        let asc: Vec<u32> = view.sorted().iter().map(|u| u.id).collect();
        // "alpha" rows are 2, 5, 7, 10 in input order
        assert_eq!(&asc[..4], &[2, 5, 7, 10]);

        view.sort_by(SortColumn::Name);
        assert_eq!(view.sort_direction(), SortDirection::Desc);
        let desc: Vec<u32> = view.sorted().iter().map(|u| u.id).collect();
        assert_eq!(&desc[desc.len() - 4..], &[2, 5, 7, 10]);
    }

    #[test]
    fn test_reverse_of_distinct_keys_is_exact() {
        let mut view = create_test_view(23);
        view.set_sort(SortColumn::Id, SortDirection::Asc);
        let mut asc: Vec<u32> = view.sorted().iter().map(|u| u.id).collect();
        view.set_sort(SortColumn::Id, SortDirection::Desc);
        let desc: Vec<u32> = view.sorted().iter().map(|u| u.id).collect();
        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_pagination_bounds() {
        let mut view = create_test_view(23);
        assert_eq!(view.total_pages(), 3);
        assert!(!view.go_to_page(0));
        assert!(!view.go_to_page(4));
        assert!(view.go_to_page(3));
        assert_eq!(view.paginated().len(), 3);
        assert_eq!(view.pagination_start(), 21);
        assert_eq!(view.pagination_end(), 23);
        assert!(!view.next_page());
        assert_eq!(view.current_page(), 3);
    }

    #[test]
    fn test_empty_set_still_has_one_page() {
        let mut view = create_test_view(5);
        view.set_search_query("nobody");
        assert_eq!(view.total_count(), 0);
        assert_eq!(view.total_pages(), 1);
        assert!(view.paginated().is_empty());
        assert!(!view.is_all_selected());
    }

    #[test]
    fn test_filters_compose() {
        let mut view = create_test_view(30);
        view.set_filter_role(Some(Role::Admin));
        view.set_filter_status(Some(Status::Inactive));
        // multiples of 6
        let ids: Vec<u32> = view.sorted().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![6, 12, 18, 24, 30]);
        view.set_search_query("  CHARLIE ");
        let ids: Vec<u32> = view.sorted().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![18]);
    }

    #[test]
    fn test_toggle_select_all_twice_restores_selection() {
        let mut view = create_test_view(25);
        view.toggle_select(22);
        view.toggle_select(3);
        view.toggle_select_all();
        assert!(view.is_all_selected());
        assert_eq!(view.selected_ids().len(), 11);
        view.toggle_select_all();
        // page-1 ids are removed, ids from other pages survive
        assert_eq!(view.selected_ids().iter().copied().collect::<Vec<_>>(), vec![22]);
    }

    #[test]
    fn test_unrelated_change_does_not_recompute_sort() {
        let mut view = create_test_view(40);
        view.sorted();
        let before = view.stage_generations();
        view.go_to_page(2);
        view.paginated();
        let after = view.stage_generations();
        assert_eq!(before.sorted, after.sorted);
        assert_ne!(before.paginated, after.paginated);
    }

    #[test]
    fn test_visible_pages_boundaries() {
        use PageItem::{Ellipsis as E, Page as P};
        assert_eq!(visible_pages(1, 1), vec![P(1)]);
        assert_eq!(visible_pages(7, 7), (1..=7).map(P).collect::<Vec<_>>());
        assert_eq!(visible_pages(8, 4), vec![P(1), P(2), P(3), P(4), P(5), E, P(8)]);
        assert_eq!(visible_pages(8, 5), vec![P(1), E, P(4), P(5), P(6), P(7), P(8)]);
        assert_eq!(
            visible_pages(20, 10),
            vec![P(1), E, P(9), P(10), P(11), E, P(20)]
        );
    }
}

#[cfg(test)]
mod form_tests {
    use usertable::form::{DraftField, DraftForm, FieldError, is_email_format};

    #[test]
    fn test_email_format() {
        for ok in ["a@b.co", "first.last@sub.domain.org", "x+tag@y.z"] {
            assert!(is_email_format(ok), "{ok}");
        }
        for bad in ["", "plain", "a@b", "a @b.c", "a@b .c", "a@@b.c", "@b.c", "a@.c"] {
            assert!(!is_email_format(bad), "{bad}");
        }
    }

    #[test]
    fn test_untrimmed_email_is_not_submittable() {
        let mut form = DraftForm::default();
        form.open();
        form.update_field(DraftField::Name("Alice".into()));
        form.update_field(DraftField::Email(" alice@example.com ".into()));
        form.validate_name();
        form.validate_email(std::iter::empty());
        // the validator trims, the submit check does not
        assert_eq!(form.errors().email, None);
        assert!(!form.is_valid());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FieldError::NameTooShort.to_string(), "Name must be at least 3 characters");
        assert_eq!(FieldError::EmailInvalid.to_string(), "Invalid email format");
    }
}

#[cfg(test)]
mod store_tests {
    use chrono::{Datelike, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use usertable::error::{Context, StoreError};
    use usertable::store::{MockOptions, MockStore, RecordStore, generate_mock_users, pick_random};

    #[test]
    fn test_generated_users_registered_in_2020() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();
        let users = generate_mock_users(&mut rng, 50, now);
        assert_eq!(users.len(), 50);
        assert!(users.iter().all(|u| u.registration_date.year() >= 2019
            && u.registration_date.year() <= 2020));
        assert!(users.iter().all(|u| (now - u.last_activity).num_days() <= 30));
    }

    #[test]
    fn test_pick_random_stays_in_slice() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = [1, 2, 3];
        for _ in 0..50 {
            assert!(items.contains(pick_random(&mut rng, &items)));
        }
    }

    #[test]
    fn test_with_records_and_delete_unknown_id() {
        let mut store = MockStore::with_records(Vec::new(), MockOptions::default());
        assert!(store.delete(42).is_ok());
        assert!(matches!(store.toggle_status(42), Err(StoreError::NotFound(42))));
    }

    #[test]
    fn test_nested_contexts() {
        let err = Err::<(), _>(StoreError::Unavailable("update"))
            .with_ctx(|| "inner".to_string())
            .with_ctx(|| "outer".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "outer: inner: service unavailable during update");
    }
}

#[cfg(test)]
mod app_tests {
    use usertable::app::{AppState, Config, InputMode, ModalState, PendingOp, Theme};
    use usertable::store::{MockOptions, MockStore};

    fn create_test_app() -> AppState {
        let config = Config {
            theme: Theme::dark(),
            ..Config::default()
        };
        AppState::new(Box::new(MockStore::new(MockOptions::default())), config)
    }

    #[test]
    fn test_app_state_defaults() {
        let app = create_test_app();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.modal.is_none());
        assert!(!app.is_busy());
        assert_eq!(app.view.page_size(), 25);
        assert!(app.cursor_record().is_none());
    }

    #[test]
    fn test_queue_sets_matching_flag() {
        let mut app = create_test_app();
        assert!(app.queue(PendingOp::ToggleStatus { id: 1 }));
        assert!(app.is_saving && !app.is_loading);
        assert!(!app.queue(PendingOp::Load));
        assert_eq!(app.pending, Some(PendingOp::ToggleStatus { id: 1 }));
    }

    #[test]
    fn test_open_and_close_modal_switch_mode() {
        let mut app = create_test_app();
        app.open_modal(ModalState::Help { scroll: 0 });
        assert_eq!(app.input_mode, InputMode::Modal);
        app.close_modal();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.modal.is_none());
    }
}

#[cfg(test)]
mod integration_tests {
    use ratatui::{Terminal, backend::TestBackend};
    use usertable::app::ops::run_pending;
    use usertable::app::{AppState, Config, EditFocus, InputMode, ModalState, PendingOp};
    use usertable::store::{MockOptions, MockStore};
    use usertable::ui::render;

    fn app_with(count: usize) -> AppState {
        let store = MockStore::new(MockOptions {
            record_count: count,
            seed: Some(12),
            ..MockOptions::default()
        });
        AppState::new(Box::new(store), Config::default())
    }

    fn draw(app: &mut AppState) -> String {
        let backend = TestBackend::new(120, 32);
        let mut terminal = Terminal::new(backend).expect("create terminal");
        terminal
            .draw(|f| {
                render(f, app);
            })
            .expect("render frame");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_ui_render_loading_then_loaded() {
        let mut app = app_with(40);
        app.queue(PendingOp::Load);
        let screen = draw(&mut app);
        assert!(screen.contains("Loading users..."));

        run_pending(&mut app);
        let screen = draw(&mut app);
        assert!(screen.contains("Showing 1-25 of 40"));
        assert!(screen.contains("ID ▲"));
        assert!(screen.contains("user1@example.com"));
    }

    #[test]
    fn test_ui_render_with_empty_data() {
        let mut app = app_with(0);
        let screen = draw(&mut app);
        assert!(screen.contains("No users"));
        assert!(screen.contains("No results"));
    }

    #[test]
    fn test_ui_render_every_modal() {
        let mut app = app_with(12);
        app.queue(PendingOp::Load);
        run_pending(&mut app);
        let record = app.view.record(1).unwrap();
        let modals = [
            ModalState::FilterMenu { selected: 1 },
            ModalState::DateInput {
                field: usertable::app::DateField::To,
                value: "2020-".into(),
                error: Some("Use YYYY-MM-DD".into()),
            },
            ModalState::AddUser {
                focus: usertable::app::AddUserField::Email,
            },
            ModalState::Details { record },
            ModalState::DeleteConfirm {
                ids: vec![1, 2],
                selected: 0,
            },
            ModalState::Info {
                message: "hello".into(),
            },
            ModalState::Help { scroll: 2 },
        ];
        for modal in modals {
            app.open_modal(modal);
            draw(&mut app);
        }
        app.open_modal(ModalState::DeleteConfirm {
            ids: vec![1, 2],
            selected: 0,
        });
        assert!(draw(&mut app).contains("Delete 2 selected users?"));
    }

    #[test]
    fn test_ui_render_inline_edit_row() {
        let mut app = app_with(3);
        app.queue(PendingOp::Load);
        run_pending(&mut app);
        let record = app.view.record(2).unwrap();
        app.view.start_edit(&record);
        app.input_mode = InputMode::Edit(EditFocus::Email);
        let screen = draw(&mut app);
        assert!(screen.contains("user2@example.com_"));
        assert!(screen.contains("EDIT"));
    }

    #[test]
    fn test_ui_render_tiny_terminal_does_not_panic() {
        let mut app = app_with(5);
        app.queue(PendingOp::Load);
        run_pending(&mut app);
        app.open_modal(ModalState::Help { scroll: 0 });
        let backend = TestBackend::new(20, 8);
        let mut terminal = Terminal::new(backend).expect("create terminal");
        terminal
            .draw(|f| render(f, &mut app))
            .expect("render tiny frame");
    }
}
