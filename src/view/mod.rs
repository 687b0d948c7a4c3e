//! The view pipeline: source records plus view parameters, and the derived
//! views computed from them.
//!
//! The chain is fixed: `by_role` -> `by_status` -> `by_date` -> `searched` ->
//! `sorted` -> `paginated`. Every stage is cached in a [`memo::Memo`] keyed by
//! the revisions of the parameters it reads and the generation of the stage
//! before it, so reading a view twice, or after an unrelated change, does not
//! recompute anything.
//!
//! Mutation happens only through the methods on [`ViewState`]. Every method
//! that changes the search text, a filter or the date range leaves
//! `current_page` at 1.

pub mod edit;
pub mod memo;
pub mod pages;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::model::{EditableFields, Role, Status, UserRecord};
use edit::EditSession;
pub use edit::EditField;
use memo::{Memo, Tracked};
pub use pages::{PageItem, visible_pages};

/// Rows shared between the stages of the pipeline.
pub type Rows = Vec<Rc<UserRecord>>;

pub const DEFAULT_PAGE_SIZE: usize = 25;
/// Page sizes offered by the pagination bar.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Name,
    Email,
    RegistrationDate,
    LastActivity,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Id,
        SortColumn::Name,
        SortColumn::Email,
        SortColumn::RegistrationDate,
        SortColumn::LastActivity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Name => "name",
            SortColumn::Email => "email",
            SortColumn::RegistrationDate => "registration_date",
            SortColumn::LastActivity => "last_activity",
        }
    }

    /// Accepts both `registration_date` and `registrationDate` spellings.
    pub fn parse(s: &str) -> Option<Self> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match norm.as_str() {
            "id" => Some(SortColumn::Id),
            "name" => Some(SortColumn::Name),
            "email" => Some(SortColumn::Email),
            "registrationdate" | "registered" => Some(SortColumn::RegistrationDate),
            "lastactivity" => Some(SortColumn::LastActivity),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Asc),
            "desc" | "descending" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// How many times each stage has been computed so far.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StageGenerations {
    pub by_role: u64,
    pub by_status: u64,
    pub by_date: u64,
    pub searched: u64,
    pub sorted: u64,
    pub paginated: u64,
}

struct Memos {
    by_role: Memo<(u64, u64), Rows>,
    by_status: Memo<(u64, u64), Rows>,
    by_date: Memo<(u64, u64, u64), Rows>,
    searched: Memo<(u64, u64), Rows>,
    sorted: Memo<(u64, u64, u64), Rows>,
    paginated: Memo<(u64, u64, u64), Rows>,
}

impl Memos {
    fn new() -> Self {
        Self {
            by_role: Memo::new("by_role"),
            by_status: Memo::new("by_status"),
            by_date: Memo::new("by_date"),
            searched: Memo::new("searched"),
            sorted: Memo::new("sorted"),
            paginated: Memo::new("paginated"),
        }
    }
}

/// Source records, view parameters, selection and edit session of one table.
pub struct ViewState {
    records: Rows,
    records_rev: u64,
    search_query: Tracked<String>,
    filter_role: Tracked<Option<Role>>,
    filter_status: Tracked<Option<Status>>,
    date_from: Tracked<Option<NaiveDate>>,
    date_to: Tracked<Option<NaiveDate>>,
    sort_column: Tracked<SortColumn>,
    sort_direction: Tracked<SortDirection>,
    current_page: Tracked<usize>,
    page_size: Tracked<usize>,
    selected_ids: BTreeSet<u32>,
    edit: EditSession,
    memos: Memos,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            records_rev: 0,
            search_query: Tracked::new(String::new()),
            filter_role: Tracked::new(None),
            filter_status: Tracked::new(None),
            date_from: Tracked::new(None),
            date_to: Tracked::new(None),
            sort_column: Tracked::new(SortColumn::Id),
            sort_direction: Tracked::new(SortDirection::Asc),
            current_page: Tracked::new(1),
            page_size: Tracked::new(page_size.max(1)),
            selected_ids: BTreeSet::new(),
            edit: EditSession::default(),
            memos: Memos::new(),
        }
    }

    // ----- source records -------------------------------------------------

    /// Replace the whole record set.
    pub fn set_records(&mut self, records: Vec<UserRecord>) {
        self.records = records.into_iter().map(Rc::new).collect();
        self.records_rev += 1;
    }

    pub fn records(&self) -> &[Rc<UserRecord>] {
        &self.records
    }

    pub fn iter_records(&self) -> impl Iterator<Item = &UserRecord> {
        self.records.iter().map(|r| r.as_ref())
    }

    pub fn record(&self, id: u32) -> Option<Rc<UserRecord>> {
        self.records.iter().find(|r| r.id == id).cloned()
    }

    // ----- parameters -----------------------------------------------------

    pub fn search_query(&self) -> &str {
        self.search_query.get()
    }

    pub fn filter_role(&self) -> Option<Role> {
        *self.filter_role.get()
    }

    pub fn filter_status(&self) -> Option<Status> {
        *self.filter_status.get()
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        *self.date_from.get()
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        *self.date_to.get()
    }

    pub fn sort_column(&self) -> SortColumn {
        *self.sort_column.get()
    }

    pub fn sort_direction(&self) -> SortDirection {
        *self.sort_direction.get()
    }

    pub fn current_page(&self) -> usize {
        *self.current_page.get()
    }

    pub fn page_size(&self) -> usize {
        *self.page_size.get()
    }

    pub fn selected_ids(&self) -> &BTreeSet<u32> {
        &self.selected_ids
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search_query().trim().is_empty()
            || self.filter_role().is_some()
            || self.filter_status().is_some()
            || self.date_from().is_some()
            || self.date_to().is_some()
    }

    // ----- derived views --------------------------------------------------

    pub fn by_role(&self) -> Rc<Rows> {
        self.by_role_stage().0
    }

    pub fn by_status(&self) -> Rc<Rows> {
        self.by_status_stage().0
    }

    pub fn by_date(&self) -> Rc<Rows> {
        self.by_date_stage().0
    }

    pub fn searched(&self) -> Rc<Rows> {
        self.searched_stage().0
    }

    pub fn sorted(&self) -> Rc<Rows> {
        self.sorted_stage().0
    }

    pub fn paginated(&self) -> Rc<Rows> {
        self.paginated_stage().0
    }

    fn by_role_stage(&self) -> (Rc<Rows>, u64) {
        let key = (self.records_rev, self.filter_role.rev());
        self.memos.by_role.get(key, || match self.filter_role() {
            None => self.records.clone(),
            Some(role) => self
                .records
                .iter()
                .filter(|u| u.role == role)
                .cloned()
                .collect(),
        })
    }

    fn by_status_stage(&self) -> (Rc<Rows>, u64) {
        let (upstream, generation) = self.by_role_stage();
        let key = (generation, self.filter_status.rev());
        self.memos.by_status.get(key, || match self.filter_status() {
            None => upstream.as_ref().clone(),
            Some(status) => upstream
                .iter()
                .filter(|u| u.status == status)
                .cloned()
                .collect(),
        })
    }

    fn by_date_stage(&self) -> (Rc<Rows>, u64) {
        let (upstream, generation) = self.by_status_stage();
        let key = (generation, self.date_from.rev(), self.date_to.rev());
        self.memos.by_date.get(key, || {
            let from = self.date_from().map(start_of_day);
            let to = self.date_to().map(end_of_day);
            upstream
                .iter()
                .filter(|u| from.is_none_or(|f| u.registration_date >= f))
                .filter(|u| to.is_none_or(|t| u.registration_date <= t))
                .cloned()
                .collect()
        })
    }

    fn searched_stage(&self) -> (Rc<Rows>, u64) {
        let (upstream, generation) = self.by_date_stage();
        let key = (generation, self.search_query.rev());
        self.memos.searched.get(key, || {
            let query = self.search_query().trim().to_lowercase();
            if query.is_empty() {
                return upstream.as_ref().clone();
            }
            upstream
                .iter()
                .filter(|u| {
                    u.name.to_lowercase().contains(&query)
                        || u.email.to_lowercase().contains(&query)
                        || u.id.to_string().contains(&query)
                })
                .cloned()
                .collect()
        })
    }

    fn sorted_stage(&self) -> (Rc<Rows>, u64) {
        let (upstream, generation) = self.searched_stage();
        let key = (generation, self.sort_column.rev(), self.sort_direction.rev());
        self.memos.sorted.get(key, || {
            let column = self.sort_column();
            let mut rows = upstream.as_ref().clone();
            // sort_by_cached_key is stable: equal keys keep their input order
            match self.sort_direction() {
                SortDirection::Asc => rows.sort_by_cached_key(|u| sort_key(column, u)),
                SortDirection::Desc => rows.sort_by_cached_key(|u| Reverse(sort_key(column, u))),
            }
            rows
        })
    }

    fn paginated_stage(&self) -> (Rc<Rows>, u64) {
        let (upstream, generation) = self.sorted_stage();
        let key = (generation, self.current_page.rev(), self.page_size.rev());
        self.memos.paginated.get(key, || {
            let start = (self.current_page() - 1).saturating_mul(self.page_size());
            upstream
                .iter()
                .skip(start)
                .take(self.page_size())
                .cloned()
                .collect()
        })
    }

    pub fn stage_generations(&self) -> StageGenerations {
        StageGenerations {
            by_role: self.memos.by_role.generation(),
            by_status: self.memos.by_status.generation(),
            by_date: self.memos.by_date.generation(),
            searched: self.memos.searched.generation(),
            sorted: self.memos.sorted.generation(),
            paginated: self.memos.paginated.generation(),
        }
    }

    // ----- derived quantities ---------------------------------------------

    /// Number of records that pass every filter and the search.
    pub fn total_count(&self) -> usize {
        self.sorted().len()
    }

    pub fn total_pages(&self) -> usize {
        self.total_count().div_ceil(self.page_size()).max(1)
    }

    /// 1-based position of the first row on the current page.
    pub fn pagination_start(&self) -> usize {
        (self.current_page() - 1) * self.page_size() + 1
    }

    /// 1-based position of the last row on the current page.
    pub fn pagination_end(&self) -> usize {
        (self.current_page() * self.page_size()).min(self.total_count())
    }

    pub fn visible_pages(&self) -> Vec<PageItem> {
        visible_pages(self.total_pages(), self.current_page())
    }

    pub fn is_all_selected(&self) -> bool {
        let page = self.paginated();
        !page.is_empty() && page.iter().all(|u| self.selected_ids.contains(&u.id))
    }

    // ----- sorting and paging ---------------------------------------------

    pub fn sort_by(&mut self, column: SortColumn) {
        if self.sort_column() == column {
            let flipped = self.sort_direction().toggled();
            self.sort_direction.set(flipped);
        } else {
            self.sort_column.set(column);
            self.sort_direction.set(SortDirection::Asc);
        }
    }

    pub fn set_sort(&mut self, column: SortColumn, direction: SortDirection) {
        self.sort_column.set(column);
        self.sort_direction.set(direction);
    }

    /// Move to `page` if it exists; returns whether the move was accepted.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.current_page.set(page);
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page() + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.current_page().saturating_sub(1))
    }

    pub fn first_page(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        self.go_to_page(self.total_pages())
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size.set(size.max(1));
        self.reset_page();
    }

    fn reset_page(&mut self) {
        self.current_page.set(1);
    }

    // ----- search and filters (all reset the page) ------------------------

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query.set(query.into());
        self.reset_page();
    }

    pub fn set_filter_role(&mut self, role: Option<Role>) {
        self.filter_role.set(role);
        self.reset_page();
    }

    pub fn set_filter_status(&mut self, status: Option<Status>) {
        self.filter_status.set(status);
        self.reset_page();
    }

    pub fn set_date_from(&mut self, date: Option<NaiveDate>) {
        self.date_from.set(date);
        self.reset_page();
    }

    pub fn set_date_to(&mut self, date: Option<NaiveDate>) {
        self.date_to.set(date);
        self.reset_page();
    }

    pub fn clear_date_filter(&mut self) {
        self.set_date_from(None);
        self.set_date_to(None);
    }

    pub fn clear_all_filters(&mut self) {
        self.set_search_query(String::new());
        self.set_filter_role(None);
        self.set_filter_status(None);
        self.clear_date_filter();
    }

    // ----- selection ------------------------------------------------------

    pub fn toggle_select(&mut self, id: u32) {
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
    }

    /// Select or deselect every row of the current page (not the whole filtered set).
    pub fn toggle_select_all(&mut self) {
        let page = self.paginated();
        if self.is_all_selected() {
            for u in page.iter() {
                self.selected_ids.remove(&u.id);
            }
        } else {
            self.selected_ids.extend(page.iter().map(|u| u.id));
        }
    }

    pub fn deselect(&mut self, ids: &[u32]) {
        for id in ids {
            self.selected_ids.remove(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    // ----- inline editing -------------------------------------------------

    pub fn start_edit(&mut self, record: &UserRecord) {
        self.edit.start(record);
    }

    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    pub fn update_edit_field(&mut self, field: EditField) {
        self.edit.update(field);
    }

    pub fn editing_id(&self) -> Option<u32> {
        self.edit.editing_id()
    }

    pub fn edit_form(&self) -> &EditableFields {
        self.edit.form()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(i64),
    Text(String),
}

fn sort_key(column: SortColumn, u: &UserRecord) -> SortKey {
    match column {
        SortColumn::Id => SortKey::Number(i64::from(u.id)),
        SortColumn::Name => SortKey::Text(u.name.to_lowercase()),
        SortColumn::Email => SortKey::Text(u.email.to_lowercase()),
        SortColumn::RegistrationDate => SortKey::Number(u.registration_date.timestamp_millis()),
        SortColumn::LastActivity => SortKey::Number(u.last_activity.timestamp_millis()),
    }
}

fn local_instant(naive: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Local midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    local_instant(date.and_time(NaiveTime::MIN))
}

/// 23:59:59.999 local time on `date`.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    local_instant(date.and_time(NaiveTime::MIN) + TimeDelta::milliseconds(86_399_999))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn rec(id: u32, name: &str, role: Role, status: Status) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            email: format!("user{id}@example.com"),
            role,
            status,
            registration_date: at(2020, 1, id.min(28), 10, 0),
            last_activity: at(2024, 6, 1, 12, 0),
            avatar: None,
            login_count: 0,
            posts_count: 0,
            comments_count: 0,
        }
    }

    fn sample() -> Vec<UserRecord> {
        vec![
            rec(1, "Carol", Role::Admin, Status::Active),
            rec(2, "alice", Role::User, Status::Inactive),
            rec(3, "Bob", Role::Moderator, Status::Active),
            rec(4, "alice", Role::Admin, Status::Inactive),
            rec(5, "Dave", Role::User, Status::Active),
        ]
    }

    fn view_with(records: Vec<UserRecord>, page_size: usize) -> ViewState {
        let mut v = ViewState::new(page_size);
        v.set_records(records);
        v
    }

    fn ids(rows: &Rows) -> Vec<u32> {
        rows.iter().map(|u| u.id).collect()
    }

    #[test]
    fn role_and_status_filters_chain() {
        let mut v = view_with(sample(), 10);
        assert_eq!(ids(&v.by_role()), vec![1, 2, 3, 4, 5]);
        v.set_filter_role(Some(Role::Admin));
        assert_eq!(ids(&v.by_role()), vec![1, 4]);
        v.set_filter_status(Some(Status::Inactive));
        assert_eq!(ids(&v.by_status()), vec![4]);
        v.set_filter_role(None);
        assert_eq!(ids(&v.by_status()), vec![2, 4]);
    }

    #[test]
    fn date_range_is_inclusive_through_end_of_day() {
        let mut records = sample();
        records[0].registration_date = at(2020, 3, 14, 23, 59);
        records[1].registration_date = at(2020, 3, 15, 0, 0);
        records[2].registration_date = at(2020, 3, 15, 23, 30);
        records[3].registration_date = at(2020, 3, 16, 0, 0);
        records[4].registration_date = at(2020, 3, 20, 8, 0);
        let mut v = view_with(records, 10);

        let day = NaiveDate::from_ymd_opt(2020, 3, 15).unwrap();
        v.set_date_from(Some(day));
        v.set_date_to(Some(day));
        assert_eq!(ids(&v.by_date()), vec![2, 3]);

        v.set_date_to(None);
        assert_eq!(ids(&v.by_date()), vec![2, 3, 4, 5]);
    }

    #[test]
    fn search_matches_name_email_or_id_case_insensitively() {
        let mut v = view_with(sample(), 10);
        v.set_search_query("  ALICE ");
        assert_eq!(ids(&v.searched()), vec![2, 4]);
        v.set_search_query("user5@");
        assert_eq!(ids(&v.searched()), vec![5]);
        v.set_search_query("3");
        assert_eq!(ids(&v.searched()), vec![3]);
        v.set_search_query("   ");
        assert_eq!(v.searched().len(), 5);
    }

    #[test]
    fn sort_is_stable_and_direction_reverses_distinct_keys() {
        let mut v = view_with(sample(), 10);
        v.sort_by(SortColumn::Name);
        // the two "alice" rows tie and keep input order in both directions
        assert_eq!(ids(&v.sorted()), vec![2, 4, 3, 1, 5]);
        v.sort_by(SortColumn::Name);
        assert_eq!(v.sort_direction(), SortDirection::Desc);
        assert_eq!(ids(&v.sorted()), vec![5, 1, 3, 2, 4]);

        v.sort_by(SortColumn::Id);
        assert_eq!(v.sort_direction(), SortDirection::Asc);
        let asc = ids(&v.sorted());
        v.sort_by(SortColumn::Id);
        let mut desc = ids(&v.sorted());
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn pagination_bounds_and_page_moves() {
        let records: Vec<_> = (1..=23)
            .map(|i| rec(i, &format!("n{i}"), Role::User, Status::Active))
            .collect();
        let mut v = view_with(records, 10);
        assert_eq!(v.total_pages(), 3);
        assert_eq!((v.pagination_start(), v.pagination_end()), (1, 10));

        assert!(v.go_to_page(3));
        assert_eq!(ids(&v.paginated()), vec![21, 22, 23]);
        assert_eq!((v.pagination_start(), v.pagination_end()), (21, 23));

        assert!(!v.go_to_page(4));
        assert!(!v.go_to_page(0));
        assert_eq!(v.current_page(), 3);

        v.set_page_size(5);
        assert_eq!(v.current_page(), 1);
        assert_eq!(v.total_pages(), 5);
        assert!(v.last_page());
        assert_eq!(v.current_page(), 5);
        assert!(v.prev_page());
        assert_eq!(v.current_page(), 4);
    }

    #[test]
    fn empty_result_still_reports_one_page() {
        let mut v = view_with(sample(), 10);
        v.set_search_query("nobody");
        assert_eq!(v.total_pages(), 1);
        assert_eq!(v.pagination_start(), 1);
        assert_eq!(v.pagination_end(), 0);
        assert!(!v.is_all_selected());
    }

    #[test]
    fn every_filter_mutation_resets_the_page() {
        let records: Vec<_> = (1..=30)
            .map(|i| rec(i, "x", Role::User, Status::Active))
            .collect();
        let mut v = view_with(records, 5);
        let day = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let mutations: Vec<Box<dyn Fn(&mut ViewState)>> = vec![
            Box::new(|v: &mut ViewState| v.set_search_query("x")),
            Box::new(|v: &mut ViewState| v.set_filter_role(Some(Role::User))),
            Box::new(|v: &mut ViewState| v.set_filter_status(Some(Status::Active))),
            Box::new(move |v: &mut ViewState| v.set_date_from(Some(day))),
            Box::new(|v: &mut ViewState| v.set_date_to(None)),
            Box::new(|v: &mut ViewState| v.clear_all_filters()),
        ];
        for m in mutations {
            assert!(v.go_to_page(3));
            m(&mut v);
            assert_eq!(v.current_page(), 1);
        }
    }

    #[test]
    fn toggle_select_all_only_touches_the_current_page() {
        let records: Vec<_> = (1..=6)
            .map(|i| rec(i, "x", Role::User, Status::Active))
            .collect();
        let mut v = view_with(records, 3);
        v.toggle_select(5);
        v.toggle_select_all();
        assert!(v.is_all_selected());
        assert_eq!(v.selected_ids().iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 5]);

        v.toggle_select_all();
        assert_eq!(v.selected_ids().iter().copied().collect::<Vec<_>>(), vec![5]);

        v.toggle_select(5);
        assert!(v.selected_ids().is_empty());
    }

    #[test]
    fn unrelated_changes_do_not_recompute_upstream_stages() {
        let records: Vec<_> = (1..=30)
            .map(|i| rec(i, "x", Role::User, Status::Active))
            .collect();
        let mut v = view_with(records, 10);
        let _ = v.paginated();
        let first = v.stage_generations();

        let _ = v.paginated();
        v.toggle_select(1);
        let _ = v.is_all_selected();
        assert_eq!(v.stage_generations(), first);

        v.go_to_page(2);
        let _ = v.paginated();
        let after_page = v.stage_generations();
        assert_eq!(after_page.sorted, first.sorted);
        assert_eq!(after_page.paginated, first.paginated + 1);

        v.sort_by(SortColumn::Name);
        let _ = v.paginated();
        let after_sort = v.stage_generations();
        assert_eq!(after_sort.searched, first.searched);
        assert_eq!(after_sort.sorted, first.sorted + 1);

        // same value again: no revision change, nothing to do
        v.set_filter_role(None);
        let _ = v.paginated();
        assert_eq!(v.stage_generations().by_role, first.by_role);

        v.set_records(sample());
        let _ = v.paginated();
        assert_eq!(v.stage_generations().by_role, first.by_role + 1);
    }

    #[test]
    fn edit_session_seeds_and_resets() {
        let mut v = view_with(sample(), 10);
        let bob = v.record(3).unwrap();
        v.start_edit(&bob);
        assert_eq!(v.editing_id(), Some(3));
        assert_eq!(v.edit_form().name, "Bob");
        assert_eq!(v.edit_form().role, Role::Moderator);

        v.update_edit_field(EditField::Name("Robert".into()));
        v.update_edit_field(EditField::Role(Role::Admin));
        assert_eq!(v.edit_form().name, "Robert");
        assert_eq!(v.edit_form().email, "user3@example.com");

        v.cancel_edit();
        assert_eq!(v.editing_id(), None);
        assert_eq!(v.edit_form(), &EditableFields::default());
    }

    #[test]
    fn sort_column_parses_config_spellings() {
        assert_eq!(SortColumn::parse("registrationDate"), Some(SortColumn::RegistrationDate));
        assert_eq!(SortColumn::parse("last_activity"), Some(SortColumn::LastActivity));
        assert_eq!(SortColumn::parse("bogus"), None);
        for c in SortColumn::ALL {
            assert_eq!(SortColumn::parse(c.as_str()), Some(c));
        }
    }
}
