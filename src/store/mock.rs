use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::RecordStore;
use crate::error::{Result, StoreError};
use crate::model::{EditableFields, NewUserDraft, Role, Status, UserRecord};

const MOCK_NAMES: [&str; 10] = [
    "Ivan Petrov",
    "Maria Sidorova",
    "Alexey Ivanov",
    "Elena Kuznetsova",
    "Dmitry Smirnov",
    "Olga Popova",
    "Sergey Vasiliev",
    "Anna Sokolova",
    "Nikolay Mikhailov",
    "Tatiana Novikova",
];

const LAST_ACTIVITY_WINDOW_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Uniformly pick one element.
///
/// # Panics
///
/// Panics if `items` is empty.
pub fn pick_random<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    assert!(!items.is_empty(), "pick_random needs at least one item");
    &items[rng.gen_range(0..items.len())]
}

/// Build `count` users with ids `1..=count`, registered during 2020 and active
/// within the 30 days before `now`.
pub fn generate_mock_users<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<UserRecord> {
    (1..=count as u32)
        .map(|i| {
            let name = format!("{} {i}", pick_random(rng, &MOCK_NAMES));
            let month = rng.gen_range(1..=12);
            let day = rng.gen_range(1..=28);
            let registered = NaiveDate::from_ymd_opt(2020, month, day).unwrap_or_default();
            let idle = TimeDelta::milliseconds(rng.gen_range(0..LAST_ACTIVITY_WINDOW_MS));
            UserRecord {
                id: i,
                name,
                email: format!("user{i}@example.com"),
                role: *pick_random(rng, &Role::ALL),
                status: *pick_random(rng, &Status::ALL),
                registration_date: crate::view::start_of_day(registered),
                last_activity: now - idle,
                avatar: None,
                login_count: rng.gen_range(0..500),
                posts_count: rng.gen_range(0..100),
                comments_count: rng.gen_range(0..300),
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct MockOptions {
    /// Users generated by `load_all`.
    pub record_count: usize,
    /// Simulated round-trip time of every operation.
    pub latency: Duration,
    /// Probability in `[0, 1]` that an operation fails.
    pub fail_rate: f64,
    /// Fixed RNG seed for reproducible data.
    pub seed: Option<u64>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            record_count: 100,
            latency: Duration::ZERO,
            fail_rate: 0.0,
            seed: None,
        }
    }
}

/// In-memory stand-in for a user service.
pub struct MockStore {
    records: Vec<UserRecord>,
    rng: StdRng,
    options: MockOptions,
}

impl MockStore {
    pub fn new(mut options: MockOptions) -> Self {
        options.fail_rate = options.fail_rate.clamp(0.0, 1.0);
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            records: Vec::new(),
            rng,
            options,
        }
    }

    /// Start from an existing record set instead of an empty one.
    pub fn with_records(records: Vec<UserRecord>, options: MockOptions) -> Self {
        let mut store = Self::new(options);
        store.records = records;
        store
    }

    fn round_trip(&mut self, op: &'static str) -> Result<()> {
        if !self.options.latency.is_zero() {
            std::thread::sleep(self.options.latency);
        }
        if self.options.fail_rate > 0.0 && self.rng.gen_bool(self.options.fail_rate) {
            tracing::warn!(op, "simulated store failure");
            return Err(StoreError::Unavailable(op));
        }
        Ok(())
    }

    fn position(&self, id: u32) -> Result<usize> {
        self.records
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

impl RecordStore for MockStore {
    fn load_all(&mut self) -> Result<Vec<UserRecord>> {
        self.round_trip("load")?;
        let count = self.options.record_count;
        self.records = generate_mock_users(&mut self.rng, count, Utc::now());
        tracing::info!(count, "loaded users");
        Ok(self.records.clone())
    }

    fn create(&mut self, draft: &NewUserDraft) -> Result<UserRecord> {
        self.round_trip("create")?;
        let id = self.records.iter().map(|u| u.id).max().map_or(1, |max| max + 1);
        let now = Utc::now();
        let record = UserRecord {
            id,
            name: draft.name.clone(),
            email: draft.email.clone(),
            role: draft.role,
            status: Status::Active,
            registration_date: now,
            last_activity: now,
            avatar: None,
            login_count: 0,
            posts_count: 0,
            comments_count: 0,
        };
        self.records.insert(0, record.clone());
        tracing::info!(id, role = %record.role, "created user");
        if draft.send_welcome_email {
            tracing::info!(id, email = %record.email, "welcome email queued");
        }
        Ok(record)
    }

    fn update(&mut self, id: u32, fields: &EditableFields) -> Result<UserRecord> {
        self.round_trip("update")?;
        let idx = self.position(id)?;
        let updated = UserRecord {
            name: fields.name.clone(),
            email: fields.email.clone(),
            role: fields.role,
            ..self.records[idx].clone()
        };
        self.records[idx] = updated.clone();
        tracing::info!(id, "updated user");
        Ok(updated)
    }

    fn delete(&mut self, id: u32) -> Result<()> {
        self.round_trip("delete")?;
        self.records.retain(|u| u.id != id);
        tracing::info!(id, "deleted user");
        Ok(())
    }

    fn delete_many(&mut self, ids: &[u32]) -> Result<()> {
        self.round_trip("delete_many")?;
        let before = self.records.len();
        self.records.retain(|u| !ids.contains(&u.id));
        tracing::info!(removed = before - self.records.len(), "deleted users");
        Ok(())
    }

    fn toggle_status(&mut self, id: u32) -> Result<UserRecord> {
        self.round_trip("toggle_status")?;
        let idx = self.position(id)?;
        let updated = UserRecord {
            status: self.records[idx].status.toggled(),
            ..self.records[idx].clone()
        };
        self.records[idx] = updated.clone();
        tracing::info!(id, status = %updated.status, "toggled user status");
        Ok(updated)
    }

    fn snapshot(&self) -> Vec<UserRecord> {
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: usize) -> MockStore {
        MockStore::new(MockOptions {
            record_count: count,
            seed: Some(42),
            ..MockOptions::default()
        })
    }

    #[test]
    fn generated_users_follow_the_mock_shape() {
        let mut store = seeded(20);
        let users = store.load_all().unwrap();
        assert_eq!(users.len(), 20);
        for (i, u) in users.iter().enumerate() {
            let id = i as u32 + 1;
            assert_eq!(u.id, id);
            assert_eq!(u.email, format!("user{id}@example.com"));
            assert!(u.name.ends_with(&format!(" {id}")));
            assert!(u.last_activity <= Utc::now());
            assert!(u.login_count < 500 && u.posts_count < 100 && u.comments_count < 300);
        }
    }

    #[test]
    fn same_seed_same_data() {
        let a = seeded(10).load_all().unwrap();
        let b = seeded(10).load_all().unwrap();
        let names = |v: &[UserRecord]| v.iter().map(|u| u.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn create_prepends_with_next_id() {
        let mut store = seeded(3);
        store.load_all().unwrap();
        let draft = NewUserDraft {
            name: "New Person".into(),
            email: "new@example.com".into(),
            role: Role::Moderator,
            send_welcome_email: false,
        };
        let created = store.create(&draft).unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.status, Status::Active);
        assert_eq!(created.login_count, 0);
        assert_eq!(store.snapshot()[0].id, 4);

        let mut empty = MockStore::new(MockOptions::default());
        assert_eq!(empty.create(&draft).unwrap().id, 1);
    }

    #[test]
    fn update_toggle_and_delete() {
        let mut store = seeded(5);
        store.load_all().unwrap();
        let fields = EditableFields {
            name: "Renamed".into(),
            email: "renamed@example.com".into(),
            role: Role::Admin,
        };
        let updated = store.update(2, &fields).unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.id, 2);

        let before = store.snapshot()[0].status;
        assert_eq!(store.toggle_status(1).unwrap().status, before.toggled());

        store.delete(3).unwrap();
        store.delete_many(&[1, 5, 99]).unwrap();
        let ids: Vec<u32> = store.snapshot().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 4]);

        assert!(matches!(store.update(3, &fields), Err(StoreError::NotFound(3))));
        assert!(matches!(store.toggle_status(3), Err(StoreError::NotFound(3))));
    }

    #[test]
    fn fail_rate_one_always_fails() {
        let mut store = MockStore::new(MockOptions {
            fail_rate: 1.0,
            seed: Some(1),
            ..MockOptions::default()
        });
        assert!(matches!(store.load_all(), Err(StoreError::Unavailable("load"))));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    #[should_panic(expected = "at least one item")]
    fn pick_random_on_empty_slice_is_a_bug() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty: [u8; 0] = [];
        pick_random(&mut rng, &empty);
    }
}
