//! Record store boundary.
//!
//! The TUI treats every operation as atomic: after a success it replaces the
//! pipeline's record set with [`RecordStore::snapshot`].

pub mod mock;

use crate::error::Result;
use crate::model::{EditableFields, NewUserDraft, UserRecord};

pub use mock::{MockOptions, MockStore, generate_mock_users, pick_random};

pub trait RecordStore {
    /// Fetch the full record set, replacing whatever the store held.
    fn load_all(&mut self) -> Result<Vec<UserRecord>>;
    fn create(&mut self, draft: &NewUserDraft) -> Result<UserRecord>;
    fn update(&mut self, id: u32, fields: &EditableFields) -> Result<UserRecord>;
    fn delete(&mut self, id: u32) -> Result<()>;
    fn delete_many(&mut self, ids: &[u32]) -> Result<()>;
    fn toggle_status(&mut self, id: u32) -> Result<UserRecord>;
    /// Current record set, in store order.
    fn snapshot(&self) -> Vec<UserRecord>;
}
