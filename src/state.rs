//! Application state: the complaint store plus the active session

use crate::session::Session;
use crate::store::ComplaintStore;
use chrono::Utc;

#[derive(Debug, Default)]
pub struct Desk {
    pub store: ComplaintStore,
    pub session: Session,
}

impl Desk {
    pub fn new(store: ComplaintStore) -> Self {
        Self {
            store,
            session: Session::default(),
        }
    }

    /// Desk seeded with the demonstration complaints
    pub fn with_demo_data() -> Self {
        Self::new(ComplaintStore::with_demo_data(Utc::now()))
    }

    /// Sign out. Complaints stay; all session and view state is dropped.
    pub fn logout(&mut self) {
        self.session.reset();
    }
}
