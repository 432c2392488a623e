//! services/tracker/src/pages/profile.rs
//!
//! The profile page is a pure projection of the session user.

use expense_tracker_core::view::ProfileView;

use crate::session::SessionStore;

pub fn load(session: &SessionStore) -> ProfileView {
    ProfileView::from_user(session.user())
}
