//! Session state and the role-based page guard.
//!
//! The session is a trusted client-side flag: whoever can write the store is
//! logged in. The guard is a navigation convenience, not a security boundary.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::{debug, info};

use crate::dialog::Dialog;

/// Storage keys shared with the login page.
pub mod keys {
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    pub const USERNAME: &str = "username";
    pub const USER_ROLE: &str = "userRole";
}

/// Tab-scoped key/value storage holding the session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn clear(&mut self);
}

/// In-memory store, used by tests and by hosts that keep the session elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Fixed page files of the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Index,
    Approval,
    Done,
    Recap,
    Rejected,
    Dashboard,
}

impl Page {
    pub const ALL: [Self; 7] = [
        Self::Login,
        Self::Index,
        Self::Approval,
        Self::Done,
        Self::Recap,
        Self::Rejected,
        Self::Dashboard,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Login => "login.html",
            Self::Index => "index.html",
            Self::Approval => "approval.html",
            Self::Done => "done.html",
            Self::Recap => "rekap.html",
            Self::Rejected => "rejected.html",
            Self::Dashboard => "dashboard.html",
        }
    }

    /// Resolve the last path segment of a location; an empty segment is the index page.
    pub fn from_path(path: &str) -> Option<Self> {
        let last = path.rsplit('/').next().unwrap_or_default();
        if last.is_empty() {
            return Some(Self::Index);
        }
        last.parse().ok()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.file_name() == s)
            .ok_or_else(|| format!("unknown page: {s}"))
    }
}

/// Permission classes. Unknown role strings fall back to [`Role::Viewer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    Viewer,
    StaffA,
    StaffB,
    StaffC,
}

impl Role {
    pub const ALL: [Self; 5] = [
        Self::Admin,
        Self::Viewer,
        Self::StaffA,
        Self::StaffB,
        Self::StaffC,
    ];

    /// Normalize a stored role string: trim, lowercase, spaces to underscores.
    /// Missing, blank and unrecognized roles become `Viewer`.
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Viewer;
        };
        let key = raw.trim().to_lowercase().replace(' ', "_");
        Self::ALL
            .into_iter()
            .find(|role| role.key() == key)
            .unwrap_or_default()
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
            Self::StaffA => "staff_a",
            Self::StaffB => "staff_b",
            Self::StaffC => "staff_c",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Admin => "Administrator Utama",
            Self::Viewer => "Viewer",
            Self::StaffA => "Staff A",
            Self::StaffB => "Staff B",
            Self::StaffC => "Staff C",
        }
    }

    pub fn allowed_pages(self) -> &'static [Page] {
        match self {
            Self::Admin => &[
                Page::Dashboard,
                Page::Index,
                Page::Approval,
                Page::Done,
                Page::Recap,
                Page::Rejected,
            ],
            Self::Viewer => &[Page::Index],
            Self::StaffA => &[Page::Index, Page::Recap, Page::Rejected],
            Self::StaffB => &[Page::Index, Page::Approval, Page::Done, Page::Recap],
            Self::StaffC => &[
                Page::Index,
                Page::Approval,
                Page::Done,
                Page::Recap,
                Page::Rejected,
            ],
        }
    }

    pub fn can_open(self, page: Page) -> bool {
        self.allowed_pages().contains(&page)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Snapshot of the session keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub logged_in: bool,
    pub username: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn read(store: &dyn SessionStore) -> Self {
        let username = store
            .get(keys::USERNAME)
            .filter(|name| !name.trim().is_empty());
        Self {
            logged_in: store.get(keys::IS_LOGGED_IN).as_deref() == Some("true"),
            username,
            role: Role::normalize(store.get(keys::USER_ROLE).as_deref()),
        }
    }

    /// Name used to sign approvals; `None` means the user must be asked.
    pub fn signer(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

/// Display information about the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub role: Role,
    pub role_name: &'static str,
}

pub fn current_user(store: &dyn SessionStore) -> CurrentUser {
    let session = Session::read(store);
    CurrentUser {
        username: session.username.unwrap_or_else(|| "User".to_owned()),
        role: session.role,
        role_name: session.role.display_name(),
    }
}

/// Write the session keys. Performed by the login flow.
pub fn login(store: &mut dyn SessionStore, username: &str, role: &str) {
    info!("Session opened for {username} ({role})");
    store.set(keys::IS_LOGGED_IN, "true");
    store.set(keys::USERNAME, username);
    store.set(keys::USER_ROLE, role);
}

pub fn logout(store: &mut dyn SessionStore) {
    info!("Session cleared");
    store.clear();
}

/// Ask before clearing the session. Returns whether the user logged out.
pub async fn confirm_logout(store: &mut dyn SessionStore, dialog: &dyn Dialog) -> bool {
    if !dialog.confirm("Are you sure you want to logout?").await {
        debug!("Logout cancelled");
        return false;
    }
    logout(store);
    true
}

/// Outcome of the page guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// No session: go to the login page.
    RedirectToLogin,
    /// Session lacks permission: go to the landing page.
    RedirectToLanding { role: Role, page: Page },
}

impl GuardDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Where the client should navigate instead, if anywhere.
    pub fn redirect_target(self) -> Option<Page> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(Page::Login),
            Self::RedirectToLanding { .. } => Some(Page::Index),
        }
    }
}

/// Decide whether the session may open `page`. The login page is never guarded.
pub fn check_page(session: &Session, page: Page) -> GuardDecision {
    if page == Page::Login {
        return GuardDecision::Allow;
    }
    if !session.logged_in {
        debug!("No session, redirecting {page} to login");
        return GuardDecision::RedirectToLogin;
    }
    if session.role.can_open(page) {
        GuardDecision::Allow
    } else {
        debug!("Role {} may not open {page}", session.role);
        GuardDecision::RedirectToLanding {
            role: session.role,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(role: &str) -> MemorySessionStore {
        let mut store = MemorySessionStore::default();
        login(&mut store, "dina", role);
        store
    }

    #[test]
    fn staff_a_is_redirected_from_approval() {
        let session = Session::read(&store_with("staff_a"));
        let decision = check_page(&session, Page::Approval);
        assert_eq!(decision.redirect_target(), Some(Page::Index));
        assert!(check_page(&session, Page::Recap).is_allowed());
    }

    #[test]
    fn missing_flag_redirects_to_login() {
        let session = Session::read(&MemorySessionStore::default());
        assert_eq!(
            check_page(&session, Page::Index),
            GuardDecision::RedirectToLogin
        );
        assert!(check_page(&session, Page::Login).is_allowed());
    }

    #[test]
    fn flag_must_be_literal_true() {
        let mut store = store_with("admin");
        store.set(keys::IS_LOGGED_IN, "yes");
        assert!(!Session::read(&store).logged_in);
    }

    #[test]
    fn role_is_normalized() {
        assert_eq!(Role::normalize(Some(" Staff B ")), Role::StaffB);
        assert_eq!(Role::normalize(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::normalize(Some("superuser")), Role::Viewer);
        assert_eq!(Role::normalize(None), Role::Viewer);
    }

    #[test]
    fn unknown_role_gets_viewer_permissions() {
        let session = Session::read(&store_with("intern"));
        assert!(check_page(&session, Page::Index).is_allowed());
        assert!(!check_page(&session, Page::Recap).is_allowed());
    }

    #[test]
    fn only_admin_sees_dashboard() {
        for role in Role::ALL {
            assert_eq!(role.can_open(Page::Dashboard), role == Role::Admin, "{role}");
        }
    }

    #[test]
    fn page_from_path() {
        assert_eq!(Page::from_path("/desk/approval.html"), Some(Page::Approval));
        assert_eq!(Page::from_path("/desk/"), Some(Page::Index));
        assert_eq!(Page::from_path("/desk/unknown.html"), None);
    }

    #[test]
    fn current_user_defaults() {
        let user = current_user(&MemorySessionStore::default());
        assert_eq!(user.username, "User");
        assert_eq!(user.role, Role::Viewer);
        assert_eq!(user.role_name, "Viewer");
    }

    #[test]
    fn logout_clears_everything() {
        let mut store = store_with("admin");
        logout(&mut store);
        assert_eq!(store.get(keys::USERNAME), None);
        assert!(!Session::read(&store).logged_in);
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod confirm_tests {
        use super::*;
        use crate::test_utils::ScriptedDialog;

        #[tokio::test]
        async fn declined_logout_keeps_session() {
            let mut store = store_with("staff_b");
            let dialog = ScriptedDialog::default().declining();

            assert!(!confirm_logout(&mut store, &dialog).await);
            assert!(Session::read(&store).logged_in);
        }

        #[tokio::test]
        async fn confirmed_logout_clears_session() {
            let mut store = store_with("staff_b");

            assert!(confirm_logout(&mut store, &ScriptedDialog::default()).await);
            assert!(!Session::read(&store).logged_in);
        }
    }
}
