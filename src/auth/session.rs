//! Session state: bearer token, cached user, change-notification hook.
//!
//! `Session` is plain data. The client keeps it behind one
//! `async_lock::RwLock`, so a commit and the hook firing it triggers happen
//! under the same write guard.

use std::fmt;
use std::sync::Arc;

use crate::domain::user::User;

/// Called after every committed change of token or cached user, with the new
/// values. Runs while the session is locked: it must not call back into the
/// client.
pub type TokenChangedHook = Arc<dyn Fn(Option<&str>, Option<&User>) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Session {
    token: Option<String>,
    current_user: Option<User>,
    on_token_changed: Option<TokenChangedHook>,
}

impl Session {
    pub(crate) fn new(
        token: Option<String>,
        current_user: Option<User>,
        on_token_changed: Option<TokenChangedHook>,
    ) -> Self {
        Self {
            token,
            current_user,
            on_token_changed,
        }
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn set_hook(&mut self, hook: Option<TokenChangedHook>) {
        self.on_token_changed = hook;
    }

    /// Replace token and user, then notify.
    pub(crate) fn commit(&mut self, token: Option<String>, current_user: Option<User>) {
        self.token = token;
        self.current_user = current_user;
        self.notify();
    }

    /// Drop the session. Returns `false` (and stays silent) if there was none.
    pub(crate) fn clear(&mut self) -> bool {
        if self.token.is_none() && self.current_user.is_none() {
            return false;
        }
        self.commit(None, None);
        true
    }

    /// Put `candidate` in place so the next request presents it. Not a commit:
    /// the hook does not fire. Returns the token it displaced.
    pub(crate) fn install_candidate(&mut self, candidate: &str) -> Option<String> {
        self.token.replace(candidate.to_string())
    }

    /// Undo [`install_candidate`](Self::install_candidate) unless another
    /// transition has replaced the candidate in the meantime.
    pub(crate) fn rollback(&mut self, candidate: &str, prior: Option<String>) -> bool {
        if self.token.as_deref() != Some(candidate) {
            return false;
        }
        self.token = prior;
        true
    }

    fn notify(&self) {
        if let Some(hook) = &self.on_token_changed {
            hook(self.token.as_deref(), self.current_user.as_ref());
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("current_user", &self.current_user)
            .field("on_token_changed", &self.on_token_changed.is_some())
            .finish()
    }
}
