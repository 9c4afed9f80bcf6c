//! The currently selected user.
//!
//! There is no login: the user is a manually chosen integer. Pages never read
//! the identity implicitly; callers pass [`IdentityContext::current`] into every
//! cart and order call, and watchers react to switches through
//! [`IdentityContext::subscribe`].

use std::sync::Arc;

use shopfront_core::UserId;
use tokio::sync::watch;

/// Shared, observable holder of the current user id.
#[derive(Debug, Clone)]
pub struct IdentityContext {
    sender: Arc<watch::Sender<UserId>>,
}

impl IdentityContext {
    /// Start with `user` selected.
    #[must_use]
    pub fn new(user: UserId) -> Self {
        let (sender, _) = watch::channel(user);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// The selected user.
    #[must_use]
    pub fn current(&self) -> UserId {
        *self.sender.borrow()
    }

    /// Select `user`. Returns `true` if the selection changed.
    ///
    /// Subscribers are only notified on an actual change.
    pub fn set(&self, user: UserId) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == user {
                false
            } else {
                *current = user;
                true
            }
        });
        if changed {
            tracing::info!(user_id = %user, "Switched user");
        }
        changed
    }

    /// Select a user from raw input, falling back to the default user for
    /// anything that is not a positive integer.
    pub fn set_from_input(&self, raw: &str) -> bool {
        self.set(UserId::parse_or_default(raw))
    }

    /// Watch for user switches.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UserId> {
        self.sender.subscribe()
    }
}

impl Default for IdentityContext {
    fn default() -> Self {
        Self::new(UserId::DEFAULT)
    }
}
