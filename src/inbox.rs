use crate::error::Result;
use crate::models::Notification;

/// Backend side of marking a notification read. The call is idempotent on
/// the server, so an optimistic local flip after success is safe.
pub trait NotificationBackend {
    async fn mark_read(&self, id: i64) -> Result<()>;
}

/// The authenticated user's notification collection for one page view.
pub struct Inbox {
    notifications: Vec<Notification>,
}

impl Inbox {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Inbox { notifications }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    /// Prefix of the collection in backend order. The backend serves
    /// notifications most-recent-first; no resort happens here, so "recent"
    /// is only as good as that ordering.
    pub fn recent(&self, limit: usize) -> &[Notification] {
        &self.notifications[..self.notifications.len().min(limit)]
    }

    /// Marks one notification read on the backend, then flips only that
    /// entry locally. A failed request leaves everything untouched; the
    /// error goes to the caller, no retry.
    pub async fn mark_read<B: NotificationBackend>(&mut self, backend: &B, id: i64) -> Result<()> {
        backend.mark_read(id).await?;
        self.apply_read(id);
        Ok(())
    }

    fn apply_read(&mut self, id: i64) {
        if let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) {
            notification.is_read = true;
        }
    }
}
