use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum NotificationKind {
    ShowError { cause: Option<Arc<anyhow::Error>> },
    ShowMessage { text: String },
}

/// A one-shot notification, held until the consumer acknowledges its id.
#[derive(Debug, Clone)]
pub struct UiNotification {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub kind: NotificationKind,
}

impl UiNotification {
    pub fn new(kind: NotificationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            kind,
        }
    }

    pub fn show_error(cause: Option<anyhow::Error>) -> Self {
        Self::new(NotificationKind::ShowError {
            cause: cause.map(Arc::new),
        })
    }

    pub fn show_message(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::ShowMessage { text: text.into() })
    }

    /// Human-readable line for toast/snackbar style surfaces.
    pub fn display_text(&self) -> String {
        match &self.kind {
            NotificationKind::ShowMessage { text } => text.clone(),
            NotificationKind::ShowError { cause: Some(cause) } => format!("{cause:#}"),
            NotificationKind::ShowError { cause: None } => "Unknown error".to_string(),
        }
    }
}

/// Ordered queue of pending notifications, keyed by id.
///
/// Cloning shares the same queue. Nothing is bounded: if no consumer ever
/// acknowledges, entries accumulate.
#[derive(Debug, Clone)]
pub struct EventChannel {
    tx: Arc<watch::Sender<Vec<UiNotification>>>,
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl EventChannel {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(watch::Sender::new(Vec::new())),
        }
    }

    pub fn send(&self, notification: UiNotification) -> Uuid {
        let id = notification.id;
        self.tx.send_modify(|pending| pending.push(notification));
        id
    }

    /// Removes the notification with `id`. Returns whether one was removed;
    /// an unknown id is not an error.
    pub fn acknowledge(&self, id: Uuid) -> bool {
        self.tx.send_if_modified(|pending| {
            let before = pending.len();
            pending.retain(|n| n.id != id);
            pending.len() != before
        })
    }

    pub fn pending(&self) -> Vec<UiNotification> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<UiNotification>> {
        self.tx.subscribe()
    }
}
