//! Shell state shared between the REPL and the notification task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lcmuse_core::ipc::ShellNotification;
use lcmuse_core::shell::{STATUS_DISPLAY, ShellModel, StatusTicket};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::view;

pub type SharedModel = Arc<Mutex<ShellModel>>;

pub fn lock(model: &SharedModel) -> MutexGuard<'_, ShellModel> {
    model.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the status issued with `ticket` once its display time is over.
pub fn schedule_status_expiry(model: SharedModel, ticket: StatusTicket) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(STATUS_DISPLAY).await;
        if lock(&model).expire_status(ticket) {
            tracing::debug!("[Shell] Status cleared");
        }
    })
}

/// Applies a background notification and returns the status ticket if it
/// set a new status line.
pub fn apply_notification(
    model: &SharedModel,
    notification: ShellNotification,
) -> Option<StatusTicket> {
    let mut model = lock(model);
    match notification {
        ShellNotification::SetUserId(user_id) => {
            model.set_user_id(user_id);
            None
        }
        ShellNotification::SendStatus(text) => Some(model.set_status(text)),
    }
}

/// Consumes notifications until the background process goes away.
pub async fn pump_notifications(
    model: SharedModel,
    mut notifications: mpsc::UnboundedReceiver<ShellNotification>,
) {
    while let Some(notification) = notifications.recv().await {
        let line = match &notification {
            ShellNotification::SetUserId(_) => None,
            ShellNotification::SendStatus(text) => Some(view::status(text)),
        };
        if let Some(ticket) = apply_notification(&model, notification) {
            schedule_status_expiry(model.clone(), ticket);
        }
        if let Some(line) = line {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn shared() -> SharedModel {
        Arc::new(Mutex::new(ShellModel::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_clears_after_display_time() {
        let model = shared();
        let ticket =
            apply_notification(&model, ShellNotification::SendStatus("sent".to_string())).unwrap();
        let timer = schedule_status_expiry(model.clone(), ticket);

        tokio::time::sleep(STATUS_DISPLAY - Duration::from_millis(1)).await;
        assert_eq!(lock(&model).status(), Some("sent"));

        timer.await.unwrap();
        assert_eq!(lock(&model).status(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_older_timer_keeps_newer_status() {
        let model = shared();
        let first = lock(&model).set_status("Sending code to SuperCollider...");
        let first_timer = schedule_status_expiry(model.clone(), first);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let second =
            apply_notification(&model, ShellNotification::SendStatus("done".to_string())).unwrap();
        let second_timer = schedule_status_expiry(model.clone(), second);

        first_timer.await.unwrap();
        assert_eq!(lock(&model).status(), Some("done"));

        second_timer.await.unwrap();
        assert_eq!(lock(&model).status(), None);
    }

    #[tokio::test]
    async fn test_user_id_notification_sets_identity() {
        let model = shared();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(ShellNotification::SetUserId("uid-3".to_string()))
            .unwrap();
        drop(tx);

        pump_notifications(model.clone(), rx).await;

        assert_eq!(lock(&model).user_id(), "uid-3");
        assert_eq!(lock(&model).status(), None);
    }
}
