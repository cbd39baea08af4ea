//! Desktop notifications
//!
//! Delivery is strictly best-effort. Callers go through [`notify_best_effort`],
//! which never returns an error, so a missing display session (cron, ssh) has
//! no effect on a run.

use std::env;
use std::ffi::OsString;

use tracing::debug;

use crate::types::NotifyError;

/// Application name shown by the notification daemon
pub const APP_NAME: &str = "Linux Maintenance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub urgency: Urgency,
}

impl Notification {
    pub fn normal(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            urgency: Urgency::Normal,
        }
    }

    pub fn critical(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            urgency: Urgency::Critical,
        }
    }
}

/// Something that can display a notification
pub trait Notifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Send a notification and discard any failure
pub fn notify_best_effort(notifier: &dyn Notifier, notification: Notification) {
    if let Err(e) = notifier.send(&notification) {
        debug!("Notification '{}' not delivered: {}", notification.title, e);
    }
}

/// Notifier backed by the freedesktop notification service
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    has_session: fn() -> bool,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(APP_NAME)
    }
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            has_session: has_display_session,
        }
    }
}

const SESSION_VARS: [&str; 3] = ["DISPLAY", "WAYLAND_DISPLAY", "DBUS_SESSION_BUS_ADDRESS"];

/// Whether the environment looks like it has a desktop session to talk to
pub fn has_display_session() -> bool {
    session_in(|var| env::var_os(var))
}

fn session_in(lookup: impl Fn(&str) -> Option<OsString>) -> bool {
    SESSION_VARS
        .iter()
        .any(|var| lookup(var).is_some_and(|value| !value.is_empty()))
}

impl Notifier for DesktopNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if !(self.has_session)() {
            return Err(NotifyError::NoSession);
        }

        // A fresh handle per message; handles are never kept between calls
        let mut message = notify_rust::Notification::new();
        message
            .appname(&self.app_name)
            .summary(&notification.title)
            .body(&notification.body);

        #[cfg(all(unix, not(target_os = "macos")))]
        message.urgency(match notification.urgency {
            Urgency::Normal => notify_rust::Urgency::Normal,
            Urgency::Critical => notify_rust::Urgency::Critical,
        });

        message
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

/// Notifier used when notifications are switched off
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}
