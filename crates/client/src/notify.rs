use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// User facing notifications (the toast service of the page).
pub trait Notifier {
    fn notify(&self, level: ToastLevel, message: String);

    fn info(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Info, message.into());
    }

    fn success(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Success, message.into());
    }

    fn error(&self, message: impl Into<String>) {
        self.notify(ToastLevel::Error, message.into());
    }
}

/// Keeps every toast in memory, newest last.
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the collected toasts.
    pub fn drain(&self) -> Vec<Toast> {
        match self.toasts.lock() {
            Ok(mut toasts) => std::mem::take(&mut *toasts),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for ToastLog {
    fn notify(&self, level: ToastLevel, message: String) {
        let toast = Toast { level, message };
        match self.toasts.lock() {
            Ok(mut toasts) => toasts.push(toast),
            Err(poisoned) => poisoned.into_inner().push(toast),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, level: ToastLevel, message: String) {
        (**self).notify(level, message);
    }
}
