use presupuesto_client::{Notifier, ToastLevel};

/// Prints toasts on stderr, so `show --format csv` output stays clean.
#[derive(Debug, Default)]
pub struct Terminal;

impl Notifier for Terminal {
    fn notify(&self, level: ToastLevel, message: String) {
        let icon = match level {
            ToastLevel::Info => "·",
            ToastLevel::Success => "✔",
            ToastLevel::Error => "✖",
        };
        eprintln!("{icon} {message}");
    }
}
