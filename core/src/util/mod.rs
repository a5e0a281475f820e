pub mod cancel;
pub use cancel::CancelFlag;

/// Session log line in `thing → action context` form.
/// The thing (bold blue) is usually a session, the action (green) a transition or host call,
/// and any remaining arguments are formatted into a dimmed context suffix.
#[doc(hidden)]
#[macro_export]
macro_rules! action_log {
    ($level:ident, $thing:expr, $action:expr) => {
        tracing::$level!("\x1b[1;34m{}\x1b[0m → \x1b[32m{}\x1b[0m", $thing, $action)
    };
    ($level:ident, $thing:expr, $action:expr, $($arg:expr),+) => {
        tracing::$level!("\x1b[1;34m{}\x1b[0m → \x1b[32m{}\x1b[0m \x1b[2m{}\x1b[0m", $thing, $action, format!("{}", format_args!($($arg),+)))
    };
}

#[macro_export]
macro_rules! action_info {
    ($($t:tt)+) => { $crate::action_log!(info, $($t)+) };
}

#[macro_export]
macro_rules! action_debug {
    ($($t:tt)+) => { $crate::action_log!(debug, $($t)+) };
}

#[macro_export]
macro_rules! action_warn {
    ($($t:tt)+) => { $crate::action_log!(warn, $($t)+) };
}
