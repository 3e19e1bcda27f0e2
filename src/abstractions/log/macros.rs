//! Macros for generating log messages. Each level macro forwards to `__log_event!` with its `tracing::Level`.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_event {
    ($level:ident, $critical:expr, $threshold:expr, $($arg:tt)+) => {
        {
            $crate::log::init_logger();
            if $critical {
                $crate::log::tracing::event!(
                    $crate::log::tracing::Level::$level,
                    critical = true,
                    threshold = $threshold,
                    message = format_args!($($arg)+)
                );
            } else {
                $crate::log::tracing::event!(
                    $crate::log::tracing::Level::$level,
                    threshold = $threshold,
                    message = format_args!($($arg)+)
                );
            }
        }
    };
}

#[macro_export]
macro_rules! critical {
    ($threshold:expr, $($arg:tt)+) => { $crate::__log_event!(ERROR, true, $threshold, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_event!(ERROR, true, 0, $($arg)+) };
}

#[macro_export]
macro_rules! error {
    ($threshold:expr, $($arg:tt)+) => { $crate::__log_event!(ERROR, false, $threshold, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_event!(ERROR, false, 0, $($arg)+) };
}

#[macro_export]
macro_rules! warning {
    ($threshold:expr, $($arg:tt)+) => { $crate::__log_event!(WARN, false, $threshold, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_event!(WARN, false, 0, $($arg)+) };
}

#[macro_export]
macro_rules! info {
    ($threshold:expr, $($arg:tt)+) => { $crate::__log_event!(INFO, false, $threshold, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_event!(INFO, false, 0, $($arg)+) };
}

#[macro_export]
macro_rules! debug {
    ($threshold:expr, $($arg:tt)+) => { $crate::__log_event!(DEBUG, false, $threshold, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_event!(DEBUG, false, 0, $($arg)+) };
}

#[macro_export]
macro_rules! trace {
    ($threshold:expr, $($arg:tt)+) => { $crate::__log_event!(TRACE, false, $threshold, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_event!(TRACE, false, 0, $($arg)+) };
}


// The following makes the macros importable directly from the `log` module.
pub use {critical, error, warning, info, debug, trace};
