//! Logging macros
//!
//! Context values accept anything that implements `Display`:
//! `log_error!(code, "msg", loc = l, "tokens" => count)`. The pairs are
//! formatted up front and borrowed by the `*_with_context` functions.

/// Owned `key => value` pairs for the `*_with_context` functions
#[doc(hidden)]
#[macro_export]
macro_rules! __log_context {
    ($($key:expr => $value:expr),*) => {{
        let pairs: Vec<(&str, String)> = vec![$(($key, $value.to_string())),*];
        pairs
    }};
}

/// Log an error with a registered code
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, loc = $loc:expr $(, $key:expr => $value:expr)*) => {{
        let context = $crate::__log_context!($($key => $value),*);
        $crate::logging::log_error_with_context(
            $code,
            $message,
            Some($loc),
            $crate::logging::borrow_context(&context),
        )
    }};

    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {{
        let context = $crate::__log_context!($($key => $value),*);
        $crate::logging::log_error_with_context(
            $code,
            $message,
            None,
            $crate::logging::borrow_context(&context),
        )
    }};
}

/// Log a success code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {{
        let context = $crate::__log_context!($($key => $value),*);
        $crate::logging::log_success_with_context(
            $code,
            $message,
            $crate::logging::borrow_context(&context),
        )
    }};
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)*) => {{
        let context = $crate::__log_context!($($key => $value),*);
        $crate::logging::log_info_with_context($message, $crate::logging::borrow_context(&context))
    }};
}

/// Log a warning, optionally with a registered code and location
#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr, loc = $loc:expr $(, $key:expr => $value:expr)*) => {{
        let context = $crate::__log_context!($($key => $value),*);
        $crate::logging::log_warning_with_context(
            Some($code),
            $message,
            Some($loc),
            $crate::logging::borrow_context(&context),
        )
    }};

    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)*) => {{
        let context = $crate::__log_context!($($key => $value),*);
        $crate::logging::log_warning_with_context(
            Some($code),
            $message,
            None,
            $crate::logging::borrow_context(&context),
        )
    }};

    ($message:expr $(, $key:expr => $value:expr)*) => {{
        let context = $crate::__log_context!($($key => $value),*);
        $crate::logging::log_warning_with_context(
            None,
            $message,
            None,
            $crate::logging::borrow_context(&context),
        )
    }};
}

/// Debug events are only built when the configured level admits them
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::config::debug_enabled() {
            let event = $crate::logging::LogEvent::debug($message);
            $crate::logging::dispatch_event(event, false);
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::config::debug_enabled() {
            let mut event = $crate::logging::LogEvent::debug($message);
            for (key, value) in $crate::__log_context!($($key => $value),+) {
                event = event.with_context(key, &value);
            }
            $crate::logging::dispatch_event(event, false);
        }
    };
}

/// Log a success code with a `duration_ms` context entry
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
        )
    };

    ($code:expr, $message:expr, duration = $duration:expr, $($key:expr => $value:expr),+) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0),
            $($key => $value),+
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::files::{Loc, PathId};
    use crate::logging::codes;

    // Every macro form must compile and be a no-op without a global logger
    #[test]
    fn test_macro_forms_without_global_logger() {
        let token_count: usize = 157;
        let duration = std::time::Duration::from_millis(150);
        let loc = Loc::new(PathId::new(0), 3, 5);

        log_error!(codes::lexical::UNEXPECTED_CHARACTER, "Unexpected character");
        log_error!(codes::syntax::UNEXPECTED_TOKEN, "Unexpected token", loc = loc);
        log_error!(codes::syntax::RECOVERY_FAILED, "Gave up",
            "context" => "block",
            "skipped" => 50
        );
        log_error!(codes::syntax::RECOVERY_FAILED, "Gave up", loc = loc, "attempts" => 10);

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => token_count
        );
        log_info!("Processing file", "is_large" => false);
        log_warning!("Suspicious input");
        log_warning!(code = codes::syntax::RECOVERY_SKIPPED_TOKENS, "Skipped", loc = loc, "count" => 2);
        log_warning!(code = codes::batch::FILE_LIMIT_EXCEEDED, "Truncated");
        log_debug!("Cursor state", "current" => "WORD");
        log_performance!(codes::success::FILE_PROCESSING_SUCCESS, "File processed",
            duration = duration,
            "size" => 1024
        );
    }
}
