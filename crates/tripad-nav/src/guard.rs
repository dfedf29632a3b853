#![forbid(unsafe_code)]

//! Error boundary around control callbacks.
//!
//! Every capability call the engine makes goes through [`invoke`]. A callback
//! that returns `Err` or panics is logged and reported as an [`ItemError`];
//! the caller then leaves its own state untouched.
//!
//! With `panic = "abort"` (the release profile) a panic still terminates the
//! process; the boundary only catches unwinding panics.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tripad_core::{debug, error};

use crate::error::ItemError;
use crate::item::ItemId;

/// Run `callback` for item `id`, converting panics into [`ItemError::Panicked`].
pub(crate) fn invoke<T>(
    id: ItemId,
    name: &'static str,
    callback: impl FnOnce() -> Result<T, ItemError>,
) -> Result<T, ItemError> {
    let result = match catch_unwind(AssertUnwindSafe(callback)) {
        Ok(result) => result,
        Err(payload) => Err(ItemError::Panicked(panic_message(payload.as_ref()))),
    };
    match &result {
        Ok(_) => {}
        Err(ItemError::Unsupported(cap)) => {
            debug!(item = id, callback = name, capability = cap, "capability not implemented");
        }
        Err(err) => {
            error!(item = id, callback = name, error = %err, "item callback failed");
        }
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn ok_passes_through() {
        assert_eq!(invoke(1, "activate", || Ok::<_, ItemError>(5)), Ok(5));
    }

    #[traced_test]
    #[test]
    fn failure_logs_at_error() {
        let result: Result<(), _> = invoke(3, "toggle", || Err(ItemError::failed("stuck")));
        assert_eq!(result, Err(ItemError::Failed("stuck".into())));
        assert!(logs_contain("ERROR"));
        assert!(logs_contain("item callback failed"));
    }

    #[traced_test]
    #[test]
    fn panic_is_caught_with_message() {
        let result: Result<(), _> = invoke(4, "activate", || panic!("boom {}", 42));
        assert_eq!(result, Err(ItemError::Panicked("boom 42".into())));
        assert!(logs_contain("callback panicked: boom 42"));
    }

    #[test]
    fn static_str_payload() {
        let result: Result<(), _> = invoke(4, "activate", || panic!("plain"));
        assert_eq!(result, Err(ItemError::Panicked("plain".into())));
    }

    #[traced_test]
    #[test]
    fn unsupported_logs_at_debug() {
        let result: Result<(), _> = invoke(9, "increase_value", || {
            Err(ItemError::Unsupported("increase_value"))
        });
        assert!(result.is_err());
        assert!(logs_contain("capability not implemented"));
        assert!(!logs_contain("item callback failed"));
    }
}
