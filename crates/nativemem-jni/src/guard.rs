//! Panic containment at the JNI boundary.

use std::any::Any;
use std::cell::RefCell;

use jni::JNIEnv;
use tracing::error;

use crate::status::{throw, JniStatus};

thread_local! {
    static LAST_PANIC: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Message of the most recent panic caught on this thread, if any.
pub fn last_panic_message() -> Option<String> {
    LAST_PANIC.with(|cell| cell.borrow().clone())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Record a caught panic and raise it into Java as an `Error`.
pub(crate) fn report_panic(env: Option<&mut JNIEnv<'_>>, payload: Box<dyn Any + Send>) {
    let message = panic_message(payload.as_ref());
    error!(panic = %message, "panic caught at JNI boundary");
    if let Some(env) = env {
        throw(env, JniStatus::Panicked, &message);
    }
    LAST_PANIC.with(|cell| *cell.borrow_mut() = Some(message));
}

/// Run a JNI export body under `catch_unwind`.
///
/// `jni_guard!(env, default, { body })` evaluates `body`; if it panics,
/// the panic is logged and raised as a `java.lang.Error` through `env`
/// and `default` is returned. Pass `None` for `env` when no environment
/// is available.
macro_rules! jni_guard {
    ($env:expr, $default:expr, $body:block) => {{
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::guard::report_panic($env, payload);
                $default
            }
        }
    }};
}
