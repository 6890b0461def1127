//! JNI bindings for `org.eclipse.serializer.nativememory.NativeMemoryAccessor`.
//!
//! Exports the native methods of the Java accessor class under their
//! mangled JNI names. Address operations forward to
//! [`nativemem_raw`]; field operations go through the JNI function table.
//! This crate and `nativemem-raw` are the only library crates that may
//! contain `unsafe` code; the test-only guard heap is the other exception.
//!
//! Configuration is read from the environment once, on `JNI_OnLoad` or
//! the first call, whichever comes first. See
//! [`AccessorConfig::from_env`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::ffi::c_void;
use std::sync::OnceLock;

use jni::sys::{jint, JavaVM, JNI_VERSION_1_8};
use nativemem_raw::{AccessorConfig, NativeMemory};
use tracing::info;

#[macro_use]
mod guard;

pub mod address;
pub mod env;
pub mod field;
pub mod logging;
pub mod memory;
pub mod status;

pub use guard::last_panic_message;
pub use status::JniStatus;

static MEMORY: OnceLock<NativeMemory> = OnceLock::new();

/// The process-wide accessor, configured from the environment on first use.
pub fn native_memory() -> &'static NativeMemory {
    MEMORY.get_or_init(|| {
        let config = AccessorConfig::from_env();
        logging::init_logging(&config.log);
        info!(
            mode = %config.mode,
            check_alignment = config.check_alignment,
            log_level = %config.log.level,
            "native memory accessor configured"
        );
        NativeMemory::new(&config)
    })
}

/// Library load hook. Initialises configuration and logging.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: *mut JavaVM, _reserved: *mut c_void) -> jint {
    let memory = native_memory();
    info!(mode = %memory.mode(), "nativemem loaded");
    JNI_VERSION_1_8
}
