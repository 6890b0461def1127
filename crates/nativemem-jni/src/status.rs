//! Status codes and exception raising for the JNI boundary.
//!
//! [`JniStatus`] names every condition the library raises into Java. The
//! numeric value is included in the exception message so Java-side
//! diagnostics can match on it without parsing free text.

use std::fmt;

use jni::JNIEnv;
use nativemem_core::AccessError;
use tracing::error;

/// Condition raised into Java. Values are stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JniStatus {
    /// Success.
    Ok = 0,
    /// Null address where a live allocation was required.
    NullAddress = -1,
    /// Address is not a known allocation.
    UnknownAllocation = -2,
    /// Address freed twice.
    DoubleFree = -3,
    /// Access range leaves its allocation.
    OutOfBounds = -4,
    /// Allocator returned a range overlapping a live allocation.
    OverlappingAllocation = -5,
    /// Address not aligned for the accessed width.
    Misaligned = -6,
    /// Negative or unrepresentable size.
    InvalidSize = -7,
    /// A Rust panic was caught at the JNI boundary.
    Panicked = -128,
}

impl JniStatus {
    /// Binary name of the Java exception class raised for this status.
    pub fn exception_class(self) -> &'static str {
        match self {
            Self::OutOfBounds => "java/lang/IndexOutOfBoundsException",
            Self::InvalidSize => "java/lang/IllegalArgumentException",
            _ => "java/lang/Error",
        }
    }
}

impl fmt::Display for JniStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, *self as i32)
    }
}

impl From<&AccessError> for JniStatus {
    fn from(e: &AccessError) -> Self {
        match e {
            AccessError::NullAddress => Self::NullAddress,
            AccessError::UnknownAllocation { .. } => Self::UnknownAllocation,
            AccessError::DoubleFree { .. } => Self::DoubleFree,
            AccessError::OutOfBounds { .. } => Self::OutOfBounds,
            AccessError::OverlappingAllocation { .. } => Self::OverlappingAllocation,
            AccessError::Misaligned { .. } => Self::Misaligned,
            AccessError::SizeOverflow { .. } => Self::InvalidSize,
        }
    }
}

/// Message text for an exception raised with `status`.
pub fn exception_message(status: JniStatus, detail: &str) -> String {
    format!("nativemem [{status}]: {detail}")
}

/// Raise `status` into Java unless an exception is already pending.
pub fn throw(env: &mut JNIEnv<'_>, status: JniStatus, detail: &str) {
    if env.exception_check().unwrap_or(false) {
        return;
    }
    let message = exception_message(status, detail);
    if let Err(e) = env.throw_new(status.exception_class(), &message) {
        error!(%status, error = %e, "failed to raise exception: {message}");
    }
}

/// Raise a tracked-heap rejection into Java.
pub fn throw_access_error(env: &mut JNIEnv<'_>, e: &AccessError) {
    throw(env, JniStatus::from(e), &e.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use nativemem_core::Address;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(JniStatus::Ok as i32, 0);
        assert_eq!(JniStatus::NullAddress as i32, -1);
        assert_eq!(JniStatus::UnknownAllocation as i32, -2);
        assert_eq!(JniStatus::DoubleFree as i32, -3);
        assert_eq!(JniStatus::OutOfBounds as i32, -4);
        assert_eq!(JniStatus::OverlappingAllocation as i32, -5);
        assert_eq!(JniStatus::Misaligned as i32, -6);
        assert_eq!(JniStatus::InvalidSize as i32, -7);
        assert_eq!(JniStatus::Panicked as i32, -128);
    }

    #[test]
    fn access_error_to_status() {
        assert_eq!(
            JniStatus::from(&AccessError::DoubleFree {
                address: Address(0x10)
            }),
            JniStatus::DoubleFree
        );
        assert_eq!(
            JniStatus::from(&AccessError::SizeOverflow { size: -1 }),
            JniStatus::InvalidSize
        );
        assert_eq!(
            JniStatus::from(&AccessError::OutOfBounds {
                address: Address(0x18),
                len: 8,
                allocation: Address(0x10),
                size: 8,
            }),
            JniStatus::OutOfBounds
        );
    }

    #[test]
    fn exception_classes() {
        assert_eq!(
            JniStatus::OutOfBounds.exception_class(),
            "java/lang/IndexOutOfBoundsException"
        );
        assert_eq!(JniStatus::Panicked.exception_class(), "java/lang/Error");
    }

    #[test]
    fn message_carries_code() {
        assert_eq!(
            exception_message(JniStatus::UnknownAllocation, "address 0x40 is not a known allocation"),
            "nativemem [UnknownAllocation (-2)]: address 0x40 is not a known allocation"
        );
    }
}
