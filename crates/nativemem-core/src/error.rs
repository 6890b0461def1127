//! Error types for the checked paths of the access layer.
//!
//! The unchecked layer never produces these: allocation failure there is
//! a null address and everything else is undefined behaviour. They are
//! raised by the tracked (debug) heap and by the in-process object model.

use std::error::Error;
use std::fmt;

use crate::address::{Address, FieldOffset};
use crate::primitive::FieldType;

/// Misuse detected by the tracked heap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// A null address was passed where a live allocation is required.
    NullAddress,
    /// The address is not the base of any live allocation.
    UnknownAllocation {
        /// The offending address.
        address: Address,
    },
    /// The address was already freed and has not been handed out again.
    DoubleFree {
        /// The offending address.
        address: Address,
    },
    /// The access range leaves the allocation that contains its start.
    OutOfBounds {
        /// Start of the attempted access.
        address: Address,
        /// Length of the attempted access in bytes.
        len: usize,
        /// Base of the containing allocation.
        allocation: Address,
        /// Size of the containing allocation in bytes.
        size: usize,
    },
    /// The allocator returned a range that overlaps a live allocation.
    OverlappingAllocation {
        /// Base of the newly returned range.
        address: Address,
        /// Base of the live allocation it overlaps.
        existing: Address,
    },
    /// The address is not aligned for the requested width.
    Misaligned {
        /// The offending address.
        address: Address,
        /// Required alignment in bytes.
        align: usize,
    },
    /// A size argument was negative or does not fit the address space.
    SizeOverflow {
        /// The rejected size.
        size: i64,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullAddress => write!(f, "null address"),
            Self::UnknownAllocation { address } => {
                write!(f, "address {address} is not a known allocation")
            }
            Self::DoubleFree { address } => write!(f, "address {address} freed twice"),
            Self::OutOfBounds {
                address,
                len,
                allocation,
                size,
            } => write!(
                f,
                "access of {len} bytes at {address} leaves allocation {allocation} ({size} bytes)"
            ),
            Self::OverlappingAllocation { address, existing } => write!(
                f,
                "new allocation at {address} overlaps live allocation {existing}"
            ),
            Self::Misaligned { address, align } => {
                write!(f, "address {address} is not {align}-byte aligned")
            }
            Self::SizeOverflow { size } => write!(f, "invalid size {size}"),
        }
    }
}

impl Error for AccessError {}

/// Errors from class layout construction and field resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A class declares the same field name twice.
    DuplicateField {
        /// The repeated field name.
        name: String,
    },
    /// A class with this name is already registered.
    DuplicateClass {
        /// The repeated class name.
        name: String,
    },
    /// No class is registered under this name or id.
    UnknownClass {
        /// Name or id of the missing class.
        class: String,
    },
    /// The class has no field with this name.
    UnknownField {
        /// Owning class.
        class: String,
        /// The missing field name.
        field: String,
    },
    /// The offset does not start any field of the object's class.
    InvalidOffset {
        /// Owning class.
        class: String,
        /// The rejected offset.
        offset: FieldOffset,
    },
    /// The field's declared type differs from the accessed type.
    TypeMismatch {
        /// Declared type of the field.
        expected: FieldType,
        /// Type the caller accessed it as.
        actual: FieldType,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateField { name } => write!(f, "duplicate field '{name}'"),
            Self::DuplicateClass { name } => write!(f, "class '{name}' already registered"),
            Self::UnknownClass { class } => write!(f, "unknown class '{class}'"),
            Self::UnknownField { class, field } => {
                write!(f, "class '{class}' has no field '{field}'")
            }
            Self::InvalidOffset { class, offset } => {
                write!(f, "unknown field offset {offset} for class '{class}'")
            }
            Self::TypeMismatch { expected, actual } => {
                write!(f, "field declared as {expected}, accessed as {actual}")
            }
        }
    }
}

impl Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PrimitiveKind;

    #[test]
    fn out_of_bounds_message_names_both_ranges() {
        let e = AccessError::OutOfBounds {
            address: Address(0x18),
            len: 8,
            allocation: Address(0x10),
            size: 12,
        };
        assert_eq!(
            e.to_string(),
            "access of 8 bytes at 0x18 leaves allocation 0x10 (12 bytes)"
        );
    }

    #[test]
    fn type_mismatch_message() {
        let e = LayoutError::TypeMismatch {
            expected: FieldType::Primitive(PrimitiveKind::Int),
            actual: FieldType::Primitive(PrimitiveKind::Long),
        };
        assert_eq!(e.to_string(), "field declared as int, accessed as long");
    }
}
