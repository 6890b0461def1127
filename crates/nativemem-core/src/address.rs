//! Opaque integral handles: native [`Address`]es and object [`FieldOffset`]s.

use std::fmt;

/// A native memory location carried as a 64-bit integer.
///
/// Matches the `long` the managed side passes across the native boundary.
/// No size, type, or liveness metadata travels with an address; the
/// unchecked layer trusts whatever value it is given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Address(pub i64);

impl Address {
    /// The null address, returned by the allocator on failure.
    pub const NULL: Address = Address(0);

    /// Whether this is the null address.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The raw integer value.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Address `bytes` further along. Wraps instead of overflowing.
    pub const fn offset(self, bytes: i64) -> Address {
        Address(self.0.wrapping_add(bytes))
    }

    /// Build an address from a pointer.
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Address(ptr as usize as i64)
    }

    /// Reinterpret the address as a typed const pointer.
    pub fn as_ptr<T>(self) -> *const T {
        self.0 as usize as *const T
    }

    /// Reinterpret the address as a typed mutable pointer.
    pub fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as usize as *mut T
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<i64> for Address {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

impl From<Address> for i64 {
    fn from(a: Address) -> Self {
        a.0
    }
}

/// Runtime-specific position of a field within an object.
///
/// Obtained by resolving a reflected field. Only meaningful for objects of
/// the class (and runtime instance) that produced it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FieldOffset(pub i64);

impl FieldOffset {
    /// The raw integer value.
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FieldOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for FieldOffset {
    fn from(v: i64) -> Self {
        Self(v)
    }
}
