//! The closed set of primitive widths the layer reads and writes.

use std::fmt;

/// A managed-runtime primitive type.
///
/// Each kind has a fixed width in bytes and maps to one JNI signature
/// character. The set is closed: there is no runtime width dispatch
/// beyond matching on this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    /// Signed 8-bit integer (`jbyte`).
    Byte,
    /// Boolean stored as one byte, 0 or 1 (`jboolean`).
    Boolean,
    /// Signed 16-bit integer (`jshort`).
    Short,
    /// Unsigned 16-bit UTF-16 code unit (`jchar`).
    Char,
    /// Signed 32-bit integer (`jint`).
    Int,
    /// IEEE-754 single precision (`jfloat`).
    Float,
    /// Signed 64-bit integer (`jlong`).
    Long,
    /// IEEE-754 double precision (`jdouble`).
    Double,
}

impl PrimitiveKind {
    /// All kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Byte,
        PrimitiveKind::Boolean,
        PrimitiveKind::Short,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::Float,
        PrimitiveKind::Long,
        PrimitiveKind::Double,
    ];

    /// Width in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Byte | Self::Boolean => 1,
            Self::Short | Self::Char => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
        }
    }

    /// Natural alignment in bytes. Equal to the width for every kind.
    pub const fn align(self) -> usize {
        self.size()
    }

    /// JNI type signature character.
    pub const fn signature(self) -> char {
        match self {
            Self::Byte => 'B',
            Self::Boolean => 'Z',
            Self::Short => 'S',
            Self::Char => 'C',
            Self::Int => 'I',
            Self::Float => 'F',
            Self::Long => 'J',
            Self::Double => 'D',
        }
    }

    /// Managed-language keyword for this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Boolean => "boolean",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Float => "float",
            Self::Long => "long",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of an object field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A primitive field of the given kind.
    Primitive(PrimitiveKind),
    /// A reference to another object (possibly null).
    Reference,
}

impl FieldType {
    /// Slot width in bytes. References occupy one pointer-sized slot.
    pub const fn size(self) -> usize {
        match self {
            Self::Primitive(kind) => kind.size(),
            Self::Reference => 8,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

impl From<PrimitiveKind> for FieldType {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}
