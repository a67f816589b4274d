//! JsValue: NaN-boxed u64 value representation
//!
//! Every value that crosses the call boundary is a single `u64`. Doubles are
//! stored as raw IEEE 754 bits; everything else lives in the NaN space.
//!
//! # Encoding
//!
//! ```text
//! f64 (double): Any value where upper 13 bits != 0x1FFF (raw IEEE 754)
//! Tagged:       0xFFF8 + 3-bit tag + 48-bit payload (NaN-boxed)
//!   - object:    0xFFF8000000000000 | handle         [tag=000]
//!   - int32:     0xFFF8001000000000 | (i32 as u32)   [tag=001]
//!   - bool:      0xFFF8002000000000 | (b as u64)     [tag=010]
//!   - string:    0xFFF8003000000000 | handle         [tag=011]
//!   - undefined: 0xFFF8004000000000                  [tag=100]
//!   - null:      0xFFF8006000000000                  [tag=110]
//! ```
//!
//! NaN doubles are canonicalised on construction so a NaN produced by native
//! arithmetic can never be mistaken for a tagged value.

/// NaN-boxed 64-bit script value.
///
/// Heap values (objects and strings) carry an opaque handle issued by the
/// runtime. The handle is only meaningful to the runtime that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct JsValue(u64);

const NAN_BOX_BASE: u64 = 0xFFF8_0000_0000_0000;
const TAG_SHIFT: u64 = 48;
const TAG_MASK: u64 = 0x7 << TAG_SHIFT;
const PAYLOAD_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;
const PAYLOAD_MASK_32: u64 = 0x0000_0000_FFFF_FFFF;

const TAG_OBJECT: u64 = 0x0;
const TAG_I32: u64 = 0x1;
const TAG_BOOL: u64 = 0x2;
const TAG_STRING: u64 = 0x3;
const TAG_UNDEFINED: u64 = 0x4;
const TAG_NULL: u64 = 0x6;

const NULL_BITS: u64 = NAN_BOX_BASE | (TAG_NULL << TAG_SHIFT);
const UNDEFINED_BITS: u64 = NAN_BOX_BASE | (TAG_UNDEFINED << TAG_SHIFT);
const TRUE_BITS: u64 = NAN_BOX_BASE | (TAG_BOOL << TAG_SHIFT) | 1;
const FALSE_BITS: u64 = NAN_BOX_BASE | (TAG_BOOL << TAG_SHIFT);
const CANONICAL_NAN: u64 = 0x7FF8_0000_0000_0000;

/// Largest handle a runtime may issue (48-bit payload).
pub const MAX_HANDLE: u64 = PAYLOAD_MASK;

/// Handle to an object owned by the runtime heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(u64);

impl ObjectRef {
    /// Wrap a raw handle. Only runtimes should mint handles.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw & PAYLOAD_MASK)
    }

    /// Raw handle value
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Box this object as a value
    #[inline]
    pub const fn to_value(self) -> JsValue {
        JsValue::object(self)
    }
}

/// Handle to a string owned by the runtime heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringRef(u64);

impl StringRef {
    /// Wrap a raw handle. Only runtimes should mint handles.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw & PAYLOAD_MASK)
    }

    /// Raw handle value
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl JsValue {
    // ========================================================================
    // Raw bits
    // ========================================================================

    /// Create from raw u64 bits
    #[inline(always)]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Get raw u64 bits
    #[inline(always)]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// The `undefined` sentinel
    #[inline]
    pub const fn undefined() -> Self {
        Self(UNDEFINED_BITS)
    }

    /// The `null` sentinel
    #[inline]
    pub const fn null() -> Self {
        Self(NULL_BITS)
    }

    /// Create a boolean value
    #[inline]
    pub const fn bool(b: bool) -> Self {
        Self(if b { TRUE_BITS } else { FALSE_BITS })
    }

    /// Create an int32 value
    #[inline]
    pub const fn int32(i: i32) -> Self {
        Self(NAN_BOX_BASE | (TAG_I32 << TAG_SHIFT) | (i as u32 as u64))
    }

    /// Create a double value
    #[inline]
    pub fn double(f: f64) -> Self {
        if f.is_nan() {
            Self(CANONICAL_NAN)
        } else {
            Self(f.to_bits())
        }
    }

    /// Create an object value
    #[inline]
    pub const fn object(obj: ObjectRef) -> Self {
        Self(NAN_BOX_BASE | (TAG_OBJECT << TAG_SHIFT) | obj.0)
    }

    /// Create a string value
    #[inline]
    pub const fn string(s: StringRef) -> Self {
        Self(NAN_BOX_BASE | (TAG_STRING << TAG_SHIFT) | s.0)
    }

    // ========================================================================
    // Type checks
    // ========================================================================

    #[inline]
    const fn is_nan_boxed(&self) -> bool {
        (self.0 & NAN_BOX_BASE) == NAN_BOX_BASE
    }

    #[inline]
    const fn tag(&self) -> u64 {
        (self.0 & TAG_MASK) >> TAG_SHIFT
    }

    /// Check for `undefined`
    #[inline]
    pub const fn is_undefined(&self) -> bool {
        self.0 == UNDEFINED_BITS
    }

    /// Check for `null`
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == NULL_BITS
    }

    /// Check for `null` or `undefined`
    #[inline]
    pub const fn is_nullish(&self) -> bool {
        self.is_null() || self.is_undefined()
    }

    /// Check for a boolean
    #[inline]
    pub const fn is_bool(&self) -> bool {
        self.is_nan_boxed() && self.tag() == TAG_BOOL
    }

    /// Check for an int32
    #[inline]
    pub const fn is_int32(&self) -> bool {
        self.is_nan_boxed() && self.tag() == TAG_I32
    }

    /// Check for a double (raw IEEE 754, not NaN-boxed)
    #[inline]
    pub const fn is_double(&self) -> bool {
        !self.is_nan_boxed()
    }

    /// Check for either numeric representation
    #[inline]
    pub const fn is_number(&self) -> bool {
        self.is_int32() || self.is_double()
    }

    /// Check for a string
    #[inline]
    pub const fn is_string(&self) -> bool {
        self.is_nan_boxed() && self.tag() == TAG_STRING
    }

    /// Check for an object (anything not primitive)
    #[inline]
    pub const fn is_object(&self) -> bool {
        self.is_nan_boxed() && self.tag() == TAG_OBJECT
    }

    /// Check for a primitive (anything not an object)
    #[inline]
    pub const fn is_primitive(&self) -> bool {
        !self.is_object()
    }

    // ========================================================================
    // Extractors
    // ========================================================================

    /// Extract boolean value
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        if self.is_bool() {
            Some((self.0 & PAYLOAD_MASK) != 0)
        } else {
            None
        }
    }

    /// Extract int32 value
    #[inline]
    pub const fn as_int32(&self) -> Option<i32> {
        if self.is_int32() {
            Some((self.0 & PAYLOAD_MASK_32) as u32 as i32)
        } else {
            None
        }
    }

    /// Extract double value
    #[inline]
    pub fn as_double(&self) -> Option<f64> {
        if self.is_double() {
            Some(f64::from_bits(self.0))
        } else {
            None
        }
    }

    /// Extract either numeric representation as f64
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        self.as_double().or_else(|| self.as_int32().map(f64::from))
    }

    /// Extract object handle
    #[inline]
    pub const fn as_object(&self) -> Option<ObjectRef> {
        if self.is_object() {
            Some(ObjectRef(self.0 & PAYLOAD_MASK))
        } else {
            None
        }
    }

    /// Extract string handle
    #[inline]
    pub const fn as_string(&self) -> Option<StringRef> {
        if self.is_string() {
            Some(StringRef(self.0 & PAYLOAD_MASK))
        } else {
            None
        }
    }

    /// Get type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        if !self.is_nan_boxed() {
            "number"
        } else {
            match self.tag() {
                TAG_OBJECT => "object",
                TAG_I32 => "number",
                TAG_BOOL => "boolean",
                TAG_STRING => "string",
                TAG_UNDEFINED => "undefined",
                TAG_NULL => "null",
                _ => "unknown",
            }
        }
    }
}

impl Default for JsValue {
    fn default() -> Self {
        Self::undefined()
    }
}

impl From<ObjectRef> for JsValue {
    fn from(obj: ObjectRef) -> Self {
        JsValue::object(obj)
    }
}

impl From<StringRef> for JsValue {
    fn from(s: StringRef) -> Self {
        JsValue::string(s)
    }
}

impl From<i32> for JsValue {
    fn from(i: i32) -> Self {
        JsValue::int32(i)
    }
}

impl From<f64> for JsValue {
    fn from(f: f64) -> Self {
        JsValue::double(f)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::bool(b)
    }
}

impl std::fmt::Debug for JsValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_nan_boxed() {
            return write!(f, "JsValue::Double({})", f64::from_bits(self.0));
        }
        match self.tag() {
            TAG_OBJECT => write!(f, "JsValue::Object({:#x})", self.0 & PAYLOAD_MASK),
            TAG_I32 => write!(f, "JsValue::Int32({})", (self.0 & PAYLOAD_MASK_32) as u32 as i32),
            TAG_BOOL => write!(f, "JsValue::Bool({})", (self.0 & PAYLOAD_MASK) != 0),
            TAG_STRING => write!(f, "JsValue::String({:#x})", self.0 & PAYLOAD_MASK),
            TAG_UNDEFINED => write!(f, "JsValue::Undefined"),
            TAG_NULL => write!(f, "JsValue::Null"),
            _ => write!(f, "JsValue::Unknown({:#x})", self.0),
        }
    }
}
