//! Member registration
//!
//! A [`HandlerDescriptor`] names a native handler, its minimum arity and
//! its property flags. Descriptors are collected into a [`MemberTable`],
//! which is then installed on a script object with [`attach`],
//! [`attach_existing`] or [`define_members`].

use std::collections::HashMap;
use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

use crate::args::{Arg, Signature};
use crate::context::ScriptContext;
use crate::error::{BindResult, BindingError};
use crate::frame::CallFrame;
use crate::value::ObjectRef;

// ============================================================================
// Property flags
// ============================================================================

/// Attribute bits of a script property
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PropertyFlags(u8);

impl PropertyFlags {
    /// No attributes: writable, deletable, hidden from enumeration
    pub const NONE: Self = Self(0);
    /// Visible to enumeration
    pub const ENUMERATE: Self = Self(1 << 0);
    /// Assignment is refused
    pub const READONLY: Self = Self(1 << 1);
    /// Deletion is refused
    pub const PERMANENT: Self = Self(1 << 2);

    /// Flags for installed sub-objects
    pub const PROPERTY: Self = Self(Self::ENUMERATE.0 | Self::READONLY.0 | Self::PERMANENT.0);
    /// Flags for ordinary native functions
    pub const FUNCTION: Self = Self(Self::READONLY.0 | Self::PERMANENT.0);
    /// Flags for native functions scripts may replace
    pub const MUTABLE_FUNCTION: Self = Self(Self::PERMANENT.0);

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Enumerable?
    pub const fn is_enumerable(self) -> bool {
        self.contains(Self::ENUMERATE)
    }

    /// Read-only?
    pub const fn is_read_only(self) -> bool {
        self.contains(Self::READONLY)
    }

    /// Permanent?
    pub const fn is_permanent(self) -> bool {
        self.contains(Self::PERMANENT)
    }
}

impl BitOr for PropertyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for PropertyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.is_enumerable() {
            parts.push("ENUMERATE");
        }
        if self.is_read_only() {
            parts.push("READONLY");
        }
        if self.is_permanent() {
            parts.push("PERMANENT");
        }
        if parts.is_empty() {
            write!(f, "PropertyFlags(NONE)")
        } else {
            write!(f, "PropertyFlags({})", parts.join(" | "))
        }
    }
}

/// The flag combinations a member may be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberAccess {
    /// Read-only, enumerable, permanent
    ReadOnlyEnumerable,
    /// Read-only, permanent
    #[default]
    ReadOnly,
    /// Permanent but replaceable by scripts
    Mutable,
}

impl MemberAccess {
    /// Property flags for this access level
    pub const fn flags(self) -> PropertyFlags {
        match self {
            MemberAccess::ReadOnlyEnumerable => PropertyFlags::PROPERTY,
            MemberAccess::ReadOnly => PropertyFlags::FUNCTION,
            MemberAccess::Mutable => PropertyFlags::MUTABLE_FUNCTION,
        }
    }
}

// ============================================================================
// Handler descriptors
// ============================================================================

/// A native handler body.
///
/// Reads its arguments from the frame, does its work, and encodes a result
/// into the frame. Any `Err` aborts the call through the failure path.
pub type HandlerFn = Rc<dyn Fn(&mut CallFrame<'_>) -> BindResult<()>>;

/// Declaration of one script-callable native member
#[derive(Clone)]
pub struct HandlerDescriptor {
    name: String,
    min_args: usize,
    access: MemberAccess,
    handler: HandlerFn,
    signature: Option<Rc<Signature>>,
}

impl HandlerDescriptor {
    /// Declare `name` with a minimum argument count
    pub fn new<F>(name: impl Into<String>, min_args: usize, handler: F) -> Self
    where
        F: Fn(&mut CallFrame<'_>) -> BindResult<()> + 'static,
    {
        Self {
            name: name.into(),
            min_args,
            access: MemberAccess::default(),
            handler: Rc::new(handler),
            signature: None,
        }
    }

    /// Declare a member that takes no arguments
    pub fn no_args<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut CallFrame<'_>) -> BindResult<()> + 'static,
    {
        Self::new(name, 0, handler)
    }

    /// Declare a member from a data signature.
    ///
    /// The minimum arity is the signature's required count; the handler
    /// receives the extracted arguments in declaration order.
    pub fn with_signature<F>(name: impl Into<String>, signature: Signature, handler: F) -> Self
    where
        F: Fn(&mut CallFrame<'_>, Vec<Arg>) -> BindResult<()> + 'static,
    {
        let signature = Rc::new(signature);
        let spec = Rc::clone(&signature);
        Self {
            name: name.into(),
            min_args: signature.min_args(),
            access: MemberAccess::default(),
            handler: Rc::new(move |frame: &mut CallFrame<'_>| {
                let args = frame.extract_all(&spec)?;
                handler(frame, args)
            }),
            signature: Some(signature),
        }
    }

    /// Use `access` instead of the default read-only flags
    pub fn access(mut self, access: MemberAccess) -> Self {
        self.access = access;
        self
    }

    /// Allow scripts to replace this member
    pub fn mutable(self) -> Self {
        self.access(MemberAccess::Mutable)
    }

    /// Same handler under another script name
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Script-visible name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum argument count
    pub fn min_args(&self) -> usize {
        self.min_args
    }

    /// Declared access level
    pub fn member_access(&self) -> MemberAccess {
        self.access
    }

    /// Property flags the member is installed with
    pub fn flags(&self) -> PropertyFlags {
        self.access.flags()
    }

    /// Data signature, when declared with one
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_deref()
    }

    /// The handler body
    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("access", &self.access)
            .finish()
    }
}

// ============================================================================
// Member tables
// ============================================================================

/// Ordered set of uniquely named members attached to one object or class
#[derive(Clone, Default)]
pub struct MemberTable {
    name: String,
    members: Vec<Rc<HandlerDescriptor>>,
    index: HashMap<String, usize>,
}

impl MemberTable {
    /// Empty table; `name` is the property the table is attached under
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a table from descriptors, rejecting duplicates
    pub fn from_members(
        name: impl Into<String>,
        members: impl IntoIterator<Item = HandlerDescriptor>,
    ) -> BindResult<Self> {
        let mut table = Self::new(name);
        for member in members {
            table.add(member)?;
        }
        Ok(table)
    }

    /// Add a member (builder style)
    pub fn member(mut self, descriptor: HandlerDescriptor) -> BindResult<Self> {
        self.add(descriptor)?;
        Ok(self)
    }

    /// Add a member
    pub fn add(&mut self, descriptor: HandlerDescriptor) -> BindResult<()> {
        if self.index.contains_key(descriptor.name()) {
            return Err(BindingError::DuplicateMember(format!(
                "{}.{}",
                self.name,
                descriptor.name()
            )));
        }
        self.index
            .insert(descriptor.name().to_string(), self.members.len());
        self.members.push(Rc::new(descriptor));
        Ok(())
    }

    /// Merge every member of `other` into this table
    pub fn extend(&mut self, other: &MemberTable) -> BindResult<()> {
        for member in &other.members {
            self.add(HandlerDescriptor::clone(member))?;
        }
        Ok(())
    }

    /// Resolve a call-by-name
    pub fn resolve(&self, name: &str) -> Option<&Rc<HandlerDescriptor>> {
        self.index.get(name).map(|&i| &self.members[i])
    }

    /// Check if a member is declared
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Members in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Rc<HandlerDescriptor>> {
        self.members.iter()
    }

    /// Member names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name()).collect()
    }

    /// Property name the table is attached under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the table has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Debug for MemberTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberTable")
            .field("name", &self.name)
            .field("members", &self.names())
            .finish()
    }
}

// ============================================================================
// Attachment
// ============================================================================

/// Install every member of `table` as a function property of `obj`
pub fn define_members(ctx: &dyn ScriptContext, obj: ObjectRef, table: &MemberTable) -> BindResult<()> {
    for member in table.iter() {
        ctx.define_function(obj, Rc::clone(member))?;
    }
    Ok(())
}

/// Create a new object holding `table`'s members and install it on
/// `parent` under the table's name as a read-only, permanent property
pub fn attach(ctx: &dyn ScriptContext, parent: ObjectRef, table: &MemberTable) -> BindResult<ObjectRef> {
    let obj = ctx.new_object();
    ctx.define_property(parent, table.name(), obj.to_value(), PropertyFlags::PROPERTY)?;
    define_members(ctx, obj, table)?;
    Ok(obj)
}

/// Install `existing` on `parent` under the table's name and define the
/// table's members on it
pub fn attach_existing(
    ctx: &dyn ScriptContext,
    parent: ObjectRef,
    table: &MemberTable,
    existing: ObjectRef,
) -> BindResult<()> {
    ctx.define_property(parent, table.name(), existing.to_value(), PropertyFlags::PROPERTY)?;
    define_members(ctx, existing, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgSpec;

    fn noop(name: &str) -> HandlerDescriptor {
        HandlerDescriptor::no_args(name, |_frame| Ok(()))
    }

    #[test]
    fn test_flag_combinations() {
        assert!(PropertyFlags::PROPERTY.is_enumerable());
        assert!(PropertyFlags::PROPERTY.is_read_only());
        assert!(PropertyFlags::PROPERTY.is_permanent());

        assert!(!PropertyFlags::FUNCTION.is_enumerable());
        assert!(PropertyFlags::FUNCTION.is_read_only());

        assert!(!PropertyFlags::MUTABLE_FUNCTION.is_read_only());
        assert!(PropertyFlags::MUTABLE_FUNCTION.is_permanent());

        let combined = PropertyFlags::READONLY | PropertyFlags::PERMANENT;
        assert_eq!(combined, PropertyFlags::FUNCTION);
    }

    #[test]
    fn test_access_flags() {
        assert_eq!(noop("a").flags(), PropertyFlags::FUNCTION);
        assert_eq!(noop("a").mutable().flags(), PropertyFlags::MUTABLE_FUNCTION);
        assert_eq!(
            noop("a").access(MemberAccess::ReadOnlyEnumerable).flags(),
            PropertyFlags::PROPERTY
        );
    }

    #[test]
    fn test_table_resolves_in_order() {
        let table = MemberTable::new("device")
            .member(noop("vibrate"))
            .unwrap()
            .member(HandlerDescriptor::new("setOrientation", 1, |_f| Ok(())))
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.names(), vec!["vibrate", "setOrientation"]);
        assert_eq!(table.resolve("setOrientation").unwrap().min_args(), 1);
        assert!(table.resolve("missing").is_none());
    }

    #[test]
    fn test_table_rejects_duplicates() {
        let err = MemberTable::new("device")
            .member(noop("vibrate"))
            .unwrap()
            .member(noop("vibrate"))
            .unwrap_err();
        assert_eq!(err, BindingError::DuplicateMember("device.vibrate".into()));
    }

    #[test]
    fn test_named_alias_shares_handler() {
        let original = HandlerDescriptor::new("setText", 2, |_f| Ok(()));
        let alias = original.named("setValue");
        assert_eq!(alias.name(), "setValue");
        assert_eq!(alias.min_args(), 2);
        assert!(Rc::ptr_eq(original.handler(), alias.handler()));

        let table = MemberTable::from_members("input", [original, alias]).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_signature_sets_min_args() {
        let sig = Signature::new(vec![ArgSpec::int32(), ArgSpec::int32_or(-1)]).unwrap();
        let member = HandlerDescriptor::with_signature("seek", sig, |_f, _args| Ok(()));
        assert_eq!(member.min_args(), 1);
        assert_eq!(member.signature().unwrap().len(), 2);
    }
}
