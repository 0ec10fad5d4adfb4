//! Metadata model
//!
//! Immutable descriptions of an inspectable class and its members, as
//! published by the registry. A snapshot is never modified after it is built;
//! a refresh replaces every [`ClassInfo`] and [`MemberInfo`] wholesale.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::AccessError;
use crate::host::{HostObjects, LiveObject};
use crate::registry::order;
use crate::types::{DebugValue, ValueType};

/// Erased getter: `instance -> value`
pub type Getter = Arc<dyn Fn(&dyn Any) -> Result<DebugValue, AccessError> + Send + Sync>;

/// Erased setter: `(instance, value) -> ()`
pub type Setter = Arc<dyn Fn(&mut dyn Any, DebugValue) -> Result<(), AccessError> + Send + Sync>;

/// Erased invoker: `(instance, args) -> value`, with `DebugValue::Unit` for no return
pub type Invoker =
    Arc<dyn Fn(&mut dyn Any, &[DebugValue]) -> Result<DebugValue, AccessError> + Send + Sync>;

/// Identity of a described type
///
/// Equality and hashing use the [`TypeId`] only.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    path: &'static str,
}

impl TypeKey {
    /// Key for `T`, named by the last path segment of its type name
    pub fn of<T: Any>() -> Self {
        let path = std::any::type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(path),
            path,
        }
    }

    /// Key for `T` with an explicit display name
    pub fn named<T: Any>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
            path: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Short type name (e.g. `Player`)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fully qualified type path
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Whether this key describes `T`
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

fn short_type_name(path: &'static str) -> &'static str {
    let base = path.split('<').next().unwrap_or(path);
    base.rsplit("::").next().unwrap_or(base)
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Member kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKind {
    Property,
    Field,
    Method,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Property => "property",
            MemberKind::Field => "field",
            MemberKind::Method => "method",
        }
    }
}

/// Method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    pub name: String,
    pub value_type: ValueType,
    /// Declared default value, if any
    pub default: Option<DebugValue>,
}

impl ParameterInfo {
    /// Value used when invoking without explicit argument entry:
    /// the declared default, or the type's zero value
    pub fn fallback_value(&self) -> DebugValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.value_type.zero_value())
    }
}

/// An inspectable field, property or method
#[derive(Clone)]
pub struct MemberInfo {
    /// Declared name
    pub name: String,
    /// Resolved display name
    pub display_name: String,
    pub kind: MemberKind,
    /// Declared type, or the return type for methods
    pub value_type: ValueType,
    pub order: i32,
    pub category: Option<String>,
    pub read_only: bool,
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
    pub(crate) invoker: Option<Invoker>,
    pub(crate) parameters: Vec<ParameterInfo>,
}

impl MemberInfo {
    pub fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn is_invokable(&self) -> bool {
        self.invoker.is_some()
    }

    /// Method parameters in declaration order (empty for fields/properties)
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// Fallback arguments for every parameter
    pub fn default_arguments(&self) -> Vec<DebugValue> {
        self.parameters
            .iter()
            .map(ParameterInfo::fallback_value)
            .collect()
    }

    /// Read the member from an instance
    pub fn get(&self, instance: &dyn Any) -> Result<DebugValue, AccessError> {
        match &self.getter {
            Some(getter) => getter(instance),
            None => Err(AccessError::NotReadable(self.name.clone())),
        }
    }

    /// Write the member on an instance
    pub fn set(&self, instance: &mut dyn Any, value: DebugValue) -> Result<(), AccessError> {
        match &self.setter {
            Some(setter) => setter(instance, value),
            None => Err(AccessError::NotWritable(self.name.clone())),
        }
    }

    /// Invoke the method on an instance
    pub fn invoke(
        &self,
        instance: &mut dyn Any,
        args: &[DebugValue],
    ) -> Result<DebugValue, AccessError> {
        match &self.invoker {
            Some(invoker) => invoker(instance, args),
            None => Err(AccessError::NotInvokable(self.name.clone())),
        }
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("kind", &self.kind)
            .field("value_type", &self.value_type)
            .field("order", &self.order)
            .field("category", &self.category)
            .field("read_only", &self.read_only)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// An inspectable class
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub type_key: TypeKey,
    pub display_name: String,
    pub order: i32,
    pub category: Option<String>,
    pub members: Vec<Arc<MemberInfo>>,
}

impl ClassInfo {
    /// Live instances of this class, queried from the host on every call
    pub fn instances(&self, host: &dyn HostObjects) -> Vec<LiveObject> {
        if !host.is_type_loaded(&self.type_key) {
            return Vec::new();
        }
        host.find_instances(&self.type_key)
    }

    /// Members in display order: no category first, then category, order, display name
    pub fn ordered_members(&self) -> Vec<Arc<MemberInfo>> {
        let mut members = self.members.clone();
        order::sort_members(&mut members);
        members
    }

    /// Find a member by declared name and kind
    pub fn member(&self, name: &str, kind: MemberKind) -> Option<&Arc<MemberInfo>> {
        self.members
            .iter()
            .find(|member| member.kind == kind && member.name == name)
    }

    /// Find a member by declared name, preferring fields/properties over methods
    pub fn member_named(&self, name: &str) -> Option<&Arc<MemberInfo>> {
        self.members
            .iter()
            .filter(|member| member.name == name)
            .min_by_key(|member| member.kind == MemberKind::Method)
    }
}
