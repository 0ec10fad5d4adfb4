//! Type catalog
//!
//! Raw descriptions of the types a process has loaded, before the registry
//! filters them by tag. A [`TypeCatalog`] groups descriptors into modules
//! (one per crate for [`LinkedCatalog`]); a module that fails to describe
//! some of its types still reports the ones it could.
//!
//! Descriptors are produced by `#[derive(Inspect)]` and `#[debug_methods]`,
//! or built by hand for types the macros cannot reach.

use std::any::Any;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::accessors;
use crate::attributes::{DebugClass, DebugMethod, DebugProperty};
use crate::error::AccessError;
use crate::model::{Getter, Invoker, Setter, TypeKey};
use crate::types::{DebugData, DebugValue, ValueType};

// =============================================================================
// Descriptors
// =============================================================================

/// Raw description of a field
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    /// Type that declares the field; `None` if it could not be resolved
    pub declaring: Option<TypeKey>,
    pub value_type: ValueType,
    pub tag: Option<DebugProperty>,
    /// Field cannot be assigned after construction
    pub init_only: bool,
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
}

impl FieldDescriptor {
    /// Describe field `name` of `T` through a pair of projections
    pub fn new<T: Any, V: DebugData>(
        name: impl Into<String>,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        Self {
            name: name.into(),
            declaring: Some(TypeKey::of::<T>()),
            value_type: V::value_type(),
            tag: None,
            init_only: false,
            getter: Some(accessors::field_getter(get)),
            setter: Some(accessors::field_setter(get_mut)),
        }
    }

    pub fn with_tag(mut self, tag: DebugProperty) -> Self {
        if self.tag.is_some() {
            tracing::warn!(field = %self.name, "duplicate debug_property tag ignored");
            return self;
        }
        self.tag = Some(tag);
        self
    }

    pub fn init_only(mut self) -> Self {
        self.init_only = true;
        self
    }

    /// Drop the declaring type (descriptor for a member whose owner is unknown)
    pub fn without_declaring_type(mut self) -> Self {
        self.declaring = None;
        self
    }
}

/// Raw description of a property (getter and/or setter method pair)
#[derive(Clone)]
pub struct PropertyDescriptor {
    pub name: String,
    pub declaring: Option<TypeKey>,
    pub value_type: ValueType,
    pub tag: Option<DebugProperty>,
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
}

impl PropertyDescriptor {
    /// Describe property `name` of `T` with value type `V`, without accessors
    pub fn new<T: Any, V: DebugData>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring: Some(TypeKey::of::<T>()),
            value_type: V::value_type(),
            tag: None,
            getter: None,
            setter: None,
        }
    }

    pub fn with_getter<T: Any, V: DebugData>(mut self, get: fn(&T) -> V) -> Self {
        self.getter = Some(accessors::property_getter(get));
        self
    }

    pub fn with_setter<T: Any, V: DebugData>(mut self, set: fn(&mut T, V)) -> Self {
        self.setter = Some(accessors::property_setter(set));
        self
    }

    /// Setter that may refuse a value
    pub fn with_fallible_setter<T: Any, V: DebugData>(
        mut self,
        set: fn(&mut T, V) -> Result<(), AccessError>,
    ) -> Self {
        self.setter = Some(accessors::property_fallible_setter(set));
        self
    }

    pub fn with_tag(mut self, tag: DebugProperty) -> Self {
        if self.tag.is_some() {
            tracing::warn!(property = %self.name, "duplicate debug_property tag ignored");
            return self;
        }
        self.tag = Some(tag);
        self
    }

    pub fn without_declaring_type(mut self) -> Self {
        self.declaring = None;
        self
    }

    pub fn can_read(&self) -> bool {
        self.getter.is_some()
    }

    pub fn can_write(&self) -> bool {
        self.setter.is_some()
    }
}

/// Raw description of a method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub default: Option<DebugValue>,
}

impl ParameterDescriptor {
    pub fn new<V: DebugData>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: V::value_type(),
            default: None,
        }
    }

    pub fn with_default<V: DebugData>(mut self, default: V) -> Self {
        self.default = Some(default.to_debug_value());
        self
    }
}

/// Raw description of a method
#[derive(Clone)]
pub struct MethodDescriptor {
    pub name: String,
    pub declaring: Option<TypeKey>,
    /// Return type; `ValueType::Unit` for methods returning `()`
    pub return_type: ValueType,
    pub tag: Option<DebugMethod>,
    pub parameters: Vec<ParameterDescriptor>,
    pub(crate) invoker: Option<Invoker>,
}

impl MethodDescriptor {
    /// Describe method `name` of `T` returning `R`, without an invoker
    pub fn new<T: Any, R: DebugData>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring: Some(TypeKey::of::<T>()),
            return_type: R::value_type(),
            tag: None,
            parameters: Vec::new(),
            invoker: None,
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Attach the invoker; its arity is the number of parameters added so far
    pub fn with_invoker<T: Any>(
        mut self,
        call: fn(&mut T, &[DebugValue]) -> Result<DebugValue, AccessError>,
    ) -> Self {
        self.invoker = Some(accessors::method_invoker(self.parameters.len(), call));
        self
    }

    pub fn with_tag(mut self, tag: DebugMethod) -> Self {
        if self.tag.is_some() {
            tracing::warn!(method = %self.name, "duplicate debug_method tag ignored");
            return self;
        }
        self.tag = Some(tag);
        self
    }

    pub fn without_declaring_type(mut self) -> Self {
        self.declaring = None;
        self
    }
}

/// Any member descriptor
#[derive(Clone)]
pub enum MemberDescriptor {
    Field(FieldDescriptor),
    Property(PropertyDescriptor),
    Method(MethodDescriptor),
}

/// Raw description of a type and all of its describable members
#[derive(Clone)]
pub struct TypeDescriptor {
    pub key: TypeKey,
    /// Abstract types are never registered
    pub is_abstract: bool,
    pub tag: Option<DebugClass>,
    pub fields: Vec<FieldDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Describe `T` under `name`
    pub fn of<T: Any>(name: &'static str) -> Self {
        Self::with_key(TypeKey::named::<T>(name))
    }

    pub fn with_key(key: TypeKey) -> Self {
        Self {
            key,
            is_abstract: false,
            tag: None,
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: DebugClass) -> Self {
        if self.tag.is_some() {
            tracing::warn!(ty = %self.key, "duplicate debug_class tag ignored");
            return self;
        }
        self.tag = Some(tag);
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_member(self, member: MemberDescriptor) -> Self {
        match member {
            MemberDescriptor::Field(field) => self.with_field(field),
            MemberDescriptor::Property(property) => self.with_property(property),
            MemberDescriptor::Method(method) => self.with_method(method),
        }
    }
}

// =============================================================================
// Catalogs
// =============================================================================

/// Types described by one module
#[derive(Clone)]
pub struct ModuleTypes {
    pub name: String,
    pub types: Vec<TypeDescriptor>,
    /// Set when the module could only describe some of its types
    pub error: Option<String>,
}

impl ModuleTypes {
    /// Fully loaded module
    pub fn loaded(name: impl Into<String>, types: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            types,
            error: None,
        }
    }

    /// Partially loaded module: `types` are the ones that could be described
    pub fn partial(
        name: impl Into<String>,
        types: Vec<TypeDescriptor>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            types,
            error: Some(error.into()),
        }
    }
}

/// Source of loaded types
///
/// `modules` is called once per registry rebuild and must describe the
/// current state of the process.
pub trait TypeCatalog: Send + Sync {
    fn modules(&self) -> Vec<ModuleTypes>;
}

/// Catalog holding an explicit module list, replaceable at runtime
///
/// Hosts that load and unload code feed their module list here and call
/// `DebugRegistry::invalidate` or `refresh` after each change.
#[derive(Default)]
pub struct StaticCatalog {
    modules: RwLock<Vec<ModuleTypes>>,
}

impl StaticCatalog {
    pub fn new(modules: Vec<ModuleTypes>) -> Self {
        Self {
            modules: RwLock::new(modules),
        }
    }

    /// Replace the whole module list
    pub fn set_modules(&self, modules: Vec<ModuleTypes>) {
        *self.modules.write() = modules;
    }

    /// Add or replace a module by name
    pub fn load_module(&self, module: ModuleTypes) {
        let mut modules = self.modules.write();
        match modules.iter_mut().find(|m| m.name == module.name) {
            Some(existing) => *existing = module,
            None => modules.push(module),
        }
    }

    /// Remove a module by name, returning whether it was present
    pub fn unload_module(&self, name: &str) -> bool {
        let mut modules = self.modules.write();
        let before = modules.len();
        modules.retain(|m| m.name != name);
        modules.len() != before
    }
}

impl TypeCatalog for StaticCatalog {
    fn modules(&self) -> Vec<ModuleTypes> {
        self.modules.read().clone()
    }
}

/// Link-time registration of a type, emitted by `#[derive(Inspect)]`
pub struct TypeRegistration {
    /// `module_path!()` of the deriving item
    pub module: &'static str,
    pub describe: fn() -> TypeDescriptor,
}

impl TypeRegistration {
    pub const fn new(module: &'static str, describe: fn() -> TypeDescriptor) -> Self {
        Self { module, describe }
    }
}

/// Link-time registration of extra members, emitted by `#[debug_methods]`
pub struct MemberRegistration {
    pub module: &'static str,
    pub owner: fn() -> TypeKey,
    pub describe: fn() -> Vec<MemberDescriptor>,
}

impl MemberRegistration {
    pub const fn new(
        module: &'static str,
        owner: fn() -> TypeKey,
        describe: fn() -> Vec<MemberDescriptor>,
    ) -> Self {
        Self {
            module,
            owner,
            describe,
        }
    }
}

inventory::collect!(TypeRegistration);
inventory::collect!(MemberRegistration);

/// Catalog of every type registered by the macros in the linked binary
///
/// Types are grouped into one module per crate. Member registrations are
/// merged into their owning type; members of a type that was never derived
/// are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedCatalog;

fn crate_of(module_path: &str) -> &str {
    module_path.split("::").next().unwrap_or(module_path)
}

impl TypeCatalog for LinkedCatalog {
    fn modules(&self) -> Vec<ModuleTypes> {
        let mut extra: HashMap<TypeKey, Vec<MemberDescriptor>> = HashMap::new();
        for registration in inventory::iter::<MemberRegistration> {
            extra
                .entry((registration.owner)())
                .or_default()
                .extend((registration.describe)());
        }

        let mut modules: Vec<ModuleTypes> = Vec::new();
        for registration in inventory::iter::<TypeRegistration> {
            let mut descriptor = (registration.describe)();
            if let Some(members) = extra.remove(&descriptor.key) {
                for member in members {
                    descriptor = descriptor.with_member(member);
                }
            }

            let name = crate_of(registration.module);
            match modules.iter_mut().find(|m| m.name == name) {
                Some(module) => module.types.push(descriptor),
                None => modules.push(ModuleTypes::loaded(name, vec![descriptor])),
            }
        }

        for owner in extra.keys() {
            tracing::debug!(
                ty = %owner,
                "debug members registered for a type without #[derive(Inspect)]"
            );
        }

        modules
    }
}
