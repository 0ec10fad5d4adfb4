//! Shared test fixtures for unit tests

use std::sync::Arc;

use crate::accessors::argument;
use crate::attributes::{DebugClass, DebugMethod, DebugProperty};
use crate::catalog::{
    FieldDescriptor, MethodDescriptor, ModuleTypes, ParameterDescriptor, PropertyDescriptor,
    StaticCatalog, TypeDescriptor,
};
use crate::error::AccessError;
use crate::model::ClassInfo;
use crate::registry::DebugRegistry;
use crate::types::{DebugData, DebugValue};

// ============================================================================
// Gauge fixture
// ============================================================================

/// Small inspectable type covering every member kind.
///
/// Display order: `fill`, `level`, `overload`, `reset`, then the `Info`
/// category with `Label` and `percent`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Gauge {
    pub level: f32,
    pub label: String,
}

impl Gauge {
    fn percent(&self) -> i32 {
        (self.level * 100.0).round() as i32
    }
}

fn invoke_fill(gauge: &mut Gauge, args: &[DebugValue]) -> Result<DebugValue, AccessError> {
    let amount = argument::<f32>(args, 0)?;
    gauge.level += amount;
    Ok(gauge.level.to_debug_value())
}

fn invoke_reset(gauge: &mut Gauge, _args: &[DebugValue]) -> Result<DebugValue, AccessError> {
    gauge.level = 0.0;
    Ok(DebugValue::Unit)
}

fn invoke_overload(_gauge: &mut Gauge, _args: &[DebugValue]) -> Result<DebugValue, AccessError> {
    panic!("gauge overloaded");
}

pub fn gauge_type() -> TypeDescriptor {
    TypeDescriptor::of::<Gauge>("Gauge")
        .with_tag(DebugClass::new().category("Instruments"))
        .with_field(
            FieldDescriptor::new::<Gauge, f32>("level", |g| &g.level, |g| &mut g.level)
                .with_tag(DebugProperty::new()),
        )
        .with_field(
            FieldDescriptor::new::<Gauge, String>("label", |g| &g.label, |g| &mut g.label)
                .with_tag(DebugProperty::new().display_name("Label").category("Info")),
        )
        .with_property(
            PropertyDescriptor::new::<Gauge, i32>("percent")
                .with_getter::<Gauge, i32>(Gauge::percent)
                .with_tag(DebugProperty::new().category("Info").order(1)),
        )
        .with_method(
            MethodDescriptor::new::<Gauge, f32>("fill")
                .with_parameter(ParameterDescriptor::new::<f32>("amount").with_default(0.5f32))
                .with_invoker::<Gauge>(invoke_fill)
                .with_tag(DebugMethod::new()),
        )
        .with_method(
            MethodDescriptor::new::<Gauge, ()>("reset")
                .with_invoker::<Gauge>(invoke_reset)
                .with_tag(DebugMethod::new()),
        )
        .with_method(
            MethodDescriptor::new::<Gauge, ()>("overload")
                .with_invoker::<Gauge>(invoke_overload)
                .with_tag(DebugMethod::new()),
        )
}

/// Registry over a single module containing [`Gauge`]
pub fn gauge_registry() -> DebugRegistry {
    DebugRegistry::new(StaticCatalog::new(vec![ModuleTypes::loaded(
        "instruments",
        vec![gauge_type()],
    )]))
}

/// Scanned class of [`Gauge`]
pub fn gauge_class() -> Arc<ClassInfo> {
    gauge_registry()
        .class_of::<Gauge>()
        .expect("gauge is registered")
}
