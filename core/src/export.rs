//! Inspected value export
//!
//! Formats the current member values of a live object as Rust source or
//! JSON for copy-paste tuning.

use serde_json::{Map, Value};

use crate::host::LiveObject;
use crate::invoke;
use crate::model::{ClassInfo, MemberInfo, MemberKind};
use crate::types::{DebugValue, ValueType};

/// Export readable fields and properties as flat Rust constants
///
/// Output format:
/// ```rust
/// // Exported from Player (3)
/// const PLAYER_SPEED: f32 = 3.5;
/// const PLAYER_HEALTH: i32 = 100;
/// ```
pub fn export_as_rust(class: &ClassInfo, object: &LiveObject) -> String {
    let mut output = format!("// Exported from {}\n\n", object.label());
    let prefix = screaming_snake(class.type_key.name());

    for (member, value) in read_members(class, object) {
        let name = format!("{}_{}", prefix, screaming_snake(&member.name));
        output.push_str(&format_rust_const(&name, &member.value_type, &value));
        output.push('\n');
    }

    output
}

/// Export readable fields and properties as a pretty-printed JSON object
/// keyed by member name
pub fn export_as_json(class: &ClassInfo, object: &LiveObject) -> String {
    let mut map = Map::new();
    for (member, value) in read_members(class, object) {
        map.insert(member.name.clone(), json_value(&value));
    }
    format!("{:#}", Value::Object(map))
}

fn read_members<'a>(
    class: &'a ClassInfo,
    object: &LiveObject,
) -> impl Iterator<Item = (&'a MemberInfo, DebugValue)> {
    class
        .members
        .iter()
        .filter(|m| m.kind != MemberKind::Method && m.is_readable())
        .filter_map(move |m| {
            invoke::read(m, object)
                .ok()
                .map(|value| (m.as_ref(), value))
        })
}

/// `GameClock` -> `GAME_CLOCK`, `jump-force` -> `JUMP_FORCE`
fn screaming_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == ' ' || c == '-' || c == '_' {
            if !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.extend(c.to_uppercase());
    }
    out
}

/// Format a single value as a Rust const declaration
fn format_rust_const(name: &str, value_type: &ValueType, value: &DebugValue) -> String {
    match (value_type, value) {
        // {:?} keeps floats round-trip safe
        (ValueType::F32, DebugValue::F32(v)) => format!("const {name}: f32 = {v:?};"),
        (ValueType::F64, DebugValue::F64(v)) => format!("const {name}: f64 = {v:?};"),
        (ValueType::Bool, DebugValue::Bool(v)) => format!("const {name}: bool = {v};"),
        (ValueType::I8, DebugValue::I8(v)) => format!("const {name}: i8 = {v};"),
        (ValueType::I16, DebugValue::I16(v)) => format!("const {name}: i16 = {v};"),
        (ValueType::I32, DebugValue::I32(v)) => format!("const {name}: i32 = {v};"),
        (ValueType::I64, DebugValue::I64(v)) => format!("const {name}: i64 = {v};"),
        (ValueType::U8, DebugValue::U8(v)) => format!("const {name}: u8 = {v};"),
        (ValueType::U16, DebugValue::U16(v)) => format!("const {name}: u16 = {v};"),
        (ValueType::U32, DebugValue::U32(v)) => format!("const {name}: u32 = {v};"),
        (ValueType::U64, DebugValue::U64(v)) => format!("const {name}: u64 = {v};"),
        (ValueType::String, DebugValue::String(v)) => format!("const {name}: &str = {v:?};"),
        (ValueType::Vec2, DebugValue::Vec2 { x, y }) => {
            format!("const {name}: Vec2 = Vec2::new({x:?}, {y:?});")
        }
        (ValueType::Vec3, DebugValue::Vec3 { x, y, z }) => {
            format!("const {name}: Vec3 = Vec3::new({x:?}, {y:?}, {z:?});")
        }
        (ValueType::Color, DebugValue::Color(rgba)) => {
            format!("const {name}: Color = Color(0x{rgba:08X});")
        }
        (ValueType::Enum { name: ty, .. }, DebugValue::Enum(v)) => match v.variant() {
            Some(variant) => format!("const {name}: {ty} = {ty}::{variant};"),
            None => format!("// {name} - unknown {ty} variant {}", v.index),
        },
        _ => format!("// {name} - type mismatch"),
    }
}

fn json_value(value: &DebugValue) -> Value {
    match value {
        DebugValue::Unit => Value::Null,
        DebugValue::Bool(v) => Value::from(*v),
        DebugValue::I8(v) => Value::from(*v),
        DebugValue::I16(v) => Value::from(*v),
        DebugValue::I32(v) => Value::from(*v),
        DebugValue::I64(v) => Value::from(*v),
        DebugValue::U8(v) => Value::from(*v),
        DebugValue::U16(v) => Value::from(*v),
        DebugValue::U32(v) => Value::from(*v),
        DebugValue::U64(v) => Value::from(*v),
        DebugValue::F32(v) => Value::from(*v),
        DebugValue::F64(v) => Value::from(*v),
        DebugValue::String(v) => Value::from(v.as_str()),
        DebugValue::Vec2 { x, y } => Value::from(vec![*x, *y]),
        DebugValue::Vec3 { x, y, z } => Value::from(vec![*x, *y, *z]),
        DebugValue::Color(_) | DebugValue::Enum(_) => Value::from(value.to_string()),
    }
}
