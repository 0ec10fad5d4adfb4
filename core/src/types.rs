//! Debug inspection type definitions
//!
//! Core value types for the inspector. Every tagged field, property, method
//! parameter and return value crosses the registry boundary as a
//! [`DebugValue`], converted through the [`DebugData`] trait.

use std::fmt;

use glam::{Vec2, Vec3};

/// Value type identifier for inspected members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// No value (methods without a return type)
    Unit,

    // Primitives
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,

    // Compound types
    Vec2,  // { x: f32, y: f32 }
    Vec3,  // { x: f32, y: f32, z: f32 }
    Color, // 0xRRGGBBAA

    /// Fieldless enum, identified by name and its ordered variant names
    Enum {
        name: &'static str,
        variants: &'static [&'static str],
    },
}

impl ValueType {
    /// Get a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueType::Unit => "()",
            ValueType::Bool => "bool",
            ValueType::I8 => "i8",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::U8 => "u8",
            ValueType::U16 => "u16",
            ValueType::U32 => "u32",
            ValueType::U64 => "u64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::String => "String",
            ValueType::Vec2 => "Vec2",
            ValueType::Vec3 => "Vec3",
            ValueType::Color => "Color",
            ValueType::Enum { name, .. } => *name,
        }
    }

    /// Zero/empty value for this type.
    ///
    /// Used to seed method arguments that declare no default.
    pub fn zero_value(&self) -> DebugValue {
        match *self {
            ValueType::Unit => DebugValue::Unit,
            ValueType::Bool => DebugValue::Bool(false),
            ValueType::I8 => DebugValue::I8(0),
            ValueType::I16 => DebugValue::I16(0),
            ValueType::I32 => DebugValue::I32(0),
            ValueType::I64 => DebugValue::I64(0),
            ValueType::U8 => DebugValue::U8(0),
            ValueType::U16 => DebugValue::U16(0),
            ValueType::U32 => DebugValue::U32(0),
            ValueType::U64 => DebugValue::U64(0),
            ValueType::F32 => DebugValue::F32(0.0),
            ValueType::F64 => DebugValue::F64(0.0),
            ValueType::String => DebugValue::String(String::new()),
            ValueType::Vec2 => DebugValue::Vec2 { x: 0.0, y: 0.0 },
            ValueType::Vec3 => DebugValue::Vec3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            ValueType::Color => DebugValue::Color(0),
            ValueType::Enum { name, variants } => {
                if variants.is_empty() {
                    DebugValue::Unit
                } else {
                    DebugValue::Enum(EnumValue::new(name, variants, 0))
                }
            }
        }
    }

    /// Parse user-entered text as a value of this type.
    ///
    /// Vectors accept comma-separated components, colors accept `#RRGGBBAA`
    /// or `0xRRGGBBAA`, enums accept a variant name or index.
    pub fn parse(&self, text: &str) -> Option<DebugValue> {
        let text = text.trim();
        match *self {
            ValueType::Unit => text.is_empty().then_some(DebugValue::Unit),
            ValueType::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "1" | "on" => Some(DebugValue::Bool(true)),
                "false" | "0" | "off" => Some(DebugValue::Bool(false)),
                _ => None,
            },
            ValueType::I8 => text.parse().ok().map(DebugValue::I8),
            ValueType::I16 => text.parse().ok().map(DebugValue::I16),
            ValueType::I32 => text.parse().ok().map(DebugValue::I32),
            ValueType::I64 => text.parse().ok().map(DebugValue::I64),
            ValueType::U8 => text.parse().ok().map(DebugValue::U8),
            ValueType::U16 => text.parse().ok().map(DebugValue::U16),
            ValueType::U32 => text.parse().ok().map(DebugValue::U32),
            ValueType::U64 => text.parse().ok().map(DebugValue::U64),
            ValueType::F32 => text.parse().ok().map(DebugValue::F32),
            ValueType::F64 => text.parse().ok().map(DebugValue::F64),
            ValueType::String => Some(DebugValue::String(text.to_string())),
            ValueType::Vec2 => {
                let parts = parse_components(text)?;
                match parts.as_slice() {
                    [x, y] => Some(DebugValue::Vec2 { x: *x, y: *y }),
                    _ => None,
                }
            }
            ValueType::Vec3 => {
                let parts = parse_components(text)?;
                match parts.as_slice() {
                    [x, y, z] => Some(DebugValue::Vec3 {
                        x: *x,
                        y: *y,
                        z: *z,
                    }),
                    _ => None,
                }
            }
            ValueType::Color => {
                let hex = text
                    .strip_prefix('#')
                    .or_else(|| text.strip_prefix("0x"))
                    .unwrap_or(text);
                if hex.len() != 8 {
                    return None;
                }
                u32::from_str_radix(hex, 16).ok().map(DebugValue::Color)
            }
            ValueType::Enum { name, variants } => {
                let index = variants
                    .iter()
                    .position(|variant| *variant == text)
                    .or_else(|| text.parse::<usize>().ok().filter(|i| *i < variants.len()))?;
                Some(DebugValue::Enum(EnumValue::new(name, variants, index)))
            }
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

fn parse_components(text: &str) -> Option<Vec<f32>> {
    text.trim_matches(|c| c == '(' || c == ')')
        .split(',')
        .map(|part| part.trim().parse::<f32>().ok())
        .collect()
}

/// Current value of a fieldless enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    /// Enum type name
    pub type_name: &'static str,
    /// All variant names in declaration order
    pub variants: &'static [&'static str],
    /// Index of the current variant
    pub index: usize,
}

impl EnumValue {
    /// Create a new enum value
    pub const fn new(
        type_name: &'static str,
        variants: &'static [&'static str],
        index: usize,
    ) -> Self {
        Self {
            type_name,
            variants,
            index,
        }
    }

    /// Name of the current variant, if the index is in range
    pub fn variant(&self) -> Option<&'static str> {
        self.variants.get(self.index).copied()
    }
}

/// Runtime value representation for debug inspection
#[derive(Debug, Clone, PartialEq)]
pub enum DebugValue {
    Unit,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Vec2 { x: f32, y: f32 },
    Vec3 { x: f32, y: f32, z: f32 },
    Color(u32), // 0xRRGGBBAA format
    Enum(EnumValue),
}

impl DebugValue {
    /// Equality for change detection: NaN compares equal to NaN
    pub fn same_as(&self, other: &DebugValue) -> bool {
        fn same(a: f32, b: f32) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }

        match (self, other) {
            (DebugValue::F32(a), DebugValue::F32(b)) => same(*a, *b),
            (DebugValue::F64(a), DebugValue::F64(b)) => a == b || (a.is_nan() && b.is_nan()),
            (DebugValue::Vec2 { x: ax, y: ay }, DebugValue::Vec2 { x: bx, y: by }) => {
                same(*ax, *bx) && same(*ay, *by)
            }
            (
                DebugValue::Vec3 {
                    x: ax,
                    y: ay,
                    z: az,
                },
                DebugValue::Vec3 {
                    x: bx,
                    y: by,
                    z: bz,
                },
            ) => same(*ax, *bx) && same(*ay, *by) && same(*az, *bz),
            _ => self == other,
        }
    }

    /// Convert to f64 for numeric types (useful for sliders)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DebugValue::I8(v) => Some(*v as f64),
            DebugValue::I16(v) => Some(*v as f64),
            DebugValue::I32(v) => Some(*v as f64),
            DebugValue::I64(v) => Some(*v as f64),
            DebugValue::U8(v) => Some(*v as f64),
            DebugValue::U16(v) => Some(*v as f64),
            DebugValue::U32(v) => Some(*v as f64),
            DebugValue::U64(v) => Some(*v as f64),
            DebugValue::F32(v) => Some(*v as f64),
            DebugValue::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get bool value
    pub fn as_bool(&self) -> bool {
        matches!(self, DebugValue::Bool(true))
    }

    /// Whether this is the unit (no value) marker
    pub fn is_unit(&self) -> bool {
        matches!(self, DebugValue::Unit)
    }

    /// Get the value type for this debug value
    pub fn value_type(&self) -> ValueType {
        match self {
            DebugValue::Unit => ValueType::Unit,
            DebugValue::Bool(_) => ValueType::Bool,
            DebugValue::I8(_) => ValueType::I8,
            DebugValue::I16(_) => ValueType::I16,
            DebugValue::I32(_) => ValueType::I32,
            DebugValue::I64(_) => ValueType::I64,
            DebugValue::U8(_) => ValueType::U8,
            DebugValue::U16(_) => ValueType::U16,
            DebugValue::U32(_) => ValueType::U32,
            DebugValue::U64(_) => ValueType::U64,
            DebugValue::F32(_) => ValueType::F32,
            DebugValue::F64(_) => ValueType::F64,
            DebugValue::String(_) => ValueType::String,
            DebugValue::Vec2 { .. } => ValueType::Vec2,
            DebugValue::Vec3 { .. } => ValueType::Vec3,
            DebugValue::Color(_) => ValueType::Color,
            DebugValue::Enum(value) => ValueType::Enum {
                name: value.type_name,
                variants: value.variants,
            },
        }
    }
}

impl fmt::Display for DebugValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugValue::Unit => f.write_str("-"),
            DebugValue::Bool(v) => write!(f, "{v}"),
            DebugValue::I8(v) => write!(f, "{v}"),
            DebugValue::I16(v) => write!(f, "{v}"),
            DebugValue::I32(v) => write!(f, "{v}"),
            DebugValue::I64(v) => write!(f, "{v}"),
            DebugValue::U8(v) => write!(f, "{v}"),
            DebugValue::U16(v) => write!(f, "{v}"),
            DebugValue::U32(v) => write!(f, "{v}"),
            DebugValue::U64(v) => write!(f, "{v}"),
            DebugValue::F32(v) => write!(f, "{v}"),
            DebugValue::F64(v) => write!(f, "{v}"),
            DebugValue::String(v) => f.write_str(v),
            DebugValue::Vec2 { x, y } => write!(f, "({x}, {y})"),
            DebugValue::Vec3 { x, y, z } => write!(f, "({x}, {y}, {z})"),
            DebugValue::Color(v) => write!(f, "#{v:08X}"),
            DebugValue::Enum(value) => f.write_str(value.variant().unwrap_or("?")),
        }
    }
}

/// Conversion between a Rust type and its boxed [`DebugValue`] form.
///
/// Implemented for the primitive types, `String`, `glam::Vec2`/`Vec3`,
/// [`Color`], `()`, and any fieldless enum deriving `DebugEnum`.
pub trait DebugData: Sized + 'static {
    /// Declared type of values of this type
    fn value_type() -> ValueType;

    /// Box the value
    fn to_debug_value(&self) -> DebugValue;

    /// Unbox a value, returning `None` if the variant does not match
    fn from_debug_value(value: &DebugValue) -> Option<Self>;
}

macro_rules! impl_debug_data {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl DebugData for $ty {
                fn value_type() -> ValueType {
                    ValueType::$variant
                }

                fn to_debug_value(&self) -> DebugValue {
                    DebugValue::$variant(*self)
                }

                fn from_debug_value(value: &DebugValue) -> Option<Self> {
                    match value {
                        DebugValue::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_debug_data! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl DebugData for () {
    fn value_type() -> ValueType {
        ValueType::Unit
    }

    fn to_debug_value(&self) -> DebugValue {
        DebugValue::Unit
    }

    fn from_debug_value(value: &DebugValue) -> Option<Self> {
        value.is_unit().then_some(())
    }
}

impl DebugData for String {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn to_debug_value(&self) -> DebugValue {
        DebugValue::String(self.clone())
    }

    fn from_debug_value(value: &DebugValue) -> Option<Self> {
        match value {
            DebugValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl DebugData for Vec2 {
    fn value_type() -> ValueType {
        ValueType::Vec2
    }

    fn to_debug_value(&self) -> DebugValue {
        DebugValue::Vec2 {
            x: self.x,
            y: self.y,
        }
    }

    fn from_debug_value(value: &DebugValue) -> Option<Self> {
        match value {
            DebugValue::Vec2 { x, y } => Some(Vec2::new(*x, *y)),
            _ => None,
        }
    }
}

impl DebugData for Vec3 {
    fn value_type() -> ValueType {
        ValueType::Vec3
    }

    fn to_debug_value(&self) -> DebugValue {
        DebugValue::Vec3 {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    fn from_debug_value(value: &DebugValue) -> Option<Self> {
        match value {
            DebugValue::Vec3 { x, y, z } => Some(Vec3::new(*x, *y, *z)),
            _ => None,
        }
    }
}

/// RGBA color packed as `0xRRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFFFFFF);
    pub const BLACK: Color = Color(0x000000FF);

    /// Pack 8-bit channels
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Unpack into (r, g, b, a)
    pub const fn to_rgba(self) -> (u8, u8, u8, u8) {
        (
            ((self.0 >> 24) & 0xFF) as u8,
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

impl DebugData for Color {
    fn value_type() -> ValueType {
        ValueType::Color
    }

    fn to_debug_value(&self) -> DebugValue {
        DebugValue::Color(self.0)
    }

    fn from_debug_value(value: &DebugValue) -> Option<Self> {
        match value {
            DebugValue::Color(v) => Some(Color(*v)),
            _ => None,
        }
    }
}
