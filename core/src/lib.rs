//! Nethercore Inspector - runtime object inspection
//!
//! Discovers the types a program marks as inspectable, describes their
//! fields, properties and methods, and gives tooling typed access to live
//! instances without per-call lookups.
//!
//! # Architecture
//!
//! - [`TypeCatalog`] - Raw type descriptions, fed by the derive macros
//!   ([`LinkedCatalog`]) or by a host ([`StaticCatalog`])
//! - [`DebugRegistry`] - Cached, ordered class metadata with change notifications
//! - [`HostObjects`] - Host collaborator answering instance queries
//! - [`InspectorSession`] - UI-independent inspector state
//!
//! # Example
//!
//! ```ignore
//! use nethercore_inspector::{DebugRegistry, Inspect};
//!
//! #[derive(Inspect)]
//! #[debug_class(category = "Actors")]
//! struct Player {
//!     #[debug_property(order = 1)]
//!     speed: f32,
//! }
//!
//! let registry = DebugRegistry::linked();
//! let player = registry.class_of::<Player>().unwrap();
//! ```

// Macro-generated code names this crate by its absolute path
extern crate self as nethercore_inspector;

pub mod accessors;
pub mod attributes;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod invoke;
pub mod model;
pub mod registry;
pub mod session;
#[cfg(test)]
pub mod test_utils;
pub mod types;

// Re-export the macros
pub use nethercore_inspector_macros::{DebugEnum, Inspect, debug_methods};

// Re-export core types
pub use attributes::{DebugClass, DebugMethod, DebugProperty};
pub use catalog::{
    FieldDescriptor, LinkedCatalog, MemberDescriptor, MethodDescriptor, ModuleTypes,
    ParameterDescriptor, PropertyDescriptor, StaticCatalog, TypeCatalog, TypeDescriptor,
};
pub use config::{InspectorConfig, RegistryConfig, SessionConfig};
pub use error::{AccessError, ConfigError, ScanError};
pub use host::{HostObjects, LiveObject, ObjectWorld};
pub use model::{ClassInfo, MemberInfo, MemberKind, ParameterInfo, TypeKey};
pub use registry::{ClassList, DebugRegistry, LifecycleEvent, RegistryUpdate, SubscriptionId};
pub use session::{InspectorSession, MemberSection};
pub use types::{Color, DebugData, DebugValue, EnumValue, ValueType};

/// Items used by macro-generated code. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
