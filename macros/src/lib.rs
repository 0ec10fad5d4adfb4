//! Derive and attribute macros for the Nethercore inspector
//!
//! - `#[derive(Inspect)]` registers a struct and its tagged fields
//! - `#[debug_methods]` registers tagged methods and getter properties of an
//!   inherent impl block
//! - `#[derive(DebugEnum)]` lets a fieldless enum be inspected and edited
//!
//! Generated code refers to `::nethercore_inspector`, so these macros are
//! meant to be used through that crate's re-exports.

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemImpl, parse_macro_input};

mod attrs;
mod debug_enum;
mod inspect;
mod methods;

/// Registers a struct with the inspector.
///
/// The struct is listed once it carries `#[debug_class]`; fields are listed
/// once they carry `#[debug_property]`.
///
/// ```ignore
/// #[derive(Inspect)]
/// #[debug_class(display_name = "Hero", order = 1, category = "Actors")]
/// struct Player {
///     #[debug_property(order = -1)]
///     speed: f32,
///     #[debug_property(category = "Stats", read_only)]
///     level: u32,
///     #[debug_property(init_only)]
///     seed: u64,
///     cache: Vec<u8>, // not listed
/// }
/// ```
#[proc_macro_derive(Inspect, attributes(debug_class, debug_property))]
pub fn derive_inspect(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    inspect::expand_inspect(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Registers tagged methods of an inherent impl block.
///
/// `#[debug_method]` lists a `&self`/`&mut self` method as invokable; its
/// parameters may declare defaults with `#[debug_param(default = expr)]`.
/// `#[debug_property]` lists a `&self` getter as a property, writable
/// through an optional `setter = method_name`.
///
/// ```ignore
/// #[debug_methods]
/// impl Player {
///     #[debug_method(category = "Cheats")]
///     fn heal(&mut self, #[debug_param(default = 10)] amount: i32) -> i32 {
///         self.health += amount;
///         self.health
///     }
///
///     #[debug_property(setter = set_speed)]
///     fn speed(&self) -> f32 {
///         self.speed
///     }
///
///     fn set_speed(&mut self, speed: f32) {
///         self.speed = speed;
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn debug_methods(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[debug_methods] takes no arguments",
        )
        .to_compile_error()
        .into();
    }
    let input = parse_macro_input!(item as ItemImpl);
    methods::expand_methods(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Implements `DebugData` for a fieldless enum.
#[proc_macro_derive(DebugEnum)]
pub fn derive_debug_enum(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    debug_enum::expand_debug_enum(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
