//! `#[derive(Inspect)]` implementation
//!
//! Example expansion:
//! ```ignore
//! // Input:
//! #[derive(Inspect)]
//! #[debug_class(category = "Actors")]
//! struct Player {
//!     #[debug_property]
//!     speed: f32,
//! }
//!
//! // Output:
//! const _: () = {
//!     fn __describe() -> ::nethercore_inspector::TypeDescriptor {
//!         fn __field0_ref(this: &Player) -> &f32 { &this.speed }
//!         fn __field0_mut(this: &mut Player) -> &mut f32 { &mut this.speed }
//!         ::nethercore_inspector::TypeDescriptor::of::<Player>("Player")
//!             .with_tag(::nethercore_inspector::DebugClass::new().category("Actors"))
//!             .with_field(
//!                 ::nethercore_inspector::FieldDescriptor::new::<Player, f32>(
//!                     "speed", __field0_ref, __field0_mut,
//!                 )
//!                 .with_tag(::nethercore_inspector::DebugProperty::new()),
//!             )
//!     }
//!     ::nethercore_inspector::__private::inventory::submit! {
//!         ::nethercore_inspector::catalog::TypeRegistration::new(module_path!(), __describe)
//!     }
//! };
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

use crate::attrs::{DEBUG_CLASS, DEBUG_PROPERTY, TagKind, find_attr, parse_tag, tag_tokens};

pub fn expand_inspect(input: DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Inspect)] does not support generic types",
        ));
    }

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Inspect)] can only be used on structs",
            ));
        }
    };

    let ident = &input.ident;
    let type_name = ident.unraw().to_string();

    let class_tag = match find_attr(&input.attrs, DEBUG_CLASS)? {
        Some(attr) => {
            let tag = tag_tokens(&parse_tag(attr, TagKind::Class)?, TagKind::Class);
            quote! { .with_tag(#tag) }
        }
        None => quote! {},
    };

    let mut accessors = Vec::new();
    let mut fields = Vec::new();

    match &data.fields {
        Fields::Named(named) => {
            for (index, field) in named.named.iter().enumerate() {
                let Some(attr) = find_attr(&field.attrs, DEBUG_PROPERTY)? else {
                    continue;
                };
                let tag = parse_tag(attr, TagKind::Field)?;

                let Some(field_ident) = &field.ident else {
                    continue;
                };
                let field_ty = &field.ty;
                let field_name = field_ident.unraw().to_string();
                // Indexed so helper names never collide with another field's
                let get = format_ident!("__field{}_ref", index);
                let get_mut = format_ident!("__field{}_mut", index);

                accessors.push(quote! {
                    fn #get(this: &#ident) -> &#field_ty {
                        &this.#field_ident
                    }
                    fn #get_mut(this: &mut #ident) -> &mut #field_ty {
                        &mut this.#field_ident
                    }
                });

                let tag_expr = tag_tokens(&tag, TagKind::Field);
                let init_only = if tag.init_only {
                    quote! { .init_only() }
                } else {
                    quote! {}
                };

                fields.push(quote! {
                    .with_field(
                        ::nethercore_inspector::FieldDescriptor::new::<#ident, #field_ty>(
                            #field_name,
                            #get,
                            #get_mut,
                        )
                        .with_tag(#tag_expr)
                        #init_only
                    )
                });
            }
        }
        Fields::Unnamed(unnamed) => {
            if let Some(field) = unnamed
                .unnamed
                .iter()
                .find(|f| f.attrs.iter().any(|a| a.path().is_ident(DEBUG_PROPERTY)))
            {
                return Err(syn::Error::new_spanned(
                    field,
                    "#[debug_property] is only supported on named fields",
                ));
            }
        }
        Fields::Unit => {}
    }

    Ok(quote! {
        const _: () = {
            fn __describe() -> ::nethercore_inspector::TypeDescriptor {
                #(#accessors)*

                ::nethercore_inspector::TypeDescriptor::of::<#ident>(#type_name)
                    #class_tag
                    #(#fields)*
            }

            ::nethercore_inspector::__private::inventory::submit! {
                ::nethercore_inspector::catalog::TypeRegistration::new(module_path!(), __describe)
            }
        };
    })
}
