//! `#[derive(DebugEnum)]` implementation
//!
//! Maps each variant of a fieldless enum to its declaration index so the
//! inspector can show the variant name and offer the full variant list.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand_debug_enum(input: DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(DebugEnum)] does not support generic types",
        ));
    }

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(DebugEnum)] can only be used on enums",
        ));
    };

    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(DebugEnum)] requires at least one variant",
        ));
    }

    if let Some(variant) = data
        .variants
        .iter()
        .find(|v| !matches!(v.fields, Fields::Unit))
    {
        return Err(syn::Error::new_spanned(
            variant,
            "#[derive(DebugEnum)] only supports fieldless variants",
        ));
    }

    let ident = &input.ident;
    let type_name = ident.unraw().to_string();
    let variants: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();
    let names: Vec<String> = variants.iter().map(|v| v.unraw().to_string()).collect();
    let indices: Vec<usize> = (0..variants.len()).collect();

    Ok(quote! {
        const _: () = {
            const VARIANTS: &[&str] = &[#(#names),*];

            impl ::nethercore_inspector::DebugData for #ident {
                fn value_type() -> ::nethercore_inspector::ValueType {
                    ::nethercore_inspector::ValueType::Enum {
                        name: #type_name,
                        variants: VARIANTS,
                    }
                }

                fn to_debug_value(&self) -> ::nethercore_inspector::DebugValue {
                    let index: usize = match self {
                        #(Self::#variants => #indices,)*
                    };
                    ::nethercore_inspector::DebugValue::Enum(
                        ::nethercore_inspector::EnumValue::new(#type_name, VARIANTS, index),
                    )
                }

                fn from_debug_value(
                    value: &::nethercore_inspector::DebugValue,
                ) -> ::core::option::Option<Self> {
                    match value {
                        ::nethercore_inspector::DebugValue::Enum(value)
                            if value.type_name == #type_name && value.variants == VARIANTS =>
                        {
                            match value.index {
                                #(#indices => ::core::option::Option::Some(Self::#variants),)*
                                _ => ::core::option::Option::None,
                            }
                        }
                        _ => ::core::option::Option::None,
                    }
                }
            }
        };
    })
}
