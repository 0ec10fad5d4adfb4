//! `#[debug_methods]` implementation
//!
//! Keeps the impl block as written (minus helper attributes) and registers
//! one invoker per `#[debug_method]` and one getter/setter pair per
//! `#[debug_property]` getter.
//!
//! Example expansion:
//! ```ignore
//! // Input:
//! #[debug_methods]
//! impl Player {
//!     #[debug_method]
//!     fn heal(&mut self, #[debug_param(default = 10)] amount: i32) -> i32 { .. }
//! }
//!
//! // Output:
//! impl Player {
//!     fn heal(&mut self, amount: i32) -> i32 { .. }
//! }
//!
//! const _: () = {
//!     fn __owner() -> ::nethercore_inspector::TypeKey {
//!         ::nethercore_inspector::TypeKey::of::<Player>()
//!     }
//!     fn __describe_members() -> Vec<::nethercore_inspector::MemberDescriptor> {
//!         fn __member0_invoke(this: &mut Player, args: &[DebugValue]) -> Result<DebugValue, AccessError> {
//!             let amount = ::nethercore_inspector::accessors::argument::<i32>(args, 0usize)?;
//!             let result = this.heal(amount);
//!             Ok(::nethercore_inspector::DebugData::to_debug_value(&result))
//!         }
//!         vec![MemberDescriptor::Method(
//!             MethodDescriptor::new::<Player, i32>("heal")
//!                 .with_parameter(ParameterDescriptor::new::<i32>("amount").with_default::<i32>(10))
//!                 .with_invoker::<Player>(__member0_invoke)
//!                 .with_tag(DebugMethod::new()),
//!         )]
//!     }
//!     ::nethercore_inspector::__private::inventory::submit! {
//!         ::nethercore_inspector::catalog::MemberRegistration::new(
//!             module_path!(), __owner, __describe_members,
//!         )
//!     }
//! };
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{
    FnArg, ImplItem, ImplItemFn, ItemImpl, Pat, Result, ReturnType, Signature, Type,
};

use crate::attrs::{
    DEBUG_METHOD, DEBUG_PROPERTY, TagKind, find_attr, is_helper, parse_param_default, parse_tag,
    tag_tokens,
};

pub fn expand_methods(mut item: ItemImpl) -> Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[debug_methods] must be applied to an inherent impl block",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[debug_methods] does not support generic impl blocks",
        ));
    }

    let self_ty = (*item.self_ty).clone();
    let mut helpers = Vec::new();
    let mut members = Vec::new();

    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };

        let method_attr = find_attr(&method.attrs, DEBUG_METHOD)?;
        let property_attr = find_attr(&method.attrs, DEBUG_PROPERTY)?;

        match (method_attr, property_attr) {
            (Some(_), Some(attr)) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "a method cannot be both #[debug_method] and #[debug_property]",
                ));
            }
            (Some(attr), None) => {
                let tag = parse_tag(attr, TagKind::Method)?;
                let (helper, member) = expand_method(&self_ty, method, &tag, members.len())?;
                helpers.push(helper);
                members.push(member);
            }
            (None, Some(attr)) => {
                let tag = parse_tag(attr, TagKind::Property)?;
                let (helper, member) = expand_property(&self_ty, method, &tag, members.len())?;
                helpers.push(helper);
                members.push(member);
            }
            (None, None) => {
                if let Some(arg) = typed_args(&method.sig).find(|arg| {
                    arg.attrs.iter().any(is_helper)
                }) {
                    return Err(syn::Error::new_spanned(
                        arg,
                        "#[debug_param] requires #[debug_method] on the method",
                    ));
                }
            }
        }

        strip_helpers(method);
    }

    if members.is_empty() {
        return Ok(quote! { #item });
    }

    Ok(quote! {
        #item

        const _: () = {
            fn __owner() -> ::nethercore_inspector::TypeKey {
                ::nethercore_inspector::TypeKey::of::<#self_ty>()
            }

            fn __describe_members() -> ::std::vec::Vec<::nethercore_inspector::MemberDescriptor> {
                #(#helpers)*

                ::std::vec![#(#members),*]
            }

            ::nethercore_inspector::__private::inventory::submit! {
                ::nethercore_inspector::catalog::MemberRegistration::new(
                    module_path!(),
                    __owner,
                    __describe_members,
                )
            }
        };
    })
}

fn typed_args(sig: &Signature) -> impl Iterator<Item = &syn::PatType> {
    sig.inputs.iter().filter_map(|arg| match arg {
        FnArg::Typed(pat_type) => Some(pat_type),
        FnArg::Receiver(_) => None,
    })
}

fn strip_helpers(method: &mut ImplItemFn) {
    method.attrs.retain(|attr| !is_helper(attr));
    for arg in method.sig.inputs.iter_mut() {
        if let FnArg::Typed(pat_type) = arg {
            pat_type.attrs.retain(|attr| !is_helper(attr));
        }
    }
}

/// Receiver mutability: `Some(false)` for `&self`, `Some(true)` for `&mut self`
fn receiver(sig: &Signature) -> Result<bool> {
    match sig.receiver() {
        Some(recv) if recv.reference.is_some() && recv.colon_token.is_none() => {
            Ok(recv.mutability.is_some())
        }
        Some(recv) => Err(syn::Error::new_spanned(
            recv,
            "inspected methods must take `&self` or `&mut self`",
        )),
        None => Err(syn::Error::new_spanned(
            &sig.ident,
            "inspected methods must take `&self` or `&mut self`",
        )),
    }
}

/// Replace a bare `Self` with the impl's self type; reject borrowed types
fn value_type(ty: &Type, self_ty: &Type) -> Result<Type> {
    match ty {
        Type::Reference(_) | Type::ImplTrait(_) | Type::Ptr(_) => Err(syn::Error::new_spanned(
            ty,
            "inspected values must be owned `DebugData` types",
        )),
        Type::Path(path) if path.qself.is_none() && path.path.is_ident("Self") => {
            Ok(self_ty.clone())
        }
        Type::Paren(inner) => value_type(&inner.elem, self_ty),
        _ => Ok(ty.clone()),
    }
}

fn return_type(sig: &Signature, self_ty: &Type) -> Result<Type> {
    match &sig.output {
        ReturnType::Default => Ok(syn::parse_quote!(())),
        ReturnType::Type(_, ty) => value_type(ty, self_ty),
    }
}

fn reject_generics(sig: &Signature) -> Result<()> {
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "inspected methods cannot be generic",
        ));
    }
    if let Some(token) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            token,
            "inspected methods cannot be async",
        ));
    }
    Ok(())
}

fn expand_method(
    self_ty: &Type,
    method: &ImplItemFn,
    tag: &crate::attrs::Tag,
    slot: usize,
) -> Result<(TokenStream, TokenStream)> {
    let sig = &method.sig;
    reject_generics(sig)?;
    receiver(sig)?;

    let ident = &sig.ident;
    let name = ident.unraw().to_string();
    let invoke = format_ident!("__member{}_invoke", slot);
    let ret = return_type(sig, self_ty)?;

    let mut conversions = Vec::new();
    let mut arg_names = Vec::new();
    let mut parameters = Vec::new();

    for (index, arg) in typed_args(sig).enumerate() {
        let arg_ty = value_type(&arg.ty, self_ty)?;
        let param_name = match &*arg.pat {
            Pat::Ident(pat) => pat.ident.unraw().to_string(),
            _ => format!("arg{index}"),
        };
        let local = format_ident!("__arg{}", index);

        conversions.push(quote! {
            let #local = ::nethercore_inspector::accessors::argument::<#arg_ty>(args, #index)?;
        });
        arg_names.push(local);

        let default = match parse_param_default(&arg.attrs)? {
            Some(expr) => quote! { .with_default::<#arg_ty>(#expr) },
            None => quote! {},
        };
        parameters.push(quote! {
            .with_parameter(
                ::nethercore_inspector::ParameterDescriptor::new::<#arg_ty>(#param_name)
                    #default
            )
        });
    }

    let helper = quote! {
        fn #invoke(
            this: &mut #self_ty,
            args: &[::nethercore_inspector::DebugValue],
        ) -> ::core::result::Result<
            ::nethercore_inspector::DebugValue,
            ::nethercore_inspector::AccessError,
        > {
            #(#conversions)*
            let result: #ret = this.#ident(#(#arg_names),*);
            ::core::result::Result::Ok(::nethercore_inspector::DebugData::to_debug_value(&result))
        }
    };

    let tag = tag_tokens(tag, TagKind::Method);
    let member = quote! {
        ::nethercore_inspector::MemberDescriptor::Method(
            ::nethercore_inspector::MethodDescriptor::new::<#self_ty, #ret>(#name)
                #(#parameters)*
                .with_invoker::<#self_ty>(#invoke)
                .with_tag(#tag)
        )
    };

    Ok((helper, member))
}

fn expand_property(
    self_ty: &Type,
    method: &ImplItemFn,
    tag: &crate::attrs::Tag,
    slot: usize,
) -> Result<(TokenStream, TokenStream)> {
    let sig = &method.sig;
    reject_generics(sig)?;
    if receiver(sig)? {
        return Err(syn::Error::new_spanned(
            &sig.ident,
            "#[debug_property] getters must take `&self`",
        ));
    }
    if let Some(arg) = typed_args(sig).next() {
        return Err(syn::Error::new_spanned(
            arg,
            "#[debug_property] getters take no arguments",
        ));
    }
    if matches!(sig.output, ReturnType::Default) {
        return Err(syn::Error::new_spanned(
            &sig.ident,
            "#[debug_property] getters must return a value",
        ));
    }

    let ident = &sig.ident;
    let name = ident.unraw().to_string();
    let value_ty = return_type(sig, self_ty)?;
    let get = format_ident!("__member{}_get", slot);
    let set = format_ident!("__member{}_set", slot);

    let mut helper = quote! {
        fn #get(this: &#self_ty) -> #value_ty {
            this.#ident()
        }
    };
    let mut accessors = quote! { .with_getter::<#self_ty, #value_ty>(#get) };

    if let Some(setter) = &tag.setter {
        helper.extend(quote! {
            fn #set(
                this: &mut #self_ty,
                value: #value_ty,
            ) -> ::core::result::Result<(), ::nethercore_inspector::AccessError> {
                ::nethercore_inspector::accessors::SetterOutcome::into_access_result(
                    this.#setter(value),
                )
            }
        });
        accessors.extend(quote! { .with_fallible_setter::<#self_ty, #value_ty>(#set) });
    }

    let tag = tag_tokens(tag, TagKind::Property);
    let member = quote! {
        ::nethercore_inspector::MemberDescriptor::Property(
            ::nethercore_inspector::PropertyDescriptor::new::<#self_ty, #value_ty>(#name)
                #accessors
                .with_tag(#tag)
        )
    };

    Ok((helper, member))
}
