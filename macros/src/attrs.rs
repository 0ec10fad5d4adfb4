//! Helper attribute parsing
//!
//! `#[debug_class]`, `#[debug_property]`, `#[debug_method]` and
//! `#[debug_param]` are parsed here and turned into builder calls on the
//! runtime tag types.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Attribute, Expr, Ident, LitStr, Meta, Result};

pub const DEBUG_CLASS: &str = "debug_class";
pub const DEBUG_PROPERTY: &str = "debug_property";
pub const DEBUG_METHOD: &str = "debug_method";
pub const DEBUG_PARAM: &str = "debug_param";

/// What a tag is attached to; decides which arguments are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Class,
    /// `#[debug_property]` on a struct field
    Field,
    /// `#[debug_property]` on a getter method
    Property,
    Method,
}

impl TagKind {
    fn attr_name(self) -> &'static str {
        match self {
            TagKind::Class => DEBUG_CLASS,
            TagKind::Field | TagKind::Property => DEBUG_PROPERTY,
            TagKind::Method => DEBUG_METHOD,
        }
    }

    fn runtime_type(self) -> Ident {
        let name = match self {
            TagKind::Class => "DebugClass",
            TagKind::Field | TagKind::Property => "DebugProperty",
            TagKind::Method => "DebugMethod",
        };
        Ident::new(name, Span::call_site())
    }
}

/// Parsed tag arguments
#[derive(Default)]
pub struct Tag {
    pub display_name: Option<LitStr>,
    pub order: Option<Expr>,
    pub category: Option<LitStr>,
    pub read_only: bool,
    pub init_only: bool,
    pub setter: Option<Ident>,
}

/// Find the single attribute named `name`, rejecting duplicates
pub fn find_attr<'a>(attrs: &'a [Attribute], name: &str) -> Result<Option<&'a Attribute>> {
    let mut found: Option<&Attribute> = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident(name)) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                format!("duplicate #[{name}] attribute"),
            ));
        }
        found = Some(attr);
    }
    Ok(found)
}

/// Whether `attr` is one of the helper attributes `#[debug_methods]` strips
pub fn is_helper(attr: &Attribute) -> bool {
    let path = attr.path();
    path.is_ident(DEBUG_PROPERTY) || path.is_ident(DEBUG_METHOD) || path.is_ident(DEBUG_PARAM)
}

/// Parse the arguments of a tag attribute
pub fn parse_tag(attr: &Attribute, kind: TagKind) -> Result<Tag> {
    let mut tag = Tag::default();

    // Bare `#[debug_class]` has no argument list
    if let Meta::Path(_) = attr.meta {
        return Ok(tag);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("display_name") {
            tag.display_name = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("order") {
            tag.order = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("category") {
            tag.category = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("read_only")
            && matches!(kind, TagKind::Field | TagKind::Property)
        {
            tag.read_only = true;
        } else if meta.path.is_ident("init_only") && kind == TagKind::Field {
            tag.init_only = true;
        } else if meta.path.is_ident("setter") && kind == TagKind::Property {
            tag.setter = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error(format!(
                "unsupported #[{}] argument",
                kind.attr_name()
            )));
        }
        Ok(())
    })?;

    Ok(tag)
}

/// Builder expression constructing the runtime tag
pub fn tag_tokens(tag: &Tag, kind: TagKind) -> TokenStream {
    let ty = kind.runtime_type();
    let mut tokens = quote! { ::nethercore_inspector::#ty::new() };

    if let Some(name) = &tag.display_name {
        tokens.extend(quote! { .display_name(#name) });
    }
    if let Some(order) = &tag.order {
        tokens.extend(quote! { .order(#order) });
    }
    if let Some(category) = &tag.category {
        tokens.extend(quote! { .category(#category) });
    }
    if tag.read_only {
        tokens.extend(quote! { .read_only() });
    }

    tokens
}

/// Parse `#[debug_param(default = expr)]` from a parameter's attributes
pub fn parse_param_default(attrs: &[Attribute]) -> Result<Option<Expr>> {
    let Some(attr) = find_attr(attrs, DEBUG_PARAM)? else {
        return Ok(None);
    };
    if let Meta::Path(_) = attr.meta {
        return Err(syn::Error::new_spanned(
            attr,
            "expected #[debug_param(default = ...)]",
        ));
    }

    let mut default = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("default") {
            default = Some(meta.value()?.parse::<Expr>()?);
            Ok(())
        } else {
            Err(meta.error("unsupported #[debug_param] argument"))
        }
    })?;
    Ok(default)
}
