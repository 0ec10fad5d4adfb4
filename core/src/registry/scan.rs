//! Registry scan
//!
//! Walks every module of a catalog, keeps the tagged non-abstract types and
//! builds their member metadata. Failures are contained: a partially loaded
//! module contributes what it described, and a member that cannot be bound
//! is logged and left out of its class.

use std::sync::Arc;

use hashbrown::HashSet;

use crate::attributes::{resolve_category, resolve_display_name};
use crate::catalog::{
    FieldDescriptor, MethodDescriptor, PropertyDescriptor, TypeCatalog, TypeDescriptor,
};
use crate::error::ScanError;
use crate::model::{ClassInfo, MemberInfo, MemberKind, ParameterInfo, TypeKey};

use super::order;

/// Scan the catalog and build the ordered class list
pub(super) fn build_classes(catalog: &dyn TypeCatalog) -> Vec<Arc<ClassInfo>> {
    let mut classes: Vec<Arc<ClassInfo>> = Vec::new();
    let mut seen: HashSet<TypeKey> = HashSet::new();

    for module in catalog.modules() {
        if let Some(error) = &module.error {
            tracing::warn!(
                module = %module.name,
                loaded = module.types.len(),
                "partial module load: {}",
                error
            );
        }

        for ty in &module.types {
            if ty.is_abstract || ty.tag.is_none() {
                continue;
            }
            if !seen.insert(ty.key) {
                tracing::warn!(
                    ty = %ty.key,
                    module = %module.name,
                    "type described twice, keeping the first"
                );
                continue;
            }
            classes.push(Arc::new(build_class(ty)));
        }
    }

    order::sort_classes(&mut classes);

    tracing::debug!(
        classes = classes.len(),
        members = classes.iter().map(|c| c.members.len()).sum::<usize>(),
        "debug registry scan complete"
    );

    classes
}

fn build_class(ty: &TypeDescriptor) -> ClassInfo {
    let tag = ty.tag.clone().unwrap_or_default();
    let owner = ty.key;

    let mut members: Vec<Arc<MemberInfo>> = Vec::new();
    let mut seen: HashSet<(String, MemberKind)> = HashSet::new();

    let built = ty
        .properties
        .iter()
        .filter(|p| p.tag.is_some())
        .map(|p| build_property(owner, p))
        .chain(
            ty.fields
                .iter()
                .filter(|f| f.tag.is_some())
                .map(|f| build_field(owner, f)),
        )
        .chain(
            ty.methods
                .iter()
                .filter(|m| m.tag.is_some())
                .map(|m| build_method(owner, m)),
        );

    for result in built {
        let member = match result {
            Ok(member) => member,
            Err(err) => {
                tracing::error!("skipping debug member: {err}");
                continue;
            }
        };

        if !seen.insert((member.name.clone(), member.kind)) {
            let err = ScanError::DuplicateMember {
                owner: owner.name(),
                member: member.name,
                kind: member.kind.as_str(),
            };
            tracing::error!("skipping debug member: {err}");
            continue;
        }

        members.push(Arc::new(member));
    }

    order::sort_members(&mut members);

    ClassInfo {
        type_key: owner,
        display_name: resolve_display_name(owner.name(), tag.display_name.as_deref()),
        order: tag.order,
        category: resolve_category(tag.category.as_deref()),
        members,
    }
}

/// Check that a member is declared on the type being scanned
fn bind(owner: TypeKey, declaring: Option<TypeKey>, member: &str) -> Result<(), ScanError> {
    match declaring {
        None => Err(ScanError::NoDeclaringType {
            owner: owner.name(),
            member: member.to_string(),
        }),
        Some(declaring) if declaring != owner => Err(ScanError::DeclaringTypeMismatch {
            owner: owner.name(),
            member: member.to_string(),
            declared: declaring.name(),
        }),
        Some(_) => Ok(()),
    }
}

fn build_property(owner: TypeKey, property: &PropertyDescriptor) -> Result<MemberInfo, ScanError> {
    bind(owner, property.declaring, &property.name)?;
    let tag = property.tag.clone().unwrap_or_default();

    let setter = if tag.read_only {
        None
    } else {
        property.setter.clone()
    };

    Ok(MemberInfo {
        name: property.name.clone(),
        display_name: resolve_display_name(&property.name, tag.display_name.as_deref()),
        kind: MemberKind::Property,
        value_type: property.value_type,
        order: tag.order,
        category: resolve_category(tag.category.as_deref()),
        read_only: tag.read_only || !property.can_write(),
        getter: property.getter.clone(),
        setter,
        invoker: None,
        parameters: Vec::new(),
    })
}

fn build_field(owner: TypeKey, field: &FieldDescriptor) -> Result<MemberInfo, ScanError> {
    bind(owner, field.declaring, &field.name)?;
    let tag = field.tag.clone().unwrap_or_default();

    let getter = field.getter.clone().ok_or(ScanError::MissingAccessor {
        owner: owner.name(),
        member: field.name.clone(),
    })?;
    let setter = if tag.read_only || field.init_only {
        None
    } else {
        field.setter.clone()
    };

    Ok(MemberInfo {
        name: field.name.clone(),
        display_name: resolve_display_name(&field.name, tag.display_name.as_deref()),
        kind: MemberKind::Field,
        value_type: field.value_type,
        order: tag.order,
        category: resolve_category(tag.category.as_deref()),
        read_only: tag.read_only || field.init_only || setter.is_none(),
        getter: Some(getter),
        setter,
        invoker: None,
        parameters: Vec::new(),
    })
}

fn build_method(owner: TypeKey, method: &MethodDescriptor) -> Result<MemberInfo, ScanError> {
    bind(owner, method.declaring, &method.name)?;
    let tag = method.tag.clone().unwrap_or_default();

    let invoker = method.invoker.clone().ok_or(ScanError::MissingAccessor {
        owner: owner.name(),
        member: method.name.clone(),
    })?;

    let parameters = method
        .parameters
        .iter()
        .map(|p| ParameterInfo {
            name: p.name.clone(),
            value_type: p.value_type,
            default: p.default.clone(),
        })
        .collect();

    Ok(MemberInfo {
        name: method.name.clone(),
        display_name: resolve_display_name(&method.name, tag.display_name.as_deref()),
        kind: MemberKind::Method,
        value_type: method.return_type,
        order: tag.order,
        category: resolve_category(tag.category.as_deref()),
        read_only: true,
        getter: None,
        setter: None,
        invoker: Some(invoker),
        parameters,
    })
}
