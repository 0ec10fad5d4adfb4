//! Display ordering shared by classes and members
//!
//! Entries without a category come first, then entries are ordered by
//! category name, declared order and display name. Names compare ordinally.
//! Remaining ties fall back to the type path for classes and to the declared
//! name and kind for members, so the result never depends on discovery order.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::model::{ClassInfo, MemberInfo};

/// Compare two `(category, order, display_name)` keys
pub fn compare(
    a: (Option<&str>, i32, &str),
    b: (Option<&str>, i32, &str),
) -> Ordering {
    let (a_category, a_order, a_name) = a;
    let (b_category, b_order, b_name) = b;

    a_category
        .is_some()
        .cmp(&b_category.is_some())
        .then_with(|| a_category.cmp(&b_category))
        .then_with(|| a_order.cmp(&b_order))
        .then_with(|| a_name.cmp(b_name))
}

fn class_key(class: &ClassInfo) -> (Option<&str>, i32, &str) {
    (
        class.category.as_deref(),
        class.order,
        class.display_name.as_str(),
    )
}

fn member_key(member: &MemberInfo) -> (Option<&str>, i32, &str) {
    (
        member.category.as_deref(),
        member.order,
        member.display_name.as_str(),
    )
}

pub fn sort_classes(classes: &mut [Arc<ClassInfo>]) {
    classes.sort_by(|a, b| {
        compare(class_key(a), class_key(b))
            .then_with(|| a.type_key.path().cmp(b.type_key.path()))
    });
}

pub fn sort_members(members: &mut [Arc<MemberInfo>]) {
    members.sort_by(|a, b| {
        compare(member_key(a), member_key(b))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.kind.cmp(&b.kind))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncategorized_first() {
        assert_eq!(
            compare((None, 10, "Zeta"), (Some("Audio"), 0, "Alpha")),
            Ordering::Less
        );
    }

    #[test]
    fn test_category_then_order_then_name() {
        assert_eq!(
            compare((Some("Audio"), 5, "B"), (Some("Combat"), 0, "A")),
            Ordering::Less
        );
        assert_eq!(
            compare((Some("Combat"), 1, "Z"), (Some("Combat"), 2, "A")),
            Ordering::Less
        );
        assert_eq!(
            compare((Some("Combat"), 1, "A"), (Some("Combat"), 1, "B")),
            Ordering::Less
        );
    }

    #[test]
    fn test_ordinal_name_comparison() {
        // Uppercase sorts before lowercase
        assert_eq!(compare((None, 0, "Zed"), (None, 0, "abe")), Ordering::Less);
    }
}
