//! Attribute markers
//!
//! Plain-data tags attached to types and members. They carry presentation
//! hints only and are consumed exclusively by the registry scanner. The
//! `#[debug_class]`, `#[debug_property]` and `#[debug_method]` macro
//! attributes expand to these builders.

/// Class-level tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugClass {
    /// Display name (falls back to the type name)
    pub display_name: Option<String>,
    /// Sort key within the category
    pub order: i32,
    /// Free-text grouping label
    pub category: Option<String>,
}

impl DebugClass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Field/property tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugProperty {
    /// Display name (falls back to the member name)
    pub display_name: Option<String>,
    /// Sort key within the category
    pub order: i32,
    /// Free-text grouping label
    pub category: Option<String>,
    /// Never expose a setter, even if the member is writable
    pub read_only: bool,
}

impl DebugProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Method tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugMethod {
    /// Display name (falls back to the method name)
    pub display_name: Option<String>,
    /// Sort key within the category
    pub order: i32,
    /// Free-text grouping label
    pub category: Option<String>,
}

impl DebugMethod {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Resolve a display name, falling back to the declared name when the tag
/// value is missing or blank
pub fn resolve_display_name(declared: &str, display_name: Option<&str>) -> String {
    match display_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => declared.to_string(),
    }
}

/// Normalize a category label: blank labels mean "no category"
pub fn resolve_category(category: Option<&str>) -> Option<String> {
    category
        .filter(|c| !c.trim().is_empty())
        .map(str::to_string)
}
