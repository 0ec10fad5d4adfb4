//! Inspector session
//!
//! Presentation state for an inspector view, independent of any UI toolkit:
//! the class list, the selected class and instance, member sections, the
//! last polled values, method argument buffers and invocation results.
//! A frontend renders from this state and routes user input back into it.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::config::SessionConfig;
use crate::error::AccessError;
use crate::host::{HostObjects, LiveObject};
use crate::invoke;
use crate::model::{ClassInfo, MemberInfo, MemberKind, TypeKey};
use crate::registry::{ClassList, DebugRegistry};
use crate::types::DebugValue;

/// Consecutive members sharing a category
#[derive(Debug, Clone)]
pub struct MemberSection {
    /// Section header; `None` for uncategorized members (no header)
    pub category: Option<String>,
    pub members: Vec<Arc<MemberInfo>>,
}

/// Inspector session state
#[derive(Debug)]
pub struct InspectorSession {
    config: SessionConfig,
    classes: ClassList,
    generation: u64,
    selected_class: Option<TypeKey>,
    selected_instance: usize,
    /// Last read value per field/property name
    values: HashMap<String, DebugValue>,
    /// Argument buffer per method name
    arguments: HashMap<String, Vec<DebugValue>>,
    /// Last successful result per method name
    results: HashMap<String, DebugValue>,
}

impl Default for InspectorSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl InspectorSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            classes: Arc::from(Vec::new()),
            generation: 0,
            selected_class: None,
            selected_instance: 0,
            values: HashMap::new(),
            arguments: HashMap::new(),
            results: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Re-read the class list from the registry.
    ///
    /// The selected class survives if its type is still registered; member
    /// state is reseeded from the new metadata. Returns whether the registry
    /// was rebuilt since the last sync.
    pub fn sync(&mut self, registry: &DebugRegistry) -> bool {
        let snapshot = registry.snapshot();
        self.classes = snapshot.classes;
        let generation = snapshot.generation;
        let changed = generation != self.generation;
        self.generation = generation;

        if !changed {
            return false;
        }

        let selected = self.selected_class;
        match selected {
            Some(key) if self.find_class(&key).is_some() => self.reseed_arguments(),
            Some(key) => {
                tracing::debug!(ty = %key, "selected class no longer registered");
                self.selected_class = None;
                self.clear_member_state();
            }
            None => {}
        }
        true
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    fn find_class(&self, key: &TypeKey) -> Option<&Arc<ClassInfo>> {
        self.classes.iter().find(|class| class.type_key == *key)
    }

    pub fn selected_class(&self) -> Option<Arc<ClassInfo>> {
        self.selected_class
            .and_then(|key| self.find_class(&key).cloned())
    }

    /// Select a class by key, or clear the selection with `None`.
    ///
    /// Returns false (selection unchanged) if the class is not registered.
    pub fn select_class(&mut self, key: Option<TypeKey>) -> bool {
        if key.is_some_and(|key| self.find_class(&key).is_none()) {
            return false;
        }
        if key == self.selected_class {
            return true;
        }

        self.selected_class = key;
        self.selected_instance = 0;
        self.clear_member_state();
        self.reseed_arguments();
        true
    }

    /// Select a class by display name or type name
    pub fn select_class_named(&mut self, name: &str) -> bool {
        let key = self
            .classes
            .iter()
            .find(|class| class.display_name == name || class.type_key.name() == name)
            .map(|class| class.type_key);
        match key {
            Some(key) => self.select_class(Some(key)),
            None => false,
        }
    }

    /// Live instances of the selected class
    pub fn instances(&self, host: &dyn HostObjects) -> Vec<LiveObject> {
        self.selected_class()
            .map(|class| class.instances(host))
            .unwrap_or_default()
    }

    /// Picker labels for the selected class's instances
    pub fn instance_labels(&self, host: &dyn HostObjects) -> Vec<String> {
        self.instances(host).iter().map(LiveObject::label).collect()
    }

    /// Select an instance by index, clamped to the available range
    pub fn select_instance(&mut self, host: &dyn HostObjects, index: usize) -> Option<LiveObject> {
        let instances = self.instances(host);
        let clamped = index.min(instances.len().saturating_sub(1));
        if clamped != self.selected_instance {
            self.values.clear();
        }
        self.selected_instance = clamped;
        instances.get(clamped).cloned()
    }

    pub fn selected_instance_index(&self) -> usize {
        self.selected_instance
    }

    /// The selected instance, clamping the index if instances went away
    pub fn selected_instance(&self, host: &dyn HostObjects) -> Option<LiveObject> {
        let instances = self.instances(host);
        let index = self.selected_instance.min(instances.len().saturating_sub(1));
        instances.get(index).cloned()
    }

    /// Members of the selected class grouped by category, in display order
    pub fn sections(&self) -> Vec<MemberSection> {
        let Some(class) = self.selected_class() else {
            return Vec::new();
        };

        let mut sections: Vec<MemberSection> = Vec::new();
        for member in class.ordered_members() {
            match sections.last_mut() {
                Some(section) if section.category == member.category => {
                    section.members.push(member);
                }
                _ => sections.push(MemberSection {
                    category: member.category.clone(),
                    members: vec![member],
                }),
            }
        }
        sections
    }

    /// Re-read live values if the host is playing (or polling is unrestricted).
    ///
    /// Returns the names of members whose value changed.
    pub fn poll(&mut self, host: &dyn HostObjects) -> Vec<String> {
        if self.config.poll_only_while_playing && !host.is_playing() {
            return Vec::new();
        }
        self.refresh_values(host)
    }

    /// Re-read every readable member of the selected instance.
    ///
    /// Returns the names of members whose value changed. A member that fails
    /// to read loses its value.
    pub fn refresh_values(&mut self, host: &dyn HostObjects) -> Vec<String> {
        let (Some(class), Some(object)) = (self.selected_class(), self.selected_instance(host))
        else {
            self.values.clear();
            return Vec::new();
        };

        let mut changed = Vec::new();
        for member in class.members.iter().filter(|m| m.is_readable()) {
            match invoke::read(member, &object) {
                Ok(value) => {
                    let unchanged = self
                        .values
                        .get(&member.name)
                        .is_some_and(|old| old.same_as(&value));
                    if !unchanged {
                        changed.push(member.name.clone());
                        self.values.insert(member.name.clone(), value);
                    }
                }
                Err(_) => {
                    if self.values.remove(&member.name).is_some() {
                        changed.push(member.name.clone());
                    }
                }
            }
        }
        changed
    }

    /// Last read value of a field or property
    pub fn value(&self, member: &str) -> Option<&DebugValue> {
        self.values.get(member)
    }

    /// Write a field or property on the selected instance
    pub fn edit(
        &mut self,
        host: &dyn HostObjects,
        member: &str,
        value: DebugValue,
    ) -> Result<(), AccessError> {
        let class = self.selected_class().ok_or(AccessError::NoInstance)?;
        let info = class
            .member_named(member)
            .filter(|m| m.kind != MemberKind::Method)
            .ok_or_else(|| AccessError::NotWritable(member.to_string()))?;
        let object = self.selected_instance(host).ok_or(AccessError::NoInstance)?;

        invoke::write(info, &object, value)?;
        if let Ok(value) = invoke::read(info, &object) {
            self.values.insert(info.name.clone(), value);
        }
        Ok(())
    }

    /// Current argument buffer of a method
    pub fn arguments(&self, method: &str) -> &[DebugValue] {
        self.arguments.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace one argument of a method.
    ///
    /// Returns false if the method or index is unknown or the value has the
    /// wrong type.
    pub fn set_argument(&mut self, method: &str, index: usize, value: DebugValue) -> bool {
        let Some(info) = self
            .selected_class()
            .and_then(|class| class.member(method, MemberKind::Method).cloned())
        else {
            return false;
        };
        let Some(parameter) = info.parameters().get(index) else {
            return false;
        };
        if parameter.value_type != value.value_type() {
            return false;
        }

        match self.arguments.get_mut(method) {
            Some(args) if index < args.len() => {
                args[index] = value;
                true
            }
            _ => false,
        }
    }

    /// Invoke a method on the selected instance with the buffered arguments.
    ///
    /// A failed call is logged and leaves the previous result in place.
    pub fn invoke(
        &mut self,
        host: &dyn HostObjects,
        method: &str,
    ) -> Result<DebugValue, AccessError> {
        let class = self.selected_class().ok_or(AccessError::NoInstance)?;
        let info = class
            .member(method, MemberKind::Method)
            .ok_or_else(|| AccessError::NotInvokable(method.to_string()))?;
        let object = self.selected_instance(host).ok_or(AccessError::NoInstance)?;

        let args = self
            .arguments
            .get(method)
            .cloned()
            .unwrap_or_else(|| info.default_arguments());
        let result = invoke::call(info, &object, &args)?;
        self.results.insert(method.to_string(), result.clone());
        Ok(result)
    }

    /// Last successful result of a method
    pub fn result(&self, method: &str) -> Option<&DebugValue> {
        self.results.get(method)
    }

    /// Text for a value cell
    pub fn format_value(&self, value: Option<&DebugValue>) -> String {
        match value {
            Some(value) if !value.is_unit() => value.to_string(),
            _ => self.config.empty_value.clone(),
        }
    }

    fn clear_member_state(&mut self) {
        self.values.clear();
        self.arguments.clear();
        self.results.clear();
    }

    /// Seed argument buffers from parameter defaults, keeping buffers whose
    /// parameter types still match
    fn reseed_arguments(&mut self) {
        let Some(class) = self.selected_class() else {
            self.arguments.clear();
            return;
        };

        let mut arguments = HashMap::new();
        for method in class.members.iter().filter(|m| m.kind == MemberKind::Method) {
            let fresh = method.default_arguments();
            let kept = self.arguments.remove(&method.name).filter(|old| {
                old.len() == fresh.len()
                    && old
                        .iter()
                        .zip(&fresh)
                        .all(|(a, b)| a.value_type() == b.value_type())
            });
            arguments.insert(method.name.clone(), kept.unwrap_or(fresh));
        }
        self.arguments = arguments;
        self.results
            .retain(|name, _| class.member(name, MemberKind::Method).is_some());
    }
}
