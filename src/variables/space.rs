//! Variable spaces.
//!
//! # Responsibilities
//! - Store named values
//! - Fall back to a parent space on lookup misses
//! - Substitute references in strings and against row fields

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use dashmap::DashMap;

use crate::variables::syntax;

/// A named value from a data row, used by `field_substitute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowField {
    pub name: String,
    pub value: String,
}

impl RowField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Read access to a set of variables.
pub trait VariableSpace: Send + Sync {
    /// Look up a variable by name.
    fn get_variable(&self, name: &str) -> Option<String>;

    /// Names of every variable visible from this space.
    fn list_variables(&self) -> Vec<String>;

    /// Replace every `${name}`, `%%name%%` and `$[hex]` reference.
    fn environment_substitute(&self, text: &str) -> String {
        syntax::substitute(text, |name| self.get_variable(name))
    }

    fn environment_substitute_all(&self, texts: &[String]) -> Vec<String> {
        texts
            .iter()
            .map(|text| self.environment_substitute(text))
            .collect()
    }

    /// Replace `?{field}` references with values from a data row, then apply
    /// regular variable substitution.
    fn field_substitute(&self, text: &str, row: &[RowField]) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find("?{") {
            let Some(close) = rest[open + 2..].find('}') else {
                break;
            };
            let name = &rest[open + 2..open + 2 + close];
            out.push_str(&rest[..open]);
            match row.iter().find(|field| field.name == name) {
                Some(field) => out.push_str(&field.value),
                None => out.push_str(&rest[open..open + 3 + close]),
            }
            rest = &rest[open + 3 + close..];
        }
        out.push_str(rest);
        self.environment_substitute(&out)
    }

    /// Interpret a (possibly referenced) value as a boolean.
    fn boolean_value_of_variable(&self, expression: &str, default: bool) -> bool {
        if expression.is_empty() {
            return default;
        }
        let value = self.environment_substitute(expression);
        if value.is_empty() {
            return default;
        }
        parse_boolean(&value)
    }
}

/// Lenient boolean parsing: `Y`, `YES`, `TRUE`, `1` (any case) are true.
pub fn parse_boolean(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_uppercase().as_str(),
        "Y" | "YES" | "TRUE" | "1"
    )
}

/// A concrete, shareable variable space with an optional parent.
#[derive(Debug, Default)]
pub struct Variables {
    values: DashMap<String, String>,
    parent: ArcSwapOption<Variables>,
}

impl Variables {
    /// Create an empty, parent-less space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty space that falls back to `parent`.
    pub fn with_parent(parent: Arc<Variables>) -> Self {
        let space = Self::new();
        space.parent.store(Some(parent));
        space
    }

    pub fn set_variable(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove_variable(&self, name: &str) -> Option<String> {
        self.values.remove(name).map(|(_, value)| value)
    }

    pub fn parent_variable_space(&self) -> Option<Arc<Variables>> {
        self.parent.load_full()
    }

    pub fn set_parent_variable_space(&self, parent: Option<Arc<Variables>>) {
        self.parent.store(parent);
    }

    /// Link to `parent` and take a snapshot of everything it currently defines.
    pub fn initialize_variables_from(&self, parent: Option<Arc<Variables>>) {
        if let Some(parent) = &parent {
            self.copy_variables_from(&**parent);
        }
        self.parent.store(parent);
    }

    /// Copy every variable visible from `other` into this space.
    pub fn copy_variables_from(&self, other: &dyn VariableSpace) {
        for name in other.list_variables() {
            if let Some(value) = other.get_variable(&name) {
                self.values.insert(name, value);
            }
        }
    }

    pub fn inject_variables(&self, values: &HashMap<String, String>) {
        for (name, value) in values {
            self.values.insert(name.clone(), value.clone());
        }
    }
}

impl VariableSpace for Variables {
    fn get_variable(&self, name: &str) -> Option<String> {
        if let Some(value) = self.values.get(name) {
            return Some(value.value().clone());
        }
        self.parent
            .load_full()
            .and_then(|parent| parent.get_variable(name))
    }

    fn list_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.iter().map(|r| r.key().clone()).collect();
        if let Some(parent) = self.parent.load_full() {
            names.extend(parent.list_variables());
        }
        names.sort();
        names.dedup();
        names
    }
}

impl VariableSpace for HashMap<String, String> {
    fn get_variable(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }

    fn list_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Looks names up in a primary space, then in a fallback.
pub struct Layered<'a> {
    primary: &'a dyn VariableSpace,
    fallback: &'a dyn VariableSpace,
}

impl<'a> Layered<'a> {
    pub fn new(primary: &'a dyn VariableSpace, fallback: &'a dyn VariableSpace) -> Self {
        Self { primary, fallback }
    }
}

impl VariableSpace for Layered<'_> {
    fn get_variable(&self, name: &str) -> Option<String> {
        self.primary
            .get_variable(name)
            .or_else(|| self.fallback.get_variable(name))
    }

    fn list_variables(&self) -> Vec<String> {
        let mut names = self.primary.list_variables();
        names.extend(self.fallback.list_variables());
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_fallback() {
        let parent = Arc::new(Variables::new());
        parent.set_variable("HOST", "nn1");

        let child = Variables::with_parent(parent.clone());
        child.set_variable("PORT", "8020");

        assert_eq!(child.get_variable("HOST").as_deref(), Some("nn1"));
        assert_eq!(child.environment_substitute("${HOST}:${PORT}"), "nn1:8020");
        assert_eq!(child.list_variables(), vec!["HOST", "PORT"]);

        // Parent changes are visible through the link.
        parent.set_variable("HOST", "nn2");
        assert_eq!(child.get_variable("HOST").as_deref(), Some("nn2"));
    }

    #[test]
    fn test_child_shadows_parent() {
        let parent = Arc::new(Variables::new());
        parent.set_variable("HOST", "nn1");
        let child = Variables::with_parent(parent);
        child.set_variable("HOST", "local");
        assert_eq!(child.get_variable("HOST").as_deref(), Some("local"));
    }

    #[test]
    fn test_initialize_copies_snapshot() {
        let parent = Arc::new(Variables::new());
        parent.set_variable("A", "1");

        let space = Variables::new();
        space.initialize_variables_from(Some(parent.clone()));
        parent.remove_variable("A");

        // The snapshot survives removal from the parent.
        assert_eq!(space.get_variable("A").as_deref(), Some("1"));
        assert!(space.parent_variable_space().is_some());
    }

    #[test]
    fn test_field_substitute() {
        let space = Variables::new();
        space.set_variable("ROOT", "/data");
        let row = vec![RowField::new("day", "monday")];

        assert_eq!(
            space.field_substitute("${ROOT}/?{day}/?{missing}", &row),
            "/data/monday/?{missing}"
        );
    }

    #[test]
    fn test_boolean_value_of_variable() {
        let space = Variables::new();
        space.set_variable("FLAG", "Yes");
        assert!(space.boolean_value_of_variable("${FLAG}", false));
        assert!(!space.boolean_value_of_variable("no", true));
        assert!(space.boolean_value_of_variable("", true));
    }

    #[test]
    fn test_layered_lookup() {
        let primary: HashMap<String, String> = [("A".to_string(), "1".to_string())].into();
        let fallback = Variables::new();
        fallback.set_variable("B", "2");

        let layered = Layered::new(&primary, &fallback);
        assert_eq!(layered.environment_substitute("${A}${B}${C}"), "12${C}");
    }
}
