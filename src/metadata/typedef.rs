//! Type names and type definitions.
//!
//! Full names are namespace-qualified with `.` and use `/` as the nesting separator
//! (`Ns.Outer/Inner`), matching the canonical form of the on-disk metadata. A type
//! definition owns its fields, properties, events, methods and nested types; member
//! full names are recomputed whenever the type is attached to a new parent, so a
//! fully built type tree can be grafted onto a module or another type in one call.

use crate::metadata::{
    attributes::TypeAttributes,
    member::{EventDef, FieldDef, PropertyDef},
    method::MethodDef,
};

/// A namespace-qualified type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeName {
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Simple type name
    pub name: String,
}

impl TypeName {
    /// Creates a namespace-qualified name
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeName {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Creates a name in the global namespace
    #[must_use]
    pub fn global(name: impl Into<String>) -> Self {
        TypeName::new("", name)
    }

    /// Renders as `Namespace.Name`, or the bare name for the global namespace
    #[must_use]
    pub fn render(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns true for the `void` return type in either spelling
    #[must_use]
    pub fn is_void(&self) -> bool {
        (self.namespace == "System" && self.name == "Void")
            || (self.namespace.is_empty() && self.name == "void")
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// A type definition owned by one module or one enclosing type.
#[derive(Clone, Debug)]
pub struct TypeDef {
    /// Namespace, empty for the global namespace and for nested types
    pub namespace: String,
    /// Simple type name
    pub name: String,
    /// Visibility and layout flags
    pub attributes: TypeAttributes,
    full_name: String,
    fields: Vec<FieldDef>,
    properties: Vec<PropertyDef>,
    events: Vec<EventDef>,
    methods: Vec<MethodDef>,
    nested: Vec<TypeDef>,
}

impl TypeDef {
    /// Creates an empty top-level type definition
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        let full_name = if namespace.is_empty() {
            name.clone()
        } else {
            format!("{namespace}.{name}")
        };
        TypeDef {
            namespace,
            name,
            attributes: TypeAttributes::PUBLIC,
            full_name,
            fields: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Canonical full name, e.g. `Ns.Outer` or `Ns.Outer/Inner`
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Adds a field, computing its full name
    pub fn add_field(&mut self, mut field: FieldDef) {
        field.attach(&self.full_name);
        self.fields.push(field);
    }

    /// Adds a property, computing its full name
    pub fn add_property(&mut self, mut property: PropertyDef) {
        property.attach(&self.full_name);
        self.properties.push(property);
    }

    /// Adds an event, computing its full name
    pub fn add_event(&mut self, mut event: EventDef) {
        event.attach(&self.full_name);
        self.events.push(event);
    }

    /// Adds a method, computing its signature string
    pub fn add_method(&mut self, mut method: MethodDef) {
        method.attach(&self.full_name);
        self.methods.push(method);
    }

    /// Adds a nested type; the child's full name and every full name beneath it are
    /// recomputed against this type's path.
    pub fn add_nested(&mut self, mut nested: TypeDef) {
        nested.full_name = format!("{}/{}", self.full_name, nested.name);
        nested.refresh_full_names();
        self.nested.push(nested);
    }

    /// Fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Properties in declaration order
    #[must_use]
    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    /// Events in declaration order
    #[must_use]
    pub fn events(&self) -> &[EventDef] {
        &self.events
    }

    /// Methods in declaration order
    #[must_use]
    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    /// Nested types in declaration order
    #[must_use]
    pub fn nested(&self) -> &[TypeDef] {
        &self.nested
    }

    /// First nested type with the given simple name
    #[must_use]
    pub fn nested_type(&self, name: &str) -> Option<&TypeDef> {
        self.nested.iter().find(|t| t.name == name)
    }

    /// First field with the given simple name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First property with the given simple name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// First event with the given simple name
    #[must_use]
    pub fn event(&self, name: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.name == name)
    }

    /// First method with the given simple name
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// First field whose canonical full name matches exactly
    #[must_use]
    pub fn field_by_full_name(&self, full_name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.full_name() == full_name)
    }

    /// First property whose canonical full name matches exactly
    #[must_use]
    pub fn property_by_full_name(&self, full_name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.full_name() == full_name)
    }

    /// First event whose canonical full name matches exactly
    #[must_use]
    pub fn event_by_full_name(&self, full_name: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.full_name() == full_name)
    }

    /// First method whose canonical signature string matches exactly
    #[must_use]
    pub fn method_by_full_name(&self, full_name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.full_name() == full_name)
    }

    pub(crate) fn method_mut(&mut self, index: usize) -> &mut MethodDef {
        &mut self.methods[index]
    }

    pub(crate) fn method_index_by_full_name(&self, full_name: &str) -> Option<usize> {
        self.methods.iter().position(|m| m.full_name() == full_name)
    }

    fn refresh_full_names(&mut self) {
        let path = self.full_name.clone();
        for field in &mut self.fields {
            field.attach(&path);
        }
        for property in &mut self.properties {
            property.attach(&path);
        }
        for event in &mut self.events {
            event.attach(&path);
        }
        for method in &mut self.methods {
            method.attach(&path);
        }
        for child in &mut self.nested {
            child.full_name = format!("{path}/{}", child.name);
            child.refresh_full_names();
        }
    }
}
