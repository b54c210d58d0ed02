//! Field, property and event definitions plus cross-module member references.
//!
//! Full names follow the Cecil convention used throughout the on-disk format:
//! `MemberType Declaring::name` for fields and events, `MemberType Declaring::Name()`
//! for properties, where `Declaring` is the declaring type's full name with `/` as the
//! nesting separator. Full names are computed when a member is attached to its declaring
//! type and are the sole matching key of the symbol relocator.

use std::path::PathBuf;

use crate::metadata::{attributes::FieldAttributes, typedef::TypeName};

/// The kind of definition a [`MemberRef`] points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    /// A field definition
    Field,
    /// A method definition
    Method,
    /// A property definition
    Property,
    /// An event definition
    Event,
    /// A type definition
    Type,
}

/// A field owned by one type definition.
#[derive(Clone, Debug)]
pub struct FieldDef {
    /// Simple field name
    pub name: String,
    /// Type of the stored value
    pub field_type: TypeName,
    /// Visibility and binding flags
    pub attributes: FieldAttributes,
    full_name: String,
}

impl FieldDef {
    /// Creates a detached field definition; the full name is computed on attach.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: TypeName) -> Self {
        FieldDef {
            name: name.into(),
            field_type,
            attributes: FieldAttributes::default(),
            full_name: String::new(),
        }
    }

    /// Creates a detached field definition with explicit attributes
    #[must_use]
    pub fn with_attributes(
        name: impl Into<String>,
        field_type: TypeName,
        attributes: FieldAttributes,
    ) -> Self {
        let mut field = FieldDef::new(name, field_type);
        field.attributes = attributes;
        field
    }

    /// Canonical full name, empty until the field is attached to a type
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Builds a [`MemberRef`] pointing at this field as defined in `origin`
    #[must_use]
    pub fn as_member_ref(&self, declaring_type: &str, origin: &std::path::Path) -> MemberRef {
        MemberRef {
            kind: MemberKind::Field,
            declaring_type: declaring_type.to_string(),
            name: self.name.clone(),
            full_name: self.full_name.clone(),
            origin: origin.to_path_buf(),
        }
    }

    pub(crate) fn attach(&mut self, declaring: &str) {
        self.full_name = format!("{} {}::{}", self.field_type.render(), declaring, self.name);
    }
}

/// A property owned by one type definition.
#[derive(Clone, Debug)]
pub struct PropertyDef {
    /// Simple property name
    pub name: String,
    /// Type of the property value
    pub property_type: TypeName,
    full_name: String,
}

impl PropertyDef {
    /// Creates a detached property definition
    #[must_use]
    pub fn new(name: impl Into<String>, property_type: TypeName) -> Self {
        PropertyDef {
            name: name.into(),
            property_type,
            full_name: String::new(),
        }
    }

    /// Canonical full name, empty until the property is attached to a type
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub(crate) fn attach(&mut self, declaring: &str) {
        self.full_name = format!(
            "{} {}::{}()",
            self.property_type.render(),
            declaring,
            self.name
        );
    }
}

/// An event owned by one type definition.
#[derive(Clone, Debug)]
pub struct EventDef {
    /// Simple event name
    pub name: String,
    /// Handler type of the event
    pub event_type: TypeName,
    full_name: String,
}

impl EventDef {
    /// Creates a detached event definition
    #[must_use]
    pub fn new(name: impl Into<String>, event_type: TypeName) -> Self {
        EventDef {
            name: name.into(),
            event_type,
            full_name: String::new(),
        }
    }

    /// Canonical full name, empty until the event is attached to a type
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub(crate) fn attach(&mut self, declaring: &str) {
        self.full_name = format!("{} {}::{}", self.event_type.render(), declaring, self.name);
    }
}

/// A reference to a member that may live outside the owning module.
///
/// A reference is a `(declaring type full name, member full name)` pair plus the path
/// of the module it was minted in. It must be resolved to a local definition by the
/// relocator before the containing instruction is valid in a destination module; until
/// then `origin` still names the (possibly transient) source module.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberRef {
    /// What kind of definition this reference points at
    pub kind: MemberKind,
    /// Full name of the declaring type, `/`-separated for nesting
    pub declaring_type: String,
    /// Simple member name
    pub name: String,
    /// Canonical full name used for structural matching
    pub full_name: String,
    /// Path of the module this reference was minted in
    pub origin: PathBuf,
}

impl MemberRef {
    /// Creates a reference of arbitrary kind from already-canonical names
    #[must_use]
    pub fn new(
        kind: MemberKind,
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        full_name: impl Into<String>,
        origin: impl Into<PathBuf>,
    ) -> Self {
        MemberRef {
            kind,
            declaring_type: declaring_type.into(),
            name: name.into(),
            full_name: full_name.into(),
            origin: origin.into(),
        }
    }

    /// Creates a reference to a type definition; declaring type and full name coincide
    #[must_use]
    pub fn to_type(full_name: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        let full_name = full_name.into();
        MemberRef {
            kind: MemberKind::Type,
            declaring_type: full_name.clone(),
            name: full_name
                .rsplit(['/', '.'])
                .next()
                .unwrap_or_default()
                .to_string(),
            full_name,
            origin: origin.into(),
        }
    }
}
