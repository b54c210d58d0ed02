//! Attribute flag words for types, methods and fields.
//!
//! These are reduced projections of the ECMA-335 attribute words: only the bits the
//! patch engine actually consults survive (visibility, `static`, abstract/sealed for
//! types). Predicates match on them and the snippet code generator consults them when
//! emitting modifiers for the synthetic compilation unit.

use bitflags::bitflags;

bitflags! {
    /// Visibility and layout flags of a type definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TypeAttributes: u32 {
        /// The type is visible outside its module.
        const PUBLIC = 0x0001;
        /// The type cannot be instantiated directly.
        const ABSTRACT = 0x0002;
        /// The type cannot be derived from.
        const SEALED = 0x0004;
        /// The type is an interface.
        const INTERFACE = 0x0008;
    }
}

bitflags! {
    /// Visibility and binding flags of a method definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MethodAttributes: u32 {
        /// The method is visible outside its declaring type.
        const PUBLIC = 0x0001;
        /// The method is only visible inside its declaring type.
        const PRIVATE = 0x0002;
        /// The method has no `this` receiver.
        const STATIC = 0x0004;
        /// The method participates in virtual dispatch.
        const VIRTUAL = 0x0008;
    }
}

bitflags! {
    /// Visibility and binding flags of a field definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldAttributes: u32 {
        /// The field is visible outside its declaring type.
        const PUBLIC = 0x0001;
        /// The field is only visible inside its declaring type.
        const PRIVATE = 0x0002;
        /// The field is visible inside its module only.
        const INTERNAL = 0x0004;
        /// The field is shared across all instances.
        const STATIC = 0x0008;
    }
}
