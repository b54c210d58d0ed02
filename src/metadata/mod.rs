//! The in-memory metadata graph the patch engine operates on.
//!
//! A [`module::Module`] owns top-level [`typedef::TypeDef`]s in declaration order;
//! each type owns its fields, properties, events, methods and nested types; each
//! [`method::MethodDef`] owns at most one [`instruction::InstructionStream`]. The
//! graph is constructed by the external module codec (or, for transient modules, by
//! the external snippet compiler) and mutated in memory through the editing layer in
//! [`crate::patcher`].
//!
//! Canonical full-name strings are the addressing scheme throughout: `.` separates
//! namespaces, `/` separates nesting levels, and member full names follow the
//! `MemberType Declaring::name` shape. These strings are the exact-match keys of the
//! symbol relocator.

pub mod attributes;
pub mod instruction;
pub mod member;
pub mod method;
pub mod module;
pub mod typedef;
