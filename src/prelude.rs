//! # cilpatch Prelude
//!
//! Convenient re-exports of the types and functions most patch code touches. Import
//! this module to write locate-edit-splice pipelines without spelling out the full
//! module paths.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilpatch operations
pub use crate::Error;

/// The result type used throughout cilpatch
pub use crate::Result;

// ================================================================================================
// Metadata Model
// ================================================================================================

/// The top-level module container
pub use crate::metadata::module::Module;

/// Instructions, identities, operands and per-method streams
pub use crate::metadata::instruction::{Instruction, InstructionId, InstructionStream, Operand};

/// Member references and member definitions
pub use crate::metadata::member::{EventDef, FieldDef, MemberKind, MemberRef, PropertyDef};

/// Method definitions and parameters
pub use crate::metadata::method::{MethodDef, Param};

/// Type names and type definitions
pub use crate::metadata::typedef::{TypeDef, TypeName};

/// Attribute flag sets
pub use crate::metadata::attributes::{FieldAttributes, MethodAttributes, TypeAttributes};

// ================================================================================================
// Patch Engine
// ================================================================================================

/// The locate-and-edit drivers and the stream editor
pub use crate::patcher::{locate, patch, patch_required, IlEditor, Locate, MethodContext};

/// Cross-module symbol relocation
pub use crate::patcher::relocate::{relocate, resolve, ResolvedMember};

/// Splice strategies over compiled snippets
pub use crate::patcher::splice::{
    inject_prefix, prefix_method, replace_body, replace_method,
};

// ================================================================================================
// Compiler Seam
// ================================================================================================

/// The external snippet compiler seam and its diagnostics
pub use crate::compiler::{Diagnostic, Severity, SnippetCompiler};

/// Reference-closure and snippet compilation helpers
pub use crate::compiler::bridge::{compile_snippet, reference_closure};

// ================================================================================================
// Sessions
// ================================================================================================

/// The on-disk module codec seam
pub use crate::codec::ModuleCodec;

/// Patch trait, registry and the backup-protocol session driver
pub use crate::apply::{
    apply_from_registry, apply_patches, backup_path, ApplyReport, Patch, PatchOutcome,
    PatchRegistry,
};
