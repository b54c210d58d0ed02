//! The top-level module container.

use std::path::{Path, PathBuf};

use crate::{metadata::typedef::TypeDef, Result};

/// The top-level container of type definitions read from or written to one binary
/// artifact.
///
/// A module is identified by its file path and carries the simple names of the
/// external modules it references; those names drive the reference-closure resolution
/// of the snippet compiler bridge. Types are held in declaration order, which is the
/// traversal order guaranteed by the method locator.
#[derive(Clone, Debug)]
pub struct Module {
    /// Path of the artifact this module was read from
    pub path: PathBuf,
    /// Simple names of referenced external modules
    pub references: Vec<String>,
    types: Vec<TypeDef>,
}

impl Module {
    /// Creates an empty module identified by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Module {
            path: path.into(),
            references: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Adds a module reference by simple name, consuming and returning the module
    #[must_use]
    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.references.push(name.into());
        self
    }

    /// Adds a top-level type definition
    pub fn add_type(&mut self, type_def: TypeDef) {
        self.types.push(type_def);
    }

    /// Top-level types in declaration order
    #[must_use]
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    /// First top-level type whose full name matches exactly.
    ///
    /// Nested types are not searched; resolve the enclosing type first and descend
    /// through [`TypeDef::nested_type`].
    #[must_use]
    pub fn type_by_full_name(&self, full_name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.full_name() == full_name)
    }

    pub(crate) fn type_mut(&mut self, index: usize) -> &mut TypeDef {
        &mut self.types[index]
    }

    pub(crate) fn type_index_by_full_name(&self, full_name: &str) -> Option<usize> {
        self.types.iter().position(|t| t.full_name() == full_name)
    }

    /// Verifies the write-time branch invariant across every method body in the
    /// module, nested types included.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DanglingBranch`] for the first dead branch target found.
    pub fn validate_branches(&self) -> Result<()> {
        fn validate_type(type_def: &TypeDef) -> Result<()> {
            for method in type_def.methods() {
                if let Some(body) = &method.body {
                    body.validate_branches()?;
                }
            }
            for nested in type_def.nested() {
                validate_type(nested)?;
            }
            Ok(())
        }

        for type_def in &self.types {
            validate_type(type_def)?;
        }
        Ok(())
    }

    /// Directory containing this module's artifact, if the path has one
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.path.parent()
    }
}
