//! Snippet compilation: the external compiler seam and the bridge around it.
//!
//! The engine does not compile source text itself. It wraps a caller-supplied source
//! snippet into a minimal synthetic compilation unit ([`codegen`]), hands that unit to
//! an external [`SnippetCompiler`] together with the target module's reference closure,
//! and extracts the synthetic method's instruction stream from the transient module the
//! compiler returns ([`bridge`]). Compiler diagnostics are surfaced verbatim, never
//! summarized or autocorrected.

pub mod bridge;
pub mod codegen;

use std::{fmt, path::PathBuf};

use crate::metadata::module::Module;

/// Severity of one compiler diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// The diagnostic prevented a module from being produced
    Error,
    /// The diagnostic did not prevent compilation
    Warning,
}

/// One diagnostic reported by the external compiler.
///
/// Carried verbatim through [`crate::Error::CompileFailed`]; the engine never rewrites
/// or filters diagnostic text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic severity
    pub severity: Severity,
    /// Compiler message, verbatim
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// The external source compiler.
///
/// Turns a source-text compilation unit plus a set of reference module paths into an
/// in-memory compiled [`Module`], or a list of diagnostics on failure. The returned
/// module exposes the same read interface as a module loaded from disk; it is
/// transient and lives only until the synthetic method's instructions are extracted
/// and relocated.
pub trait SnippetCompiler {
    /// Compiles `source` against the given reference module paths.
    ///
    /// # Errors
    ///
    /// Returns every diagnostic the compiler produced when no module could be emitted.
    fn compile(
        &self,
        source: &str,
        references: &[PathBuf],
    ) -> std::result::Result<Module, Vec<Diagnostic>>;
}
