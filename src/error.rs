use std::path::PathBuf;

use thiserror::Error;

use crate::{compiler::Diagnostic, metadata::instruction::InstructionId};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Each variant corresponds to one failure mode of the patch pipeline: locating methods,
/// editing instruction streams, compiling snippets, relocating symbols and applying the
/// resulting module back to disk. Every error carries enough context (module path, member
/// full name, failing index) to be actionable without re-running the pipeline.
///
/// # Error Categories
///
/// ## Stream Editing Errors
/// - [`Error::NotFound`] - An anchor instruction or named member was absent where presence was assumed
/// - [`Error::OutOfRange`] - Index-based stream access beyond bounds
/// - [`Error::DanglingBranch`] - A branch operand references an instruction that is no longer live
///
/// ## Splice and Relocation Errors
/// - [`Error::UnresolvedSymbol`] - A foreign member reference has no structural match in the target module
/// - [`Error::CompileFailed`] - The external compiler returned diagnostics instead of a module
/// - [`Error::NoMatch`] - A predicate pair matched zero methods where at least one was required
///
/// ## Structural and I/O Errors
/// - [`Error::Malformed`] - A compiled or supplied artifact violates a structural assumption
/// - [`Error::FileError`] - Filesystem I/O errors during backup or artifact access
#[derive(Error, Debug)]
pub enum Error {
    /// A requested instruction, member or type was absent where presence was assumed.
    ///
    /// Raised when an insert anchor is not live in the edited stream, when a matched
    /// method carries no body, or when a by-name lookup that must succeed comes up empty.
    /// The message names the missing element.
    #[error("not found - {0}")]
    NotFound(String),

    /// An index-based stream access was beyond the stream bounds.
    ///
    /// Carries the offending index and the stream length at the time of the access.
    #[error("index {index} is out of range for an instruction stream of length {len}")]
    OutOfRange {
        /// The index that was requested
        index: usize,
        /// The stream length at the time of the access
        len: usize,
    },

    /// A foreign member reference could not be mapped into the target module.
    ///
    /// The relocator performs exact full-name structural matching; any miss fails the
    /// enclosing splice atomically. The target method is left untouched when this is
    /// returned.
    #[error("unresolved symbol '{member}' in module '{}'", .module.display())]
    UnresolvedSymbol {
        /// Full name of the member reference that failed to resolve
        member: String,
        /// Path of the module the reference was resolved against
        module: PathBuf,
    },

    /// The external compiler returned diagnostics instead of a module.
    ///
    /// The diagnostics are carried verbatim, never summarized. Display output lists
    /// every diagnostic on its own line.
    #[error("snippet compilation failed:\n{}", format_diagnostics(.0))]
    CompileFailed(Vec<Diagnostic>),

    /// A predicate pair matched zero methods where the caller required at least one.
    ///
    /// Zero matches is not an error for the locator itself; this variant exists for
    /// callers that expect a patch target to be present.
    #[error("no method matched the predicate pair in module '{}'", .module.display())]
    NoMatch {
        /// Path of the module that was searched
        module: PathBuf,
    },

    /// A branch operand references an instruction that is not live in its stream.
    ///
    /// Detected at write time; a dangling branch target is a structural error in the
    /// edited module, not a recoverable condition.
    #[error("branch target {0} does not reference a live instruction in its stream")]
    DanglingBranch(InstructionId),

    /// A compiled or supplied artifact violates a structural assumption.
    ///
    /// The error includes the source location where the malformation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur during backup creation and artifact
    /// reads and writes.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}

fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Severity;

    #[test]
    fn test_compile_failed_lists_every_diagnostic() {
        let err = Error::CompileFailed(vec![
            Diagnostic::new(Severity::Error, "CS0103: The name 'x' does not exist"),
            Diagnostic::new(Severity::Warning, "CS0219: Variable assigned but never used"),
        ]);

        let rendered = err.to_string();
        assert!(rendered.contains("CS0103"), "first diagnostic must survive verbatim");
        assert!(rendered.contains("CS0219"), "second diagnostic must survive verbatim");
    }

    #[test]
    fn test_malformed_macro_captures_location() {
        let err: Error = malformed_error!("unexpected {} in stream", "ret");
        match err {
            Error::Malformed { message, file, .. } => {
                assert_eq!(message, "unexpected ret in stream");
                assert!(file.ends_with("error.rs"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_display() {
        let err = Error::OutOfRange { index: 9, len: 3 };
        assert_eq!(
            err.to_string(),
            "index 9 is out of range for an instruction stream of length 3"
        );
    }
}
