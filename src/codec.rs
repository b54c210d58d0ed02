//! The external module reader/writer seam.

use std::path::Path;

use crate::{metadata::module::Module, Result};

/// Parses and serializes the on-disk binary format into the in-memory metadata graph.
///
/// The patch engine treats the codec as a given capability: it never inspects artifact
/// bytes itself. The apply session reads the module graph from the backup artifact
/// through this trait and writes the patched graph back over the live artifact.
///
/// Implementations must satisfy two properties the backup/apply protocol relies on:
///
/// - `read_module` is a pure function of the file contents at `path`, and the returned
///   module's [`Module::path`] names the path it was read from;
/// - `write_module` is deterministic: serializing the same graph twice produces
///   byte-identical output.
pub trait ModuleCodec {
    /// Reads the module graph from the artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] for I/O failures and
    /// [`crate::Error::Malformed`] when the artifact does not parse.
    fn read_module(&self, path: &Path) -> Result<Module>;

    /// Serializes `module` over the artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] for I/O failures.
    fn write_module(&self, module: &Module, path: &Path) -> Result<()>;
}
