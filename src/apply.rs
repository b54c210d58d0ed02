//! The apply session: backup protocol, patch registry and per-patch reporting.
//!
//! A session always reads the pristine module image from the `.bak` sibling of the
//! target artifact and writes the patched image over the live artifact. The backup is
//! created exactly once, on the first session that touches an artifact; every later
//! session starts from the same pristine bytes, so re-running the same patch set is
//! idempotent and patches never stack on their own output. Patches run independently:
//! one failing patch is recorded in the report and the rest still run.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    codec::ModuleCodec, compiler::SnippetCompiler, metadata::module::Module, Error, Result,
};

/// One self-contained modification of a module.
///
/// Implementations locate their targets themselves, usually through
/// [`crate::patcher::patch`], and go through the snippet compiler for any code they
/// splice in. The id is stable and unique within a registry; it names the patch in
/// reports.
pub trait Patch {
    /// Stable identifier of this patch
    fn id(&self) -> &str;

    /// Applies this patch to `module`.
    ///
    /// # Errors
    ///
    /// Any engine error; the session records it and continues with the next patch.
    fn apply(&self, module: &mut Module, compiler: &dyn SnippetCompiler) -> Result<()>;
}

type PatchFactory = fn() -> Box<dyn Patch>;

/// Static registry of known patches, keyed by id.
///
/// Registration is explicit; there is no runtime discovery. Ids iterate in sorted
/// order, which fixes the application order of [`create_all`](Self::create_all).
#[derive(Default)]
pub struct PatchRegistry {
    factories: BTreeMap<String, PatchFactory>,
}

impl PatchRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        PatchRegistry::default()
    }

    /// Registers a patch factory under `id`, replacing any previous registration
    pub fn register(&mut self, id: impl Into<String>, factory: PatchFactory) {
        self.factories.insert(id.into(), factory);
    }

    /// Instantiates the patch registered under `id`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::NotFound`] when no patch is registered under `id`.
    pub fn create(&self, id: &str) -> Result<Box<dyn Patch>> {
        self.factories
            .get(id)
            .map(|factory| factory())
            .ok_or_else(|| Error::NotFound(format!("no patch registered under id '{id}'")))
    }

    /// Instantiates every registered patch, in id order
    #[must_use]
    pub fn create_all(&self) -> Vec<Box<dyn Patch>> {
        self.factories.values().map(|factory| factory()).collect()
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

/// The `.bak` sibling holding an artifact's pristine bytes.
///
/// The suffix is appended to the full file name, so `game.dll` backs up as
/// `game.dll.bak`.
#[must_use]
pub fn backup_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Result of one patch within a session.
#[derive(Debug)]
pub struct PatchOutcome {
    /// Id of the patch that ran
    pub id: String,
    /// What the patch returned
    pub result: Result<()>,
}

/// Everything one apply session did.
#[derive(Debug)]
pub struct ApplyReport {
    /// The live artifact that was written
    pub artifact: PathBuf,
    /// The pristine backup the session read from
    pub backup: PathBuf,
    /// Per-patch results, in application order
    pub outcomes: Vec<PatchOutcome>,
}

impl ApplyReport {
    /// Returns true when every patch of the session succeeded
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Runs `patches` against `artifact` under the backup protocol.
///
/// Creates `<artifact>.bak` from the live artifact if it does not exist yet, reads the
/// module from the backup, runs every patch in order (the module's path is rewritten to
/// the live artifact first, so reference resolution works against the real directory),
/// validates the branch invariant and writes the patched module over the live
/// artifact. Patch failures land in the report; only session-level failures abort.
///
/// # Errors
///
/// - [`crate::Error::FileError`] when the backup cannot be created or read
/// - [`crate::Error::DanglingBranch`] when an edited body holds a dead branch target;
///   nothing is written in that case
/// - any codec error from reading or writing the module
pub fn apply_patches(
    codec: &dyn ModuleCodec,
    compiler: &dyn SnippetCompiler,
    artifact: &Path,
    patches: &[Box<dyn Patch>],
) -> Result<ApplyReport> {
    let backup = backup_path(artifact);
    if !backup.exists() {
        std::fs::copy(artifact, &backup)?;
    }

    let mut module = codec.read_module(&backup)?;
    module.path = artifact.to_path_buf();

    let mut outcomes = Vec::with_capacity(patches.len());
    for patch in patches {
        let result = patch.apply(&mut module, compiler);
        outcomes.push(PatchOutcome {
            id: patch.id().to_string(),
            result,
        });
    }

    module.validate_branches()?;
    codec.write_module(&module, artifact)?;

    Ok(ApplyReport {
        artifact: artifact.to_path_buf(),
        backup,
        outcomes,
    })
}

/// Instantiates the named patches from `registry` and runs [`apply_patches`].
///
/// # Errors
///
/// [`crate::Error::NotFound`] for an unknown id, before anything is touched on disk;
/// otherwise as [`apply_patches`].
pub fn apply_from_registry(
    codec: &dyn ModuleCodec,
    compiler: &dyn SnippetCompiler,
    artifact: &Path,
    registry: &PatchRegistry,
    ids: &[&str],
) -> Result<ApplyReport> {
    let mut patches = Vec::with_capacity(ids.len());
    for id in ids {
        patches.push(registry.create(id)?);
    }
    apply_patches(codec, compiler, artifact, &patches)
}
