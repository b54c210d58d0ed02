//! Invokes the external compiler and extracts the synthetic method's body.

use std::path::PathBuf;

use crate::{
    compiler::{codegen, SnippetCompiler},
    metadata::{instruction::InstructionStream, module::Module},
    patcher::MethodContext,
    Result,
};

/// Computes the reference set for compiling a snippet against `module`.
///
/// The closure is the target module itself plus every module reference that resolves
/// to an existing `<name>.dll` sibling of the target artifact. References that do not
/// resolve on disk are skipped silently; the external compiler will report anything
/// the snippet actually needed.
#[must_use]
pub fn reference_closure(module: &Module) -> Vec<PathBuf> {
    let mut references = vec![module.path.clone()];
    if let Some(directory) = module.directory() {
        for name in &module.references {
            let candidate = directory.join(format!("{name}.dll"));
            if candidate.exists() {
                references.push(candidate);
            }
        }
    }
    references
}

/// Compiles `body` inside a synthetic unit matching `ctx` and returns the resulting
/// instruction stream.
///
/// The stream is extracted from the transient module by exact full-name match against
/// the synthetic declaration and is *not yet relocated*; relocation into the target
/// module is the splice strategy's responsibility. The transient module is discarded
/// on return.
///
/// # Errors
///
/// - [`crate::Error::CompileFailed`] with the compiler's diagnostics, verbatim
/// - [`crate::Error::Malformed`] when the transient module lacks the synthetic type
///   or method, or the synthetic method has no body
pub fn compile_snippet(
    compiler: &dyn SnippetCompiler,
    module: &Module,
    ctx: &MethodContext,
    body: &str,
    extra_declarations: &[&str],
) -> Result<InstructionStream> {
    let source = codegen::patch_unit_source(ctx, body, extra_declarations);
    let references = reference_closure(module);

    let mut transient = compiler
        .compile(&source, &references)
        .map_err(crate::Error::CompileFailed)?;

    extract_synthetic_body(&mut transient, ctx)
}

fn extract_synthetic_body(transient: &mut Module, ctx: &MethodContext) -> Result<InstructionStream> {
    let type_full_name = ctx.synthetic_type_full_name();
    let method_full_name = ctx.synthetic_method_full_name();

    let type_index = transient
        .type_index_by_full_name(&type_full_name)
        .ok_or_else(|| {
            malformed_error!(
                "transient module is missing synthetic type '{}'",
                type_full_name
            )
        })?;
    let method_index = transient.types()[type_index]
        .method_index_by_full_name(&method_full_name)
        .ok_or_else(|| {
            malformed_error!(
                "transient module is missing synthetic method '{}'",
                method_full_name
            )
        })?;

    transient
        .type_mut(type_index)
        .method_mut(method_index)
        .body
        .take()
        .ok_or_else(|| {
            malformed_error!("synthetic method '{}' has no body", method_full_name)
        })
}
