//! Synthetic compilation-unit generation.
//!
//! Builds the minimal compilable source text around a target method: one reference
//! import, one type declaration matching the target's declaring type name and
//! namespace, the caller's extra member declarations verbatim, one method declaration
//! matching the target's exact signature with the snippet body as its statement
//! sequence, and closing braces matching the opened scopes. The compiled result's
//! full names therefore line up with the target's, which is what lets the bridge find
//! the synthetic method again inside the transient module.

use std::fmt::Write;

use crate::patcher::MethodContext;

/// Renders the synthetic compilation unit for `ctx` with `body` as the method's
/// statement sequence.
///
/// `extra_declarations` are emitted verbatim inside the type body, each on its own
/// line, before the method declaration; an injected field lands here. The generator
/// emits `public` (and `static` when the target method is static) and
/// namespace-qualified return and parameter types; it performs no validation of the
/// snippet text itself, the external compiler owns that.
#[must_use]
pub fn patch_unit_source(ctx: &MethodContext, body: &str, extra_declarations: &[&str]) -> String {
    let mut source = String::new();

    source.push_str("using System;\n");
    if !ctx.type_namespace.is_empty() {
        let _ = writeln!(source, "namespace {} {{", ctx.type_namespace);
    }
    let _ = writeln!(source, "public class {} {{", ctx.type_name);

    for declaration in extra_declarations {
        source.push_str(declaration);
        source.push('\n');
    }

    source.push_str("public ");
    if ctx.is_static() {
        source.push_str("static ");
    }
    let _ = write!(source, "{} {} (", ctx.return_type.render(), ctx.method_name);
    for (index, param) in ctx.params.iter().enumerate() {
        if index > 0 {
            source.push_str(", ");
        }
        let _ = write!(source, "{} {}", param.param_type.render(), param.name);
    }
    source.push_str(") {\n");

    source.push_str(body);
    source.push('\n');

    source.push_str("}\n");
    source.push_str("}\n");
    if !ctx.type_namespace.is_empty() {
        source.push_str("}\n");
    }

    source
}
