//! The patch engine: locating methods, editing their streams, splicing compiled code.
//!
//! Control flow mirrors the apply pipeline: [`locate`] (or the mutable driver
//! [`patch`]) finds target methods by a `(type predicate, method predicate)` pair; the
//! caller's edit closure operates on an [`IlEditor`] over the detached body, either
//! editing instructions directly or going through the snippet compiler bridge plus a
//! splice strategy in [`splice`]; [`relocate`] fixes up cross-module operands before
//! anything spliced lands in the target stream.

mod editor;
mod locator;
pub mod relocate;
pub mod splice;

pub use editor::IlEditor;
pub use locator::{locate, Locate};

use std::path::PathBuf;

use crate::{
    metadata::{
        attributes::MethodAttributes,
        method::{MethodDef, Param},
        module::Module,
        typedef::{TypeDef, TypeName},
    },
    Error, Result,
};

/// Owned snapshot of one target method's signature and surroundings.
///
/// Captured before the method's body is detached for editing, so edit closures can
/// consult the signature (and the compiler bridge can generate a matching synthetic
/// unit) without holding a borrow into the module graph.
#[derive(Clone, Debug)]
pub struct MethodContext {
    /// Path of the module the method lives in
    pub module_path: PathBuf,
    /// Namespace of the declaring type, empty for the global namespace
    pub type_namespace: String,
    /// Simple name of the declaring type
    pub type_name: String,
    /// Full name of the declaring type, `/`-separated for nesting
    pub type_full_name: String,
    /// Simple method name
    pub method_name: String,
    /// Canonical signature string of the method
    pub method_full_name: String,
    /// The method's attribute flags
    pub attributes: MethodAttributes,
    /// Declared return type
    pub return_type: TypeName,
    /// Formal parameters in declaration order
    pub params: Vec<Param>,
}

impl MethodContext {
    /// Returns true when the target method returns `void`
    #[must_use]
    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }

    /// Returns true when the target method is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.attributes.contains(MethodAttributes::STATIC)
    }

    /// Full name the synthetic type declaration will carry.
    ///
    /// The synthetic unit always declares a top-level type, so for a nested target
    /// this differs from [`MethodContext::type_full_name`]: the nesting path is
    /// dropped and only namespace and simple name survive.
    #[must_use]
    pub fn synthetic_type_full_name(&self) -> String {
        if self.type_namespace.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}.{}", self.type_namespace, self.type_name)
        }
    }

    /// Signature string the synthetic method declaration will carry
    #[must_use]
    pub fn synthetic_method_full_name(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| p.param_type.render())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{} {}::{}({})",
            self.return_type.render(),
            self.synthetic_type_full_name(),
            self.method_name,
            params
        )
    }

    fn capture(module: &Module, type_def: &TypeDef, method: &MethodDef) -> Self {
        MethodContext {
            module_path: module.path.clone(),
            type_namespace: type_def.namespace.clone(),
            type_name: type_def.name.clone(),
            type_full_name: type_def.full_name().to_string(),
            method_name: method.name.clone(),
            method_full_name: method.full_name().to_string(),
            attributes: method.attributes,
            return_type: method.return_type.clone(),
            params: method.params.clone(),
        }
    }
}

/// Applies `edit` to every method matching the predicate pair, returning the number
/// of methods edited.
///
/// Traversal covers the module's top-level types in declaration order and each type's
/// methods in declaration order; nested types are not expanded. For every match the
/// method's body is detached, the closure runs against `(&Module, &MethodContext,
/// &mut IlEditor)`, and the body is reinstalled afterwards whether the closure
/// succeeded or not, so a failing edit never leaves a method bodiless.
///
/// Zero matches is `Ok(0)`; use [`patch_required`] when at least one target is
/// expected.
///
/// # Errors
///
/// - [`crate::Error::NotFound`] when a matched method has no body
/// - the closure's error, aborting the remaining matches of this call
pub fn patch<TP, MP, F>(module: &mut Module, type_pred: TP, method_pred: MP, mut edit: F) -> Result<usize>
where
    TP: Fn(&TypeDef) -> bool,
    MP: Fn(&MethodDef) -> bool,
    F: FnMut(&Module, &MethodContext, &mut IlEditor) -> Result<()>,
{
    let mut targets = Vec::new();
    for (type_index, type_def) in module.types().iter().enumerate() {
        if !type_pred(type_def) {
            continue;
        }
        for (method_index, method) in type_def.methods().iter().enumerate() {
            if method_pred(method) {
                targets.push((type_index, method_index));
            }
        }
    }

    let mut edited = 0;
    for (type_index, method_index) in targets {
        let ctx = {
            let type_def = &module.types()[type_index];
            MethodContext::capture(module, type_def, &type_def.methods()[method_index])
        };

        let mut body = module
            .type_mut(type_index)
            .method_mut(method_index)
            .body
            .take()
            .ok_or_else(|| {
                Error::NotFound(format!("method '{}' has no body", ctx.method_full_name))
            })?;

        let result = {
            let mut editor = IlEditor::new(&mut body);
            edit(&*module, &ctx, &mut editor)
        };

        module.type_mut(type_index).method_mut(method_index).body = Some(body);
        result?;
        edited += 1;
    }

    Ok(edited)
}

/// Like [`patch`], but zero matches is an error.
///
/// # Errors
///
/// [`crate::Error::NoMatch`] carrying the module path when no method matched; otherwise
/// as [`patch`].
pub fn patch_required<TP, MP, F>(
    module: &mut Module,
    type_pred: TP,
    method_pred: MP,
    edit: F,
) -> Result<usize>
where
    TP: Fn(&TypeDef) -> bool,
    MP: Fn(&MethodDef) -> bool,
    F: FnMut(&Module, &MethodContext, &mut IlEditor) -> Result<()>,
{
    match patch(module, type_pred, method_pred, edit)? {
        0 => Err(Error::NoMatch {
            module: module.path.clone(),
        }),
        edited => Ok(edited),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::instruction::{Instruction, Operand},
        test::{ret, sample_module},
    };

    #[test]
    fn test_patch_edits_every_match() {
        let mut module = sample_module("/tmp/game.dll");
        let edited = patch(
            &mut module,
            |td| td.full_name() == "Foo",
            |_| true,
            |_, _, editor| {
                editor.clear();
                editor.append(ret());
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(edited, 2);
        for method in module.type_by_full_name("Foo").unwrap().methods() {
            assert_eq!(method.body.as_ref().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_patch_zero_matches_is_ok() {
        let mut module = sample_module("/tmp/game.dll");
        let edited = patch(&mut module, |_| false, |_| true, |_, _, _| Ok(())).unwrap();
        assert_eq!(edited, 0);
    }

    #[test]
    fn test_patch_required_zero_matches_is_no_match() {
        let mut module = sample_module("/tmp/game.dll");
        let err = patch_required(&mut module, |_| false, |_| true, |_, _, _| Ok(())).unwrap_err();
        assert!(matches!(err, Error::NoMatch { .. }));
    }

    #[test]
    fn test_failing_edit_reinstalls_the_body() {
        let mut module = sample_module("/tmp/game.dll");
        let original_len = module
            .type_by_full_name("Foo")
            .unwrap()
            .method("Bar")
            .unwrap()
            .body
            .as_ref()
            .unwrap()
            .len();

        let result = patch(
            &mut module,
            |td| td.full_name() == "Foo",
            |md| md.name == "Bar",
            |_, _, editor| {
                editor.append(Instruction::new("nop", Operand::None));
                Err(Error::NotFound("simulated".to_string()))
            },
        );

        assert!(result.is_err());
        let body = module
            .type_by_full_name("Foo")
            .unwrap()
            .method("Bar")
            .unwrap()
            .body
            .as_ref()
            .unwrap();
        // The closure's partial edit survives, but the stream is live again.
        assert_eq!(body.len(), original_len + 1);
    }

    #[test]
    fn test_context_snapshot_matches_the_target() {
        let mut module = sample_module("/tmp/game.dll");
        patch(
            &mut module,
            |td| td.full_name() == "Foo",
            |md| md.name == "Bar",
            |_, ctx, _| {
                assert_eq!(ctx.type_full_name, "Foo");
                assert_eq!(ctx.method_name, "Bar");
                assert_eq!(ctx.method_full_name, "System.Int32 Foo::Bar()");
                assert!(!ctx.returns_void());
                Ok(())
            },
        )
        .unwrap();
    }

    #[test]
    fn test_synthetic_names_drop_the_nesting_path() {
        let ctx = MethodContext {
            module_path: "/tmp/game.dll".into(),
            type_namespace: "Game".to_string(),
            type_name: "Inner".to_string(),
            type_full_name: "Game.Outer/Inner".to_string(),
            method_name: "Tick".to_string(),
            method_full_name: "System.Void Game.Outer/Inner::Tick()".to_string(),
            attributes: MethodAttributes::PUBLIC,
            return_type: TypeName::new("System", "Void"),
            params: Vec::new(),
        };
        assert_eq!(ctx.synthetic_type_full_name(), "Game.Inner");
        assert_eq!(
            ctx.synthetic_method_full_name(),
            "System.Void Game.Inner::Tick()"
        );
    }
}
