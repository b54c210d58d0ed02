//! Shared factories for unit tests.
//!
//! Builders for the small module shapes the engine tests keep reaching for, plus a
//! scripted [`SnippetCompiler`] implementation. Everything here is `pub(crate)` and
//! compiled only under `cfg(test)`.

use std::{
    cell::RefCell,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    compiler::{Diagnostic, SnippetCompiler},
    metadata::{
        attributes::MethodAttributes,
        instruction::{Instruction, InstructionStream, Operand},
        member::FieldDef,
        method::MethodDef,
        module::Module,
        typedef::{TypeDef, TypeName},
    },
    patcher::MethodContext,
};

/// `System.Int32`
pub(crate) fn int32() -> TypeName {
    TypeName::new("System", "Int32")
}

/// A fresh `ret` instruction
pub(crate) fn ret() -> Instruction {
    Instruction::new("ret", Operand::None)
}

/// A module holding one top-level type `Foo` with exactly two methods:
/// `System.Int32 Foo::Bar()` with body `[ldc.i4 1, ret]` and
/// `void Foo::Reset()` with body `[ret]`.
pub(crate) fn sample_module(path: impl Into<PathBuf>) -> Module {
    let mut foo = TypeDef::new("", "Foo");
    foo.add_method(
        MethodDef::new("Bar", int32(), Vec::new()).with_body(
            InstructionStream::from_instructions(vec![
                Instruction::new("ldc.i4", Operand::Int(1)),
                ret(),
            ]),
        ),
    );
    foo.add_method(
        MethodDef::new("Reset", TypeName::global("void"), Vec::new())
            .with_body(InstructionStream::from_instructions(vec![ret()])),
    );

    let mut module = Module::new(path);
    module.add_type(foo);
    module
}

/// A module holding `Outer` with nested `Inner` carrying the field
/// `System.Int32 Outer/Inner::f`.
pub(crate) fn nested_module(path: impl Into<PathBuf>) -> Module {
    let mut inner = TypeDef::new("", "Inner");
    inner.add_field(FieldDef::new("f", int32()));
    let mut outer = TypeDef::new("", "Outer");
    outer.add_nested(inner);

    let mut module = Module::new(path);
    module.add_type(outer);
    module
}

/// Context snapshot for `System.Int32 Foo::Bar()` of [`sample_module`]
pub(crate) fn sample_context() -> MethodContext {
    MethodContext {
        module_path: PathBuf::from("/tmp/game.dll"),
        type_namespace: String::new(),
        type_name: "Foo".to_string(),
        type_full_name: "Foo".to_string(),
        method_name: "Bar".to_string(),
        method_full_name: "System.Int32 Foo::Bar()".to_string(),
        attributes: MethodAttributes::PUBLIC,
        return_type: int32(),
        params: Vec::new(),
    }
}

static TEMP_DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Creates and returns a unique, empty directory under the system temp dir.
pub(crate) fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "cilpatch-test-{name}-{}-{}",
        std::process::id(),
        TEMP_DIR_SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&dir).expect("temp dir creation must succeed");
    dir
}

/// Scripted snippet compiler.
///
/// Returns a preloaded transient module (consumed by clone, so repeat compiles see the
/// same pristine shape) or a preloaded diagnostic set, and records the last source text
/// it was handed for assertion.
pub(crate) struct StubCompiler {
    module: Option<Module>,
    diagnostics: Vec<Diagnostic>,
    last_source: RefCell<String>,
}

impl StubCompiler {
    /// A compiler that always succeeds with a clone of `module`
    pub(crate) fn returning(module: Module) -> Self {
        StubCompiler {
            module: Some(module),
            diagnostics: Vec::new(),
            last_source: RefCell::new(String::new()),
        }
    }

    /// A compiler that always fails with `diagnostics`
    pub(crate) fn failing(diagnostics: Vec<Diagnostic>) -> Self {
        StubCompiler {
            module: None,
            diagnostics,
            last_source: RefCell::new(String::new()),
        }
    }

    /// The source text handed to the most recent `compile` call
    pub(crate) fn last_source(&self) -> String {
        self.last_source.borrow().clone()
    }
}

impl SnippetCompiler for StubCompiler {
    fn compile(
        &self,
        source: &str,
        _references: &[PathBuf],
    ) -> std::result::Result<Module, Vec<Diagnostic>> {
        *self.last_source.borrow_mut() = source.to_string();
        match &self.module {
            Some(module) => Ok(module.clone()),
            None => Err(self.diagnostics.clone()),
        }
    }
}
