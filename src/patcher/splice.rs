//! Splice strategies: full-body replace and prefix-inject.
//!
//! Both strategies consume a compiled instruction stream plus the target method's
//! editor, relocate every member-reference operand into the target module, and only
//! then touch the target stream. Relocation failure therefore leaves the target method
//! exactly as it was; there is no partial splice.

use crate::{
    compiler::{bridge, SnippetCompiler},
    metadata::{instruction::InstructionStream, module::Module},
    patcher::{relocate::relocate, IlEditor, MethodContext},
    Result,
};

/// Replaces the target method's entire body with the compiled stream.
///
/// Every instruction of `compiled` is relocated into `target_module` and copied into
/// the target stream in order; the previous body is discarded. Used when the injected
/// code is meant to be the whole method.
///
/// # Errors
///
/// [`crate::Error::UnresolvedSymbol`] when any operand fails relocation; the target
/// stream is unchanged in that case.
pub fn replace_body(
    editor: &mut IlEditor,
    target_module: &Module,
    compiled: InstructionStream,
) -> Result<()> {
    let relocated = relocate(target_module, compiled.into_instructions())?;

    editor.clear();
    for instruction in relocated {
        editor.append(instruction);
    }
    Ok(())
}

/// Inserts the compiled stream in front of the target method's existing body.
///
/// The compiled stream is the body of a synthetic method that necessarily ends in a
/// return sequence: a bare `ret` for `void` targets, a value-producing instruction
/// feeding a `ret` otherwise. Only that machinery is stripped (one trailing
/// instruction when `returns_void`, two otherwise), so the caller's injected
/// statements survive intact. The remainder is relocated and inserted, in order,
/// immediately before the target stream's first instruction; the original body then
/// executes unmodified. An empty target body degenerates to a plain append.
///
/// # Errors
///
/// - [`crate::Error::Malformed`] when the compiled stream is too short to strip its
///   return sequence
/// - [`crate::Error::UnresolvedSymbol`] when any operand fails relocation; the target
///   stream is unchanged in that case
pub fn inject_prefix(
    editor: &mut IlEditor,
    target_module: &Module,
    compiled: InstructionStream,
    returns_void: bool,
) -> Result<()> {
    let mut instructions = compiled.into_instructions();
    let strip = if returns_void { 1 } else { 2 };
    if instructions.len() < strip {
        return Err(malformed_error!(
            "compiled snippet of {} instruction(s) is too short to strip its return sequence of {}",
            instructions.len(),
            strip
        ));
    }
    instructions.truncate(instructions.len() - strip);

    let relocated = relocate(target_module, instructions)?;

    match editor.stream().first().map(|i| i.id()) {
        Some(anchor) => {
            for instruction in relocated {
                editor.insert_before(anchor, instruction)?;
            }
        }
        None => {
            for instruction in relocated {
                editor.append(instruction);
            }
        }
    }
    Ok(())
}

/// Compiles `code` as the target method's complete replacement body and splices it in.
///
/// Convenience composition of the compiler bridge and [`replace_body`].
///
/// # Errors
///
/// As [`bridge::compile_snippet`] and [`replace_body`].
pub fn replace_method(
    compiler: &dyn SnippetCompiler,
    target_module: &Module,
    ctx: &MethodContext,
    editor: &mut IlEditor,
    code: &str,
) -> Result<()> {
    let compiled = bridge::compile_snippet(compiler, target_module, ctx, code, &[])?;
    replace_body(editor, target_module, compiled)
}

/// Compiles `code` and injects it in front of the target method's body.
///
/// `extra_declarations` are emitted verbatim inside the synthetic type, letting the
/// snippet reference members (such as an injected field) that the declaring type does
/// not carry in source form. Convenience composition of the compiler bridge and
/// [`inject_prefix`].
///
/// # Errors
///
/// As [`bridge::compile_snippet`] and [`inject_prefix`].
pub fn prefix_method(
    compiler: &dyn SnippetCompiler,
    target_module: &Module,
    ctx: &MethodContext,
    editor: &mut IlEditor,
    code: &str,
    extra_declarations: &[&str],
) -> Result<()> {
    let compiled =
        bridge::compile_snippet(compiler, target_module, ctx, code, extra_declarations)?;
    inject_prefix(editor, target_module, compiled, ctx.returns_void())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            instruction::{Instruction, InstructionId, Operand},
            member::{MemberKind, MemberRef},
        },
        test::{nested_module, ret},
        Error,
    };

    fn resolvable() -> Operand {
        Operand::Member(MemberRef::new(
            MemberKind::Field,
            "Outer/Inner",
            "f",
            "System.Int32 Outer/Inner::f",
            "/tmp/transient.dll",
        ))
    }

    fn unresolvable() -> Operand {
        Operand::Member(MemberRef::new(
            MemberKind::Field,
            "Outer/Inner",
            "ghost",
            "System.Int32 Outer/Inner::ghost",
            "/tmp/transient.dll",
        ))
    }

    fn snapshot(editor: &IlEditor) -> Vec<(InstructionId, &'static str)> {
        editor.stream().iter().map(|i| (i.id(), i.mnemonic)).collect()
    }

    #[test]
    fn test_full_replace_swaps_the_entire_body() {
        let module = nested_module("/tmp/game.dll");
        let mut body = crate::metadata::instruction::InstructionStream::from_instructions(vec![
            Instruction::new("ldc.i4", Operand::Int(1)),
            ret(),
        ]);
        let mut editor = IlEditor::new(&mut body);

        let compiled = InstructionStream::from_instructions(vec![
            Instruction::new("ldfld", resolvable()),
            ret(),
        ]);
        replace_body(&mut editor, &module, compiled).unwrap();

        let mnemonics: Vec<_> = editor.stream().iter().map(|i| i.mnemonic).collect();
        assert_eq!(mnemonics, vec!["ldfld", "ret"]);
    }

    #[test]
    fn test_full_replace_is_atomic_on_unresolved_symbol() {
        let module = nested_module("/tmp/game.dll");
        let mut body = crate::metadata::instruction::InstructionStream::from_instructions(vec![
            Instruction::new("ldc.i4", Operand::Int(1)),
            ret(),
        ]);
        let mut editor = IlEditor::new(&mut body);
        let before = snapshot(&editor);

        let compiled = InstructionStream::from_instructions(vec![
            Instruction::new("ldfld", resolvable()),
            Instruction::new("ldfld", unresolvable()),
            ret(),
        ]);
        let err = replace_body(&mut editor, &module, compiled).unwrap_err();

        assert!(matches!(err, Error::UnresolvedSymbol { .. }));
        assert_eq!(snapshot(&editor), before, "target stream must be untouched");
    }

    #[test]
    fn test_prefix_inject_void_strips_only_the_return() {
        let module = nested_module("/tmp/game.dll");
        let mut body = crate::metadata::instruction::InstructionStream::from_instructions(vec![
            Instruction::new("ldarg.0", Operand::None),
            ret(),
        ]);
        let original = body.iter().map(|i| i.id()).collect::<Vec<_>>();
        let mut editor = IlEditor::new(&mut body);

        // Compiled body of `{ stmtA; stmtB; }` in a void method: two statements + ret.
        let compiled = InstructionStream::from_instructions(vec![
            Instruction::new("stmt.a", Operand::None),
            Instruction::new("stmt.b", Operand::None),
            ret(),
        ]);
        inject_prefix(&mut editor, &module, compiled, true).unwrap();

        let mnemonics: Vec<_> = editor.stream().iter().map(|i| i.mnemonic).collect();
        assert_eq!(mnemonics, vec!["stmt.a", "stmt.b", "ldarg.0", "ret"]);
        // Original instructions follow, in original order and identity.
        assert_eq!(editor.stream().get(2).unwrap().id(), original[0]);
        assert_eq!(editor.stream().get(3).unwrap().id(), original[1]);
    }

    #[test]
    fn test_prefix_inject_non_void_strips_producer_and_return() {
        let module = nested_module("/tmp/game.dll");
        let mut body = crate::metadata::instruction::InstructionStream::from_instructions(vec![
            Instruction::new("ldc.i4", Operand::Int(7)),
            ret(),
        ]);
        let mut editor = IlEditor::new(&mut body);

        // Compiled body of `{ stmtA; return <expr>; }`: statement, producer, ret.
        let compiled = InstructionStream::from_instructions(vec![
            Instruction::new("stmt.a", Operand::None),
            Instruction::new("ldc.i4", Operand::Int(0)),
            ret(),
        ]);
        inject_prefix(&mut editor, &module, compiled, false).unwrap();

        let mnemonics: Vec<_> = editor.stream().iter().map(|i| i.mnemonic).collect();
        assert_eq!(mnemonics, vec!["stmt.a", "ldc.i4", "ret"]);
    }

    #[test]
    fn test_prefix_inject_is_atomic_on_unresolved_symbol() {
        let module = nested_module("/tmp/game.dll");
        let mut body = crate::metadata::instruction::InstructionStream::from_instructions(vec![
            Instruction::new("ldarg.0", Operand::None),
            ret(),
        ]);
        let mut editor = IlEditor::new(&mut body);
        let before = snapshot(&editor);

        let compiled = InstructionStream::from_instructions(vec![
            Instruction::new("ldfld", resolvable()),
            Instruction::new("ldfld", unresolvable()),
            ret(),
        ]);
        let err = inject_prefix(&mut editor, &module, compiled, true).unwrap_err();

        assert!(matches!(err, Error::UnresolvedSymbol { .. }));
        assert_eq!(snapshot(&editor), before, "target stream must be untouched");
    }

    #[test]
    fn test_prefix_inject_rejects_streams_too_short_to_strip() {
        let module = nested_module("/tmp/game.dll");
        let mut body = crate::metadata::instruction::InstructionStream::new();
        let mut editor = IlEditor::new(&mut body);

        let compiled = InstructionStream::from_instructions(vec![ret()]);
        let err = inject_prefix(&mut editor, &module, compiled, false).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn test_prefix_inject_into_empty_body_appends() {
        let module = nested_module("/tmp/game.dll");
        let mut body = crate::metadata::instruction::InstructionStream::new();
        let mut editor = IlEditor::new(&mut body);

        let compiled = InstructionStream::from_instructions(vec![
            Instruction::new("stmt.a", Operand::None),
            ret(),
        ]);
        inject_prefix(&mut editor, &module, compiled, true).unwrap();

        let mnemonics: Vec<_> = editor.stream().iter().map(|i| i.mnemonic).collect();
        assert_eq!(mnemonics, vec!["stmt.a"]);
    }
}
