//! Instructions, operands and the per-method instruction stream.
//!
//! Branch operands reference instruction *identity* ([`InstructionId`]), not stream
//! position, so insert and remove operations never invalidate previously constructed
//! branches unless the referenced instruction itself is removed. Identity is assigned
//! once at construction from a process-wide counter and survives moves between streams,
//! which is what allows instructions lifted from a transient compiled module to be
//! spliced into a target stream with their internal branches intact.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{metadata::member::MemberRef, Result};

static NEXT_INSTRUCTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one [`Instruction`].
///
/// Comparable, hashable and stable for the lifetime of the process. A cloned
/// instruction shares the identity of its source; streams therefore treat a clone
/// as the same instruction for anchor lookup and branch validation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct InstructionId(u64);

impl InstructionId {
    fn next() -> Self {
        InstructionId(NEXT_INSTRUCTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identity value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The operand of one instruction.
///
/// The engine does not define the instruction set; it only distinguishes the operand
/// shapes it has to rewrite (member references) or validate (branch targets). Everything
/// else is carried opaquely.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// No operand
    None,
    /// Integer literal operand
    Int(i64),
    /// Floating point literal operand
    Float(f64),
    /// String literal operand
    Str(String),
    /// Reference to a field, method, property, event or type, possibly in another module
    Member(MemberRef),
    /// Branch target referencing another instruction in the same stream by identity
    Target(InstructionId),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int(value) => write!(f, "{value}"),
            Operand::Float(value) => write!(f, "{value}"),
            Operand::Str(value) => write!(f, "\"{value}\""),
            Operand::Member(member) => write!(f, "{}", member.full_name),
            Operand::Target(id) => write!(f, "{id}"),
        }
    }
}

/// One opcode plus its optional operand.
///
/// Mnemonics are static strings supplied by whoever constructs the instruction (the
/// on-disk codec, the snippet compiler, or an edit closure); the engine never
/// interprets them.
#[derive(Clone, Debug)]
pub struct Instruction {
    id: InstructionId,
    /// Opcode mnemonic, e.g. `ldarg.0` or `ret`
    pub mnemonic: &'static str,
    /// The operand, [`Operand::None`] when the opcode takes none
    pub operand: Operand,
}

impl Instruction {
    /// Creates a new instruction with a fresh identity
    #[must_use]
    pub fn new(mnemonic: &'static str, operand: Operand) -> Self {
        Instruction {
            id: InstructionId::next(),
            mnemonic,
            operand,
        }
    }

    /// Returns this instruction's identity
    #[must_use]
    pub fn id(&self) -> InstructionId {
        self.id
    }
}

/// Ordered instruction sequence constituting one method body.
///
/// The stream owns its instructions; an [`crate::patcher::IlEditor`] borrows one stream
/// at a time and provides the edit primitives. [`InstructionStream::validate_branches`]
/// enforces the write-time invariant that every branch operand references a live member
/// of the same stream.
#[derive(Clone, Debug, Default)]
pub struct InstructionStream {
    instructions: Vec<Instruction>,
}

impl InstructionStream {
    /// Creates an empty stream
    #[must_use]
    pub fn new() -> Self {
        InstructionStream::default()
    }

    /// Creates a stream from instructions in order
    #[must_use]
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        InstructionStream { instructions }
    }

    /// Number of instructions in the stream
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the stream holds no instructions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterates the instructions in order
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Returns the instruction at `index`, if any
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Returns the first instruction, if any
    #[must_use]
    pub fn first(&self) -> Option<&Instruction> {
        self.instructions.first()
    }

    /// Returns the last instruction, if any
    #[must_use]
    pub fn last(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Position of the instruction with the given identity, if it is live in this stream
    #[must_use]
    pub fn position_of(&self, id: InstructionId) -> Option<usize> {
        self.instructions.iter().position(|i| i.id() == id)
    }

    /// Returns true if the instruction with the given identity is live in this stream
    #[must_use]
    pub fn contains(&self, id: InstructionId) -> bool {
        self.position_of(id).is_some()
    }

    /// Consumes the stream, returning its instructions in order
    #[must_use]
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    pub(crate) fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instructions
    }

    /// Verifies that every branch-target operand references a live instruction of this
    /// stream.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DanglingBranch`] naming the first dead target found.
    pub fn validate_branches(&self) -> Result<()> {
        for instruction in &self.instructions {
            if let Operand::Target(target) = instruction.operand {
                if !self.contains(target) {
                    return Err(crate::Error::DanglingBranch(target));
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a InstructionStream {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_unique_per_construction() {
        let a = Instruction::new("nop", Operand::None);
        let b = Instruction::new("nop", Operand::None);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clone_shares_identity() {
        let a = Instruction::new("ret", Operand::None);
        let b = a.clone();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_position_of_live_and_dead() {
        let a = Instruction::new("nop", Operand::None);
        let dead = Instruction::new("nop", Operand::None);
        let stream = InstructionStream::from_instructions(vec![a.clone()]);

        assert_eq!(stream.position_of(a.id()), Some(0));
        assert_eq!(stream.position_of(dead.id()), None);
    }

    #[test]
    fn test_validate_branches_accepts_live_target() {
        let target = Instruction::new("ret", Operand::None);
        let branch = Instruction::new("br", Operand::Target(target.id()));
        let stream = InstructionStream::from_instructions(vec![branch, target]);

        assert!(stream.validate_branches().is_ok());
    }

    #[test]
    fn test_validate_branches_rejects_dead_target() {
        let removed = Instruction::new("ret", Operand::None);
        let branch = Instruction::new("br", Operand::Target(removed.id()));
        let stream = InstructionStream::from_instructions(vec![branch]);

        let err = stream.validate_branches().unwrap_err();
        assert!(matches!(err, crate::Error::DanglingBranch(id) if id == removed.id()));
    }
}
