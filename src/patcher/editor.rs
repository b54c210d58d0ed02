//! The instruction stream editor.

use crate::{
    metadata::instruction::{Instruction, InstructionId, InstructionStream, Operand},
    Error, Result,
};

/// Mutable view over exactly one method body's instruction sequence.
///
/// The editor borrows one [`InstructionStream`] for its lifetime and owns all edit
/// primitives. Anchors are instruction identities, not indices, so previously
/// constructed anchors and branch targets stay valid across inserts and removals
/// unless the referenced instruction itself is removed. The editor never auto-retargets
/// branches: removing an instruction that something still branches to is caller error,
/// caught at write time by branch validation.
pub struct IlEditor<'a> {
    stream: &'a mut InstructionStream,
}

impl<'a> IlEditor<'a> {
    /// Creates an editor over `stream`
    #[must_use]
    pub fn new(stream: &'a mut InstructionStream) -> Self {
        IlEditor { stream }
    }

    /// Read access to the edited stream
    #[must_use]
    pub fn stream(&self) -> &InstructionStream {
        self.stream
    }

    /// Number of instructions currently in the stream
    #[must_use]
    pub fn len(&self) -> usize {
        self.stream.len()
    }

    /// Returns true when the stream holds no instructions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// Removes all instructions.
    ///
    /// The stream is empty afterwards; appending a valid body again is the caller's
    /// responsibility.
    pub fn clear(&mut self) {
        self.stream.instructions_mut().clear();
    }

    /// Appends `instruction` at the end of the stream, returning its identity
    pub fn append(&mut self, instruction: Instruction) -> InstructionId {
        let id = instruction.id();
        self.stream.instructions_mut().push(instruction);
        id
    }

    /// Constructs and appends an instruction, returning its identity.
    ///
    /// Convenience for the common emit-at-end pattern of rebuilt method tails.
    pub fn emit(&mut self, mnemonic: &'static str, operand: Operand) -> InstructionId {
        self.append(Instruction::new(mnemonic, operand))
    }

    /// Inserts `instruction` immediately before the live instruction `anchor`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::NotFound`] when `anchor` is not live in this stream.
    pub fn insert_before(&mut self, anchor: InstructionId, instruction: Instruction) -> Result<()> {
        let position = self.position_of_live(anchor)?;
        self.stream.instructions_mut().insert(position, instruction);
        Ok(())
    }

    /// Inserts `instruction` immediately after the live instruction `anchor`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::NotFound`] when `anchor` is not live in this stream.
    pub fn insert_after(&mut self, anchor: InstructionId, instruction: Instruction) -> Result<()> {
        let position = self.position_of_live(anchor)?;
        self.stream
            .instructions_mut()
            .insert(position + 1, instruction);
        Ok(())
    }

    /// Removes and returns the instruction at `index`.
    ///
    /// Any branch operand elsewhere in the stream that pointed at the removed
    /// instruction is now dangling; the editor does not retarget it.
    ///
    /// # Errors
    ///
    /// [`crate::Error::OutOfRange`] when `index` is beyond the stream length.
    pub fn remove_at(&mut self, index: usize) -> Result<Instruction> {
        let len = self.stream.len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        Ok(self.stream.instructions_mut().remove(index))
    }

    /// Replaces the live instruction `target` with `instruction`, preserving its
    /// stream position.
    ///
    /// # Errors
    ///
    /// [`crate::Error::NotFound`] when `target` is not live in this stream.
    pub fn replace(&mut self, target: InstructionId, instruction: Instruction) -> Result<()> {
        let position = self.position_of_live(target)?;
        self.stream.instructions_mut()[position] = instruction;
        Ok(())
    }

    fn position_of_live(&self, id: InstructionId) -> Result<usize> {
        self.stream
            .position_of(id)
            .ok_or_else(|| Error::NotFound(format!("instruction {id} is not live in this stream")))
    }
}
