//! Cross-module symbol relocation.
//!
//! Instructions lifted from a transient compiled module carry member references minted
//! against that module. Before they may be spliced into a target method, every such
//! reference has to be mapped onto a structurally equivalent definition in the target
//! module. Matching is purely structural: exact full-name string equality, declaring
//! type resolved first (parent-before-nested for nested types), then the member inside
//! the declaring type's direct collection. There are no partial or best-effort results;
//! any miss fails the enclosing splice.
//!
//! Renamed or overloaded members with identical full names are indistinguishable under
//! this scheme. That is a known limitation of full-name matching, kept deliberately.

use crate::{
    metadata::{
        instruction::{Instruction, Operand},
        member::{EventDef, FieldDef, MemberKind, MemberRef, PropertyDef},
        method::MethodDef,
        module::Module,
        typedef::TypeDef,
    },
    Error, Result,
};

/// A member reference resolved to its local definition in a target module.
#[derive(Debug)]
pub enum ResolvedMember<'m> {
    /// Resolved to a field definition
    Field(&'m FieldDef),
    /// Resolved to a method definition
    Method(&'m MethodDef),
    /// Resolved to a property definition
    Property(&'m PropertyDef),
    /// Resolved to an event definition
    Event(&'m EventDef),
    /// Resolved to a type definition
    Type(&'m TypeDef),
}

/// Maps a foreign member reference onto the structurally equivalent definition in
/// `target`.
///
/// The declaring type is resolved first: nested declaring types resolve their
/// enclosing type recursively and then search its nested types by exact simple name;
/// top-level declaring types are matched by exact full name against the module's
/// top-level types. Once the declaring type is found, the member is matched by exact
/// full name inside the corresponding direct member collection. Returns `None` as soon
/// as any step fails.
#[must_use]
pub fn resolve<'m>(target: &'m Module, member: &MemberRef) -> Option<ResolvedMember<'m>> {
    if member.kind == MemberKind::Type {
        return resolve_type(target, &member.full_name).map(ResolvedMember::Type);
    }

    let declaring = resolve_type(target, &member.declaring_type)?;
    match member.kind {
        MemberKind::Field => declaring
            .field_by_full_name(&member.full_name)
            .map(ResolvedMember::Field),
        MemberKind::Method => declaring
            .method_by_full_name(&member.full_name)
            .map(ResolvedMember::Method),
        MemberKind::Property => declaring
            .property_by_full_name(&member.full_name)
            .map(ResolvedMember::Property),
        MemberKind::Event => declaring
            .event_by_full_name(&member.full_name)
            .map(ResolvedMember::Event),
        MemberKind::Type => unreachable!("handled above"),
    }
}

fn resolve_type<'m>(target: &'m Module, full_name: &str) -> Option<&'m TypeDef> {
    match full_name.rsplit_once('/') {
        Some((enclosing, name)) => resolve_type(target, enclosing)?.nested_type(name),
        None => target.type_by_full_name(full_name),
    }
}

/// Relocates every member-reference operand of `instructions` into `target`.
///
/// All operands are resolved before anything is rewritten, so on error the input is
/// simply dropped and no instruction has been altered; callers rely on this for
/// splice atomicity. On success every member operand's origin is rewritten to the
/// target module's path and the instructions are returned in their original order.
///
/// # Errors
///
/// [`crate::Error::UnresolvedSymbol`] naming the first member that has no structural
/// match in `target`.
pub fn relocate(target: &Module, instructions: Vec<Instruction>) -> Result<Vec<Instruction>> {
    for instruction in &instructions {
        if let Operand::Member(member) = &instruction.operand {
            if resolve(target, member).is_none() {
                return Err(Error::UnresolvedSymbol {
                    member: member.full_name.clone(),
                    module: target.path.clone(),
                });
            }
        }
    }

    Ok(instructions
        .into_iter()
        .map(|mut instruction| {
            if let Operand::Member(member) = &mut instruction.operand {
                member.origin = target.path.clone();
            }
            instruction
        })
        .collect())
}
