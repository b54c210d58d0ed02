//! Method definitions and their instruction streams.

use std::fmt::Write;

use crate::metadata::{
    attributes::MethodAttributes,
    instruction::{InstructionStream, Operand},
    member::{MemberKind, MemberRef},
    typedef::TypeName,
};

/// One formal parameter of a method.
#[derive(Clone, Debug)]
pub struct Param {
    /// Parameter name as declared
    pub name: String,
    /// Declared parameter type
    pub param_type: TypeName,
}

impl Param {
    /// Creates a parameter
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: TypeName) -> Self {
        Param {
            name: name.into(),
            param_type,
        }
    }
}

/// A method owned by exactly one type definition.
///
/// The full name is the canonical signature string
/// `RetType Declaring::Name(ParamType,...)`, computed when the method is attached to
/// its declaring type. A method owns exactly one [`InstructionStream`] when it has a
/// body; abstract and external methods carry `None`.
#[derive(Clone, Debug)]
pub struct MethodDef {
    /// Simple method name; constructors are named `.ctor` / `.cctor`
    pub name: String,
    /// Visibility and binding flags
    pub attributes: MethodAttributes,
    /// Declared return type
    pub return_type: TypeName,
    /// Formal parameters in declaration order
    pub params: Vec<Param>,
    /// The method body, `None` for bodiless methods
    pub body: Option<InstructionStream>,
    full_name: String,
    declaring_type: String,
}

impl MethodDef {
    /// Creates a detached, bodiless method definition
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: TypeName, params: Vec<Param>) -> Self {
        MethodDef {
            name: name.into(),
            attributes: MethodAttributes::PUBLIC,
            return_type,
            params,
            body: None,
            full_name: String::new(),
            declaring_type: String::new(),
        }
    }

    /// Attaches a body, consuming and returning the definition for chained construction
    #[must_use]
    pub fn with_body(mut self, body: InstructionStream) -> Self {
        self.body = Some(body);
        self
    }

    /// Replaces the attribute flags, consuming and returning the definition
    #[must_use]
    pub fn with_attributes(mut self, attributes: MethodAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Canonical signature string, empty until the method is attached to a type
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Full name of the declaring type, empty until attached
    #[must_use]
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// Returns true for instance and static constructors
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == ".ctor" || self.name == ".cctor"
    }

    /// Returns true when the method has no `this` receiver
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.attributes.contains(MethodAttributes::STATIC)
    }

    /// Builds a [`MemberRef`] pointing at this method as defined in `origin`
    #[must_use]
    pub fn as_member_ref(&self, origin: &std::path::Path) -> MemberRef {
        MemberRef::new(
            MemberKind::Method,
            self.declaring_type.clone(),
            self.name.clone(),
            self.full_name.clone(),
            origin,
        )
    }

    /// Renders the body as a human-readable IL listing with `IL_xxxx` labels.
    ///
    /// Branch targets are rendered as the label of the referenced instruction, or
    /// `IL_????` when the target is not live in the stream. Bodiless methods render
    /// as the empty string.
    #[must_use]
    pub fn dump_il(&self) -> String {
        let Some(body) = &self.body else {
            return String::new();
        };

        let mut listing = String::new();
        for (index, instruction) in body.iter().enumerate() {
            let _ = write!(listing, "IL_{index:04}: {}", instruction.mnemonic);
            match &instruction.operand {
                Operand::None => {}
                Operand::Target(target) => match body.position_of(*target) {
                    Some(position) => {
                        let _ = write!(listing, " IL_{position:04}");
                    }
                    None => listing.push_str(" IL_????"),
                },
                operand => {
                    let _ = write!(listing, " {operand}");
                }
            }
            listing.push('\n');
        }
        listing
    }

    pub(crate) fn attach(&mut self, declaring: &str) {
        self.declaring_type = declaring.to_string();
        let params = self
            .params
            .iter()
            .map(|p| p.param_type.render())
            .collect::<Vec<_>>()
            .join(",");
        self.full_name = format!(
            "{} {}::{}({})",
            self.return_type.render(),
            declaring,
            self.name,
            params
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::instruction::Instruction;

    fn int32() -> TypeName {
        TypeName::new("System", "Int32")
    }

    #[test]
    fn test_full_name_after_attach() {
        let mut method = MethodDef::new(
            "Bar",
            int32(),
            vec![Param::new("count", int32()), Param::new("scale", int32())],
        );
        method.attach("Ns.Foo");
        assert_eq!(
            method.full_name(),
            "System.Int32 Ns.Foo::Bar(System.Int32,System.Int32)"
        );
        assert_eq!(method.declaring_type(), "Ns.Foo");
    }

    #[test]
    fn test_constructor_detection() {
        let ctor = MethodDef::new(".ctor", TypeName::global("void"), Vec::new());
        let cctor = MethodDef::new(".cctor", TypeName::global("void"), Vec::new());
        let plain = MethodDef::new("Run", TypeName::global("void"), Vec::new());
        assert!(ctor.is_constructor());
        assert!(cctor.is_constructor());
        assert!(!plain.is_constructor());
    }

    #[test]
    fn test_dump_il_renders_labels_and_branches() {
        let target = Instruction::new("ret", Operand::None);
        let branch = Instruction::new("br", Operand::Target(target.id()));
        let load = Instruction::new("ldc.i4", Operand::Int(1));
        let method = MethodDef::new("Bar", int32(), Vec::new()).with_body(
            InstructionStream::from_instructions(vec![load, branch, target]),
        );

        let listing = method.dump_il();
        assert_eq!(
            listing,
            "IL_0000: ldc.i4 1\nIL_0001: br IL_0002\nIL_0002: ret\n"
        );
    }

    #[test]
    fn test_dump_il_without_body_is_empty() {
        let method = MethodDef::new("Bar", int32(), Vec::new());
        assert!(method.dump_il().is_empty());
    }
}
