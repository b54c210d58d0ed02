//! The predicate-based method locator.

use crate::metadata::{method::MethodDef, module::Module, typedef::TypeDef};

/// Lazily yields every method of `module` matching the predicate pair.
///
/// Traversal order is stable: top-level types in declaration order, methods within a
/// type in declaration order. Nested types are not auto-expanded; a caller that wants
/// them traverses [`TypeDef::nested`] explicitly. The type predicate is evaluated at
/// most once per type, the method predicate at most once per method, and nothing is
/// visited beyond what the consumer pulls.
///
/// Zero matches is not an error; the iterator is simply empty.
pub fn locate<TP, MP>(module: &Module, type_pred: TP, method_pred: MP) -> Locate<'_, TP, MP>
where
    TP: Fn(&TypeDef) -> bool,
    MP: Fn(&MethodDef) -> bool,
{
    Locate {
        module,
        type_pred,
        method_pred,
        type_index: 0,
        method_index: 0,
    }
}

/// Lazy, finite, single-pass iterator produced by [`locate`].
pub struct Locate<'a, TP, MP> {
    module: &'a Module,
    type_pred: TP,
    method_pred: MP,
    type_index: usize,
    method_index: usize,
}

impl<'a, TP, MP> Iterator for Locate<'a, TP, MP>
where
    TP: Fn(&TypeDef) -> bool,
    MP: Fn(&MethodDef) -> bool,
{
    type Item = &'a MethodDef;

    fn next(&mut self) -> Option<Self::Item> {
        let types = self.module.types();
        loop {
            let type_def = types.get(self.type_index)?;

            // The type predicate is consulted once, on first entry into the type.
            if self.method_index == 0 && !(self.type_pred)(type_def) {
                self.type_index += 1;
                continue;
            }

            let methods = type_def.methods();
            while self.method_index < methods.len() {
                let method = &methods[self.method_index];
                self.method_index += 1;
                if (self.method_pred)(method) {
                    return Some(method);
                }
            }

            self.type_index += 1;
            self.method_index = 0;
        }
    }
}
