// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # cilpatch
//!
//! A bytecode patch engine for .NET module artifacts. `cilpatch` locates methods by
//! predicate, edits their instruction streams through identity-stable anchors, splices
//! in code produced by an external snippet compiler, and drives whole patch sessions
//! under a backup protocol that keeps re-applies idempotent.
//!
//! ## Features
//!
//! - **Predicate-based targeting** - Find methods by arbitrary `(type, method)`
//!   predicate pairs instead of hardcoded token offsets
//! - **Identity-stable editing** - Branch targets and edit anchors reference
//!   instruction identity, so surrounding inserts and removals never invalidate them
//! - **Compiler bridge** - Wrap a source snippet into a synthetic compilation unit,
//!   compile it externally, and lift the resulting instructions
//! - **Atomic splicing** - Cross-module symbol relocation verifies every reference
//!   before a single instruction lands in the target method
//! - **Safe sessions** - A pristine `.bak` image is taken once and every session
//!   starts from it, so patches never stack on their own output
//!
//! ## Quick Start
//!
//! ```rust
//! use cilpatch::prelude::*;
//!
//! # fn sample() -> cilpatch::metadata::module::Module {
//! #     use cilpatch::metadata::{
//! #         instruction::{Instruction, InstructionStream, Operand},
//! #         method::MethodDef,
//! #         typedef::{TypeDef, TypeName},
//! #     };
//! #     let mut t = TypeDef::new("Game", "Player");
//! #     t.add_method(
//! #         MethodDef::new("Heal", TypeName::global("void"), Vec::new()).with_body(
//! #             InstructionStream::from_instructions(vec![Instruction::new(
//! #                 "ret",
//! #                 Operand::None,
//! #             )]),
//! #         ),
//! #     );
//! #     let mut m = cilpatch::metadata::module::Module::new("/tmp/game.dll");
//! #     m.add_type(t);
//! #     m
//! # }
//! let mut module = sample();
//!
//! // Rewrite every `Heal` method of `Game.Player` to return immediately.
//! let edited = patch(
//!     &mut module,
//!     |t| t.full_name() == "Game.Player",
//!     |m| m.name == "Heal",
//!     |_module, _ctx, editor| {
//!         editor.clear();
//!         editor.emit("ret", Operand::None);
//!         Ok(())
//!     },
//! )?;
//! assert_eq!(edited, 1);
//! # Ok::<(), cilpatch::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - The in-memory module model: types, members, methods and
//!   identity-carrying instruction streams
//! - [`patcher`] - Locator, editor, relocator and splice strategies
//! - [`compiler`] - The external compiler seam and the synthetic-unit bridge
//! - [`codec`] - The seam towards on-disk module readers and writers
//! - [`apply`] - Patch trait, registry and the backup-protocol session driver
//! - [`Error`] and [`Result`] - Error handling across all of the above
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result):
//!
//! ```rust
//! use cilpatch::{Error, metadata::module::Module, patcher::patch_required};
//!
//! let mut module = Module::new("/tmp/game.dll");
//! match patch_required(&mut module, |_| true, |_| true, |_, _, _| Ok(())) {
//!     Err(Error::NoMatch { module }) => println!("nothing to patch in {}", module.display()),
//!     Err(e) => println!("error: {}", e),
//!     Ok(edited) => println!("edited {edited} methods"),
//! }
//! ```

#[macro_use]
pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

pub mod apply;
pub mod codec;
pub mod compiler;
pub mod metadata;
pub mod patcher;
pub mod prelude;

/// Result type used throughout this crate, carrying [`Error`] on failure
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all operations in this crate.
///
/// Covers lookup misses, editing range violations, symbol relocation failures,
/// compiler diagnostics and the write-time branch invariant.
pub use error::Error;
