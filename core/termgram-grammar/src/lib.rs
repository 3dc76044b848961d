#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod condition;
pub mod pattern;

pub use condition::{Additional, Condition, SyntaxRole};
pub use pattern::{Component, ModelSlot, Pattern, PatternKind, PatternSet, WordSlot};
