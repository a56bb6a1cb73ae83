//! jackc_emitter: VM instruction output.
//!
//! Walks a parsed class and lowers it to stack machine instructions. All
//! generation state (label counters, output buffer) lives in a context
//! created fresh for each call to `generate`, so units never share it.

mod codegen;
mod instruction;
mod labels;

pub use codegen::generate;
pub use instruction::{ArithmeticOp, Segment, VmInstruction};
pub use labels::{LabelContext, LabelKind};
