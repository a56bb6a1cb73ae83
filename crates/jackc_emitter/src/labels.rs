//! Label allocation.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    IfFalse,
    IfEnd,
    WhileStart,
    WhileEnd,
}

impl LabelKind {
    pub fn prefix(self) -> &'static str {
        match self {
            LabelKind::IfFalse => "IF_FALSE",
            LabelKind::IfEnd => "IF_END",
            LabelKind::WhileStart => "WHILE_START",
            LabelKind::WhileEnd => "WHILE_END",
        }
    }
}

/// Per-unit label counters, one per category.
#[derive(Debug, Clone, Default)]
pub struct LabelContext {
    counters: FxHashMap<LabelKind, u32>,
}

impl LabelContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next unused label of `kind`, e.g. `IF_END3`.
    pub fn fresh(&mut self, kind: LabelKind) -> String {
        let counter = self.counters.entry(kind).or_insert(0);
        let label = format!("{}{}", kind.prefix(), counter);
        *counter += 1;
        label
    }
}
