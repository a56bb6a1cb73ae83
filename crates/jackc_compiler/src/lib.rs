//! jackc_compiler: Compiler orchestration.
//!
//! Runs tokenize -> parse -> generate for one unit, and compiles whole
//! programs by running that pipeline over every unit in parallel. Units share
//! no mutable state, so one unit's failure never affects another.

mod error;

pub use error::UnitError;

use jackc_diagnostics::CompileError;
use jackc_emitter::{generate, VmInstruction};
use jackc_options::CompilerOptions;
use jackc_parser::parse;
use jackc_scanner::tokenize;
use rayon::prelude::*;
use tracing::{debug, debug_span, info};

/// The output of one successfully compiled unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    /// Name of the class the unit declares.
    pub class_name: String,
    pub instructions: Vec<VmInstruction>,
}

impl CompiledUnit {
    /// One text line per instruction.
    pub fn lines(&self) -> Vec<String> {
        self.instructions.iter().map(ToString::to_string).collect()
    }

    /// The `.vm` file contents: every line newline-terminated.
    pub fn to_vm_text(&self) -> String {
        let mut text = String::new();
        for instruction in &self.instructions {
            text.push_str(&instruction.to_string());
            text.push('\n');
        }
        text
    }
}

/// Compile the text of one unit.
pub fn compile_unit(
    name: &str,
    text: &str,
    options: &CompilerOptions,
) -> Result<CompiledUnit, UnitError> {
    let span = debug_span!("compile_unit", unit = name);
    let _guard = span.enter();

    run_pipeline(text, options).map_err(|error| {
        debug!(%error, kind = error.kind_name(), "unit failed");
        UnitError::new(name, text, error)
    })
}

fn run_pipeline(text: &str, options: &CompilerOptions) -> Result<CompiledUnit, CompileError> {
    let tokens = tokenize(text)?;
    debug!(tokens = tokens.len(), "tokenized");

    let unit = parse(&tokens)?;
    debug!(subroutines = unit.class.subroutines.len(), "parsed");

    let instructions = generate(&unit.class, &unit.class_scope, text, options)?;
    debug!(instructions = instructions.len(), "generated");

    Ok(CompiledUnit {
        class_name: unit.class.name.text,
        instructions,
    })
}

/// A set of units compiled with the same options.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Compiler options.
    pub options: CompilerOptions,
    /// Units as (name, text), in insertion order.
    units: Vec<(String, String)>,
}

impl Program {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            units: Vec::new(),
        }
    }

    /// Add a unit to the program.
    pub fn add_source(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.units.push((name.into(), text.into()));
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Compile every unit in parallel. Results come back in insertion order,
    /// one per unit.
    pub fn compile(&self) -> Vec<Result<CompiledUnit, UnitError>> {
        let results: Vec<_> = self
            .units
            .par_iter()
            .map(|(name, text)| compile_unit(name, text, &self.options))
            .collect();

        let failures = results.iter().filter(|r| r.is_err()).count();
        info!(units = results.len(), failures, "compiled program");
        results
    }
}
