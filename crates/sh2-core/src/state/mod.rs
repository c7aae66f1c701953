//! Architectural CPU state model primitives.

/// Execution-state machine.
pub mod cpu_state;
/// Register file and SR bit accessors.
pub mod registers;

pub use cpu_state::CpuState;
pub use registers::{
    RegisterFile, GBR, MACH, MACL, PC, PR, REGISTER_COUNT, SP, SR, SR_DEFINED_MASK, VBR,
};
