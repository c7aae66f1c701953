//! Interpreter core for the Hitachi SH-2 32-bit RISC CPU.
//!
//! The core executes machine code one instruction per [`Sh2::cycle`] call
//! against a host-provided [`Bus`]. It models the 23-register architectural
//! state, the delayed-branch pipeline with slot-illegal detection, and the
//! reset/interrupt/trap exception paths. Memory devices, peripherals, and
//! cycle timing are the embedder's concern.

/// Bus contract and little-endian byte-assembly helpers.
pub mod bus;
pub use bus::{read_u16_le, read_u32_le, write_u16_le, write_u32_le, Bus};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{
    CpuState, RegisterFile, GBR, MACH, MACL, PC, PR, REGISTER_COUNT, SP, SR, SR_DEFINED_MASK, VBR,
};

/// Opcode field extraction and sign-extension helpers.
pub mod encoding;
pub use encoding::{disp4, imm8, reg_m, reg_n, sdisp12, sign_extend16, sign_extend8, simm8};

/// Pure opcode classification.
pub mod decoder;
pub use decoder::{decode, Instruction};

/// Exception causes, vector offsets, and the host error type.
pub mod exception;
pub use exception::{
    CpuError, Exception, IRQ_LINE_MAX, VEC_ILLEGAL_INSTRUCTION, VEC_ILLEGAL_SLOT, VEC_IRQ_BASE,
    VEC_NMI, VEC_POWER_PC, VEC_POWER_SP, VEC_RESET_PC, VEC_RESET_SP, VEC_TRAPA_BASE,
};

/// The CPU instance and fetch/execute sequencer.
pub mod cpu;
pub use cpu::Sh2;

/// Instruction executors.
mod execute;

/// Instruction disassembly.
pub mod disasm;
pub use disasm::{disassemble_one, disassemble_window, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
