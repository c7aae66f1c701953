//! Exception kinds, vector-table offsets, and the host-facing error type.
//!
//! Guest-visible CPU exceptions never surface to the host as Rust errors;
//! they are dispatched in-band by the pipeline through the vector table at
//! `VBR + offset`. The only host-observable failures are API misuse.

use thiserror::Error;

/// Vector-table offset of the power-on PC.
pub const VEC_POWER_PC: u32 = 0x00;
/// Vector-table offset of the power-on SP.
pub const VEC_POWER_SP: u32 = 0x04;
/// Vector-table offset of the soft-reset PC (relative to VBR).
pub const VEC_RESET_PC: u32 = 0x08;
/// Vector-table offset of the soft-reset SP (relative to VBR).
pub const VEC_RESET_SP: u32 = 0x0C;
/// Vector-table offset of the illegal-instruction handler.
pub const VEC_ILLEGAL_INSTRUCTION: u32 = 0x10;
/// Vector-table offset of the illegal-slot-instruction handler.
pub const VEC_ILLEGAL_SLOT: u32 = 0x18;
/// Vector-table offset of the NMI handler.
pub const VEC_NMI: u32 = 0x2C;
/// Vector-table base for `TRAPA #imm` (`imm * 4` is added).
pub const VEC_TRAPA_BASE: u32 = 0x80;
/// Vector-table base for external IRQs (`line * 4` is added).
pub const VEC_IRQ_BASE: u32 = 0x100;

/// Highest external IRQ line.
pub const IRQ_LINE_MAX: u8 = 7;

/// In-band CPU exception causes dispatched through the vector table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exception {
    /// Decoded opcode has no assigned instruction.
    IllegalInstruction,
    /// PC-writing instruction executed in a delay slot.
    IllegalSlot,
    /// Non-maskable interrupt.
    Nmi,
    /// External interrupt on the carried line (`0..=7`).
    Irq(u8),
    /// `TRAPA #imm` software trap with the carried immediate.
    Trapa(u8),
}

impl Exception {
    /// Returns the vector-table offset this exception dispatches through.
    #[must_use]
    pub const fn vector_offset(self) -> u32 {
        match self {
            Self::IllegalInstruction => VEC_ILLEGAL_INSTRUCTION,
            Self::IllegalSlot => VEC_ILLEGAL_SLOT,
            Self::Nmi => VEC_NMI,
            Self::Irq(line) => VEC_IRQ_BASE + (line as u32) * 4,
            Self::Trapa(imm) => VEC_TRAPA_BASE + (imm as u32) * 4,
        }
    }
}

/// Host API misuse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CpuError {
    /// `irq()` was called with a line outside `0..=7`.
    #[error("irq line {0} is out of range (0..=7)")]
    InvalidIrqLine(u8),
}
