//! Logical, bit-test, shift, and rotate executors.
//!
//! The `*.B #imm,@(R0,GBR)` forms read-modify-write one byte at
//! `R0 + GBR`; TST.B only tests and leaves the byte untouched.

use crate::bus::Bus;
use crate::cpu::Sh2;
use crate::encoding::{imm8, reg_m, reg_n};

impl<B: Bus> Sh2<B> {
    pub(crate) fn and(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n) & self.regs.r(reg_m(op));
        self.regs.set_r(n, value);
    }

    pub(crate) fn and_i(&mut self, op: u16) {
        let value = self.regs.r(0) & imm8(op);
        self.regs.set_r(0, value);
    }

    pub(crate) fn or(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n) | self.regs.r(reg_m(op));
        self.regs.set_r(n, value);
    }

    pub(crate) fn or_i(&mut self, op: u16) {
        let value = self.regs.r(0) | imm8(op);
        self.regs.set_r(0, value);
    }

    pub(crate) fn xor(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n) ^ self.regs.r(reg_m(op));
        self.regs.set_r(n, value);
    }

    pub(crate) fn xor_i(&mut self, op: u16) {
        let value = self.regs.r(0) ^ imm8(op);
        self.regs.set_r(0, value);
    }

    pub(crate) fn not(&mut self, op: u16) {
        let value = !self.regs.r(reg_m(op));
        self.regs.set_r(reg_n(op), value);
    }

    pub(crate) fn tst(&mut self, op: u16) {
        let masked = self.regs.r(reg_n(op)) & self.regs.r(reg_m(op));
        self.regs.set_t(masked == 0);
    }

    pub(crate) fn tst_i(&mut self, op: u16) {
        self.regs.set_t(self.regs.r(0) & imm8(op) == 0);
    }

    fn gbr_byte_addr(&self) -> u32 {
        self.regs.r(0).wrapping_add(self.gbr())
    }

    pub(crate) fn andb_gbr(&mut self, op: u16) {
        let addr = self.gbr_byte_addr();
        let value = self.bus.read8(addr) & imm8(op) as u8;
        self.bus.write8(addr, value);
    }

    pub(crate) fn orb_gbr(&mut self, op: u16) {
        let addr = self.gbr_byte_addr();
        let value = self.bus.read8(addr) | imm8(op) as u8;
        self.bus.write8(addr, value);
    }

    pub(crate) fn xorb_gbr(&mut self, op: u16) {
        let addr = self.gbr_byte_addr();
        let value = self.bus.read8(addr) ^ imm8(op) as u8;
        self.bus.write8(addr, value);
    }

    pub(crate) fn tstb_gbr(&mut self, op: u16) {
        let addr = self.gbr_byte_addr();
        let masked = self.bus.read8(addr) & imm8(op) as u8;
        self.regs.set_t(masked == 0);
    }

    /// Test-and-set: T reports whether the byte was zero, then bit 7 is set.
    /// Two separate bus operations; no atomicity against other bus masters.
    pub(crate) fn tas(&mut self, op: u16) {
        let addr = self.regs.r(reg_n(op));
        let value = self.bus.read8(addr);
        self.regs.set_t(value == 0);
        self.bus.write8(addr, value | 0x80);
    }

    // Single-bit shifts; T receives the shifted-out bit.

    pub(crate) fn shll(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n);
        self.regs.set_t(value & 0x8000_0000 != 0);
        self.regs.set_r(n, value << 1);
    }

    pub(crate) fn shal(&mut self, op: u16) {
        self.shll(op);
    }

    pub(crate) fn shlr(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n);
        self.regs.set_t(value & 1 != 0);
        self.regs.set_r(n, value >> 1);
    }

    /// Arithmetic right shift preserves the sign bit.
    pub(crate) fn shar(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n);
        self.regs.set_t(value & 1 != 0);
        self.regs.set_r(n, ((value as i32) >> 1) as u32);
    }

    // Fixed multi-bit shifts; T is untouched.

    pub(crate) fn shll_k(&mut self, op: u16, amount: u32) {
        let n = reg_n(op);
        let value = self.regs.r(n) << amount;
        self.regs.set_r(n, value);
    }

    pub(crate) fn shlr_k(&mut self, op: u16, amount: u32) {
        let n = reg_n(op);
        let value = self.regs.r(n) >> amount;
        self.regs.set_r(n, value);
    }

    // Rotates

    pub(crate) fn rotl(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n);
        self.regs.set_t(value & 0x8000_0000 != 0);
        self.regs.set_r(n, value.rotate_left(1));
    }

    pub(crate) fn rotr(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n);
        self.regs.set_t(value & 1 != 0);
        self.regs.set_r(n, value.rotate_right(1));
    }

    pub(crate) fn rotcl(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n);
        let rotated = (value << 1) | u32::from(self.regs.t());
        self.regs.set_t(value & 0x8000_0000 != 0);
        self.regs.set_r(n, rotated);
    }

    pub(crate) fn rotcr(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n);
        let rotated = (value >> 1) | (u32::from(self.regs.t()) << 31);
        self.regs.set_t(value & 1 != 0);
        self.regs.set_r(n, rotated);
    }
}
