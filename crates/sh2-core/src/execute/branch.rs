//! Branch executors.
//!
//! Every branch except BF and BT is delayed: it arms `delay_target` and the
//! following instruction executes before the jump lands. The dispatcher has
//! already applied the slot-illegal gate when these run.
//!
//! Displacement targets are computed as `PC + 2 + disp * 2` against the
//! post-fetch PC, which matches the SH-2 "address of branch + 4" rule.

use crate::bus::Bus;
use crate::cpu::Sh2;
use crate::encoding::{reg_n, sdisp12, simm8};
use crate::state::PR;

impl<B: Bus> Sh2<B> {
    fn disp8_target(&self, op: u16) -> u32 {
        self.regs
            .pc()
            .wrapping_add(2)
            .wrapping_add(simm8(op).wrapping_shl(1))
    }

    fn disp12_target(&self, op: u16) -> u32 {
        self.regs
            .pc()
            .wrapping_add(2)
            .wrapping_add(sdisp12(op).wrapping_shl(1))
    }

    pub(crate) fn bf(&mut self, op: u16) {
        if !self.regs.t() {
            let target = self.disp8_target(op);
            self.regs.set_pc(target);
        }
    }

    pub(crate) fn bt(&mut self, op: u16) {
        if self.regs.t() {
            let target = self.disp8_target(op);
            self.regs.set_pc(target);
        }
    }

    pub(crate) fn bf_s(&mut self, op: u16) {
        if !self.regs.t() {
            self.delay_target = self.disp8_target(op);
        }
    }

    pub(crate) fn bt_s(&mut self, op: u16) {
        if self.regs.t() {
            self.delay_target = self.disp8_target(op);
        }
    }

    pub(crate) fn bra(&mut self, op: u16) {
        self.delay_target = self.disp12_target(op);
    }

    pub(crate) fn bsr(&mut self, op: u16) {
        self.regs.set(PR, self.regs.pc().wrapping_add(2));
        self.delay_target = self.disp12_target(op);
    }

    pub(crate) fn braf(&mut self, op: u16) {
        let target = self
            .regs
            .pc()
            .wrapping_add(2)
            .wrapping_add(self.regs.r(reg_n(op)));
        self.delay_target = target;
    }

    pub(crate) fn bsrf(&mut self, op: u16) {
        let return_addr = self.regs.pc().wrapping_add(2);
        self.regs.set(PR, return_addr);
        self.delay_target = return_addr.wrapping_add(self.regs.r(reg_n(op)));
    }

    pub(crate) fn jmp(&mut self, op: u16) {
        self.delay_target = self.regs.r(reg_n(op));
    }

    pub(crate) fn jsr(&mut self, op: u16) {
        self.regs.set(PR, self.regs.pc().wrapping_add(2));
        self.delay_target = self.regs.r(reg_n(op));
    }

    pub(crate) fn rts(&mut self) {
        self.delay_target = self.regs.get(PR);
    }
}
