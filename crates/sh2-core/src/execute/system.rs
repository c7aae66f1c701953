//! System executors: T-bit control, SLEEP, exception returns and traps,
//! and the control/system register transfer families.
//!
//! SR writes that originate in a register or memory value go through the
//! masked setter, so undefined SR bits can never become architecturally
//! visible (this is what keeps RTE's restored SR clean).

use crate::bus::Bus;
use crate::cpu::Sh2;
use crate::encoding::{imm8, reg_n};
use crate::exception::Exception;
use crate::state::{CpuState, GBR, MACH, MACL, PR, VBR};

impl<B: Bus> Sh2<B> {
    pub(crate) fn clrt(&mut self) {
        self.regs.set_t(false);
    }

    pub(crate) fn sett(&mut self) {
        self.regs.set_t(true);
    }

    pub(crate) fn clrmac(&mut self) {
        self.regs.set(MACH, 0);
        self.regs.set(MACL, 0);
    }

    pub(crate) fn sleep(&mut self) {
        self.state = CpuState::Sleep;
    }

    /// Return from exception: the popped PC becomes a delayed-branch
    /// target (RTE has a delay slot), the popped SR is masked to the
    /// defined bits, and ordinary execution resumes.
    pub(crate) fn rte(&mut self) {
        let return_pc = self.pop32();
        let sr = self.pop32();
        self.delay_target = return_pc;
        self.regs.set_sr(sr);
        self.state = CpuState::ProgramExecution;
    }

    /// Software trap: pushes SR and the address of the next instruction,
    /// then vectors through `VBR + 0x80 + imm * 4`.
    pub(crate) fn trapa(&mut self, op: u16) {
        let next = self.regs.pc();
        self.enter_exception(Exception::Trapa(imm8(op) as u8), next);
    }

    // LDC: register to control register

    pub(crate) fn ldc_sr(&mut self, op: u16) {
        let value = self.regs.r(reg_n(op));
        self.regs.set_sr(value);
    }

    pub(crate) fn ldc_gbr(&mut self, op: u16) {
        let value = self.regs.r(reg_n(op));
        self.regs.set(GBR, value);
    }

    pub(crate) fn ldc_vbr(&mut self, op: u16) {
        let value = self.regs.r(reg_n(op));
        self.regs.set(VBR, value);
    }

    // LDC.L: post-increment memory to control register

    pub(crate) fn ldcl_sr(&mut self, op: u16) {
        let value = self.load_postinc(op);
        self.regs.set_sr(value);
    }

    pub(crate) fn ldcl_gbr(&mut self, op: u16) {
        let value = self.load_postinc(op);
        self.regs.set(GBR, value);
    }

    pub(crate) fn ldcl_vbr(&mut self, op: u16) {
        let value = self.load_postinc(op);
        self.regs.set(VBR, value);
    }

    // LDS: register to system register

    pub(crate) fn lds_mach(&mut self, op: u16) {
        let value = self.regs.r(reg_n(op));
        self.regs.set(MACH, value);
    }

    pub(crate) fn lds_macl(&mut self, op: u16) {
        let value = self.regs.r(reg_n(op));
        self.regs.set(MACL, value);
    }

    pub(crate) fn lds_pr(&mut self, op: u16) {
        let value = self.regs.r(reg_n(op));
        self.regs.set(PR, value);
    }

    // LDS.L: post-increment memory to system register

    pub(crate) fn ldsl_mach(&mut self, op: u16) {
        let value = self.load_postinc(op);
        self.regs.set(MACH, value);
    }

    pub(crate) fn ldsl_macl(&mut self, op: u16) {
        let value = self.load_postinc(op);
        self.regs.set(MACL, value);
    }

    pub(crate) fn ldsl_pr(&mut self, op: u16) {
        let value = self.load_postinc(op);
        self.regs.set(PR, value);
    }

    // STC: control register to register

    pub(crate) fn stc_sr(&mut self, op: u16) {
        self.regs.set_r(reg_n(op), self.regs.sr());
    }

    pub(crate) fn stc_gbr(&mut self, op: u16) {
        self.regs.set_r(reg_n(op), self.regs.get(GBR));
    }

    pub(crate) fn stc_vbr(&mut self, op: u16) {
        self.regs.set_r(reg_n(op), self.regs.get(VBR));
    }

    // STC.L: control register to pre-decrement memory

    pub(crate) fn stcl_sr(&mut self, op: u16) {
        let value = self.regs.sr();
        self.store_predec(op, value);
    }

    pub(crate) fn stcl_gbr(&mut self, op: u16) {
        let value = self.regs.get(GBR);
        self.store_predec(op, value);
    }

    pub(crate) fn stcl_vbr(&mut self, op: u16) {
        let value = self.regs.get(VBR);
        self.store_predec(op, value);
    }

    // STS: system register to register

    pub(crate) fn sts_mach(&mut self, op: u16) {
        self.regs.set_r(reg_n(op), self.regs.get(MACH));
    }

    pub(crate) fn sts_macl(&mut self, op: u16) {
        self.regs.set_r(reg_n(op), self.regs.get(MACL));
    }

    pub(crate) fn sts_pr(&mut self, op: u16) {
        self.regs.set_r(reg_n(op), self.regs.get(PR));
    }

    // STS.L: system register to pre-decrement memory

    pub(crate) fn stsl_mach(&mut self, op: u16) {
        let value = self.regs.get(MACH);
        self.store_predec(op, value);
    }

    pub(crate) fn stsl_macl(&mut self, op: u16) {
        let value = self.regs.get(MACL);
        self.store_predec(op, value);
    }

    pub(crate) fn stsl_pr(&mut self, op: u16) {
        let value = self.regs.get(PR);
        self.store_predec(op, value);
    }

    /// Shared `@Rm+` long-word load for the LDC.L/LDS.L families.
    fn load_postinc(&mut self, op: u16) -> u32 {
        let m = reg_n(op);
        let addr = self.regs.r(m);
        let value = self.bus.read32(addr);
        self.regs.set_r(m, addr.wrapping_add(4));
        value
    }

    /// Shared `@-Rn` long-word store for the STC.L/STS.L families.
    fn store_predec(&mut self, op: u16, value: u32) {
        let n = reg_n(op);
        let addr = self.regs.r(n).wrapping_sub(4);
        self.regs.set_r(n, addr);
        self.bus.write32(addr, value);
    }
}
