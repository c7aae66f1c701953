//! Arithmetic executors: add/subtract with carry and overflow, compares,
//! the restoring-division step, and the multiply/accumulate family.

use crate::bus::Bus;
use crate::cpu::Sh2;
use crate::encoding::{reg_m, reg_n, sign_extend16, simm8};
use crate::state::{MACH, MACL};

impl<B: Bus> Sh2<B> {
    pub(crate) fn add(&mut self, op: u16) {
        let n = reg_n(op);
        let sum = self.regs.r(n).wrapping_add(self.regs.r(reg_m(op)));
        self.regs.set_r(n, sum);
    }

    pub(crate) fn add_i(&mut self, op: u16) {
        let n = reg_n(op);
        let sum = self.regs.r(n).wrapping_add(simm8(op));
        self.regs.set_r(n, sum);
    }

    pub(crate) fn addc(&mut self, op: u16) {
        let n = reg_n(op);
        let (partial, carry0) = self.regs.r(n).overflowing_add(self.regs.r(reg_m(op)));
        let (sum, carry1) = partial.overflowing_add(u32::from(self.regs.t()));
        self.regs.set_r(n, sum);
        self.regs.set_t(carry0 | carry1);
    }

    pub(crate) fn addv(&mut self, op: u16) {
        let n = reg_n(op);
        let (sum, overflow) =
            (self.regs.r(n) as i32).overflowing_add(self.regs.r(reg_m(op)) as i32);
        self.regs.set_r(n, sum as u32);
        self.regs.set_t(overflow);
    }

    pub(crate) fn sub(&mut self, op: u16) {
        let n = reg_n(op);
        let diff = self.regs.r(n).wrapping_sub(self.regs.r(reg_m(op)));
        self.regs.set_r(n, diff);
    }

    pub(crate) fn subc(&mut self, op: u16) {
        let n = reg_n(op);
        let (partial, borrow0) = self.regs.r(n).overflowing_sub(self.regs.r(reg_m(op)));
        let (diff, borrow1) = partial.overflowing_sub(u32::from(self.regs.t()));
        self.regs.set_r(n, diff);
        self.regs.set_t(borrow0 | borrow1);
    }

    pub(crate) fn subv(&mut self, op: u16) {
        let n = reg_n(op);
        let (diff, underflow) =
            (self.regs.r(n) as i32).overflowing_sub(self.regs.r(reg_m(op)) as i32);
        self.regs.set_r(n, diff as u32);
        self.regs.set_t(underflow);
    }

    pub(crate) fn neg(&mut self, op: u16) {
        let value = 0u32.wrapping_sub(self.regs.r(reg_m(op)));
        self.regs.set_r(reg_n(op), value);
    }

    pub(crate) fn negc(&mut self, op: u16) {
        let (partial, borrow0) = 0u32.overflowing_sub(self.regs.r(reg_m(op)));
        let (value, borrow1) = partial.overflowing_sub(u32::from(self.regs.t()));
        self.regs.set_r(reg_n(op), value);
        self.regs.set_t(borrow0 | borrow1);
    }

    pub(crate) fn dt(&mut self, op: u16) {
        let n = reg_n(op);
        let value = self.regs.r(n).wrapping_sub(1);
        self.regs.set_r(n, value);
        self.regs.set_t(value == 0);
    }

    // Compares

    pub(crate) fn cmp_eq(&mut self, op: u16) {
        let t = self.regs.r(reg_n(op)) == self.regs.r(reg_m(op));
        self.regs.set_t(t);
    }

    pub(crate) fn cmp_eq_i(&mut self, op: u16) {
        self.regs.set_t(self.regs.r(0) == simm8(op));
    }

    pub(crate) fn cmp_hs(&mut self, op: u16) {
        let t = self.regs.r(reg_n(op)) >= self.regs.r(reg_m(op));
        self.regs.set_t(t);
    }

    pub(crate) fn cmp_ge(&mut self, op: u16) {
        let t = (self.regs.r(reg_n(op)) as i32) >= (self.regs.r(reg_m(op)) as i32);
        self.regs.set_t(t);
    }

    pub(crate) fn cmp_hi(&mut self, op: u16) {
        let t = self.regs.r(reg_n(op)) > self.regs.r(reg_m(op));
        self.regs.set_t(t);
    }

    pub(crate) fn cmp_gt(&mut self, op: u16) {
        let t = (self.regs.r(reg_n(op)) as i32) > (self.regs.r(reg_m(op)) as i32);
        self.regs.set_t(t);
    }

    pub(crate) fn cmp_pl(&mut self, op: u16) {
        self.regs.set_t((self.regs.r(reg_n(op)) as i32) > 0);
    }

    pub(crate) fn cmp_pz(&mut self, op: u16) {
        self.regs.set_t((self.regs.r(reg_n(op)) as i32) >= 0);
    }

    /// T is set when any of the four byte lanes of Rn and Rm are equal.
    pub(crate) fn cmp_str(&mut self, op: u16) {
        let diff = self.regs.r(reg_n(op)) ^ self.regs.r(reg_m(op));
        let any_zero_byte = diff & 0xFF == 0
            || diff & 0xFF00 == 0
            || diff & 0xFF_0000 == 0
            || diff & 0xFF00_0000 == 0;
        self.regs.set_t(any_zero_byte);
    }

    // Division step

    pub(crate) fn div0s(&mut self, op: u16) {
        let q = self.regs.r(reg_n(op)) & 0x8000_0000 != 0;
        let m = self.regs.r(reg_m(op)) & 0x8000_0000 != 0;
        self.regs.set_q(q);
        self.regs.set_m(m);
        self.regs.set_t(q != m);
    }

    pub(crate) fn div0u(&mut self) {
        self.regs.set_q(false);
        self.regs.set_m(false);
        self.regs.set_t(false);
    }

    /// One restoring-division step, following the SH-2 programming manual's
    /// DIV1 operation table: shift T into Rn, subtract Rm when the saved Q
    /// equals M (add otherwise), then derive the new quotient bit from the
    /// carry/borrow and the pre-shift MSB.
    pub(crate) fn div1(&mut self, op: u16) {
        let n = reg_n(op);
        let rm = self.regs.r(reg_m(op));
        let m_bit = self.regs.m();
        let old_q = self.regs.q();

        let msb = self.regs.r(n) & 0x8000_0000 != 0;
        let shifted = (self.regs.r(n) << 1) | u32::from(self.regs.t());

        let (result, moved) = if old_q == m_bit {
            let r = shifted.wrapping_sub(rm);
            (r, r > shifted)
        } else {
            let r = shifted.wrapping_add(rm);
            (r, r < shifted)
        };

        let q = match (m_bit, msb) {
            (false, false) => moved,
            (false, true) => !moved,
            (true, false) => !moved,
            (true, true) => moved,
        };

        self.regs.set_r(n, result);
        self.regs.set_q(q);
        self.regs.set_t(q == m_bit);
    }

    // Multiplies

    pub(crate) fn mul_l(&mut self, op: u16) {
        let product = self.regs.r(reg_n(op)).wrapping_mul(self.regs.r(reg_m(op)));
        self.regs.set(MACL, product);
    }

    pub(crate) fn muls_w(&mut self, op: u16) {
        let lhs = sign_extend16(self.regs.r(reg_n(op)) as u16) as i32;
        let rhs = sign_extend16(self.regs.r(reg_m(op)) as u16) as i32;
        self.regs.set(MACL, lhs.wrapping_mul(rhs) as u32);
    }

    pub(crate) fn mulu_w(&mut self, op: u16) {
        let lhs = u32::from(self.regs.r(reg_n(op)) as u16);
        let rhs = u32::from(self.regs.r(reg_m(op)) as u16);
        self.regs.set(MACL, lhs.wrapping_mul(rhs));
    }

    /// Signed 64-bit product: widen both operands to i64, multiply, and
    /// split the bits across MACH:MACL.
    pub(crate) fn dmuls_l(&mut self, op: u16) {
        let lhs = i64::from(self.regs.r(reg_n(op)) as i32);
        let rhs = i64::from(self.regs.r(reg_m(op)) as i32);
        let product = lhs.wrapping_mul(rhs) as u64;
        self.regs.set(MACH, (product >> 32) as u32);
        self.regs.set(MACL, product as u32);
    }

    pub(crate) fn dmulu_l(&mut self, op: u16) {
        let product = u64::from(self.regs.r(reg_n(op))) * u64::from(self.regs.r(reg_m(op)));
        self.regs.set(MACH, (product >> 32) as u32);
        self.regs.set(MACL, product as u32);
    }

    /// Reads @Rn+ then @Rm+ (each bumped by 4), multiplies signed, and adds
    /// the 64-bit product into MACH:MACL. Wrap-around; SR.S is ignored.
    pub(crate) fn mac_l(&mut self, op: u16) {
        let n = reg_n(op);
        let m = reg_m(op);

        let addr_n = self.regs.r(n);
        let operand_n = self.bus.read32(addr_n) as i32;
        self.regs.set_r(n, addr_n.wrapping_add(4));

        let addr_m = self.regs.r(m);
        let operand_m = self.bus.read32(addr_m) as i32;
        self.regs.set_r(m, addr_m.wrapping_add(4));

        let mac = (u64::from(self.regs.get(MACH)) << 32) | u64::from(self.regs.get(MACL));
        let product = i64::from(operand_n).wrapping_mul(i64::from(operand_m));
        let sum = mac.wrapping_add(product as u64);

        self.regs.set(MACH, (sum >> 32) as u32);
        self.regs.set(MACL, sum as u32);
    }

    /// Word-sized MAC accumulates into MACL only; MACH is untouched.
    pub(crate) fn mac_w(&mut self, op: u16) {
        let n = reg_n(op);
        let m = reg_m(op);

        let addr_n = self.regs.r(n);
        let operand_n = sign_extend16(self.bus.read16(addr_n)) as i32;
        self.regs.set_r(n, addr_n.wrapping_add(2));

        let addr_m = self.regs.r(m);
        let operand_m = sign_extend16(self.bus.read16(addr_m)) as i32;
        self.regs.set_r(m, addr_m.wrapping_add(2));

        let product = operand_n.wrapping_mul(operand_m);
        let sum = self.regs.get(MACL).wrapping_add(product as u32);
        self.regs.set(MACL, sum);
    }
}
