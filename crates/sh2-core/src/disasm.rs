//! Instruction disassembly.
//!
//! Decode-driven formatting of raw opcodes into mnemonic/operand strings,
//! for debugger embedders and execution traces. PC-relative operands are
//! resolved against the instruction address, so branch rows show absolute
//! targets. Illegal encodings render as `.word 0xXXXX`.

use crate::bus::Bus;
use crate::decoder::{decode, Instruction};
use crate::encoding::{disp4, imm8, reg_m, reg_n, sdisp12, simm8};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DisassemblyRow {
    /// Address the opcode was fetched from.
    pub addr: u32,
    /// Raw 16-bit opcode.
    pub raw: u16,
    /// Instruction mnemonic (e.g. `MOV.L`, `ADDC`), or `.word` when illegal.
    pub mnemonic: String,
    /// Formatted operands (e.g. `R5, @(R0, R3)`), empty for no-operand forms.
    pub operands: String,
    /// Whether the encoding has no assigned instruction.
    pub is_illegal: bool,
}

/// Disassembles one opcode fetched from `addr`.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn disassemble_one(addr: u32, raw: u16) -> DisassemblyRow {
    let instr = decode(raw);

    let n = reg_n(raw);
    let m = reg_m(raw);
    let d4 = disp4(raw);
    let imm = imm8(raw);

    // Targets mirror the executors: displacement branches land at
    // addr + 4 + disp * 2, PC-relative loads read from addr + 4 (masked for
    // long-word forms).
    let disp8_target = addr.wrapping_add(4).wrapping_add(simm8(raw) << 1);
    let disp12_target = addr.wrapping_add(4).wrapping_add(sdisp12(raw) << 1);
    let pcw_ea = addr.wrapping_add(4).wrapping_add(imm << 1);
    let pcl_ea = (addr.wrapping_add(4) & !3).wrapping_add(imm << 2);

    use Instruction::*;
    let (mnemonic, operands) = match instr {
        Mov => ("MOV", format!("R{m}, R{n}")),
        MovI => ("MOV", format!("#{}, R{n}", simm8(raw) as i32)),
        MovwPc => ("MOV.W", format!("@0x{pcw_ea:08X}, R{n}")),
        MovlPc => ("MOV.L", format!("@0x{pcl_ea:08X}, R{n}")),
        Mova => ("MOVA", format!("@0x{pcl_ea:08X}, R0")),
        Movt => ("MOVT", format!("R{n}")),
        MovbStore => ("MOV.B", format!("R{m}, @R{n}")),
        MovwStore => ("MOV.W", format!("R{m}, @R{n}")),
        MovlStore => ("MOV.L", format!("R{m}, @R{n}")),
        MovbLoad => ("MOV.B", format!("@R{m}, R{n}")),
        MovwLoad => ("MOV.W", format!("@R{m}, R{n}")),
        MovlLoad => ("MOV.L", format!("@R{m}, R{n}")),
        MovbStoreDec => ("MOV.B", format!("R{m}, @-R{n}")),
        MovwStoreDec => ("MOV.W", format!("R{m}, @-R{n}")),
        MovlStoreDec => ("MOV.L", format!("R{m}, @-R{n}")),
        MovbLoadInc => ("MOV.B", format!("@R{m}+, R{n}")),
        MovwLoadInc => ("MOV.W", format!("@R{m}+, R{n}")),
        MovlLoadInc => ("MOV.L", format!("@R{m}+, R{n}")),
        MovbStoreDisp => ("MOV.B", format!("R0, @({d4}, R{m})")),
        MovwStoreDisp => ("MOV.W", format!("R0, @({}, R{m})", d4 * 2)),
        MovlStoreDisp => ("MOV.L", format!("R{m}, @({}, R{n})", d4 * 4)),
        MovbLoadDisp => ("MOV.B", format!("@({d4}, R{m}), R0")),
        MovwLoadDisp => ("MOV.W", format!("@({}, R{m}), R0", d4 * 2)),
        MovlLoadDisp => ("MOV.L", format!("@({}, R{m}), R{n}", d4 * 4)),
        MovbStoreIdx => ("MOV.B", format!("R{m}, @(R0, R{n})")),
        MovwStoreIdx => ("MOV.W", format!("R{m}, @(R0, R{n})")),
        MovlStoreIdx => ("MOV.L", format!("R{m}, @(R0, R{n})")),
        MovbLoadIdx => ("MOV.B", format!("@(R0, R{m}), R{n}")),
        MovwLoadIdx => ("MOV.W", format!("@(R0, R{m}), R{n}")),
        MovlLoadIdx => ("MOV.L", format!("@(R0, R{m}), R{n}")),
        MovbStoreGbr => ("MOV.B", format!("R0, @({imm}, GBR)")),
        MovwStoreGbr => ("MOV.W", format!("R0, @({}, GBR)", imm * 2)),
        MovlStoreGbr => ("MOV.L", format!("R0, @({}, GBR)", imm * 4)),
        MovbLoadGbr => ("MOV.B", format!("@({imm}, GBR), R0")),
        MovwLoadGbr => ("MOV.W", format!("@({}, GBR), R0", imm * 2)),
        MovlLoadGbr => ("MOV.L", format!("@({}, GBR), R0", imm * 4)),
        SwapB => ("SWAP.B", format!("R{m}, R{n}")),
        SwapW => ("SWAP.W", format!("R{m}, R{n}")),
        Xtrct => ("XTRCT", format!("R{m}, R{n}")),
        ExtsB => ("EXTS.B", format!("R{m}, R{n}")),
        ExtsW => ("EXTS.W", format!("R{m}, R{n}")),
        ExtuB => ("EXTU.B", format!("R{m}, R{n}")),
        ExtuW => ("EXTU.W", format!("R{m}, R{n}")),

        Add => ("ADD", format!("R{m}, R{n}")),
        AddI => ("ADD", format!("#{}, R{n}", simm8(raw) as i32)),
        Addc => ("ADDC", format!("R{m}, R{n}")),
        Addv => ("ADDV", format!("R{m}, R{n}")),
        Sub => ("SUB", format!("R{m}, R{n}")),
        Subc => ("SUBC", format!("R{m}, R{n}")),
        Subv => ("SUBV", format!("R{m}, R{n}")),
        Neg => ("NEG", format!("R{m}, R{n}")),
        Negc => ("NEGC", format!("R{m}, R{n}")),
        Dt => ("DT", format!("R{n}")),
        CmpEq => ("CMP/EQ", format!("R{m}, R{n}")),
        CmpEqI => ("CMP/EQ", format!("#{}, R0", simm8(raw) as i32)),
        CmpHs => ("CMP/HS", format!("R{m}, R{n}")),
        CmpGe => ("CMP/GE", format!("R{m}, R{n}")),
        CmpHi => ("CMP/HI", format!("R{m}, R{n}")),
        CmpGt => ("CMP/GT", format!("R{m}, R{n}")),
        CmpPl => ("CMP/PL", format!("R{n}")),
        CmpPz => ("CMP/PZ", format!("R{n}")),
        CmpStr => ("CMP/STR", format!("R{m}, R{n}")),
        Div0s => ("DIV0S", format!("R{m}, R{n}")),
        Div0u => ("DIV0U", String::new()),
        Div1 => ("DIV1", format!("R{m}, R{n}")),
        MulL => ("MUL.L", format!("R{m}, R{n}")),
        MulsW => ("MULS.W", format!("R{m}, R{n}")),
        MuluW => ("MULU.W", format!("R{m}, R{n}")),
        DmulsL => ("DMULS.L", format!("R{m}, R{n}")),
        DmuluL => ("DMULU.L", format!("R{m}, R{n}")),
        MacL => ("MAC.L", format!("@R{m}+, @R{n}+")),
        MacW => ("MAC.W", format!("@R{m}+, @R{n}+")),

        And => ("AND", format!("R{m}, R{n}")),
        AndI => ("AND", format!("#0x{imm:02X}, R0")),
        AndbGbr => ("AND.B", format!("#0x{imm:02X}, @(R0, GBR)")),
        Or => ("OR", format!("R{m}, R{n}")),
        OrI => ("OR", format!("#0x{imm:02X}, R0")),
        OrbGbr => ("OR.B", format!("#0x{imm:02X}, @(R0, GBR)")),
        Xor => ("XOR", format!("R{m}, R{n}")),
        XorI => ("XOR", format!("#0x{imm:02X}, R0")),
        XorbGbr => ("XOR.B", format!("#0x{imm:02X}, @(R0, GBR)")),
        Not => ("NOT", format!("R{m}, R{n}")),
        Tst => ("TST", format!("R{m}, R{n}")),
        TstI => ("TST", format!("#0x{imm:02X}, R0")),
        TstbGbr => ("TST.B", format!("#0x{imm:02X}, @(R0, GBR)")),
        Tas => ("TAS.B", format!("@R{n}")),

        Shal => ("SHAL", format!("R{n}")),
        Shar => ("SHAR", format!("R{n}")),
        Shll => ("SHLL", format!("R{n}")),
        Shlr => ("SHLR", format!("R{n}")),
        Shll2 => ("SHLL2", format!("R{n}")),
        Shll8 => ("SHLL8", format!("R{n}")),
        Shll16 => ("SHLL16", format!("R{n}")),
        Shlr2 => ("SHLR2", format!("R{n}")),
        Shlr8 => ("SHLR8", format!("R{n}")),
        Shlr16 => ("SHLR16", format!("R{n}")),
        Rotl => ("ROTL", format!("R{n}")),
        Rotr => ("ROTR", format!("R{n}")),
        Rotcl => ("ROTCL", format!("R{n}")),
        Rotcr => ("ROTCR", format!("R{n}")),

        Bf => ("BF", format!("0x{disp8_target:08X}")),
        BfS => ("BF/S", format!("0x{disp8_target:08X}")),
        Bt => ("BT", format!("0x{disp8_target:08X}")),
        BtS => ("BT/S", format!("0x{disp8_target:08X}")),
        Bra => ("BRA", format!("0x{disp12_target:08X}")),
        Bsr => ("BSR", format!("0x{disp12_target:08X}")),
        Braf => ("BRAF", format!("R{n}")),
        Bsrf => ("BSRF", format!("R{n}")),
        Jmp => ("JMP", format!("@R{n}")),
        Jsr => ("JSR", format!("@R{n}")),
        Rts => ("RTS", String::new()),

        Clrt => ("CLRT", String::new()),
        Clrmac => ("CLRMAC", String::new()),
        Sett => ("SETT", String::new()),
        Sleep => ("SLEEP", String::new()),
        Nop => ("NOP", String::new()),
        Rte => ("RTE", String::new()),
        Trapa => ("TRAPA", format!("#0x{imm:02X}")),
        LdcSr => ("LDC", format!("R{n}, SR")),
        LdcGbr => ("LDC", format!("R{n}, GBR")),
        LdcVbr => ("LDC", format!("R{n}, VBR")),
        LdclSr => ("LDC.L", format!("@R{n}+, SR")),
        LdclGbr => ("LDC.L", format!("@R{n}+, GBR")),
        LdclVbr => ("LDC.L", format!("@R{n}+, VBR")),
        LdsMach => ("LDS", format!("R{n}, MACH")),
        LdsMacl => ("LDS", format!("R{n}, MACL")),
        LdsPr => ("LDS", format!("R{n}, PR")),
        LdslMach => ("LDS.L", format!("@R{n}+, MACH")),
        LdslMacl => ("LDS.L", format!("@R{n}+, MACL")),
        LdslPr => ("LDS.L", format!("@R{n}+, PR")),
        StcSr => ("STC", format!("SR, R{n}")),
        StcGbr => ("STC", format!("GBR, R{n}")),
        StcVbr => ("STC", format!("VBR, R{n}")),
        StclSr => ("STC.L", format!("SR, @-R{n}")),
        StclGbr => ("STC.L", format!("GBR, @-R{n}")),
        StclVbr => ("STC.L", format!("VBR, @-R{n}")),
        StsMach => ("STS", format!("MACH, R{n}")),
        StsMacl => ("STS", format!("MACL, R{n}")),
        StsPr => ("STS", format!("PR, R{n}")),
        StslMach => ("STS.L", format!("MACH, @-R{n}")),
        StslMacl => ("STS.L", format!("MACL, @-R{n}")),
        StslPr => ("STS.L", format!("PR, @-R{n}")),

        Illegal => (".word", format!("0x{raw:04X}")),
    };

    DisassemblyRow {
        addr,
        raw,
        mnemonic: mnemonic.to_owned(),
        operands,
        is_illegal: instr == Illegal,
    }
}

/// Disassembles a window of instructions around `center_pc`.
///
/// Produces `before` rows ahead of the center, the center row, and `after`
/// rows past it, in address order. Instructions are fixed-width, so the
/// window is a straight walk from `center_pc - before * 2`.
pub fn disassemble_window<B: Bus>(
    bus: &mut B,
    center_pc: u32,
    before: usize,
    after: usize,
) -> Vec<DisassemblyRow> {
    let start = center_pc.wrapping_sub((before as u32) * 2);
    let total = before + 1 + after;

    (0..total)
        .map(|index| {
            let addr = start.wrapping_add((index as u32) * 2) & !1;
            let raw = bus.read16(addr);
            disassemble_one(addr, raw)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{disassemble_one, disassemble_window};
    use crate::bus::Bus;

    struct WordBus(Vec<u16>);

    impl Bus for WordBus {
        fn read8(&mut self, _addr: u32) -> u8 {
            0
        }
        fn read16(&mut self, addr: u32) -> u16 {
            self.0[(addr as usize / 2) % self.0.len()]
        }
        fn read32(&mut self, _addr: u32) -> u32 {
            0
        }
        fn write8(&mut self, _addr: u32, _value: u8) {}
        fn write16(&mut self, _addr: u32, _value: u16) {}
        fn write32(&mut self, _addr: u32, _value: u32) {}
    }

    #[test]
    fn register_forms_render_both_operands() {
        let row = disassemble_one(0, 0x300C);
        assert_eq!(row.mnemonic, "ADD");
        assert_eq!(row.operands, "R0, R0");

        let row = disassemble_one(0, 0x6A53);
        assert_eq!(row.mnemonic, "MOV");
        assert_eq!(row.operands, "R5, R10");
    }

    #[test]
    fn immediates_render_signed() {
        let row = disassemble_one(0, 0x7203);
        assert_eq!(row.mnemonic, "ADD");
        assert_eq!(row.operands, "#3, R2");

        let row = disassemble_one(0, 0xE1FF);
        assert_eq!(row.operands, "#-1, R1");
    }

    #[test]
    fn branch_targets_resolve_against_the_instruction_address() {
        // BRA -2 from 0x200 lands back on 0x200.
        let row = disassemble_one(0x200, 0xAFFE);
        assert_eq!(row.mnemonic, "BRA");
        assert_eq!(row.operands, "0x00000200");
    }

    #[test]
    fn illegal_encodings_render_as_raw_words() {
        let row = disassemble_one(0, 0xF123);
        assert_eq!(row.mnemonic, ".word");
        assert_eq!(row.operands, "0xF123");
        assert!(row.is_illegal);
    }

    #[test]
    fn window_walks_fixed_width_instructions_in_address_order() {
        let mut bus = WordBus(vec![0x0009, 0x7201, 0x300C, 0xAFFE]);
        let rows = disassemble_window(&mut bus, 0x4, 2, 1);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].addr, 0x0);
        assert_eq!(rows[1].addr, 0x2);
        assert_eq!(rows[2].addr, 0x4);
        assert_eq!(rows[3].addr, 0x6);
        assert_eq!(rows[2].mnemonic, "ADD");
        assert_eq!(rows[3].mnemonic, "BRA");
    }
}
