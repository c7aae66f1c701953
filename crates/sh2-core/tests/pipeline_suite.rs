//! Fetch, delay-slot, and sleep sequencing, including the literal
//! power-on/branch scenarios from the core contract.

use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use sh2_core::{
    read_u16_le, read_u32_le, write_u16_le, write_u32_le, Bus, CpuState, Sh2, PR,
    VEC_ILLEGAL_INSTRUCTION, VEC_ILLEGAL_SLOT,
};

const RAM_BYTES: usize = 0x2_0000;
const BOOT_PC: u32 = 0x1000;
const BOOT_SP: u32 = 0x8000;

struct Ram(Vec<u8>);

impl Ram {
    fn new() -> Self {
        Self(vec![0; RAM_BYTES])
    }

    fn at(addr: u32) -> usize {
        addr as usize % RAM_BYTES
    }
}

impl Bus for Ram {
    fn read8(&mut self, addr: u32) -> u8 {
        self.0[Self::at(addr)]
    }
    fn read16(&mut self, addr: u32) -> u16 {
        read_u16_le(&self.0, Self::at(addr))
    }
    fn read32(&mut self, addr: u32) -> u32 {
        read_u32_le(&self.0, Self::at(addr))
    }
    fn write8(&mut self, addr: u32, value: u8) {
        self.0[Self::at(addr)] = value;
    }
    fn write16(&mut self, addr: u32, value: u16) {
        write_u16_le(&mut self.0, Self::at(addr), value);
    }
    fn write32(&mut self, addr: u32, value: u32) {
        write_u32_le(&mut self.0, Self::at(addr), value);
    }
}

fn boot(program: &[u16]) -> Sh2<Ram> {
    let mut ram = Ram::new();
    write_u32_le(&mut ram.0, 0x0, BOOT_PC);
    write_u32_le(&mut ram.0, 0x4, BOOT_SP);
    for (index, word) in program.iter().enumerate() {
        write_u16_le(&mut ram.0, BOOT_PC as usize + index * 2, *word);
    }
    let mut cpu = Sh2::new(ram);
    cpu.power_on();
    cpu
}

fn run(cpu: &mut Sh2<Ram>, cycles: usize) {
    for _ in 0..cycles {
        cpu.cycle();
    }
}

#[test]
fn power_on_vector_load_scenario() {
    let mut ram = Ram::new();
    write_u32_le(&mut ram.0, 0x0, 0x0000_0100);
    write_u32_le(&mut ram.0, 0x4, 0x0010_0000);

    let mut cpu = Sh2::new(ram);
    cpu.power_on();

    assert_eq!(cpu.regs.pc(), 0x100);
    assert_eq!(cpu.regs.sp(), 0x0010_0000);
    assert_eq!(cpu.regs.imask(), 0xF);
    assert_eq!(cpu.state(), CpuState::ProgramExecution);
}

#[test]
fn nop_sleep_loop_scenario() {
    let mut cpu = boot(&[0x0009, 0x001B]); // NOP ; SLEEP
    run(&mut cpu, 2);
    assert_eq!(cpu.state(), CpuState::Sleep);

    let pc = cpu.regs.pc();
    run(&mut cpu, 5);
    assert_eq!(cpu.state(), CpuState::Sleep);
    assert_eq!(cpu.regs.pc(), pc);
}

#[test]
fn bra_to_self_scenario() {
    let mut cpu = boot(&[0xAFFE, 0x0009]); // BRA -2 ; NOP
    cpu.cycle();
    // Branch armed, slot not yet executed: PC still points at the slot.
    assert_eq!(cpu.regs.pc(), BOOT_PC + 2);

    cpu.cycle();
    // Slot NOP executed from the pre-branch stream, PC back on the branch.
    assert_eq!(cpu.regs.pc(), BOOT_PC);
    assert_eq!(cpu.state(), CpuState::ProgramExecution);
}

#[test]
fn delay_slot_effects_land_before_the_jump() {
    // BRA +2 (target 0x1008) with ADD #1,R0 in the slot.
    let mut cpu = boot(&[0xA002, 0x7001]);
    cpu.cycle();
    assert_eq!(cpu.regs.r(0), 0); // branch alone has no side effects

    cpu.cycle();
    assert_eq!(cpu.regs.r(0), 1); // slot fully applied
    assert_eq!(cpu.regs.pc(), 0x1008);
}

#[test]
fn bt_and_bf_are_immediate_branches() {
    // SETT ; BT +2
    let mut cpu = boot(&[0x0018, 0x8902]);
    run(&mut cpu, 2);
    assert_eq!(cpu.regs.pc(), 0x100A);

    // SETT ; BF +2 falls through
    let mut cpu = boot(&[0x0018, 0x8B02]);
    run(&mut cpu, 2);
    assert_eq!(cpu.regs.pc(), 0x1004);
}

#[test]
fn delayed_conditional_branch_executes_its_slot() {
    // SETT ; BT/S +2 ; ADD #1,R0
    let mut cpu = boot(&[0x0018, 0x8D02, 0x7001]);
    run(&mut cpu, 3);
    assert_eq!(cpu.regs.r(0), 1);
    assert_eq!(cpu.regs.pc(), 0x100A);
}

#[test]
fn untaken_delayed_conditional_does_not_arm_a_slot() {
    // SETT ; BF/S +2 ; NOP
    let mut cpu = boot(&[0x0018, 0x8F02, 0x0009]);
    run(&mut cpu, 3);
    assert_eq!(cpu.regs.pc(), 0x1006);
    assert_eq!(cpu.state(), CpuState::ProgramExecution);
}

#[test]
fn bsr_and_rts_roundtrip_through_pr() {
    let program = [
        0xB002, // 0x1000: BSR 0x1008
        0x0009, // 0x1002: slot NOP
        0xE505, // 0x1004: MOV #5,R5 (return point)
        0x0009, // 0x1006: NOP
        0xE707, // 0x1008: MOV #7,R7 (subroutine)
        0x000B, // 0x100A: RTS
        0x0009, // 0x100C: slot NOP
    ];
    let mut cpu = boot(&program);

    run(&mut cpu, 2);
    assert_eq!(cpu.regs.get(PR), 0x1004);
    assert_eq!(cpu.regs.pc(), 0x1008);

    run(&mut cpu, 3); // MOV #7 ; RTS ; slot NOP
    assert_eq!(cpu.regs.r(7), 7);
    assert_eq!(cpu.regs.pc(), 0x1004);

    cpu.cycle();
    assert_eq!(cpu.regs.r(5), 5);
}

#[test]
fn braf_and_bsrf_add_the_register_to_the_post_slot_pc() {
    // BRAF R1 ; NOP
    let mut cpu = boot(&[0x0123, 0x0009]);
    cpu.regs.set_r(1, 0x10);
    run(&mut cpu, 2);
    assert_eq!(cpu.regs.pc(), 0x1014);

    // BSRF R1 ; NOP
    let mut cpu = boot(&[0x0103, 0x0009]);
    cpu.regs.set_r(1, 0x10);
    run(&mut cpu, 2);
    assert_eq!(cpu.regs.get(PR), 0x1004);
    assert_eq!(cpu.regs.pc(), 0x1014);
}

#[test]
fn jmp_and_jsr_take_register_targets() {
    let mut cpu = boot(&[0x412B, 0x0009]); // JMP @R1 ; NOP
    cpu.regs.set_r(1, 0x4000);
    run(&mut cpu, 2);
    assert_eq!(cpu.regs.pc(), 0x4000);

    let mut cpu = boot(&[0x410B, 0x0009]); // JSR @R1 ; NOP
    cpu.regs.set_r(1, 0x4000);
    run(&mut cpu, 2);
    assert_eq!(cpu.regs.get(PR), 0x1004);
    assert_eq!(cpu.regs.pc(), 0x4000);
}

#[test]
fn branch_in_a_delay_slot_raises_slot_illegal() {
    // BRA +2 (target 0x1008) with another BRA in the slot.
    let mut cpu = boot(&[0xA002, 0xA000]);
    cpu.bus.write32(VEC_ILLEGAL_SLOT, 0x4000);
    let sr_before = cpu.regs.sr();

    run(&mut cpu, 2);

    assert_eq!(cpu.regs.pc(), 0x4000);
    assert_eq!(cpu.state(), CpuState::ExceptionProcessing);
    assert_eq!(cpu.regs.sp(), BOOT_SP - 8);
    // The pushed PC is the in-flight target of the original branch.
    assert_eq!(cpu.bus.read32(BOOT_SP - 8), 0x1008);
    assert_eq!(cpu.bus.read32(BOOT_SP - 4), sr_before);
}

#[test]
fn rts_in_a_delay_slot_raises_slot_illegal() {
    let mut cpu = boot(&[0xA002, 0x000B]); // BRA ; RTS in slot
    cpu.bus.write32(VEC_ILLEGAL_SLOT, 0x4000);
    run(&mut cpu, 2);
    assert_eq!(cpu.regs.pc(), 0x4000);
    assert_eq!(cpu.state(), CpuState::ExceptionProcessing);
}

#[test]
fn rte_in_a_delay_slot_raises_slot_illegal() {
    let mut cpu = boot(&[0xA002, 0x002B]); // BRA ; RTE in slot
    cpu.bus.write32(VEC_ILLEGAL_SLOT, 0x4000);
    run(&mut cpu, 2);

    assert_eq!(cpu.regs.pc(), 0x4000);
    assert_eq!(cpu.state(), CpuState::ExceptionProcessing);
    // RTE popped nothing: SP moved only by the two entry pushes, and the
    // pushed PC is the in-flight branch target.
    assert_eq!(cpu.regs.sp(), BOOT_SP - 8);
    assert_eq!(cpu.bus.read32(BOOT_SP - 8), 0x1008);
}

#[test]
fn trapa_in_a_delay_slot_raises_slot_illegal() {
    let mut cpu = boot(&[0xA002, 0xC310]); // BRA ; TRAPA #0x10 in slot
    cpu.bus.write32(VEC_ILLEGAL_SLOT, 0x4000);
    // TRAPA's own vector must not be taken.
    cpu.bus.write32(0x80 + 0x10 * 4, 0x6000);
    run(&mut cpu, 2);

    assert_eq!(cpu.regs.pc(), 0x4000);
    assert_eq!(cpu.state(), CpuState::ExceptionProcessing);
    assert_eq!(cpu.regs.sp(), BOOT_SP - 8);
    assert_eq!(cpu.bus.read32(BOOT_SP - 8), 0x1008);
}

#[test]
fn illegal_opcode_vectors_and_pushes_the_faulting_address() {
    let mut cpu = boot(&[0x0009, 0xF000]); // NOP ; illegal
    cpu.bus.write32(VEC_ILLEGAL_INSTRUCTION, 0x5000);
    let sr_before = cpu.regs.sr();

    run(&mut cpu, 2);

    assert_eq!(cpu.regs.pc(), 0x5000);
    assert_eq!(cpu.state(), CpuState::ExceptionProcessing);
    assert_eq!(cpu.bus.read32(BOOT_SP - 8), BOOT_PC + 2);
    assert_eq!(cpu.bus.read32(BOOT_SP - 4), sr_before);
}

#[test]
fn group0_holes_are_illegal_opcodes() {
    let mut cpu = boot(&[0x0000]);
    cpu.bus.write32(VEC_ILLEGAL_INSTRUCTION, 0x5000);
    cpu.cycle();
    assert_eq!(cpu.regs.pc(), 0x5000);
    assert_eq!(cpu.state(), CpuState::ExceptionProcessing);
}

#[test]
fn straight_line_pc_advances_by_two() {
    let mut cpu = boot(&[0x0009, 0x0009, 0x0009]);
    for step in 1..=3 {
        cpu.cycle();
        assert_eq!(cpu.regs.pc(), BOOT_PC + 2 * step);
    }
}
