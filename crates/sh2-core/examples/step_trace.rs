//! Steps a tiny in-RAM program and prints a disassembly trace per cycle.
//!
//! ```sh
//! cargo run -p sh2-core --example step_trace
//! ```

use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use sh2_core::{disassemble_one, read_u16_le, read_u32_le, write_u16_le, write_u32_le, Bus, Sh2};

const RAM_BYTES: usize = 0x1_0000;

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

fn main() {
    let mut ram = Ram::new();

    // Reset vectors: PC = 0x1000, SP = 0x8000.
    write_u32_le(&mut ram.0, 0x0, 0x1000);
    write_u32_le(&mut ram.0, 0x4, 0x8000);

    // Sum 1..=5 with a DT-driven loop, then sleep:
    //   MOV #5,R1 ; MOV #0,R0
    // loop:
    //   ADD R1,R0 ; DT R1 ; BF loop
    //   SLEEP
    let program: [u16; 6] = [0xE105, 0xE000, 0x300C, 0x4110, 0x8BFC, 0x001B];
    for (index, word) in program.iter().enumerate() {
        write_u16_le(&mut ram.0, 0x1000 + index * 2, *word);
    }

    let mut cpu = Sh2::new(ram);
    cpu.power_on();

    while !cpu.state().is_asleep() {
        let pc = cpu.regs.pc();
        let raw = cpu.bus.read16(pc);
        let row = disassemble_one(pc, raw);

        cpu.cycle();

        println!(
            "{:08X}  {:04X}  {:<8} {:<24} r0={:08X} r1={:08X} t={}",
            row.addr,
            row.raw,
            row.mnemonic,
            row.operands,
            cpu.regs.r(0),
            cpu.regs.r(1),
            u8::from(cpu.regs.t()),
        );
    }

    println!("sum(1..=5) = {}", cpu.regs.r(0));
    assert_eq!(cpu.regs.r(0), 15);
}
