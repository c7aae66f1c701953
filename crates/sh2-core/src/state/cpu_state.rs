//! Execution-state machine for host-observable CPU control flow.

/// Power and execution states of the CPU core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CpuState {
    /// Construction state; `cycle()` is a no-op until `power_on()`.
    #[default]
    PowerOff,
    /// Ordinary fetch/decode/execute.
    ProgramExecution,
    /// Inside an exception or interrupt handler; left via `RTE`.
    ExceptionProcessing,
    /// Entered by `SLEEP`; only interrupt arbitration runs.
    Sleep,
    /// Deep-sleep variant; treated like [`CpuState::Sleep`] by this core.
    Standby,
}

impl CpuState {
    /// Returns `true` when `cycle()` fetches and executes instructions.
    #[must_use]
    pub const fn is_executing(self) -> bool {
        matches!(self, Self::ProgramExecution | Self::ExceptionProcessing)
    }

    /// Returns `true` when the core is waiting for an interrupt.
    #[must_use]
    pub const fn is_asleep(self) -> bool {
        matches!(self, Self::Sleep | Self::Standby)
    }
}
