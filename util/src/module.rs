//! Module interfaces
//!
//! Cyclic controllers in `tank_exec` which are initialised against a session and then stepped
//! once per control tick implement [`State`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// A cyclic control module.
pub trait State {
    /// Data needed to set the module up, usually a parameter file name.
    type InitData;
    /// Failure to set the module up.
    type InitError;

    /// Snapshot the module consumes each tick.
    type InputData;
    /// Command the module produces each tick.
    type OutputData;
    /// Monitoring quantities for the tick.
    type StatusReport;
    /// Failure during a tick.
    type ProcError;

    /// Set the module up for the given session.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Step the module once.
    ///
    /// Returns the tick's output and status report. A module must leave its state consistent on
    /// error so that the next tick can proceed.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
