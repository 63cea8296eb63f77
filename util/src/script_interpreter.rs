//! # Tank script interpreter module
//!
//! This module provides an interpreter for tank scripts, allowing telecommands to be replayed at
//! fixed times after the start of a session.
//!
//! A script is a list of `<time_s>: <tc json>;` entries, for example:
//!
//! ```text
//! 0.5: {"UpdatePosition": "10.0,0.0,10.0"};
//! 1.0: {"SetDestination": "100.0,0.0,100.0"};
//! ```
//!
//! Anything outside of an entry is ignored, so comments may be written on their own lines.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use comms_if::tc::{Tc, TcParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
#[derive(Debug)]
struct Command {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The Telecommand to run
    tc: Tc
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending_tcs` to
/// acquire a list of telecommands that need executing.
#[derive(Debug)]
pub struct ScriptInterpreter {
    _script_path: Option<PathBuf>,
    cmds: VecDeque<Command>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid TC at {0} s: {1}")]
    InvalidTc(f64, TcParseError),

    #[error("Script entries must be in time order, found {1} s after {0} s")]
    OutOfOrder(f64, f64)
}

#[derive(Debug)]
pub enum PendingTcs {
    None,
    Some(Vec<Tc>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(
                ScriptError::ScriptNotFound(path.display().to_string()));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_script_str(&script)?;
        si._script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {
        // Empty queue of commands
        let mut tc_queue: VecDeque<Command> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(|e| ScriptError::InvalidTimestamp(e.to_string()))?;

        for cap in re.captures_iter(script) {
            let (time_str, tc_str) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(c)) => (t.as_str(), c.as_str()),
                _ => continue
            };

            // Parse the exec time
            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(prev) = tc_queue.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(prev.exec_time_s, exec_time_s))
                }
            }

            // Parse the TC from the payload. The scripts contain JSON only.
            let tc = Tc::from_json(tc_str)
                .map_err(|e| ScriptError::InvalidTc(exec_time_s, e))?;

            tc_queue.push_back(Command {
                exec_time_s,
                tc
            });
        }

        if tc_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: None,
            cmds: tc_queue
        })
    }

    /// Return the TCs whose execution time is earlier than `current_time_s`.
    ///
    /// Once every TC has been released `EndOfScript` is returned.
    pub fn get_pending_tcs(&mut self, current_time_s: f64) -> PendingTcs {

        // If the queue is empty the script is over
        if self.cmds.is_empty() {
            return PendingTcs::EndOfScript
        }

        let mut tc_vec: Vec<Tc> = vec![];

        while let Some(cmd) = self.cmds.front() {
            if cmd.exec_time_s >= current_time_s {
                break;
            }
            if let Some(cmd) = self.cmds.pop_front() {
                tc_vec.push(cmd.tc);
            }
        }

        if tc_vec.is_empty() {
            PendingTcs::None
        }
        else {
            PendingTcs::Some(tc_vec)
        }
    }

    /// Get the number of TCs remaining in the script
    pub fn get_num_tcs(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SCRIPT: &str = r#"
        // Drive to the far corner then look for targets
        0.5: {"UpdatePosition": "10.0,0.0,10.0"};
        1.0: {"SetDestination": "100.0,0.0,100.0"};
        2.25: {"Detections": [{"id": 3, "distance": 60.0, "pixel_count": 420}]};
    "#;

    #[test]
    fn test_script_parse() {
        let si = ScriptInterpreter::from_script_str(SCRIPT).unwrap();
        assert_eq!(si.get_num_tcs(), 3);
        assert_eq!(si.get_duration(), 2.25);
    }

    #[test]
    fn test_pending_tcs() {
        let mut si = ScriptInterpreter::from_script_str(SCRIPT).unwrap();

        match si.get_pending_tcs(0.1) {
            PendingTcs::None => (),
            p => panic!("Expected no TCs, got {:?}", p)
        }

        match si.get_pending_tcs(1.5) {
            PendingTcs::Some(tcs) => {
                assert_eq!(tcs.len(), 2);
                assert_eq!(tcs[0], Tc::UpdatePosition("10.0,0.0,10.0".into()));
                assert_eq!(tcs[1], Tc::SetDestination("100.0,0.0,100.0".into()));
            },
            p => panic!("Expected two TCs, got {:?}", p)
        }

        match si.get_pending_tcs(3.0) {
            PendingTcs::Some(tcs) => assert_eq!(tcs.len(), 1),
            p => panic!("Expected one TC, got {:?}", p)
        }

        match si.get_pending_tcs(4.0) {
            PendingTcs::EndOfScript => (),
            p => panic!("Expected end of script, got {:?}", p)
        }
    }

    #[test]
    fn test_bad_scripts() {
        match ScriptInterpreter::from_script_str("nothing to see here") {
            Err(ScriptError::ScriptEmpty) => (),
            r => panic!("Expected empty script error, got {:?}", r)
        }

        match ScriptInterpreter::from_script_str("1.0: {\"Launch\": 1};") {
            Err(ScriptError::InvalidTc(t, _)) => assert_eq!(t, 1.0),
            r => panic!("Expected invalid TC error, got {:?}", r)
        }

        let unordered = "2.0: {\"UpdatePosition\": \"0,0,0\"};\n\
                         1.0: {\"UpdatePosition\": \"1,0,1\"};";
        match ScriptInterpreter::from_script_str(unordered) {
            Err(ScriptError::OutOfOrder(a, b)) => assert_eq!((a, b), (2.0, 1.0)),
            r => panic!("Expected out of order error, got {:?}", r)
        }
    }
}
