use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How a run reacts to the first failing task.
///
/// - `WaitAll`: never abort; every task runs and every error is collected.
/// - `AbortFirst`: cancel and return as soon as one task fails, leaving tasks
///   already in flight to observe cancellation in the background.
/// - `AbortFirstWait`: cancel on the first failure but keep draining outcomes
///   until every admitted task has reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortMode {
    WaitAll,
    AbortFirst,
    AbortFirstWait,
}

impl AbortMode {
    /// Whether a task failure cancels the rest of the run.
    pub fn aborts_on_error(self) -> bool {
        !matches!(self, AbortMode::WaitAll)
    }

    /// Whether the driver keeps consuming outcomes after aborting.
    pub fn drains_after_abort(self) -> bool {
        matches!(self, AbortMode::AbortFirstWait)
    }
}

impl Default for AbortMode {
    fn default() -> Self {
        AbortMode::WaitAll
    }
}

impl fmt::Display for AbortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AbortMode::WaitAll => "wait_all",
            AbortMode::AbortFirst => "abort_first",
            AbortMode::AbortFirstWait => "abort_first_wait",
        };
        f.write_str(s)
    }
}

impl FromStr for AbortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "wait_all" => Ok(AbortMode::WaitAll),
            "abort_first" => Ok(AbortMode::AbortFirst),
            "abort_first_wait" => Ok(AbortMode::AbortFirstWait),
            other => Err(format!(
                "invalid abort mode: {other} (expected \"wait_all\", \"abort_first\" or \"abort_first_wait\")"
            )),
        }
    }
}
