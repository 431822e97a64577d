//! The three-outcome shape [`crate::analyze`] returns (spec §6: "The
//! top-level analyzer emits three integer exit codes — 0 Approve, 1 Reject,
//! −1 Failure — and an associated error for Failure").

use crate::error::ParityError;
use crate::MismatchReason;

/// The result of one top-level [`crate::analyze`] call.
#[derive(Debug)]
pub enum Outcome {
    /// `base` and `last` are equivalent.
    Approve,
    /// `base` and `last` diverge, with a best-effort explanation when one
    /// could be pinned down.
    Reject(Option<MismatchReason>),
    /// Analysis could not be completed at all.
    Failure(ParityError),
}

impl Outcome {
    /// The process exit code spec §6 assigns this outcome: `0` for
    /// [`Outcome::Approve`], `1` for [`Outcome::Reject`], `-1` for
    /// [`Outcome::Failure`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Approve => 0,
            Outcome::Reject(_) => 1,
            Outcome::Failure(_) => -1,
        }
    }
}
