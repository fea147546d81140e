//! Successful invocations that nonetheless refused the request.

use serde::Serialize;
use std::fmt;

/// Why a request was declined.
///
/// A declined request still answers with status 200 and leaves world state unchanged for the
/// declined part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DeclineReason {
    /// A report for the data call version is already locked.
    ReportLocked,
    /// The report is locked, or another report already has the requested status.
    ReportUpdateLocked,
    /// The carrier has already consented.
    ConsentExists,
}

impl DeclineReason {
    pub fn message(self) -> &'static str {
        match self {
            DeclineReason::ReportLocked => "Report can not be created as the report is locked.",
            DeclineReason::ReportUpdateLocked => {
                "This report can not be updated as the report is locked for updated."
            }
            DeclineReason::ConsentExists => "Consent already exists for this carrier.",
        }
    }

    /// Response payload carried with the decline.
    pub fn payload(self) -> Vec<u8> {
        match self {
            DeclineReason::ConsentExists => Vec::new(),
            other => other.message().as_bytes().to_vec(),
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of an operation that may decline without failing.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Completed(T),
    Declined(DeclineReason),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Declined(reason) => Outcome::Declined(reason),
        }
    }

    pub fn declined(&self) -> Option<DeclineReason> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Declined(reason) => Some(*reason),
        }
    }
}
