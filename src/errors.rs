// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a render pass, an export, or the terminal front end can
//! fail.  None of these are retried; they all travel back to the
//! caller.

use std::io;
use std::result;

/// The crate-wide error type.
#[derive(Debug, Fail)]
pub enum Error {
    /// The bounding box is inverted, empty, or has a non-positive
    /// scale.  Reported before any rendering starts.
    #[fail(display = "Invalid viewport: {}", _0)]
    InvalidViewport(String),

    /// A single row could not be completed.  The whole pass is
    /// abandoned; no partial grid is ever returned.
    #[fail(display = "Worker failed on row {}: {}", row, reason)]
    WorkerFailure {
        /// The row the worker was rendering when it failed.
        row: usize,
        /// What went wrong.
        reason: String,
    },

    /// The pass was cancelled between work units.
    #[fail(display = "Render cancelled")]
    Cancelled,

    /// Writing the image container failed.
    #[fail(display = "Could not write image: {}", _0)]
    ContainerWriteFailure(#[cause] io::Error),

    /// A bitmap header could not be parsed back.
    #[fail(display = "Invalid bitmap header: {}", _0)]
    InvalidHeader(String),

    /// The terminal could not be driven.
    #[fail(display = "Terminal error: {}", _0)]
    Terminal(#[cause] io::Error),
}

/// Shorthand used throughout the crate.
pub type Result<T> = result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::ContainerWriteFailure(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_failure_names_the_row() {
        let e = Error::WorkerFailure {
            row: 17,
            reason: "out of memory".to_string(),
        };
        assert_eq!(format!("{}", e), "Worker failed on row 17: out of memory");
    }

    #[test]
    fn io_errors_become_write_failures() {
        let e: Error = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        match e {
            Error::ContainerWriteFailure(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied)
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
