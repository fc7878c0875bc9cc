// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type shared by every renderer in the crate.

use failure::Fail;
use std::io;

/// Result type alias using fracray's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between receiving a render request
/// and handing back a finished buffer.
#[derive(Debug, Fail)]
pub enum Error {
    /// An argument was outside the domain of the operation: a negative
    /// magnitude or power, a zero root order, an empty root set, a
    /// non-positive threshold.
    #[fail(display = "Invalid argument: {}", reason)]
    InvalidArgument {
        /// What was wrong with it
        reason: String,
    },

    /// Text that does not look like `a`, `bi`, or `a+bi`.
    #[fail(display = "Could not parse complex number {:?}", input)]
    MalformedComplex {
        /// The offending text
        input: String,
    },

    /// The world bounds or pixel dimensions cannot be mapped onto
    /// one another.
    #[fail(display = "Invalid viewport: {}", reason)]
    InvalidViewport {
        /// What was wrong with it
        reason: String,
    },

    /// A worker observed the cancellation flag and stopped early.
    #[fail(display = "Render cancelled")]
    Cancelled,

    /// A worker thread panicked while rendering its rows.
    #[fail(display = "A render worker panicked")]
    WorkerPanicked,

    /// The divide-and-conquer pool could not be started.
    #[fail(display = "Could not build worker pool: {}", reason)]
    ThreadPool {
        /// Reason reported by the pool builder
        reason: String,
    },

    /// Writing a rendered image failed.
    #[fail(display = "Could not write image: {}", _0)]
    Io(#[cause] io::Error),
}

impl Error {
    pub(crate) fn invalid<S: Into<String>>(reason: S) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
