// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline setup errors.

use thiserror::Error;

/// Failures while preparing a pipeline, before any process is spawned.
///
/// These abort the whole pipeline with [`STATUS_ABNORMAL`]
/// (`crate::STATUS_ABNORMAL`) and one diagnostic on stderr; already-opened
/// descriptors are closed first.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// A redirection target could not be opened.
    #[error("{path}: {}", source.desc())]
    Redirect {
        path: String,
        source: nix::errno::Errno,
    },

    /// `pipe()` failed, usually fd exhaustion.
    #[error("cannot create pipe: {}", source.desc())]
    Pipe { source: nix::errno::Errno },
}
