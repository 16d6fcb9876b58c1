//! Rich diagnostic error types for goalrec.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Recoverable conditions (unknown group
//! members, malformed score lines, non-numeric scores) never reach these types:
//! they degrade silently where they occur. Everything here aborts the run.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for goalrec.
#[derive(Debug, Error, Diagnostic)]
pub enum GoalRecError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Recognizer(#[from] RecognizerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Output(#[from] OutputError),
}

// ---------------------------------------------------------------------------
// Relation source errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("failed to read relation file: {path}")]
    #[diagnostic(
        code(goalrec::source::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed relation at {path}:{line}: {message}")]
    #[diagnostic(
        code(goalrec::source::malformed),
        help(
            "Each line must be `<frame> <subject> <predicate> <object>`, \
             whitespace separated, with an integer frame index. \
             Blank lines and lines starting with `#` are ignored."
        )
    )]
    Malformed {
        path: String,
        line: usize,
        message: String,
    },

    #[error("input not found: {path}")]
    #[diagnostic(
        code(goalrec::source::not_found),
        help("Pass an existing relation file, or a folder containing relation files.")
    )]
    NotFound { path: String },

    #[error("failed to list folder: {path}")]
    #[diagnostic(
        code(goalrec::source::list),
        help("Check that the folder exists and you have read permissions.")
    )]
    ListFolder {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(goalrec::config::read),
        help("Ensure the config file exists, or pass another one with --config.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(goalrec::config::parse),
        help(
            "Check the TOML syntax. Relations in `init` are arrays of two \
             (`[type, object]`) or three (`[subject, predicate, object]`) strings."
        )
    )]
    Parse { path: String, message: String },

    #[error("recognizer command is empty")]
    #[diagnostic(
        code(goalrec::config::empty_command),
        help(
            "Set `recognizer.command` to the program and its arguments, \
             e.g. [\"java\", \"-jar\", \"gc_stop.jar\"]."
        )
    )]
    EmptyCommand,
}

// ---------------------------------------------------------------------------
// Recognizer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RecognizerError {
    #[error("failed to spawn recognizer `{program}`")]
    #[diagnostic(
        code(goalrec::recognizer::spawn),
        help("Check that `recognizer.command` names an installed program.")
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to recognizer")]
    #[diagnostic(
        code(goalrec::recognizer::write),
        help(
            "The recognizer process most likely exited. \
             Run it by hand to see why it stopped."
        )
    )]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read from recognizer")]
    #[diagnostic(code(goalrec::recognizer::read))]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("recognizer closed its output before the terminator line")]
    #[diagnostic(
        code(goalrec::recognizer::closed),
        help("The recognizer process exited mid-response. Check its stderr output.")
    )]
    Closed,

    #[error("no response from recognizer within {timeout:?}")]
    #[diagnostic(
        code(goalrec::recognizer::timeout),
        help(
            "The recognizer never printed its terminator line. Raise \
             `recognizer.read_timeout_secs`, or set it to 0 to wait forever."
        )
    )]
    Timeout { timeout: Duration },

    #[error("recognizer read was cancelled")]
    #[diagnostic(code(goalrec::recognizer::cancelled))]
    Cancelled,

    #[error("failed to write observation log: {path}")]
    #[diagnostic(
        code(goalrec::recognizer::observation_log),
        help(
            "The recognizer reads observations from this file. Check that its \
             folder is writable and the disk is not full."
        )
    )]
    ObservationLog {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OutputError {
    #[error("failed to write {path}")]
    #[diagnostic(
        code(goalrec::output::write),
        help("Ensure the output folder exists and you have write permissions.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write score table {path}: {message}")]
    #[diagnostic(
        code(goalrec::output::csv),
        help("Ensure the output folder exists and you have write permissions.")
    )]
    Csv { path: String, message: String },
}

/// Convenience alias for goalrec results.
pub type GoalRecResult<T> = std::result::Result<T, GoalRecError>;

/// Result alias for the recognizer subsystem.
pub type RecognizerResult<T> = std::result::Result<T, RecognizerError>;
