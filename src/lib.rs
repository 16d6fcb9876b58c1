// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # goalrec
//!
//! Recognizes which cooking goal a person is pursuing by streaming symbolic
//! observations (object relations extracted per video frame) to an external
//! goal-recognition oracle and tracking its per-goal confidence over time.
//!
//! ## Architecture
//!
//! - **Relations** (`relation`, `source`): per-frame facts read from trial files
//! - **Normalization** (`normalize`): collapse object variants onto group labels
//! - **Encoding** (`encode`): the predicate-string grammar the recognizer reads
//! - **Goal states** (`goal_state`): end-of-recipe facts merged across trials
//! - **Templates** (`template`): problem definitions with a goal placeholder
//! - **Recognizer** (`recognizer`): oracle transport, framing, and sessions
//! - **Scores** (`scores`, `obslog`): confidence tables and the observation trail
//!
//! ## Library usage
//!
//! ```
//! use goalrec::encode::encode_frame;
//! use goalrec::normalize::Groups;
//! use goalrec::relation::Relation;
//!
//! let groups: Groups = [("egg", ["shell_egg"])].into_iter().collect();
//! let frame = [Relation::binary("shell_egg", "in", "bowl")];
//! assert_eq!(
//!     encode_frame(&frame, &groups),
//!     "(egg1),(bowl1),(in egg1 bowl1),(shell_egg egg1)"
//! );
//! ```

pub mod config;
pub mod encode;
pub mod error;
pub mod goal_state;
pub mod normalize;
pub mod obslog;
pub mod pipeline;
pub mod recognizer;
pub mod relation;
pub mod scores;
pub mod source;
pub mod template;
