//! # detonate-cli
//!
//! Command-line front end for `detonate-core`.
//!
//! ## Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | CLEAN |
//! | 1 | MALWARE |
//! | 2 | SUSPICIOUS |
//! | 3 | ERROR (pipeline failed, bad arguments, bad config) |

pub mod cli;
pub mod logging;
pub mod output;

pub use cli::run;
