//! Shared utilities for the procure workspace.
//!
//! Holds build metadata used by `procure-business` and the `procure` CLI.

pub mod version_info;
