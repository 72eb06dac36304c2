//! Workspace root package.
//!
//! Holds workspace-level tooling only (pre-commit hooks via `rusty-hook`).
//! The functional crates live under `crates/`.
