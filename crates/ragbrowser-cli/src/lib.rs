//! RAG Web Browser CLI library.
//!
//! Rendering helpers shared by the `ragbrowser` binary's subcommands.

pub mod output;
