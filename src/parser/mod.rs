//! Shell parsing utilities for infra-guardrails
//!
//! Lexical helpers only; commands are never parsed into a syntax tree.

pub mod shell;
