//! Voice-driven reminder assistant: turns transcribed speech into
//! structured task records. Remote AI analysis is attempted first when
//! configured; a heuristic local parser is the always-available
//! fallback.

pub mod ai;
pub mod capture;
pub mod cli;
pub mod commands;
pub mod config;
pub mod listen;
pub mod parser;
pub mod session;
pub mod sink;
pub mod speech;
pub mod task;
