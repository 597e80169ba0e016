//! `subrev` command-line front end: argument parsing and command dispatch.

pub mod args;
pub mod commands;
