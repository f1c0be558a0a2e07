//! Line-oriented front end.
//!
//! Reads commands and messages from stdin, feeds them to the state container
//! as events and prints the transcript as it changes.

pub mod commands;
pub mod ui;
pub mod view;
