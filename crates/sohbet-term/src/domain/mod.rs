//! Core domain logic for the chat client.
//!
//! This module contains the session store, the submission controller and the
//! markup renderer, independent of any terminal or network implementation.

pub mod models;
pub mod services;
