//! Infrastructure layer providing external integrations.
//!
//! This module contains the HTTP implementation of the chat backend.

pub mod clients;
