// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential redaction for Net-API.
//!
//! Plugin error messages can echo back whatever the plugin was sent,
//! including the device password. Everything that leaves the dispatcher as
//! an error detail or a log line goes through [`redact`] first.

pub mod redact;

pub use redact::{redact, RedactingWriter, REDACTED};
