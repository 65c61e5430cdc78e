// src/core/mod.rs

// This file acts as the root of the `core` module, exposing the data
// models, the static protocol rules, the resolved-input store and the
// transform engine to the rest of the crate.

/// Contains all data structures and models used throughout the application,
/// such as `ProtocolType`, `TransformationKind` and the scan API records
/// exchanged with the remote scanning service.
pub mod models;

/// The static, read-only table mapping each protocol type to the
/// transformation its executor requires, together with any default port.
pub mod protocol_rules;

/// The resolved-input store: a closeable hybrid memory/disk lookup from a
/// raw input token to a previously probed HTTP(S) URL.
pub mod store;

/// Houses the transform engine that rewrites raw user-supplied targets
/// into the canonical form each protocol executor expects.
pub mod transform;
