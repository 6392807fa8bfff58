//! Header hygiene for the forwarding path.

pub mod headers;
