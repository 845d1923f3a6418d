//! Recording editing modules
//!
//! Apply detected ranges to the recording:
//! - Range removal with chronological discard capture
//! - Serializable reports

pub mod remover;
pub mod report;
