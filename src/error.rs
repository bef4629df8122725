//! Error type for help generation and rendering.

use thiserror::Error;

/// Errors surfaced by [`crate::MamlGenerator`] and the MAML renderer.
#[derive(Debug, Error)]
pub enum GenError {
    /// The type handed to `generate` does not satisfy the command contract.
    #[error(
        "'{0}' does not implement a command: the type must be public, non-abstract, \
         implement the command capability, and carry a command declaration with a \
         non-empty verb and noun"
    )]
    NotACommand(String),

    /// The XML writer rejected an event.
    #[error("failed to write help XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An I/O failure while writing help XML.
    #[error("failed to write help XML: {0}")]
    Io(#[from] std::io::Error),
}
