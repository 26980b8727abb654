//! Store error types.

use thiserror::Error;

/// Errors that can occur while building or validating a [`CompactTree`](crate::CompactTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A schema id does not exist in the schema table.
    #[error("Unknown schema id {0}")]
    UnknownSchema(u32),

    /// A field references a schema that is not declared before its owner.
    #[error("Field `{field}` of schema {owner} references schema {child}, which is not declared before it")]
    SchemaOrder {
        /// Schema owning the field.
        owner: u32,
        /// Field key.
        field: String,
        /// Referenced schema.
        child: u32,
    },

    /// A field's children do not fit inside the owning node.
    #[error("Field `{field}` of schema {owner} extends past the node's {bytes_per_node} bytes")]
    FieldOutOfBounds {
        /// Schema owning the field.
        owner: u32,
        /// Field key.
        field: String,
        /// Size of one node of the owning schema.
        bytes_per_node: u32,
    },

    /// A payload does not fit inside its node.
    #[error("Payload of schema {owner} ({payload_size} bytes) does not fit in {bytes_per_node} bytes")]
    PayloadOutOfBounds {
        /// Schema owning the payload.
        owner: u32,
        /// Declared payload size.
        payload_size: u16,
        /// Size of one node of the schema.
        bytes_per_node: u32,
    },

    /// The data buffer does not match the size implied by the root schema.
    #[error("Expected {expected} bytes of node data, found {actual}")]
    DataLength {
        /// Size implied by the root schema.
        expected: u64,
        /// Size of the supplied buffer.
        actual: usize,
    },

    /// The requested tree is too large to encode.
    #[error("Tree is too large to encode: {0}")]
    TooLarge(String),
}

impl StoreError {
    /// Creates a too-large error.
    pub fn too_large(message: impl Into<String>) -> Self {
        Self::TooLarge(message.into())
    }
}
