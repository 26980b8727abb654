//! Uniform-chunk tree store.
//!
//! A [`CompactTree`] holds every node of a tree in one byte buffer. The layout
//! is described by a flat table of [`ChunkSchema`] entries: all nodes sharing a
//! schema have the same size, payload, and fields. A field's children are laid
//! out contiguously inside the owning node's bytes, so finding a child is
//! arithmetic on offsets rather than pointer chasing.

use crate::{FieldKey, StoreError, TreeType};

/// Index of a schema in a [`CompactTree`]'s schema table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub u32);

impl SchemaId {
    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Layout shared by every node of one kind.
#[derive(Debug, Clone)]
pub struct ChunkSchema {
    pub node_type: TreeType,
    /// Number of nodes in each field using this schema
    /// (for the root schema: number of top-level nodes).
    pub node_count: u32,
    pub bytes_per_node: u32,
    /// Payload stored in the first bytes of every node.
    pub payload_size: Option<u16>,
    /// Fields in iteration order.
    pub fields: Vec<OffsetSchema>,
}

/// A field of a [`ChunkSchema`].
///
/// `byte_offset` is relative to the start of the owning node and must account
/// for the owner's payload and every field stored before this one.
#[derive(Debug, Clone)]
pub struct OffsetSchema {
    pub key: FieldKey,
    pub byte_offset: u32,
    pub schema: SchemaId,
}

/// Opaque address of a node inside one [`CompactTree`].
///
/// Only meaningful for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    schema: SchemaId,
    offset: u32,
}

/// The run of sibling nodes held by one field, or the top-level nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sequence {
    schema: SchemaId,
    start: u32,
}

/// A tree encoded as schemas plus one byte buffer.
#[derive(Debug, Clone)]
pub struct CompactTree {
    schemas: Vec<ChunkSchema>,
    root: SchemaId,
    data: Vec<u8>,
    total_nodes: usize,
}

impl CompactTree {
    /// Validates the layout and creates a tree.
    ///
    /// Every field must reference a schema with a smaller id than its owner,
    /// which keeps the schema graph acyclic.
    pub fn new(schemas: Vec<ChunkSchema>, root: SchemaId, data: Vec<u8>) -> Result<Self, StoreError> {
        let root_schema = schemas
            .get(root.index())
            .ok_or(StoreError::UnknownSchema(root.0))?;

        // Nodes per subtree, filled in id order: children always come first.
        let mut subtree_nodes: Vec<u64> = Vec::with_capacity(schemas.len());

        for (owner, schema) in schemas.iter().enumerate() {
            if let Some(payload_size) = schema.payload_size {
                if u32::from(payload_size) > schema.bytes_per_node {
                    return Err(StoreError::PayloadOutOfBounds {
                        owner: owner as u32,
                        payload_size,
                        bytes_per_node: schema.bytes_per_node,
                    });
                }
            }

            let mut nodes = 1u64;
            for field in &schema.fields {
                let child = schemas
                    .get(field.schema.index())
                    .ok_or(StoreError::UnknownSchema(field.schema.0))?;
                if field.schema.index() >= owner {
                    return Err(StoreError::SchemaOrder {
                        owner: owner as u32,
                        field: field.key.to_string(),
                        child: field.schema.0,
                    });
                }

                let end = u64::from(field.byte_offset)
                    + u64::from(child.node_count) * u64::from(child.bytes_per_node);
                if end > u64::from(schema.bytes_per_node) {
                    return Err(StoreError::FieldOutOfBounds {
                        owner: owner as u32,
                        field: field.key.to_string(),
                        bytes_per_node: schema.bytes_per_node,
                    });
                }

                nodes = nodes.saturating_add(
                    u64::from(child.node_count).saturating_mul(subtree_nodes[field.schema.index()]),
                );
            }
            subtree_nodes.push(nodes);
        }

        let expected = u64::from(root_schema.node_count) * u64::from(root_schema.bytes_per_node);
        if expected > u64::from(u32::MAX) {
            return Err(StoreError::too_large(format!(
                "{expected} bytes exceeds the 32-bit address space"
            )));
        }
        if expected != data.len() as u64 {
            return Err(StoreError::DataLength {
                expected,
                actual: data.len(),
            });
        }

        let total_nodes =
            u64::from(root_schema.node_count).saturating_mul(subtree_nodes[root.index()]);

        Ok(Self {
            schemas,
            root,
            data,
            total_nodes: usize::try_from(total_nodes).unwrap_or(usize::MAX),
        })
    }

    /// Returns the schema table.
    pub fn schemas(&self) -> &[ChunkSchema] {
        &self.schemas
    }

    /// Returns the encoded node data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of nodes in the whole tree.
    #[inline]
    pub fn total_nodes(&self) -> usize {
        self.total_nodes
    }

    #[inline]
    fn schema(&self, id: SchemaId) -> &ChunkSchema {
        &self.schemas[id.index()]
    }

    /// Returns the sequence of top-level nodes.
    #[inline]
    pub fn root_sequence(&self) -> Sequence {
        Sequence {
            schema: self.root,
            start: 0,
        }
    }

    /// Returns the number of nodes in a sequence.
    #[inline]
    pub fn sequence_len(&self, sequence: Sequence) -> u32 {
        self.schema(sequence.schema).node_count
    }

    /// Returns the node at `index` in a sequence.
    #[inline]
    pub fn node_at(&self, sequence: Sequence, index: u32) -> Option<NodeRef> {
        let schema = self.schema(sequence.schema);
        (index < schema.node_count).then(|| NodeRef {
            schema: sequence.schema,
            offset: sequence.start + index * schema.bytes_per_node,
        })
    }

    /// Iterates the nodes of a sequence.
    pub fn sequence(&self, sequence: Sequence) -> impl Iterator<Item = NodeRef> + '_ {
        let schema = self.schema(sequence.schema);
        let stride = schema.bytes_per_node;
        (0..schema.node_count).map(move |index| NodeRef {
            schema: sequence.schema,
            offset: sequence.start + index * stride,
        })
    }

    /// Returns the number of fields on a node.
    #[inline]
    pub fn field_count(&self, node: NodeRef) -> usize {
        self.schema(node.schema).fields.len()
    }

    /// Returns true if the node has no fields.
    #[inline]
    pub fn is_leaf(&self, node: NodeRef) -> bool {
        self.schema(node.schema).fields.is_empty()
    }

    /// Returns the key and contents of the field at `index`.
    pub fn field(&self, node: NodeRef, index: usize) -> Option<(&FieldKey, Sequence)> {
        let field = self.schema(node.schema).fields.get(index)?;
        Some((&field.key, Self::field_sequence(node, field)))
    }

    /// Returns the position of the field named `key`.
    pub fn field_index_of(&self, node: NodeRef, key: &str) -> Option<usize> {
        self.schema(node.schema)
            .fields
            .iter()
            .position(|field| field.key.as_str() == key)
    }

    /// Iterates the fields of a node in declaration order.
    pub fn fields(&self, node: NodeRef) -> impl Iterator<Item = (&FieldKey, Sequence)> + '_ {
        self.schema(node.schema)
            .fields
            .iter()
            .map(move |field| (&field.key, Self::field_sequence(node, field)))
    }

    /// Iterates every child of a node, field by field.
    pub fn children(&self, node: NodeRef) -> impl Iterator<Item = NodeRef> + '_ {
        self.fields(node)
            .flat_map(move |(_, sequence)| self.sequence(sequence))
    }

    #[inline]
    fn field_sequence(node: NodeRef, field: &OffsetSchema) -> Sequence {
        Sequence {
            schema: field.schema,
            start: node.offset + field.byte_offset,
        }
    }

    /// Returns the type of a node.
    #[inline]
    pub fn node_type(&self, node: NodeRef) -> &TreeType {
        &self.schema(node.schema).node_type
    }

    /// Returns the payload bytes of a node.
    pub fn payload(&self, node: NodeRef) -> Option<&[u8]> {
        let size = self.schema(node.schema).payload_size?;
        let start = node.offset as usize;
        self.data.get(start..start + usize::from(size))
    }

    /// Decodes the payload of a node as a number.
    ///
    /// 1, 2 and 4 byte payloads are little-endian unsigned integers,
    /// 8 byte payloads are little-endian `f64`. Other sizes have no value.
    pub fn value(&self, node: NodeRef) -> Option<f64> {
        let bytes = self.payload(node)?;
        match bytes.len() {
            1 => Some(f64::from(bytes[0])),
            2 => Some(f64::from(u16::from_le_bytes(bytes.try_into().ok()?))),
            4 => Some(f64::from(u32::from_le_bytes(bytes.try_into().ok()?))),
            8 => Some(f64::from_le_bytes(bytes.try_into().ok()?)),
            _ => None,
        }
    }
}
