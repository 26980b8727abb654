//! Regular tree shapes.
//!
//! A [`TreeShape`] describes a synthetic tree where every interior node has the
//! same number of fields and every field the same number of children.

use serde::{Deserialize, Serialize};

use crate::{ChunkSchema, CompactTree, FieldKey, OffsetSchema, SchemaId, StoreError, TreeType};

/// Bytes of payload stored on every node built from a shape.
const PAYLOAD_BYTES: u16 = 1;

/// Deepest shape that [`TreeShape::build`] accepts.
///
/// Walks recurse once per level, so this also bounds their stack use.
pub const MAX_DEPTH: u32 = 64;

/// Shape of a regular tree.
///
/// The root sits at level 0. Nodes above `depth` have `fields_per_node` fields
/// holding `nodes_per_field` children each; nodes at `depth` are leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeShape {
    pub fields_per_node: u32,
    pub nodes_per_field: u32,
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_depth() -> u32 {
    1
}

impl TreeShape {
    /// Creates a shape with one level of children below the root.
    #[inline]
    pub const fn new(fields_per_node: u32, nodes_per_field: u32) -> Self {
        Self {
            fields_per_node,
            nodes_per_field,
            depth: 1,
        }
    }

    /// Sets the number of levels below the root.
    #[inline]
    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Levels below the root that actually hold nodes.
    ///
    /// Without fields nothing hangs below the root. With empty fields the
    /// root's fields exist but nothing hangs below them.
    #[inline]
    pub const fn effective_depth(&self) -> u32 {
        if self.fields_per_node == 0 {
            0
        } else if self.nodes_per_field == 0 && self.depth > 1 {
            1
        } else {
            self.depth
        }
    }

    /// Number of nodes in a tree of this shape.
    ///
    /// `sum((F * N)^d for d in 0..=depth)`, which is `N * F + 1` at depth 1.
    /// Saturates at `usize::MAX`.
    pub fn expected_count(&self) -> usize {
        let per_level = (self.fields_per_node as usize).saturating_mul(self.nodes_per_field as usize);
        match per_level {
            0 => 1,
            1 => (self.depth as usize).saturating_add(1),
            _ => {
                let mut level = 1usize;
                let mut total = 1usize;
                for _ in 0..self.depth {
                    level = level.saturating_mul(per_level);
                    total = total.saturating_add(level);
                    if total == usize::MAX {
                        break;
                    }
                }
                total
            }
        }
    }

    /// Encodes a tree of this shape.
    ///
    /// Each level gets one schema; its fields are named `field0`, `field1`, ...
    /// and every node carries a one byte payload holding its level.
    ///
    /// Fails with [`StoreError::TooLarge`] beyond [`MAX_DEPTH`] levels or
    /// when a node would not fit in `u32` bytes.
    pub fn build(&self) -> Result<CompactTree, StoreError> {
        if self.depth > MAX_DEPTH {
            return Err(StoreError::too_large(format!(
                "depth {} exceeds the maximum of {}",
                self.depth, MAX_DEPTH
            )));
        }

        let depth = self.effective_depth();
        let mut schemas: Vec<ChunkSchema> = Vec::with_capacity(depth as usize + 1);
        let mut child: Option<SchemaId> = None;

        // Deepest level first so fields always point at smaller schema ids.
        for level in (0..=depth).rev() {
            let node_count = if level == 0 { 1 } else { self.nodes_per_field };
            let mut bytes_per_node = u64::from(PAYLOAD_BYTES);
            let mut fields = Vec::new();

            if let Some(child_id) = child {
                let child_schema = &schemas[child_id.0 as usize];
                let field_bytes =
                    u64::from(child_schema.node_count) * u64::from(child_schema.bytes_per_node);
                for index in 0..self.fields_per_node {
                    fields.push(OffsetSchema {
                        key: FieldKey::new(format!("field{index}")),
                        byte_offset: to_u32(bytes_per_node)?,
                        schema: child_id,
                    });
                    bytes_per_node += field_bytes;
                }
            }

            let id = SchemaId(schemas.len() as u32);
            schemas.push(ChunkSchema {
                node_type: TreeType::new(format!("level{level}")),
                node_count,
                bytes_per_node: to_u32(bytes_per_node)?,
                payload_size: Some(PAYLOAD_BYTES),
                fields,
            });
            child = Some(id);
        }

        // The loop always runs at least once.
        let root = child.unwrap_or(SchemaId(0));
        let mut data = vec![0u8; schemas[root.0 as usize].bytes_per_node as usize];
        write_payloads(&schemas, root, 0, 0, &mut data);

        CompactTree::new(schemas, root, data)
    }
}

impl CompactTree {
    /// Builds the regular tree described by `shape`.
    pub fn from_shape(shape: &TreeShape) -> Result<Self, StoreError> {
        shape.build()
    }
}

impl Default for TreeShape {
    fn default() -> Self {
        Self::new(2, 5)
    }
}

fn to_u32(bytes: u64) -> Result<u32, StoreError> {
    u32::try_from(bytes)
        .map_err(|_| StoreError::too_large(format!("{bytes} bytes per node exceeds u32")))
}

fn write_payloads(schemas: &[ChunkSchema], id: SchemaId, start: usize, level: u8, data: &mut [u8]) {
    let schema = &schemas[id.0 as usize];
    for node in 0..schema.node_count as usize {
        let base = start + node * schema.bytes_per_node as usize;
        if schema.payload_size.is_some() {
            data[base] = level;
        }
        for field in &schema.fields {
            write_payloads(
                schemas,
                field.schema,
                base + field.byte_offset as usize,
                level.wrapping_add(1),
                data,
            );
        }
    }
}
