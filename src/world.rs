//! Capabilities the hosting world provides to this crate.
//!
//! The library never owns a world model; chunk management, block registries
//! and world bounds all live behind these traits and are injected by the
//! caller.

use crate::block_state::BlockState;
use crate::error::WorldError;

/// Destination for block writes, absolute world coordinates.
pub trait BlockSetter {
    fn set_block(&mut self, x: i32, y: i32, z: i32, state_id: u16);
}

/// Ensures chunks are present before blocks in them are touched.
pub trait ChunkLoader {
    fn ensure_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<(), WorldError>;
}

/// Read access to a loaded world, used by [`Schematic::copy`](crate::Schematic::copy).
pub trait WorldReader: ChunkLoader {
    /// State id at an absolute position, or `None` where no block exists.
    fn state_id_at(&self, x: i32, y: i32, z: i32) -> Option<u16>;
}

/// Write access to a loaded world, used by [`Schematic::build`](crate::Schematic::build).
pub trait WorldWriter: ChunkLoader + BlockSetter {
    /// Inclusive vertical range blocks may occupy, `(min_y, max_y)`.
    fn vertical_bounds(&self) -> (i32, i32);
}

/// Resolves a block descriptor to a numeric state id.
///
/// `None` means the name is unknown to the hosting world; readers map that
/// to air rather than failing the parse.
pub trait BlockRegistry {
    fn resolve(&self, block: &BlockState) -> Option<u16>;
}

/// A generation-time unit that can fork a writable sub-region, used by
/// [`Schematic::fork`](crate::Schematic::fork).
pub trait GenerationUnit {
    type Modifier: BlockSetter;

    /// Forks a writable sub-region spanning `start` (inclusive) to `end`
    /// (exclusive).
    fn fork(&mut self, start: (i32, i32, i32), end: (i32, i32, i32)) -> Self::Modifier;
}

/// Buffers block writes so a build lands in the world as one batch.
#[derive(Debug, Default)]
pub struct BlockBatch {
    writes: Vec<(i32, i32, i32, u16)>,
}

impl BlockBatch {
    pub fn new() -> Self {
        BlockBatch::default()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Replays every buffered write into `setter`, in insertion order.
    pub fn flush<S: BlockSetter + ?Sized>(&self, setter: &mut S) {
        for &(x, y, z, state_id) in &self.writes {
            setter.set_block(x, y, z, state_id);
        }
    }
}

impl BlockSetter for BlockBatch {
    fn set_block(&mut self, x: i32, y: i32, z: i32, state_id: u16) {
        self.writes.push((x, y, z, state_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Collector(Vec<(i32, i32, i32, u16)>);

    impl BlockSetter for Collector {
        fn set_block(&mut self, x: i32, y: i32, z: i32, state_id: u16) {
            self.0.push((x, y, z, state_id));
        }
    }

    #[test]
    fn test_batch_flushes_in_order() {
        let mut batch = BlockBatch::new();
        batch.set_block(0, 64, 0, 1);
        batch.set_block(1, 64, 0, 14);
        assert_eq!(batch.len(), 2);

        let mut out = Collector(Vec::new());
        batch.flush(&mut out);
        assert_eq!(out.0, vec![(0, 64, 0, 1), (1, 64, 0, 14)]);
    }
}
