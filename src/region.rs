use crate::error::WorldError;
use crate::world::ChunkLoader;

/// An axis-aligned box of blocks, inclusive on both corners.
///
/// Corners are normalized at construction, so `lower` is the component-wise
/// minimum no matter which opposite pair was passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    lower: (i32, i32, i32),
    upper: (i32, i32, i32),
}

impl Region {
    pub fn new(p1: (i32, i32, i32), p2: (i32, i32, i32)) -> Self {
        Region {
            lower: (p1.0.min(p2.0), p1.1.min(p2.1), p1.2.min(p2.2)),
            upper: (p1.0.max(p2.0), p1.1.max(p2.1), p1.2.max(p2.2)),
        }
    }

    pub fn lower(&self) -> (i32, i32, i32) {
        self.lower
    }

    pub fn upper(&self) -> (i32, i32, i32) {
        self.upper
    }

    pub fn width(&self) -> i32 {
        self.upper.0 - self.lower.0 + 1
    }

    pub fn height(&self) -> i32 {
        self.upper.1 - self.lower.1 + 1
    }

    pub fn length(&self) -> i32 {
        self.upper.2 - self.lower.2 + 1
    }

    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.lower.0
            && x <= self.upper.0
            && y >= self.lower.1
            && y <= self.upper.1
            && z >= self.lower.2
            && z <= self.upper.2
    }

    // Chunk coordinates are block coordinates floor-divided by 16. Rust's
    // `>>` on signed integers is an arithmetic shift, which is exactly that,
    // negative coordinates included.

    pub fn lower_chunk_x(&self) -> i32 {
        self.lower.0 >> 4
    }

    pub fn lower_chunk_z(&self) -> i32 {
        self.lower.2 >> 4
    }

    pub fn upper_chunk_x(&self) -> i32 {
        self.upper.0 >> 4
    }

    pub fn upper_chunk_z(&self) -> i32 {
        self.upper.2 >> 4
    }

    /// Number of chunk columns this region spans along x.
    pub fn chunk_count_x(&self) -> i32 {
        self.upper_chunk_x() - self.lower_chunk_x() + 1
    }

    /// Number of chunk columns this region spans along z.
    pub fn chunk_count_z(&self) -> i32 {
        self.upper_chunk_z() - self.lower_chunk_z() + 1
    }

    /// All chunk coordinates overlapped by this region.
    pub fn chunks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.lower_chunk_x()..=self.upper_chunk_x()).flat_map(move |chunk_x| {
            (self.lower_chunk_z()..=self.upper_chunk_z()).map(move |chunk_z| (chunk_x, chunk_z))
        })
    }

    /// Issues one ensure-loaded request per overlapped chunk.
    ///
    /// The first failure aborts the fan-out and is returned to the caller.
    pub fn load_chunks<L: ChunkLoader + ?Sized>(&self, loader: &mut L) -> Result<(), WorldError> {
        for (chunk_x, chunk_z) in self.chunks() {
            loader.ensure_chunk(chunk_x, chunk_z)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_are_normalized() {
        let region = Region::new((10, 5, -3), (-2, 9, 4));
        assert_eq!(region.lower(), (-2, 5, -3));
        assert_eq!(region.upper(), (10, 9, 4));
        assert_eq!(region.width(), 13);
        assert_eq!(region.height(), 5);
        assert_eq!(region.length(), 8);
    }

    #[test]
    fn test_chunk_coordinates_floor_toward_negative_infinity() {
        let region = Region::new((-17, 0, -1), (16, 0, 15));
        assert_eq!(region.lower_chunk_x(), -2);
        assert_eq!(region.lower_chunk_z(), -1);
        assert_eq!(region.upper_chunk_x(), 1);
        assert_eq!(region.upper_chunk_z(), 0);
    }

    #[test]
    fn test_chunk_fanout_covers_the_rectangle() {
        let region = Region::new((0, 0, 0), (31, 255, 16));
        let chunks: Vec<_> = region.chunks().collect();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(region.chunk_count_x() * region.chunk_count_z(), 4);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let region = Region::new((0, 0, 0), (2, 2, 2));
        assert!(region.contains(0, 0, 0));
        assert!(region.contains(2, 2, 2));
        assert!(!region.contains(3, 1, 1));
        assert!(!region.contains(1, -1, 1));
    }

    #[test]
    fn test_load_chunks_stops_at_first_failure() {
        struct FailingLoader {
            calls: usize,
        }

        impl ChunkLoader for FailingLoader {
            fn ensure_chunk(&mut self, chunk_x: i32, _chunk_z: i32) -> Result<(), WorldError> {
                self.calls += 1;
                if chunk_x > 0 {
                    return Err(WorldError(format!("chunk column {chunk_x} unavailable")));
                }
                Ok(())
            }
        }

        let region = Region::new((0, 0, 0), (47, 0, 0));
        let mut loader = FailingLoader { calls: 0 };
        assert!(region.load_chunks(&mut loader).is_err());
        // Columns 0, 1 requested; 2 never reached.
        assert_eq!(loader.calls, 2);
    }
}
