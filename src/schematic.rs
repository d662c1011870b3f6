//! The in-memory voxel grid a schematic decodes into, and the operations
//! that push it back into a world.

use crate::error::SchematicError;
use crate::region::Region;
use crate::world::{BlockBatch, BlockSetter, GenerationUnit, WorldReader, WorldWriter};

/// Per-axis mirroring applied when a schematic is placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flip {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Flip {
    pub const NONE: Flip = Flip {
        x: false,
        y: false,
        z: false,
    };
}

/// A populated voxel grid. Exists only inside a ready [`Schematic`], so
/// every operation on it can assume the block array matches the dimensions.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) length: u16,
    pub(crate) offset: (i32, i32, i32),
    pub(crate) blocks: Vec<u16>,
}

impl Grid {
    pub(crate) fn new(width: u16, height: u16, length: u16) -> Self {
        let area = usize::from(width) * usize::from(height) * usize::from(length);
        Grid {
            width,
            height,
            length,
            offset: (0, 0, 0),
            blocks: vec![0; area],
        }
    }

    /// Position of `(x, y, z)` in the flat block array.
    #[inline]
    pub(crate) fn index(&self, x: u16, y: u16, z: u16) -> usize {
        let (w, l) = (usize::from(self.width), usize::from(self.length));
        usize::from(y) * w * l + usize::from(z) * w + usize::from(x)
    }

    fn contains(&self, x: u16, y: u16, z: u16) -> bool {
        x < self.width && y < self.height && z < self.length
    }
}

#[derive(Debug, Clone)]
enum State {
    /// No grid: just constructed, reset, or a failed read. The schematic is
    /// "locked" in this state and every grid operation is rejected.
    Empty,
    Ready(Grid),
}

/// A parsed schematic.
///
/// Starts out locked (empty); a format reader or [`copy`](Schematic::copy)
/// installs a grid, after which blocks can be read, edited and placed. A
/// failed read leaves the schematic locked, never partially populated.
#[derive(Debug, Clone)]
pub struct Schematic {
    state: State,
}

impl Default for Schematic {
    fn default() -> Self {
        Schematic::new()
    }
}

impl Schematic {
    /// Constructs a locked, empty schematic.
    pub fn new() -> Self {
        Schematic {
            state: State::Empty,
        }
    }

    pub(crate) fn from_grid(grid: Grid) -> Self {
        Schematic {
            state: State::Ready(grid),
        }
    }

    /// Discards the grid, returning the schematic to its locked state.
    pub fn reset(&mut self) {
        self.state = State::Empty;
    }

    /// Whether the schematic holds no grid yet.
    pub fn is_locked(&self) -> bool {
        matches!(self.state, State::Empty)
    }

    /// Installs a fresh zero-filled (all air) grid of the given dimensions,
    /// replacing whatever the schematic held before.
    pub fn set_size(&mut self, width: u16, height: u16, length: u16) {
        self.state = State::Ready(Grid::new(width, height, length));
    }

    fn grid(&self) -> Result<&Grid, SchematicError> {
        match &self.state {
            State::Ready(grid) => Ok(grid),
            State::Empty => Err(SchematicError::Locked),
        }
    }

    fn grid_mut(&mut self) -> Result<&mut Grid, SchematicError> {
        match &mut self.state {
            State::Ready(grid) => Ok(grid),
            State::Empty => Err(SchematicError::Locked),
        }
    }

    pub fn width(&self) -> u16 {
        self.grid().map(|g| g.width).unwrap_or(0)
    }

    pub fn height(&self) -> u16 {
        self.grid().map(|g| g.height).unwrap_or(0)
    }

    pub fn length(&self) -> u16 {
        self.grid().map(|g| g.length).unwrap_or(0)
    }

    /// `width * height * length`; 0 while locked. 64-bit because the
    /// maximum dimensions multiply out past `u32`.
    pub fn area(&self) -> u64 {
        self.grid()
            .map(|g| u64::from(g.width) * u64::from(g.height) * u64::from(g.length))
            .unwrap_or(0)
    }

    /// Offset applied to the placement position to find the lower corner.
    pub fn offset(&self) -> (i32, i32, i32) {
        self.grid().map(|g| g.offset).unwrap_or((0, 0, 0))
    }

    pub fn set_offset(&mut self, x: i32, y: i32, z: i32) -> Result<(), SchematicError> {
        self.grid_mut()?.offset = (x, y, z);
        Ok(())
    }

    /// Index of `(x, y, z)` in the flat block array.
    pub fn block_index(&self, x: u16, y: u16, z: u16) -> Result<usize, SchematicError> {
        let grid = self.grid()?;
        if !grid.contains(x, y, z) {
            return Err(SchematicError::OutOfBounds { x, y, z });
        }
        Ok(grid.index(x, y, z))
    }

    pub fn get_state_id(&self, x: u16, y: u16, z: u16) -> Result<u16, SchematicError> {
        let index = self.block_index(x, y, z)?;
        Ok(self.grid()?.blocks[index])
    }

    pub fn set_state_id(
        &mut self,
        x: u16,
        y: u16,
        z: u16,
        state_id: u16,
    ) -> Result<(), SchematicError> {
        let index = self.block_index(x, y, z)?;
        self.grid_mut()?.blocks[index] = state_id;
        Ok(())
    }

    /// Repopulates this schematic from a region of the world.
    ///
    /// Any previous grid is discarded up front; on failure the schematic
    /// stays locked. Positions the world reports no block for are left as
    /// air. The offset is cleared.
    pub fn copy<W: WorldReader>(
        &mut self,
        region: &Region,
        world: &mut W,
    ) -> Result<(), SchematicError> {
        self.reset();

        let (width, height, length) = region_extents(region)?;
        region.load_chunks(world)?;

        let mut grid = Grid::new(width, height, length);
        let lower = region.lower();
        for x in 0..width {
            for y in 0..height {
                for z in 0..length {
                    let state_id = world.state_id_at(
                        lower.0 + i32::from(x),
                        lower.1 + i32::from(y),
                        lower.2 + i32::from(z),
                    );
                    if let Some(state_id) = state_id {
                        let index = grid.index(x, y, z);
                        grid.blocks[index] = state_id;
                    }
                }
            }
        }

        self.state = State::Ready(grid);
        Ok(())
    }

    /// Pushes every voxel through `setter`, with `position` as the lower
    /// corner of the destination.
    ///
    /// A set flip flag mirrors the *source* index along that axis, so the
    /// written footprint is the same either way. Air (state id 0) is written
    /// like any other block; a paste erases what was underneath it.
    pub fn apply<S: BlockSetter + ?Sized>(
        &self,
        position: (i32, i32, i32),
        flip: Flip,
        setter: &mut S,
    ) -> Result<(), SchematicError> {
        let grid = self.grid()?;

        for x in 0..grid.width {
            for y in 0..grid.height {
                for z in 0..grid.length {
                    let source_x = if flip.x { grid.width - 1 - x } else { x };
                    let source_y = if flip.y { grid.height - 1 - y } else { y };
                    let source_z = if flip.z { grid.length - 1 - z } else { z };

                    let state_id = grid.blocks[grid.index(source_x, source_y, source_z)];
                    setter.set_block(
                        position.0 + i32::from(x),
                        position.1 + i32::from(y),
                        position.2 + i32::from(z),
                        state_id,
                    );
                }
            }
        }

        Ok(())
    }

    /// The region this schematic would occupy if placed at `position`, with
    /// the offset applied.
    pub fn containing_region(&self, position: (i32, i32, i32)) -> Result<Region, SchematicError> {
        let grid = self.grid()?;
        let lower = (
            position.0 + grid.offset.0,
            position.1 + grid.offset.1,
            position.2 + grid.offset.2,
        );
        let upper = (
            lower.0 + i32::from(grid.width) - 1,
            lower.1 + i32::from(grid.height) - 1,
            lower.2 + i32::from(grid.length) - 1,
        );
        Ok(Region::new(lower, upper))
    }

    /// Whether a build at `position` would stay inside the world's vertical
    /// bounds.
    pub fn is_placeable<W: WorldWriter>(
        &self,
        world: &W,
        position: (i32, i32, i32),
    ) -> Result<bool, SchematicError> {
        let region = self.containing_region(position)?;
        Ok(fits_vertically(&region, world.vertical_bounds()))
    }

    /// Places this schematic into the world at `position`.
    ///
    /// Placement bounds are checked before anything else, then the covered
    /// chunks are loaded, and finally all writes land as one batch. Returns
    /// the region that was written.
    pub fn build<W: WorldWriter>(
        &self,
        world: &mut W,
        position: (i32, i32, i32),
        flip: Flip,
    ) -> Result<Region, SchematicError> {
        let region = self.containing_region(position)?;
        let (min_y, max_y) = world.vertical_bounds();
        if !fits_vertically(&region, (min_y, max_y)) {
            return Err(SchematicError::Placement {
                lower_y: region.lower().1,
                upper_y: region.upper().1,
                min_y,
                max_y,
            });
        }

        region.load_chunks(world)?;

        let mut batch = BlockBatch::new();
        self.apply(region.lower(), flip, &mut batch)?;
        batch.flush(world);

        Ok(region)
    }

    /// Applies this schematic to a freshly forked sub-region of a
    /// generation unit instead of the live world.
    pub fn fork<G: GenerationUnit>(
        &self,
        unit: &mut G,
        position: (i32, i32, i32),
        flip: Flip,
    ) -> Result<(), SchematicError> {
        let grid = self.grid()?;

        let start = (
            position.0 - grid.offset.0,
            position.1 - grid.offset.1,
            position.2 - grid.offset.2,
        );
        let end = (
            start.0 + i32::from(grid.width),
            start.1 + i32::from(grid.height),
            start.2 + i32::from(grid.length),
        );

        let mut modifier = unit.fork(start, end);
        self.apply(position, flip, &mut modifier)
    }
}

fn fits_vertically(region: &Region, (min_y, max_y): (i32, i32)) -> bool {
    region.lower().1 >= min_y && region.upper().1 <= max_y
}

fn region_extents(region: &Region) -> Result<(u16, u16, u16), SchematicError> {
    let (width, height, length) = (region.width(), region.height(), region.length());
    match (
        u16::try_from(width),
        u16::try_from(height),
        u16::try_from(length),
    ) {
        (Ok(w), Ok(h), Ok(l)) => Ok((w, h, l)),
        _ => Err(SchematicError::RegionTooLarge {
            width,
            height,
            length,
        }),
    }
}
