//! Decoding of Minecraft schematic files into an in-memory voxel grid, and
//! placement of that grid back into a hosting world.
//!
//! Two binary layouts are supported: the legacy MCEdit format (block ids
//! plus data nibbles, resolved through a bundled legacy lookup table) and
//! the palette-based Sponge format (LEB128 varint indices into a block
//! descriptor palette). Everything the hosting world owns — chunk loading,
//! the block registry, world bounds — is consumed through the traits in
//! [`world`].
//!
//! ```no_run
//! use schemplate::{from_path, BlockRegistry, BlockState};
//!
//! struct Registry;
//! impl BlockRegistry for Registry {
//!     fn resolve(&self, block: &BlockState) -> Option<u16> {
//!         // Delegate to the hosting world's block registry.
//!         # let _ = block;
//!         None
//!     }
//! }
//!
//! # fn main() -> Result<(), schemplate::SchematicError> {
//! let schematic = from_path("house.schem", &Registry)?;
//! println!("{}x{}x{}", schematic.width(), schematic.height(), schematic.length());
//! # Ok(())
//! # }
//! ```

pub mod block_state;
pub mod error;
pub mod formats;
pub mod legacy;
pub mod region;
pub mod schematic;
pub mod varint;
pub mod world;

pub use block_state::BlockState;
pub use error::{FormatError, LegacyTableError, SchematicError, WorldError};
pub use formats::{detect, from_bytes, from_nbt, from_path, SchematicFormat};
pub use legacy::LegacyBlockTable;
pub use region::Region;
pub use schematic::{Flip, Schematic};
pub use world::{
    BlockBatch, BlockRegistry, BlockSetter, ChunkLoader, GenerationUnit, WorldReader, WorldWriter,
};
