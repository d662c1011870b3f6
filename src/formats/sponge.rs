//! Reader for the palette-based Sponge format (`.schem`).
//!
//! Voxels are LEB128 varints indexing into a palette of block descriptors;
//! descriptors are resolved to state ids through the hosting world's
//! [`BlockRegistry`].

use quartz_nbt::{NbtCompound, NbtTag};

use super::{byte_array_field, compound_field, int_field, short_field};
use crate::block_state::BlockState;
use crate::error::{FormatError, SchematicError};
use crate::schematic::{Grid, Schematic};
use crate::varint;
use crate::world::BlockRegistry;

pub fn is_readable(root: &NbtCompound) -> bool {
    root.contains_key("Palette") || matches!(root.get::<_, i32>("Version"), Ok(version) if version < 2)
}

pub fn read<R: BlockRegistry>(
    root: &NbtCompound,
    registry: &R,
) -> Result<Schematic, SchematicError> {
    let width = short_field(root, "Width")? as u16;
    let height = short_field(root, "Height")? as u16;
    let length = short_field(root, "Length")? as u16;

    // Unlike MCEdit, the offsets live under a Metadata compound.
    let metadata = compound_field(root, "Metadata")?;
    let offset = (
        int_field(metadata, "WEOffsetX")?,
        int_field(metadata, "WEOffsetY")?,
        int_field(metadata, "WEOffsetZ")?,
    );

    let palette = read_palette(root)?;
    let resolved: Vec<u16> = palette
        .iter()
        .map(|descriptor| resolve_descriptor(descriptor, registry))
        .collect();

    let block_data = byte_array_field(root, "BlockData")?;
    if block_data.is_empty() {
        return Err(FormatError::MissingField("BlockData").into());
    }
    let bytes: Vec<u8> = block_data.iter().map(|&b| b as u8).collect();
    let indices = varint::decode_stream(&bytes)?;

    // 64-bit so declared dimensions of 65535 each cannot wrap the product
    // into something a crafted varint count could match.
    let area = u64::from(width) * u64::from(height) * u64::from(length);
    if indices.len() as u64 != area {
        return Err(FormatError::BlockCountMismatch {
            expected: area,
            actual: indices.len() as u64,
        }
        .into());
    }

    let mut grid = Grid::new(width, height, length);
    let layer = u64::from(width) * u64::from(length);
    for (i, &value) in indices.iter().enumerate() {
        let state_id = *resolved
            .get(value as usize)
            .ok_or(FormatError::PaletteIndexOutOfRange(value))?;

        // BlockData runs x fastest, then z, then y.
        let i = i as u64;
        let y = i / layer;
        let remainder = i % layer;
        let z = remainder / u64::from(width);
        let x = remainder % u64::from(width);

        let index = grid.index(x as u16, y as u16, z as u16);
        grid.blocks[index] = state_id;
    }

    grid.offset = offset;
    Ok(Schematic::from_grid(grid))
}

/// Reads the name -> index palette map and returns the descriptors ordered
/// ascending by index.
fn read_palette(root: &NbtCompound) -> Result<Vec<String>, FormatError> {
    let declared = int_field(root, "PaletteMax")?;
    let palette = compound_field(root, "Palette")?;

    let mut entries: Vec<(String, i32)> = Vec::with_capacity(palette.inner().len());
    for (name, tag) in palette.inner() {
        match tag {
            NbtTag::Int(index) => entries.push((name.clone(), *index)),
            _ => {
                return Err(FormatError::MistypedField {
                    field: "Palette",
                    expected: "int entries",
                })
            }
        }
    }

    if entries.len() != declared as usize {
        return Err(FormatError::PaletteSizeMismatch {
            declared,
            actual: entries.len(),
        });
    }

    entries.sort_by_key(|&(_, index)| index);
    Ok(entries.into_iter().map(|(name, _)| name).collect())
}

/// Resolves a palette descriptor to a state id.
///
/// If the full descriptor fails but carries properties, the bare block name
/// is retried so an unknown property degrades to the default state rather
/// than to air. A completely unknown name becomes air.
fn resolve_descriptor<R: BlockRegistry>(descriptor: &str, registry: &R) -> u16 {
    let block = BlockState::parse(descriptor);
    if let Some(state_id) = registry.resolve(&block) {
        return state_id;
    }
    if !block.properties.is_empty() {
        if let Some(state_id) = registry.resolve(&BlockState::new(block.name.clone())) {
            return state_id;
        }
    }
    log::warn!("unknown palette block {descriptor:?}, replacing with air");
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_sorted_by_index() {
        let mut palette = NbtCompound::new();
        palette.insert("a", NbtTag::Int(5));
        palette.insert("b", NbtTag::Int(0));
        palette.insert("c", NbtTag::Int(2));

        let mut root = NbtCompound::new();
        root.insert("PaletteMax", NbtTag::Int(3));
        root.insert("Palette", NbtTag::Compound(palette));

        assert_eq!(read_palette(&root).unwrap(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_palette_size_mismatch_is_rejected() {
        let mut palette = NbtCompound::new();
        palette.insert("minecraft:air", NbtTag::Int(0));

        let mut root = NbtCompound::new();
        root.insert("PaletteMax", NbtTag::Int(2));
        root.insert("Palette", NbtTag::Compound(palette));

        assert!(matches!(
            read_palette(&root),
            Err(FormatError::PaletteSizeMismatch {
                declared: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_version_one_is_readable_without_palette_key() {
        let mut root = NbtCompound::new();
        root.insert("Version", NbtTag::Int(1));
        assert!(is_readable(&root));

        let mut root = NbtCompound::new();
        root.insert("Version", NbtTag::Int(2));
        assert!(!is_readable(&root));
    }
}
