//! Reader for the legacy MCEdit format (`.schematic`).
//!
//! Blocks are stored as one byte of block id plus a nibble of data, with an
//! optional `AddBlocks` array extending ids past 255: each byte there holds
//! the 4-bit extensions for two consecutive blocks.

use quartz_nbt::NbtCompound;

use super::{byte_array_field, int_field, short_field, string_field};
use crate::error::{FormatError, SchematicError};
use crate::legacy::LegacyBlockTable;
use crate::schematic::{Grid, Schematic};

pub fn is_readable(root: &NbtCompound) -> bool {
    root.contains_key("Blocks")
}

pub fn read(root: &NbtCompound) -> Result<Schematic, SchematicError> {
    let table = LegacyBlockTable::global()?;

    let width = short_field(root, "Width")? as u16;
    let height = short_field(root, "Height")? as u16;
    let length = short_field(root, "Length")? as u16;

    let materials = string_field(root, "Materials")?;
    if materials != "Alpha" {
        return Err(FormatError::UnsupportedMaterials(materials.to_string()).into());
    }

    let blocks = byte_array_field(root, "Blocks")?;
    let data = byte_array_field(root, "Data")?;
    let add_blocks = if root.contains_key("AddBlocks") {
        byte_array_field(root, "AddBlocks")?
    } else {
        &[]
    };

    let area = usize::from(width) * usize::from(height) * usize::from(length);
    check_length("Blocks", blocks, area)?;
    check_length("Data", data, area)?;

    let legacy_ids = assemble_legacy_ids(blocks, add_blocks);

    let mut grid = Grid::new(width, height, length);
    let mut unknown = 0usize;
    for x in 0..width {
        for y in 0..height {
            for z in 0..length {
                let index = grid.index(x, y, z);
                // Unknown legacy ids become air rather than failing the read.
                let state_id = match table.resolve(legacy_ids[index], data[index] as u8) {
                    Some(state_id) => state_id,
                    None => {
                        unknown += 1;
                        0
                    }
                };
                grid.blocks[index] = state_id;
            }
        }
    }
    if unknown > 0 {
        log::warn!("{unknown} blocks had no legacy mapping and were replaced with air");
    }

    grid.offset = (
        int_field(root, "WEOffsetX")?,
        int_field(root, "WEOffsetY")?,
        int_field(root, "WEOffsetZ")?,
    );

    Ok(Schematic::from_grid(grid))
}

fn check_length(field: &'static str, array: &[i8], area: usize) -> Result<(), FormatError> {
    if array.len() != area {
        return Err(FormatError::LengthMismatch {
            field,
            expected: area,
            actual: array.len(),
        });
    }
    Ok(())
}

/// Combines the base id bytes with their `AddBlocks` nibble extensions.
///
/// Block `i` finds its extension in `add_blocks[i >> 1]`: the high nibble
/// for even `i`, the low nibble for odd `i`, shifted onto bits 8..12 of the
/// final id.
fn assemble_legacy_ids(blocks: &[i8], add_blocks: &[i8]) -> Vec<u16> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, &base)| {
            let extension = match add_blocks.get(i >> 1) {
                Some(&raw) => {
                    let raw = raw as u8;
                    if i % 2 == 0 {
                        u16::from(raw >> 4) << 8
                    } else {
                        u16::from(raw & 0x0F) << 4
                    }
                }
                None => 0,
            };
            extension + u16::from(base as u8)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_ids_without_add_blocks() {
        let ids = assemble_legacy_ids(&[0, 1, -1], &[]);
        // -1 is the raw byte 0xFF, i.e. unsigned 255.
        assert_eq!(ids, vec![0, 1, 255]);
    }

    #[test]
    fn test_odd_index_uses_low_nibble() {
        // Block 1 is odd: low nibble 0x1 lands on bits 4..8.
        let ids = assemble_legacy_ids(&[-1, -1], &[0x01]);
        assert_eq!(ids[1], (1 << 4) + 255);
        assert_eq!(ids[1], 271);
    }

    #[test]
    fn test_even_index_uses_high_nibble() {
        // Block 0 is even: high nibble 0x1 lands on bits 8..12.
        let ids = assemble_legacy_ids(&[-1, -1], &[0x10]);
        assert_eq!(ids[0], (1 << 8) + 255);
        assert_eq!(ids[0], 511);
    }

    #[test]
    fn test_both_nibbles_of_one_byte() {
        let ids = assemble_legacy_ids(&[0, 0], &[0x23]);
        assert_eq!(ids[0], 2 << 8);
        assert_eq!(ids[1], 3 << 4);
    }
}
