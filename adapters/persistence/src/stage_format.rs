//! Stage format: a version line, three metadata lines and an inlined map.

use scurry_core::{Stage, StageInfo, STAGE_FORMAT_VERSION};

use crate::{
    map_format::{read_map, write_map},
    CodecError, LineReader, LineWriter,
};

/// Encodes `stage` at the current format revision.
#[must_use]
pub fn encode_stage(stage: &Stage) -> Vec<String> {
    let mut writer = LineWriter::new();
    writer.push_u32(STAGE_FORMAT_VERSION);
    writer.push_text(&stage.info.name);
    writer.push_text(&stage.info.music_track);
    writer.push_text(&stage.info.resource_pack);
    write_map(&stage.grid, &mut writer);
    writer.into_lines()
}

/// Decodes a stage stream.
///
/// The version line is checked before anything else is read, so a stream
/// from another revision fails with [`CodecError::UnsupportedVersion`].
pub fn decode_stage(lines: &[String], tile_size: f32) -> Result<Stage, CodecError> {
    let mut reader = LineReader::new(lines);
    let version = reader.next_u32("format version")?;
    if version != STAGE_FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: version,
            expected: STAGE_FORMAT_VERSION,
        });
    }

    let name = reader.next_text("stage name")?;
    let music_track = reader.next_text("music track")?;
    let resource_pack = reader.next_text("resource pack")?;
    let grid = read_map(&mut reader, tile_size)?;

    Ok(Stage::new(StageInfo::new(name, music_track, resource_pack), grid))
}

#[cfg(test)]
mod tests {
    use scurry_core::{Grid, Improvement, TileCoord};

    use super::*;

    #[test]
    fn header_precedes_map_block() {
        let stage = Stage::new(
            StageInfo::new("Cheese Run", "theme_a", "default"),
            Grid::with_dimensions(1, 2, 1.0),
        );
        let encoded = encode_stage(&stage);
        assert_eq!(
            encoded,
            vec!["1", "Cheese Run", "theme_a", "default", "1", "2", "4", "4"]
        );
    }

    #[test]
    fn stage_round_trips() {
        let mut grid = Grid::with_dimensions(3, 3, 1.0);
        assert!(grid.place_improvement(TileCoord::new(2, 2), Improvement::Hole));
        let stage = Stage::new(StageInfo::new("Hole", "", "retro"), grid);

        let decoded = decode_stage(&encode_stage(&stage), 1.0).expect("decode");
        assert_eq!(decoded, stage);
    }

    #[test]
    fn foreign_version_stops_before_metadata() {
        let lines: Vec<String> = vec!["2".to_owned()];
        assert_eq!(
            decode_stage(&lines, 1.0),
            Err(CodecError::UnsupportedVersion {
                found: 2,
                expected: STAGE_FORMAT_VERSION,
            })
        );
    }
}
