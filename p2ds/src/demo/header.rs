//! Source-engine demo header
//!
//! Fixed 1072-byte little-endian block at the start of every `.dem` file.

use super::reader::ByteReader;
use super::DemoError;

/// File magic, NUL included
pub const DEMO_MAGIC: &[u8; 8] = b"HL2DEMO\0";

/// Length of the fixed-size string fields
pub const HEADER_STRING_LEN: usize = 260;

/// Total header length in bytes
pub const HEADER_LEN: usize = 8 + 4 + 4 + 4 * HEADER_STRING_LEN + 4 + 4 + 4 + 4;

/// Parsed demo header
#[derive(Debug, Clone, PartialEq)]
pub struct DemoHeader {
    pub demo_protocol: i32,
    pub network_protocol: i32,
    pub server_name: String,
    pub client_name: String,
    pub map_name: String,
    pub game_directory: String,
    /// Playback time in seconds as recorded by the engine
    pub playback_time: f32,
    pub playback_ticks: i32,
    pub playback_frames: i32,
    pub sign_on_length: i32,
}

impl DemoHeader {
    /// Parse the header from the start of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<Self, DemoError> {
        let mut reader = ByteReader::new(bytes);

        let magic = reader.take(DEMO_MAGIC.len())?;
        if magic != DEMO_MAGIC {
            return Err(DemoError::BadMagic);
        }

        let header = Self {
            demo_protocol: reader.read_i32()?,
            network_protocol: reader.read_i32()?,
            server_name: reader.read_fixed_str(HEADER_STRING_LEN)?,
            client_name: reader.read_fixed_str(HEADER_STRING_LEN)?,
            map_name: reader.read_fixed_str(HEADER_STRING_LEN)?,
            game_directory: reader.read_fixed_str(HEADER_STRING_LEN)?,
            playback_time: reader.read_f32()?,
            playback_ticks: reader.read_i32()?,
            playback_frames: reader.read_i32()?,
            sign_on_length: reader.read_i32()?,
        };

        if !(2..=4).contains(&header.demo_protocol) {
            return Err(DemoError::UnsupportedProtocol(header.demo_protocol));
        }

        Ok(header)
    }

    /// Seconds per tick derived from the header, 0.016 when unusable
    pub fn interval_per_tick(&self) -> f64 {
        let time = self.playback_time as f64;
        if self.playback_ticks > 0 && time.is_finite() && time > 0.0 {
            time / self.playback_ticks as f64
        } else {
            p2ds_common::timing::NAIVE_SECONDS_PER_TICK
        }
    }

    /// Protocol 4 frames carry a player-slot byte after the tick
    pub fn has_player_slot(&self) -> bool {
        self.demo_protocol >= 4
    }
}
