//! Demo frame walk
//!
//! Walks the command stream after the header and keeps what the splitter
//! needs: console commands with their ticks, the sync tick and the last
//! tick seen. Packet, user-command and table payloads are skipped.

use super::header::{DemoHeader, HEADER_LEN};
use super::reader::{c_string, ByteReader};
use super::DemoError;

/// Split-screen slots in protocol 4 packet command info
const PROTOCOL4_CMDINFO_SLOTS: usize = 2;
/// Size of one command info block (flags, view origin/angles, local angles)
const CMDINFO_LEN: usize = 76;

/// Demo command byte, protocol 4 numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCommand {
    SignOn,
    Packet,
    SyncTick,
    ConsoleCmd,
    UserCmd,
    DataTables,
    Stop,
    CustomData,
    StringTables,
}

impl DemoCommand {
    fn from_byte(byte: u8, protocol: i32) -> Option<Self> {
        let command = match byte {
            1 => DemoCommand::SignOn,
            2 => DemoCommand::Packet,
            3 => DemoCommand::SyncTick,
            4 => DemoCommand::ConsoleCmd,
            5 => DemoCommand::UserCmd,
            6 => DemoCommand::DataTables,
            7 => DemoCommand::Stop,
            8 if protocol >= 4 => DemoCommand::CustomData,
            8 => DemoCommand::StringTables,
            9 if protocol >= 4 => DemoCommand::StringTables,
            _ => return None,
        };
        Some(command)
    }
}

/// Console command recorded in the demo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleCommand {
    pub tick: i32,
    pub text: String,
}

/// What the frame walk found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSummary {
    pub console_commands: Vec<ConsoleCommand>,
    pub sync_tick: Option<i32>,
    /// Largest non-negative tick of any frame
    pub last_tick: Option<i32>,
    pub frames: usize,
    /// A stop frame ended the stream
    pub stopped: bool,
}

impl FrameSummary {
    /// `last_tick - sync_tick`, when both are known
    pub fn measured_ticks(&self) -> Option<i64> {
        match (self.sync_tick, self.last_tick) {
            (Some(sync), Some(last)) => Some((last as i64 - sync as i64).max(0)),
            _ => None,
        }
    }
}

/// Walk every frame after the header
///
/// A stream that ends exactly on a frame boundary without a stop frame is
/// accepted; anything cut mid-frame is an error.
pub fn walk_frames(bytes: &[u8], header: &DemoHeader) -> Result<FrameSummary, DemoError> {
    let mut reader = ByteReader::at(bytes, HEADER_LEN);
    let mut summary = FrameSummary::default();

    let cmdinfo_len = if header.has_player_slot() {
        CMDINFO_LEN * PROTOCOL4_CMDINFO_SLOTS
    } else {
        CMDINFO_LEN
    };

    while !reader.is_at_end() {
        let offset = reader.offset();
        let byte = reader.read_u8()?;
        let command = DemoCommand::from_byte(byte, header.demo_protocol)
            .ok_or(DemoError::UnknownCommand { offset, byte })?;
        let tick = reader.read_i32()?;
        if header.has_player_slot() {
            reader.skip(1)?;
        }

        summary.frames += 1;
        if tick >= 0 {
            summary.last_tick = Some(summary.last_tick.map_or(tick, |last| last.max(tick)));
        }

        match command {
            DemoCommand::SignOn | DemoCommand::Packet => {
                reader.skip(cmdinfo_len)?;
                // in/out sequence numbers
                reader.skip(8)?;
                reader.read_sized()?;
            }
            DemoCommand::SyncTick => {
                summary.sync_tick = Some(tick);
            }
            DemoCommand::ConsoleCmd => {
                let text = c_string(reader.read_sized()?);
                summary.console_commands.push(ConsoleCommand { tick, text });
            }
            DemoCommand::UserCmd => {
                // command number
                reader.skip(4)?;
                reader.read_sized()?;
            }
            DemoCommand::DataTables | DemoCommand::StringTables => {
                reader.read_sized()?;
            }
            DemoCommand::CustomData => {
                // callback index
                reader.skip(4)?;
                reader.read_sized()?;
            }
            DemoCommand::Stop => {
                summary.stopped = true;
                break;
            }
        }
    }

    Ok(summary)
}
