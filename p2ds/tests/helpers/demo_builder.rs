//! Synthetic Source-engine demo files
//!
//! Builds byte-exact `.dem` buffers with a chosen map, protocol and frame
//! stream, so demo parsing can be tested without real recordings.

#![allow(dead_code)]

use std::path::Path;

enum Frame {
    SignOn(usize),
    Packet(i32, usize),
    SyncTick(i32),
    ConsoleCmd(i32, String),
    UserCmd(i32, usize),
    DataTables(i32, usize),
    StringTables(i32, usize),
    CustomData(i32, usize),
    Stop(i32),
}

pub struct DemoBuilder {
    map_name: String,
    protocol: i32,
    header_ticks: i32,
    header_time: f32,
    frames: Vec<Frame>,
    trailing: Vec<u8>,
}

impl DemoBuilder {
    pub fn new(map_name: &str) -> Self {
        Self {
            map_name: map_name.to_string(),
            protocol: 4,
            header_ticks: 0,
            header_time: 0.0,
            frames: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn protocol(mut self, protocol: i32) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn header_ticks(mut self, ticks: i32, seconds: f32) -> Self {
        self.header_ticks = ticks;
        self.header_time = seconds;
        self
    }

    pub fn sign_on(mut self, size: usize) -> Self {
        self.frames.push(Frame::SignOn(size));
        self
    }

    pub fn packet(mut self, tick: i32, size: usize) -> Self {
        self.frames.push(Frame::Packet(tick, size));
        self
    }

    pub fn sync_tick(mut self, tick: i32) -> Self {
        self.frames.push(Frame::SyncTick(tick));
        self
    }

    pub fn console_cmd(mut self, tick: i32, text: &str) -> Self {
        self.frames.push(Frame::ConsoleCmd(tick, text.to_string()));
        self
    }

    pub fn user_cmd(mut self, tick: i32, size: usize) -> Self {
        self.frames.push(Frame::UserCmd(tick, size));
        self
    }

    pub fn data_tables(mut self, tick: i32, size: usize) -> Self {
        self.frames.push(Frame::DataTables(tick, size));
        self
    }

    pub fn string_tables(mut self, tick: i32, size: usize) -> Self {
        self.frames.push(Frame::StringTables(tick, size));
        self
    }

    pub fn custom_data(mut self, tick: i32, size: usize) -> Self {
        self.frames.push(Frame::CustomData(tick, size));
        self
    }

    pub fn stop(mut self, tick: i32) -> Self {
        self.frames.push(Frame::Stop(tick));
        self
    }

    /// Bytes appended after the last frame
    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    /// A demo of `ticks` playback ticks, optionally ending in the escape prompt
    pub fn finished_map(map_name: &str, ticks: i32, escape: bool) -> Vec<u8> {
        let mut builder = Self::new(map_name)
            .header_ticks(ticks, ticks as f32 / 60.0)
            .sign_on(32)
            .sync_tick(0)
            .packet(1, 16)
            .packet(ticks, 16);
        if escape {
            builder = builder.console_cmd(ticks, "gameui_allowescapetoshow");
        }
        builder.stop(ticks).build()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"HL2DEMO\0");
        out.extend_from_slice(&self.protocol.to_le_bytes());
        out.extend_from_slice(&2001i32.to_le_bytes());
        push_fixed(&mut out, "localhost:27015");
        push_fixed(&mut out, "player");
        push_fixed(&mut out, &self.map_name);
        push_fixed(&mut out, "portal2");
        out.extend_from_slice(&self.header_time.to_le_bytes());
        out.extend_from_slice(&self.header_ticks.to_le_bytes());
        out.extend_from_slice(&(self.frames.len() as i32).to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());

        let cmdinfo_len = if self.protocol >= 4 { 152 } else { 76 };
        let modern = self.protocol >= 4;

        for frame in &self.frames {
            match frame {
                Frame::SignOn(size) => {
                    self.prefix(&mut out, 1, 0);
                    out.resize(out.len() + cmdinfo_len + 8, 0);
                    push_sized(&mut out, &vec![0xAB; *size]);
                }
                Frame::Packet(tick, size) => {
                    self.prefix(&mut out, 2, *tick);
                    out.resize(out.len() + cmdinfo_len + 8, 0);
                    push_sized(&mut out, &vec![0xCD; *size]);
                }
                Frame::SyncTick(tick) => self.prefix(&mut out, 3, *tick),
                Frame::ConsoleCmd(tick, text) => {
                    self.prefix(&mut out, 4, *tick);
                    let mut data = text.as_bytes().to_vec();
                    data.push(0);
                    push_sized(&mut out, &data);
                }
                Frame::UserCmd(tick, size) => {
                    self.prefix(&mut out, 5, *tick);
                    out.extend_from_slice(&1i32.to_le_bytes());
                    push_sized(&mut out, &vec![0; *size]);
                }
                Frame::DataTables(tick, size) => {
                    self.prefix(&mut out, 6, *tick);
                    push_sized(&mut out, &vec![0; *size]);
                }
                Frame::StringTables(tick, size) => {
                    self.prefix(&mut out, if modern { 9 } else { 8 }, *tick);
                    push_sized(&mut out, &vec![0; *size]);
                }
                Frame::CustomData(tick, size) => {
                    self.prefix(&mut out, 8, *tick);
                    out.extend_from_slice(&0i32.to_le_bytes());
                    push_sized(&mut out, &vec![0; *size]);
                }
                Frame::Stop(tick) => self.prefix(&mut out, 7, *tick),
            }
        }

        out.extend_from_slice(&self.trailing);
        out
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }

    fn prefix(&self, out: &mut Vec<u8>, command: u8, tick: i32) {
        out.push(command);
        out.extend_from_slice(&tick.to_le_bytes());
        if self.protocol >= 4 {
            out.push(0);
        }
    }
}

fn push_fixed(out: &mut Vec<u8>, text: &str) {
    let mut field = [0u8; 260];
    let len = text.len().min(259);
    field[..len].copy_from_slice(&text.as_bytes()[..len]);
    out.extend_from_slice(&field);
}

fn push_sized(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(&(data.len() as i32).to_le_bytes());
    out.extend_from_slice(data);
}
