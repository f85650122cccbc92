//! In-memory stand-ins for the serial link, store and printer host

use std::collections::VecDeque;
use std::string::String;
use std::vec;
use std::vec::Vec;

use touchlink_hal::{PersistentStore, SerialLink, StoreError};

use crate::traits::{Axis, Heater, PrinterHost};

/// Serial link fed from a byte queue, recording everything written
#[derive(Default)]
pub struct MockLink {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    pub fn clear_sent(&mut self) {
        self.tx.clear();
    }

    /// Split the transmitted bytes back into frames
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        let mut rest = &self.tx[..];
        while rest.len() >= 3 {
            let end = (3 + rest[2] as usize).min(rest.len());
            frames.push(rest[..end].to_vec());
            rest = &rest[end..];
        }
        frames
    }

    /// Page ids sent through the page register, in order
    pub fn pages_shown(&self) -> Vec<u8> {
        self.sent_frames()
            .iter()
            .filter(|f| f.len() == 7 && f[3] == 0x80 && f[4] == 0x03)
            .map(|f| f[6])
            .collect()
    }
}

impl SerialLink for MockLink {
    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.tx.extend_from_slice(bytes);
    }
}

/// Byte-addressable RAM store
pub struct RamStore {
    pub data: Vec<u8>,
    pub committed: Option<u16>,
    pub commits: u32,
    /// Report the committed checksum back through `stored_checksum`
    pub keeps_checksum: bool,
}

impl RamStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0xFF; capacity],
            committed: None,
            commits: 0,
            keeps_checksum: false,
        }
    }
}

impl PersistentStore for RamStore {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        let end = offset.checked_add(buf.len()).ok_or(StoreError::OutOfBounds)?;
        let src = self.data.get(offset..end).ok_or(StoreError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StoreError> {
        let end = offset.checked_add(bytes.len()).ok_or(StoreError::OutOfBounds)?;
        let dst = self.data.get_mut(offset..end).ok_or(StoreError::OutOfBounds)?;
        dst.copy_from_slice(bytes);
        Ok(())
    }

    fn commit(&mut self, checksum: u16) -> Result<(), StoreError> {
        self.committed = Some(checksum);
        self.commits += 1;
        Ok(())
    }

    fn stored_checksum(&mut self) -> Option<u16> {
        if self.keeps_checksum {
            self.committed
        } else {
            None
        }
    }
}

/// Scripted printer
pub struct MockHost {
    pub hotend: i16,
    pub bed: i16,
    pub targets: [i16; 2],
    pub position: [f32; 4],
    pub printing: bool,
    pub progress: u8,
    pub now: u32,
    /// Moves still queued; each yield retires one
    pub queued_moves: u32,
    /// Queue never drains
    pub motion_stuck: bool,
    pub commands: Vec<String>,
    pub yields: u32,
    /// Clock advance per yield
    pub yield_step_ms: u32,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            hotend: 0,
            bed: 0,
            targets: [0; 2],
            position: [0.0; 4],
            printing: false,
            progress: 0,
            now: 0,
            queued_moves: 0,
            motion_stuck: false,
            commands: Vec::new(),
            yields: 0,
            yield_step_ms: 0,
        }
    }

    /// Every injected command line, in order
    pub fn lines(&self) -> Vec<&str> {
        self.commands.iter().flat_map(|c| c.lines()).collect()
    }
}

fn slot(heater: Heater) -> usize {
    match heater {
        Heater::Hotend => 0,
        Heater::Bed => 1,
    }
}

impl PrinterHost for MockHost {
    fn inject_command(&mut self, gcode: &str) {
        self.commands.push(String::from(gcode));
    }

    fn current_temperature(&self, heater: Heater) -> i16 {
        match heater {
            Heater::Hotend => self.hotend,
            Heater::Bed => self.bed,
        }
    }

    fn target_temperature(&self, heater: Heater) -> i16 {
        self.targets[slot(heater)]
    }

    fn set_target_temperature(&mut self, heater: Heater, celsius: i16) {
        self.targets[slot(heater)] = celsius;
    }

    fn axis_position(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.position[0],
            Axis::Y => self.position[1],
            Axis::Z => self.position[2],
            Axis::E => self.position[3],
        }
    }

    fn is_motion_queue_empty(&self) -> bool {
        !self.motion_stuck && self.queued_moves == 0
    }

    fn is_printing(&self) -> bool {
        self.printing
    }

    fn print_progress(&self) -> u8 {
        self.progress
    }

    fn now_ms(&self) -> u32 {
        self.now
    }

    fn yield_now(&mut self) {
        self.yields += 1;
        self.now = self.now.wrapping_add(self.yield_step_ms);
        self.queued_moves = self.queued_moves.saturating_sub(1);
    }
}
