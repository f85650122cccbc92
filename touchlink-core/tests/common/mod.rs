//! Host-side fakes shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use touchlink_core::config::SessionConfig;
use touchlink_core::nav::{Navigator, Page};
use touchlink_core::traits::{Axis, Heater, PrinterHost};
use touchlink_core::{Action, KeyValue, Session};
use touchlink_hal::{PersistentStore, SerialLink, StoreError};

#[derive(Default)]
pub struct Wire {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl Wire {
    /// Page ids written to the page register, in order
    pub fn pages(&self) -> Vec<u8> {
        let mut pages = Vec::new();
        let mut rest = &self.tx[..];
        while rest.len() >= 3 {
            let end = (3 + rest[2] as usize).min(rest.len());
            let frame = &rest[..end];
            if frame.len() == 7 && frame[3] == 0x80 && frame[4] == 0x03 {
                pages.push(frame[6]);
            }
            rest = &rest[end..];
        }
        pages
    }
}

impl SerialLink for Wire {
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

pub struct Eeprom {
    pub bytes: Vec<u8>,
}

impl Eeprom {
    pub fn blank(len: usize) -> Self {
        Self {
            bytes: vec![0xFF; len],
        }
    }
}

impl PersistentStore for Eeprom {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        let src = self
            .bytes
            .get(offset..offset + buf.len())
            .ok_or(StoreError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError> {
        let dst = self
            .bytes
            .get_mut(offset..offset + data.len())
            .ok_or(StoreError::OutOfBounds)?;
        dst.copy_from_slice(data);
        Ok(())
    }
}

#[derive(Default)]
pub struct Printer {
    pub now: u32,
    pub printing: bool,
    pub targets: [i16; 2],
    pub commands: Vec<String>,
}

impl PrinterHost for Printer {
    fn inject_command(&mut self, gcode: &str) {
        self.commands.push(gcode.to_string());
    }

    fn current_temperature(&self, _heater: Heater) -> i16 {
        25
    }

    fn target_temperature(&self, heater: Heater) -> i16 {
        self.targets[heater as usize]
    }

    fn set_target_temperature(&mut self, heater: Heater, celsius: i16) {
        self.targets[heater as usize] = celsius;
    }

    fn axis_position(&self, _axis: Axis) -> f32 {
        0.0
    }

    fn is_motion_queue_empty(&self) -> bool {
        true
    }

    fn is_printing(&self) -> bool {
        self.printing
    }

    fn now_ms(&self) -> u32 {
        self.now
    }
}

/// Navigator with a scriptable print state that records displayed pages
#[derive(Default)]
pub struct Recorder {
    pub printing: bool,
    pub shown: Vec<Page>,
}

impl Navigator for Recorder {
    fn is_printing(&self) -> bool {
        self.printing
    }

    fn is_motion_idle(&self) -> bool {
        true
    }

    fn wait(&mut self) {}

    fn display(&mut self, page: Page) {
        self.shown.push(page);
    }
}

pub type Rig = Session<Printer, Wire, Eeprom>;

pub fn session(store: Eeprom) -> Rig {
    Session::new(Printer::default(), Wire::default(), store, SessionConfig::default())
        .expect("default config is valid")
}

/// Touch frame for `key` on `action`
pub fn touch(action: Action, key: KeyValue) -> Vec<u8> {
    let var = (action as u16).to_be_bytes();
    let key = key.raw().to_be_bytes();
    vec![0x5A, 0xA5, 0x06, 0x83, var[0], var[1], 0x01, key[0], key[1]]
}

/// Deliver `bytes` and run one idle tick at `now`
pub fn deliver(rig: &mut Rig, now: u32, bytes: &[u8]) {
    rig.host_mut().now = now;
    rig.panel_mut().link_mut().rx.extend(bytes.iter().copied());
    rig.idle();
}
