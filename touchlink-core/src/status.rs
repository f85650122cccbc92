//! Rate-limited status flush
//!
//! Pushes temperatures, positions and progress to the panel no more often
//! than every `interval_ms`.

use touchlink_hal::SerialLink;

use crate::layout;
use crate::panel::Panel;
use crate::traits::{Axis, Heater, PrinterHost};

/// Tracks when the panel last received a status update
#[derive(Debug, Clone)]
pub struct StatusReporter {
    interval_ms: u32,
    last_flush_ms: Option<u32>,
    job_progress: u8,
    flushes: u32,
}

impl StatusReporter {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_flush_ms: None,
            job_progress: 0,
            flushes: 0,
        }
    }

    /// Progress of the background job, shown next to print progress
    pub fn set_job_progress(&mut self, percent: u8) {
        self.job_progress = percent.min(100);
    }

    /// True when a flush at `now_ms` would go out
    pub fn is_due(&self, now_ms: u32) -> bool {
        match self.last_flush_ms {
            Some(last) => now_ms.wrapping_sub(last) >= self.interval_ms,
            None => true,
        }
    }

    /// Send the status block if due, or unconditionally with `force`
    ///
    /// Returns true if anything was sent.
    pub fn flush<H, L>(&mut self, host: &H, panel: &mut Panel<L>, now_ms: u32, force: bool) -> bool
    where
        H: PrinterHost + ?Sized,
        L: SerialLink,
    {
        if !force && !self.is_due(now_ms) {
            return false;
        }
        self.last_flush_ms = Some(now_ms);
        self.flushes = self.flushes.wrapping_add(1);

        let temps = [
            celsius_word(host.current_temperature(Heater::Hotend)),
            celsius_word(host.target_temperature(Heater::Hotend)),
            celsius_word(host.current_temperature(Heater::Bed)),
            celsius_word(host.target_temperature(Heater::Bed)),
        ];
        panel.write_words(layout::TEMPERATURES, &temps);

        let positions = [
            tenths(host.axis_position(Axis::X)),
            tenths(host.axis_position(Axis::Y)),
            tenths(host.axis_position(Axis::Z)),
        ];
        panel.write_words(layout::POSITIONS, &positions);

        let progress = [u16::from(host.print_progress().min(100)), u16::from(self.job_progress)];
        panel.write_words(layout::PROGRESS, &progress);

        trace!("status flush {}", self.flushes);
        true
    }

    /// Number of flushes sent so far
    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

fn celsius_word(celsius: i16) -> u16 {
    celsius.max(0) as u16
}

/// Millimetres to a signed tenth-millimetre word, as the panel expects it
fn tenths(mm: f32) -> u16 {
    let scaled = mm * 10.0;
    let clamped = if scaled > i16::MAX as f32 {
        i16::MAX
    } else if scaled < i16::MIN as f32 {
        i16::MIN
    } else {
        scaled as i16
    };
    clamped as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockHost, MockLink};

    #[test]
    fn test_rate_limited() {
        let host = MockHost::new();
        let mut panel = Panel::new(MockLink::new(), 8);
        let mut status = StatusReporter::new(250);

        assert!(status.flush(&host, &mut panel, 1000, false));
        assert!(!status.flush(&host, &mut panel, 1100, false));
        assert!(!status.flush(&host, &mut panel, 1249, false));
        assert!(status.flush(&host, &mut panel, 1250, false));
        assert_eq!(status.flushes(), 2);
    }

    #[test]
    fn test_force_ignores_interval() {
        let host = MockHost::new();
        let mut panel = Panel::new(MockLink::new(), 8);
        let mut status = StatusReporter::new(250);
        status.flush(&host, &mut panel, 0, false);
        assert!(status.flush(&host, &mut panel, 10, true));
    }

    #[test]
    fn test_wrapping_clock() {
        let host = MockHost::new();
        let mut panel = Panel::new(MockLink::new(), 8);
        let mut status = StatusReporter::new(250);
        status.flush(&host, &mut panel, u32::MAX - 100, false);
        assert!(!status.flush(&host, &mut panel, 100, false));
        assert!(status.flush(&host, &mut panel, 150, false));
    }

    #[test]
    fn test_temperature_block() {
        let mut host = MockHost::new();
        host.set_target_temperature(Heater::Hotend, 210);
        host.hotend = 25;
        let mut panel = Panel::new(MockLink::new(), 8);
        let mut status = StatusReporter::new(250);
        status.flush(&host, &mut panel, 0, true);
        let sent = panel.link().sent();
        // First frame: write-ram to 0x2000 with four words
        assert_eq!(
            &sent[..13],
            &[0x5A, 0xA5, 0x0B, 0x82, 0x20, 0x00, 0x00, 25, 0x00, 210, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_tenths() {
        assert_eq!(tenths(12.34), 123);
        assert_eq!(tenths(-1.0) as i16, -10);
        assert_eq!(tenths(1.0e6) as i16, i16::MAX);
    }
}
