//! Session timing and machine parameters

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use touchlink_protocol::DEFAULT_SPIN_LIMIT;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Status flush interval is zero
    ZeroInterval,
    /// Frame completion would never wait for a byte
    ZeroSpinLimit,
    /// Background jobs would step on every tick
    ZeroStepInterval,
    /// Bed too small for the leveling walk
    BedTooSmall,
    /// Postcard encoding or decoding failed
    Serialize,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionConfig {
    /// Repeat touches on the same action inside this window are dropped (ms)
    pub debounce_ms: u32,
    /// Minimum spacing between status flushes (ms)
    pub status_interval_ms: u32,
    /// Polls per byte while completing a started frame
    pub spin_limit: u32,
    /// Waits allowed while leaving an ExitFinishMove page, unbounded if None
    pub move_wait_limit: Option<u32>,
    /// Minimum spacing between background job steps (ms)
    pub job_step_ms: u32,
    /// Where the settings ledger starts in the persistent store
    pub settings_offset: usize,
    /// Bed size used for the leveling walk (mm)
    pub bed_x_mm: u16,
    pub bed_y_mm: u16,
    /// Extruder step per filament job tick (mm)
    pub filament_step_mm: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 20,
            status_interval_ms: 250,
            spin_limit: DEFAULT_SPIN_LIMIT,
            move_wait_limit: None,
            job_step_ms: 500,
            settings_offset: 0,
            bed_x_mm: 220,
            bed_y_mm: 220,
            filament_step_mm: 5,
        }
    }
}

impl SessionConfig {
    /// Smallest bed edge that leaves room for probe points
    pub const MIN_BED_MM: u16 = 50;

    /// Reject values the session cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.status_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.spin_limit == 0 {
            return Err(ConfigError::ZeroSpinLimit);
        }
        if self.job_step_ms == 0 || self.filament_step_mm == 0 {
            return Err(ConfigError::ZeroStepInterval);
        }
        if self.bed_x_mm < Self::MIN_BED_MM || self.bed_y_mm < Self::MIN_BED_MM {
            return Err(ConfigError::BedTooSmall);
        }
        Ok(())
    }

    /// Serialize into `buf` as postcard bytes
    #[cfg(feature = "serde")]
    pub fn to_postcard<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate postcard bytes
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Serialize)?;
        config.validate()?;
        Ok(config)
    }
}
