//! Events delivered by the printer host

/// Notifications the host firmware pushes into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostEvent {
    // Media events
    /// Card or drive mounted
    MediaInserted,
    /// Card or drive removed
    MediaRemoved,
    /// Mount or read failure
    MediaError,

    // Print lifecycle events
    PrintStarted,
    PrintPaused,
    PrintStopped,

    // Motion events
    /// A homing cycle finished
    HomingDone,

    // Safety events
    /// Runout sensor tripped
    FilamentRunout,
    /// Host asked for settings to be wiped
    FactoryResetRequested,
}

impl HostEvent {
    /// Text shown on the media popup, if this is a media event
    pub const fn media_message(&self) -> Option<&'static str> {
        match self {
            HostEvent::MediaInserted => Some("Media inserted"),
            HostEvent::MediaRemoved => Some("Media removed"),
            HostEvent::MediaError => Some("Media error"),
            _ => None,
        }
    }

    /// Check if this event belongs to the print lifecycle
    pub fn is_print_event(&self) -> bool {
        matches!(
            self,
            HostEvent::PrintStarted | HostEvent::PrintPaused | HostEvent::PrintStopped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_messages() {
        assert_eq!(HostEvent::MediaInserted.media_message(), Some("Media inserted"));
        assert_eq!(HostEvent::MediaError.media_message(), Some("Media error"));
        assert_eq!(HostEvent::HomingDone.media_message(), None);
    }

    #[test]
    fn test_print_events() {
        assert!(HostEvent::PrintPaused.is_print_event());
        assert!(!HostEvent::FilamentRunout.is_print_event());
    }
}
