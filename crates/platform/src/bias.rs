//! Power bias levels and device identity
//!
//! The power-management authority drives the codec through the bias levels
//! below. The machine driver only reacts to them; it never initiates one.

/// Power/activity state of the codec's analog and digital domains.
///
/// Ordered by power draw, `Off < Standby < Prepare < On`. Transitions are not
/// necessarily linear: the authority may jump between any two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerBiasLevel {
    /// Fully powered down
    #[default]
    Off,
    /// Bias generated, no clocks required
    Standby,
    /// About to stream; clocks must be running before `On`
    Prepare,
    /// Streaming
    On,
}

impl PowerBiasLevel {
    /// All levels in ascending power order.
    pub const ALL: [Self; 4] = [Self::Off, Self::Standby, Self::Prepare, Self::On];

    /// Short lowercase name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Standby => "standby",
            Self::Prepare => "prepare",
            Self::On => "on",
        }
    }

    /// Returns `true` for the levels at which the FLL may be running.
    pub const fn is_clocked(self) -> bool {
        matches!(self, Self::Prepare | Self::On)
    }
}

impl core::fmt::Display for PowerBiasLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of one hardware device instance on the card.
///
/// Several digital-audio interfaces can share a card; bias events carry the
/// id of the device they belong to, and clock hooks only act on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct DeviceId(pub u32);

impl core::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "dev{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_power() {
        assert!(PowerBiasLevel::Off < PowerBiasLevel::Standby);
        assert!(PowerBiasLevel::Standby < PowerBiasLevel::Prepare);
        assert!(PowerBiasLevel::Prepare < PowerBiasLevel::On);
    }

    #[test]
    fn default_level_is_off() {
        assert_eq!(PowerBiasLevel::default(), PowerBiasLevel::Off);
    }

    #[test]
    fn only_prepare_and_on_are_clocked() {
        let clocked: std::vec::Vec<_> = PowerBiasLevel::ALL
            .iter()
            .copied()
            .filter(|l| l.is_clocked())
            .collect();
        assert_eq!(clocked, [PowerBiasLevel::Prepare, PowerBiasLevel::On]);
    }

    #[test]
    fn display_uses_short_names() {
        assert_eq!(std::format!("{}", PowerBiasLevel::Standby), "standby");
        assert_eq!(std::format!("{}", DeviceId(7)), "dev7");
    }
}
