use std::fmt;

use serde::{Deserialize, Serialize};

/// Volume and speed settings with range validation.
///
/// Player-level settings always hold concrete values; sound-level settings
/// may be unset, meaning "inherit from the owning player". Out-of-range
/// values are clamped to the nearest bound with a diagnostic, never
/// rejected, so callers can treat every set operation as applied.

/// Closed range of values a backend accepts for one setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportedRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> SupportedRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Clamp `value` into `range`.
///
/// Returns the stored value and whether the input was already in range.
/// An out-of-range input is clamped to the nearest bound and reported with
/// a warning; the clamped value is still meant to be applied.
pub fn clamp_and_report<T>(setting: &str, value: T, range: SupportedRange<T>) -> (T, bool)
where
    T: PartialOrd + Copy + fmt::Display,
{
    if value < range.min {
        tracing::warn!(
            "Can't set {} to {} (supported values: {} - {}); clamping to {}",
            setting,
            value,
            range.min,
            range.max,
            range.min
        );
        (range.min, false)
    } else if value > range.max {
        tracing::warn!(
            "Can't set {} to {} (supported values: {} - {}); clamping to {}",
            setting,
            value,
            range.min,
            range.max,
            range.max
        );
        (range.max, false)
    } else {
        (value, true)
    }
}

/// The ranges a player accepts, taken from configuration at startup.
#[derive(Debug, Clone, Copy)]
pub struct SupportedRanges {
    pub volume: SupportedRange<i32>,
    pub speed: SupportedRange<f64>,
}

impl Default for SupportedRanges {
    fn default() -> Self {
        Self {
            volume: SupportedRange::new(0, 100),
            speed: SupportedRange::new(0.5, 100.0),
        }
    }
}

/// Device-level defaults. Always concrete; there is no unset state for a
/// player, so the "inherit" sentinel is unrepresentable here.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSettings {
    volume: i32,
    speed: f64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: 100,
            speed: 1.0,
        }
    }
}

impl PlayerSettings {
    pub fn volume(&self) -> i32 {
        self.volume
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Store a clamped volume. Returns true iff `volume` was in range.
    pub fn set_volume(&mut self, volume: i32, range: SupportedRange<i32>) -> bool {
        let (value, ok) = clamp_and_report("volume", volume, range);
        self.volume = value;
        if ok {
            tracing::info!("Set volume to {}", value);
        }
        ok
    }

    /// Store a clamped speed. Returns true iff `speed` was in range.
    pub fn set_speed(&mut self, speed: f64, range: SupportedRange<f64>) -> bool {
        let (value, ok) = clamp_and_report("speed", speed, range);
        self.speed = value;
        if ok {
            tracing::info!("Set speed to {}", value);
        }
        ok
    }
}

/// Per-sound overrides. `None` means "inherit from the player".
#[derive(Debug, Clone, Copy, Default)]
pub struct SoundSettings {
    volume: Option<i32>,
    speed: Option<f64>,
}

impl SoundSettings {
    pub fn volume(&self) -> Option<i32> {
        self.volume
    }

    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn set_volume(&mut self, volume: i32, range: SupportedRange<i32>) -> bool {
        let (value, ok) = clamp_and_report("volume", volume, range);
        self.volume = Some(value);
        ok
    }

    pub fn set_speed(&mut self, speed: f64, range: SupportedRange<f64>) -> bool {
        let (value, ok) = clamp_and_report("speed", speed, range);
        self.speed = Some(value);
        ok
    }

    /// Resolve the values a spawned process will actually use: the sound's
    /// override where one is set, the player default otherwise. An override
    /// of 0 is a real override, not an unset marker.
    pub fn effective(&self, player: &PlayerSettings) -> EffectiveSettings {
        EffectiveSettings {
            volume: self.volume.unwrap_or(player.volume),
            speed: self.speed.unwrap_or(player.speed),
        }
    }
}

/// Fully resolved settings handed to the command builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveSettings {
    pub volume: i32,
    pub speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> SupportedRanges {
        SupportedRanges::default()
    }

    #[test]
    fn test_clamp_in_range_is_verbatim() {
        let (value, ok) = clamp_and_report("volume", 55, ranges().volume);
        assert_eq!(value, 55);
        assert!(ok);

        let (value, ok) = clamp_and_report("volume", 0, ranges().volume);
        assert_eq!(value, 0);
        assert!(ok);

        let (value, ok) = clamp_and_report("volume", 100, ranges().volume);
        assert_eq!(value, 100);
        assert!(ok);
    }

    #[test]
    fn test_clamp_below_min() {
        let (value, ok) = clamp_and_report("volume", -20, ranges().volume);
        assert_eq!(value, 0);
        assert!(!ok);
    }

    #[test]
    fn test_clamp_above_max() {
        let (value, ok) = clamp_and_report("volume", 250, ranges().volume);
        assert_eq!(value, 100);
        assert!(!ok);
    }

    #[test]
    fn test_clamp_speed_range() {
        let (value, ok) = clamp_and_report("speed", 0.1, ranges().speed);
        assert_eq!(value, 0.5);
        assert!(!ok);

        let (value, ok) = clamp_and_report("speed", 1.5, ranges().speed);
        assert_eq!(value, 1.5);
        assert!(ok);

        let (value, ok) = clamp_and_report("speed", 500.0, ranges().speed);
        assert_eq!(value, 100.0);
        assert!(!ok);
    }

    #[test]
    fn test_player_settings_store_clamped_value() {
        let mut settings = PlayerSettings::default();

        assert!(settings.set_volume(90, ranges().volume));
        assert_eq!(settings.volume(), 90);

        assert!(!settings.set_volume(140, ranges().volume));
        assert_eq!(settings.volume(), 100);

        assert!(!settings.set_speed(0.0, ranges().speed));
        assert_eq!(settings.speed(), 0.5);
    }

    #[test]
    fn test_effective_inherits_player_defaults() {
        let mut player = PlayerSettings::default();
        player.set_volume(90, ranges().volume);

        let sound = SoundSettings::default();
        let effective = sound.effective(&player);
        assert_eq!(effective.volume, 90);
        assert_eq!(effective.speed, 1.0);
    }

    #[test]
    fn test_effective_prefers_sound_override() {
        let mut player = PlayerSettings::default();
        player.set_volume(90, ranges().volume);

        let mut sound = SoundSettings::default();
        assert!(sound.set_volume(70, ranges().volume));

        assert_eq!(sound.effective(&player).volume, 70);
    }

    #[test]
    fn test_zero_override_is_honored() {
        let player = PlayerSettings::default();

        let mut sound = SoundSettings::default();
        assert!(sound.set_volume(0, ranges().volume));

        assert_eq!(sound.effective(&player).volume, 0);
    }
}
