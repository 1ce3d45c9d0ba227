//! Animation of the selected timestep.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::pollution::{TimeAxis, Timestep};

/// Playback speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    /// Time between two frames.
    pub fn interval(self) -> Duration {
        match self {
            Speed::Slow => Duration::from_millis(1000),
            Speed::Medium => Duration::from_millis(500),
            Speed::Fast => Duration::from_millis(100),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Speed::Slow => "Slow",
            Speed::Medium => "Medium",
            Speed::Fast => "Fast",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(Speed::Slow),
            "medium" => Ok(Speed::Medium),
            "fast" => Ok(Speed::Fast),
            other => Err(format!("unknown speed: {}", other)),
        }
    }
}

/// Play/pause state of the timestep animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Playback {
    pub playing: bool,
    pub speed: Speed,
}

impl Playback {
    pub fn new(speed: Speed) -> Self {
        Self {
            playing: false,
            speed,
        }
    }

    /// Switch between playing and paused.
    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// The timestep after `current`, wrapping to the start past the end.
    pub fn next_timestep(current: Timestep, axis: TimeAxis) -> Timestep {
        current
            .checked_add(axis.step)
            .filter(|next| *next <= axis.end)
            .unwrap_or(axis.start)
    }
}

/// Format a timestep in seconds as `H:MM:SS`.
pub fn format_clock(timestep: Timestep) -> String {
    let sign = if timestep < 0 { "-" } else { "" };
    let secs = timestep.unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const AXIS: TimeAxis = TimeAxis {
        start: 0,
        end: 90,
        step: 30,
    };

    #[test]
    fn test_next_timestep_advances() {
        assert_eq!(Playback::next_timestep(0, AXIS), 30);
        assert_eq!(Playback::next_timestep(60, AXIS), 90);
    }

    #[test]
    fn test_next_timestep_wraps() {
        assert_eq!(Playback::next_timestep(90, AXIS), 0);
        assert_eq!(Playback::next_timestep(75, AXIS), 0);
    }

    #[test]
    fn test_next_timestep_near_max_wraps() {
        assert_eq!(Playback::next_timestep(i64::MAX - 5, AXIS), 0);
        let wide = TimeAxis {
            start: -30,
            end: i64::MAX,
            step: 30,
        };
        assert_eq!(Playback::next_timestep(i64::MAX - 10, wide), -30);
    }

    #[test]
    fn test_new_is_paused() {
        let playback = Playback::new(Speed::Fast);
        assert!(!playback.playing);
        assert_eq!(playback.speed, Speed::Fast);
    }

    #[test]
    fn test_toggle() {
        let mut playback = Playback::default();
        assert!(!playback.playing);
        playback.toggle();
        assert!(playback.playing);
        playback.toggle();
        assert!(!playback.playing);
    }

    #[test]
    fn test_speed_intervals() {
        assert_eq!(Speed::default(), Speed::Medium);
        assert_eq!(Speed::Slow.interval(), Duration::from_millis(1000));
        assert_eq!(Speed::Fast.interval(), Duration::from_millis(100));
        assert_eq!("FAST".parse::<Speed>(), Ok(Speed::Fast));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00:00");
        assert_eq!(format_clock(42330), "11:45:30");
        assert_eq!(format_clock(77700), "21:35:00");
        assert_eq!(format_clock(90000), "25:00:00");
    }
}
