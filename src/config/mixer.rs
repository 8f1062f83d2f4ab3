// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::sounds::Category;
use crate::mixer::{is_valid_floor_db, DEFAULT_FLOOR_DB};

/// A YAML representation of the mixer bridge configuration.
#[derive(Deserialize, Clone, Serialize, Debug)]
pub struct MixerConfig {
    /// The gain in decibels that stands in for silence.
    #[serde(default = "default_floor_db")]
    floor_db: f32,

    /// The mixer channel names each category is pushed to.
    #[serde(default)]
    channels: MixerChannels,
}

fn default_floor_db() -> f32 {
    DEFAULT_FLOOR_DB
}

impl MixerConfig {
    /// Creates a new mixer configuration. The floor must be finite and at most 0 dB.
    pub fn new(floor_db: f32, channels: MixerChannels) -> Result<MixerConfig, ConfigError> {
        let config = MixerConfig { floor_db, channels };
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that can't be caught by deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_floor_db(self.floor_db) {
            return Err(ConfigError::InvalidFloor(self.floor_db));
        }
        Ok(())
    }

    /// Gets the decibel floor.
    pub fn floor_db(&self) -> f32 {
        self.floor_db
    }

    /// Gets the mixer channel for the given category, if it has one.
    pub fn channel(&self, category: Category) -> Option<&str> {
        match category {
            Category::SoundEffect => self.channels.sound_effect.as_deref(),
            Category::Music => self.channels.music.as_deref(),
            Category::Other => self.channels.other.as_deref(),
        }
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        MixerConfig {
            floor_db: DEFAULT_FLOOR_DB,
            channels: MixerChannels::default(),
        }
    }
}

/// Mixer channel names per category. A category set to null is not forwarded.
#[derive(Deserialize, Clone, Serialize, Debug)]
pub struct MixerChannels {
    #[serde(default = "default_sound_effect_channel")]
    sound_effect: Option<String>,
    #[serde(default = "default_music_channel")]
    music: Option<String>,
    #[serde(default = "default_other_channel")]
    other: Option<String>,
}

fn default_sound_effect_channel() -> Option<String> {
    Some("SoundEffectVolume".to_string())
}

fn default_music_channel() -> Option<String> {
    Some("MusicVolume".to_string())
}

fn default_other_channel() -> Option<String> {
    Some("OtherVolume".to_string())
}

impl MixerChannels {
    /// Creates a new channel mapping.
    pub fn new(
        sound_effect: Option<String>,
        music: Option<String>,
        other: Option<String>,
    ) -> MixerChannels {
        MixerChannels {
            sound_effect,
            music,
            other,
        }
    }
}

impl Default for MixerChannels {
    fn default() -> Self {
        MixerChannels {
            sound_effect: default_sound_effect_channel(),
            music: default_music_channel(),
            other: default_other_channel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    #[test]
    fn test_mixer_deserialize_defaults() {
        let mixer: MixerConfig = Config::builder()
            .add_source(File::from_str("floor_db: -80", FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(mixer.floor_db(), -80.0);
        assert_eq!(mixer.channel(Category::Music), Some("MusicVolume"));
        assert_eq!(
            mixer.channel(Category::SoundEffect),
            Some("SoundEffectVolume")
        );
        assert_eq!(mixer.channel(Category::Other), Some("OtherVolume"));
    }

    #[test]
    fn test_mixer_deserialize_two_channels() {
        let yaml = r#"
            channels:
              music: Music
              sound_effect: SFX
              other: ~
        "#;
        let mixer: MixerConfig = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(mixer.floor_db(), DEFAULT_FLOOR_DB);
        assert_eq!(mixer.channel(Category::Music), Some("Music"));
        assert_eq!(mixer.channel(Category::SoundEffect), Some("SFX"));
        assert_eq!(mixer.channel(Category::Other), None);
    }

    #[test]
    fn test_mixer_floor_validation() {
        assert!(MixerConfig::new(-80.0, MixerChannels::default()).is_ok());
        assert!(MixerConfig::new(0.0, MixerChannels::default()).is_ok());
        for floor_db in [6.0, f32::NAN, f32::NEG_INFINITY] {
            assert!(matches!(
                MixerConfig::new(floor_db, MixerChannels::default()),
                Err(ConfigError::InvalidFloor(_))
            ));
        }
    }
}
