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
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ConfigError;
use super::mixer::MixerConfig;
use crate::audio::Clip;
use crate::registry::{
    Lifetime, PitchPolicy, SoundDefinition as Definition, SoundRegistry, PITCH_LIMIT,
};
use crate::util::{parse_duration, parse_lifetime};

/// The category a sound belongs to, used to pick its category gain.
#[derive(Deserialize, Clone, Copy, Serialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Short, usually positional effects.
    SoundEffect,
    /// Background music.
    Music,
    /// Anything else (voice, UI, ambience).
    Other,
}

impl Category {
    /// All known categories, in gain table order.
    pub const ALL: [Category; 3] = [Category::SoundEffect, Category::Music, Category::Other];

    /// The index of this category in a gain table.
    pub fn index(self) -> usize {
        match self {
            Category::SoundEffect => 0,
            Category::Music => 1,
            Category::Other => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::SoundEffect => "sound_effect",
            Category::Music => "music",
            Category::Other => "other",
        };
        f.write_str(name)
    }
}

/// A YAML representation of a sound definition.
#[derive(Deserialize, Clone, Serialize, Debug)]
pub struct SoundDefinition {
    /// The name callers play this sound by.
    name: String,

    /// Names of the clips to pick from. One is chosen at random for each playback.
    #[serde(default)]
    clips: Vec<String>,

    /// Base volume before category scaling.
    #[serde(default = "default_volume")]
    volume: f32,

    /// 0 is fully 2D, 1 is fully positional.
    #[serde(default)]
    spatial_blend: f32,

    /// Whether to randomize the pitch between min_pitch and max_pitch.
    #[serde(default)]
    random_pitch: bool,

    #[serde(default = "default_min_pitch")]
    min_pitch: f32,

    #[serde(default = "default_max_pitch")]
    max_pitch: f32,

    /// Whether the backend should loop the clip.
    #[serde(default)]
    repeating: bool,

    /// Dispose the playback when the clip ends. Otherwise time_until_destroyed is used.
    #[serde(default = "default_destroy_on_end")]
    destroy_on_end: bool,

    /// How long the playback lives when destroy_on_end is false. "infinite" never disposes.
    #[serde(default = "default_time_until_destroyed")]
    time_until_destroyed: String,

    /// Offset into the clip at which playback starts.
    start_time: Option<String>,

    /// The category used for category gain. Null opts the sound out of category scaling.
    #[serde(default = "default_category")]
    category: Option<Category>,

    /// The mixer routing group to assign the playback to.
    mixer_group: Option<String>,
}

fn default_volume() -> f32 {
    1.0
}

fn default_min_pitch() -> f32 {
    0.8
}

fn default_max_pitch() -> f32 {
    1.2
}

fn default_destroy_on_end() -> bool {
    true
}

fn default_time_until_destroyed() -> String {
    "1s".to_string()
}

fn default_category() -> Option<Category> {
    Some(Category::SoundEffect)
}

impl SoundDefinition {
    /// Gets the name of the sound.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the clip names of the sound.
    pub fn clips(&self) -> &[String] {
        &self.clips
    }

    /// Gets whether the pitch is randomized.
    pub fn random_pitch(&self) -> bool {
        self.random_pitch
    }

    /// Gets the configured pitch range as written.
    pub fn pitch_range(&self) -> (f32, f32) {
        (self.min_pitch, self.max_pitch)
    }

    /// Gets whether the sound loops.
    pub fn repeating(&self) -> bool {
        self.repeating
    }

    /// Gets whether the sound is disposed when its clip ends.
    pub fn destroy_on_end(&self) -> bool {
        self.destroy_on_end
    }

    /// Gets the raw lifetime used when the sound isn't destroyed on end.
    pub fn time_until_destroyed(&self) -> &str {
        &self.time_until_destroyed
    }

    /// Gets the raw start time.
    pub fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref()
    }

    /// Gets the category of the sound.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Converts the YAML representation into a registry definition, resolving clip names
    /// against the given clip table.
    pub fn to_definition(
        &self,
        clip_table: &HashMap<String, Arc<Clip>>,
    ) -> Result<Definition, ConfigError> {
        let clips = self
            .clips
            .iter()
            .map(|clip| {
                clip_table
                    .get(clip)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownClip {
                        sound: self.name.clone(),
                        clip: clip.clone(),
                    })
            })
            .collect::<Result<Vec<Arc<Clip>>, ConfigError>>()?;

        let pitch = if self.random_pitch {
            if !self.min_pitch.is_finite() || !self.max_pitch.is_finite() {
                return Err(ConfigError::InvalidPitch {
                    sound: self.name.clone(),
                    min: self.min_pitch,
                    max: self.max_pitch,
                });
            }
            if self.min_pitch.abs() > PITCH_LIMIT || self.max_pitch.abs() > PITCH_LIMIT {
                warn!(
                    sound = self.name,
                    min_pitch = self.min_pitch,
                    max_pitch = self.max_pitch,
                    limit = PITCH_LIMIT,
                    "Pitch range exceeds the pitch limit, clamping bounds"
                );
            }
            if self.min_pitch > self.max_pitch {
                warn!(
                    sound = self.name,
                    min_pitch = self.min_pitch,
                    max_pitch = self.max_pitch,
                    "Pitch range is reversed, swapping bounds"
                );
            }
            PitchPolicy::random(self.min_pitch, self.max_pitch)
        } else {
            PitchPolicy::Fixed
        };

        let lifetime = if self.destroy_on_end {
            if self.repeating {
                warn!(
                    sound = self.name,
                    "Repeating sound is set to destroy on end, it will never be disposed"
                );
            }
            Lifetime::ClipEnd
        } else {
            match parse_lifetime(
                &format!("{}.time_until_destroyed", self.name),
                &self.time_until_destroyed,
            )? {
                Some(duration) => Lifetime::After(duration),
                None => Lifetime::Never,
            }
        };

        let start_time = match &self.start_time {
            Some(start_time) => parse_duration(&format!("{}.start_time", self.name), start_time)?,
            None => std::time::Duration::ZERO,
        };

        Ok(Definition::new(self.name.clone(), clips)
            .with_volume(self.volume)
            .with_spatial_blend(self.spatial_blend)
            .with_pitch(pitch)
            .with_repeating(self.repeating)
            .with_lifetime(lifetime)
            .with_start_time(start_time)
            .with_category(self.category)
            .with_mixer_group(self.mixer_group.clone()))
    }
}

/// Linear gains per category applied when category scaling is on.
#[derive(Deserialize, Clone, Copy, Serialize, Debug)]
pub struct CategoryGainsConfig {
    #[serde(default = "default_gain")]
    sound_effect: f32,
    #[serde(default = "default_gain")]
    music: f32,
    #[serde(default = "default_gain")]
    other: f32,
}

fn default_gain() -> f32 {
    1.0
}

impl CategoryGainsConfig {
    /// Gets the configured starting gain for a category.
    pub fn gain(&self, category: Category) -> f32 {
        match category {
            Category::SoundEffect => self.sound_effect,
            Category::Music => self.music,
            Category::Other => self.other,
        }
    }
}

impl Default for CategoryGainsConfig {
    fn default() -> Self {
        CategoryGainsConfig {
            sound_effect: 1.0,
            music: 1.0,
            other: 1.0,
        }
    }
}

/// The sound registration file.
#[derive(Deserialize, Clone, Serialize, Debug, Default)]
pub struct SoundsConfig {
    /// Multiply each sound's volume by its category gain.
    #[serde(default)]
    category_scaling: bool,

    /// Starting category gains.
    #[serde(default)]
    category_gains: CategoryGainsConfig,

    /// The mixer bridge configuration. Without it, gains are not forwarded anywhere.
    mixer: Option<MixerConfig>,

    /// Resident clips by name, with their lengths.
    #[serde(default)]
    clips: HashMap<String, String>,

    /// Sound definitions in lookup order.
    #[serde(default)]
    sounds: Vec<SoundDefinition>,
}

impl SoundsConfig {
    /// Parses a sounds configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<SoundsConfig, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<SoundsConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a sounds configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<SoundsConfig, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize::<SoundsConfig>()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match &self.mixer {
            Some(mixer) => mixer.validate(),
            None => Ok(()),
        }
    }

    /// Gets whether category scaling is enabled.
    pub fn category_scaling(&self) -> bool {
        self.category_scaling
    }

    /// Gets the starting category gains.
    pub fn category_gains(&self) -> &CategoryGainsConfig {
        &self.category_gains
    }

    /// Gets the mixer configuration.
    pub fn mixer(&self) -> Option<&MixerConfig> {
        self.mixer.as_ref()
    }

    /// Gets the declared clips and their raw lengths.
    pub fn clips(&self) -> &HashMap<String, String> {
        &self.clips
    }

    /// Gets the sound definitions.
    pub fn sounds(&self) -> &[SoundDefinition] {
        &self.sounds
    }

    /// Resolves the clip table.
    pub fn clip_table(&self) -> Result<HashMap<String, Arc<Clip>>, ConfigError> {
        self.clips
            .iter()
            .map(|(name, length)| {
                let length = parse_duration(&format!("clips.{}", name), length)?;
                Ok((name.clone(), Arc::new(Clip::new(name.clone(), length))))
            })
            .collect()
    }

    /// Builds the sound registry, keeping the configured order.
    pub fn to_registry(&self) -> Result<SoundRegistry, ConfigError> {
        let clip_table = self.clip_table()?;
        let definitions = self
            .sounds
            .iter()
            .map(|sound| sound.to_definition(&clip_table))
            .collect::<Result<Vec<Definition>, ConfigError>>()?;

        Ok(SoundRegistry::new(definitions))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const CONFIG: &str = r#"
        category_scaling: true
        category_gains:
          music: 0.5
        mixer:
          floor_db: -60
        clips:
          step1: 350ms
          step2: 400ms
          theme: 130s
        sounds:
          - name: footstep
            clips: [step1, step2]
            volume: 0.8
            spatial_blend: 1.0
            random_pitch: true
            min_pitch: 1.1
            max_pitch: 0.9
          - name: theme
            clips: [theme]
            repeating: true
            destroy_on_end: false
            time_until_destroyed: infinite
            category: music
            mixer_group: Music
          - name: beep
            clips: [step1]
            destroy_on_end: false
            time_until_destroyed: 2.5
            start_time: 100ms
            category: ~
    "#;

    #[test]
    fn test_parse_config() {
        let config = SoundsConfig::from_yaml(CONFIG).unwrap();

        assert!(config.category_scaling());
        assert_eq!(config.category_gains().gain(Category::Music), 0.5);
        assert_eq!(config.category_gains().gain(Category::SoundEffect), 1.0);
        assert_eq!(config.mixer().unwrap().floor_db(), -60.0);
        assert_eq!(config.clips().len(), 3);
        assert_eq!(config.sounds().len(), 3);

        let footstep = &config.sounds()[0];
        assert_eq!(footstep.name(), "footstep");
        assert_eq!(footstep.clips().to_vec(), vec!["step1", "step2"]);
        assert!(footstep.random_pitch());
        assert_eq!(footstep.pitch_range(), (1.1, 0.9));
        assert_eq!(footstep.category(), Some(Category::SoundEffect));
        assert!(footstep.destroy_on_end());

        assert_eq!(config.sounds()[1].category(), Some(Category::Music));
        assert_eq!(config.sounds()[2].category(), None);
    }

    #[test]
    fn test_to_registry() {
        let registry = SoundsConfig::from_yaml(CONFIG)
            .unwrap()
            .to_registry()
            .unwrap();
        assert_eq!(registry.len(), 3);

        let footstep = registry.lookup_by_name("footstep").unwrap();
        assert_eq!(footstep.clips().len(), 2);
        assert_eq!(footstep.clips()[0].name(), "step1");
        assert_eq!(footstep.clips()[0].length(), Duration::from_millis(350));
        assert_eq!(footstep.volume(), 0.8);
        assert_eq!(footstep.spatial_blend(), 1.0);
        // Reversed ranges are sorted when the registry is built.
        assert_eq!(footstep.pitch(), PitchPolicy::Random { min: 0.9, max: 1.1 });
        assert_eq!(footstep.lifetime(), Lifetime::ClipEnd);

        let theme = registry.lookup_by_name("theme").unwrap();
        assert!(theme.repeating());
        assert_eq!(theme.lifetime(), Lifetime::Never);
        assert_eq!(theme.pitch(), PitchPolicy::Fixed);
        assert_eq!(theme.mixer_group(), Some("Music"));

        let beep = registry.lookup_by_name("beep").unwrap();
        assert_eq!(beep.lifetime(), Lifetime::After(Duration::from_millis(2500)));
        assert_eq!(beep.start_time(), Duration::from_millis(100));
        assert_eq!(beep.category(), None);
    }

    #[test]
    fn test_unknown_clip() {
        let config = SoundsConfig::from_yaml(
            r#"
            clips:
              step1: 1s
            sounds:
              - name: footstep
                clips: [step1, missing]
            "#,
        )
        .unwrap();

        match config.to_registry() {
            Err(ConfigError::UnknownClip { sound, clip }) => {
                assert_eq!(sound, "footstep");
                assert_eq!(clip, "missing");
            }
            other => panic!("expected unknown clip error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_duration() {
        let config = SoundsConfig::from_yaml(
            r#"
            clips:
              step1: soon
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.to_registry(),
            Err(ConfigError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_pitch_range_bounds() {
        let yaml = |min: &str, max: &str| {
            format!(
                "clips:\n  a: 1s\nsounds:\n  - name: x\n    clips: [a]\n    random_pitch: true\n    min_pitch: {}\n    max_pitch: {}\n",
                min, max
            )
        };

        let registry = SoundsConfig::from_yaml(&yaml("-3.0e38", "3.0e38"))
            .unwrap()
            .to_registry()
            .unwrap();
        assert_eq!(
            registry.lookup_by_name("x").unwrap().pitch(),
            PitchPolicy::Random {
                min: -PITCH_LIMIT,
                max: PITCH_LIMIT
            }
        );

        // 1e39 overflows to infinity as an f32.
        let config = SoundsConfig::from_yaml(&yaml("0.5", "1e39")).unwrap();
        match config.to_registry() {
            Err(ConfigError::InvalidPitch { sound, min, .. }) => {
                assert_eq!(sound, "x");
                assert_eq!(min, 0.5);
            }
            other => panic!("expected invalid pitch error, got {:?}", other),
        }
    }

    #[test]
    fn test_unusable_mixer_floor_is_rejected() {
        for yaml in ["mixer:\n  floor_db: 6\n", "mixer:\n  floor_db: 12.5\n"] {
            assert!(
                matches!(
                    SoundsConfig::from_yaml(yaml),
                    Err(ConfigError::InvalidFloor(_))
                ),
                "{}",
                yaml
            );
        }
        assert!(SoundsConfig::from_yaml("mixer:\n  floor_db: 0\n").is_ok());
    }

    #[test]
    fn test_empty_clip_list_is_allowed() {
        let registry = SoundsConfig::from_yaml(
            r#"
            sounds:
              - name: silent
            "#,
        )
        .unwrap()
        .to_registry()
        .unwrap();

        assert!(registry.lookup_by_name("silent").unwrap().clips().is_empty());
    }
}
