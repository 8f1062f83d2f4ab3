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

//! The sound registry: configured sound definitions in lookup order.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::audio::Clip;
use crate::config::sounds::Category;

/// How the playback pitch of a sound is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchPolicy {
    /// Always play at unity pitch.
    Fixed,
    /// Draw the pitch uniformly from `[min, max]`.
    Random { min: f32, max: f32 },
}

/// The largest pitch multiplier, in either direction, a playback can be given.
pub const PITCH_LIMIT: f32 = 3.0;

impl PitchPolicy {
    /// Creates a random pitch policy, putting the bounds in order and clamping them to
    /// `[-PITCH_LIMIT, PITCH_LIMIT]`. A NaN bound gives a fixed pitch.
    pub fn random(a: f32, b: f32) -> PitchPolicy {
        if a.is_nan() || b.is_nan() {
            return PitchPolicy::Fixed;
        }
        let a = a.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let b = b.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        PitchPolicy::Random {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

/// When a playback instance of a sound is disposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// When the selected clip reaches its end.
    ClipEnd,
    /// After a fixed time.
    After(Duration),
    /// Never; the backend keeps it until shutdown.
    Never,
}

/// A named sound and the rules for turning it into a playback.
#[derive(Debug, Clone)]
pub struct SoundDefinition {
    name: String,
    clips: Vec<Arc<Clip>>,
    volume: f32,
    spatial_blend: f32,
    pitch: PitchPolicy,
    repeating: bool,
    lifetime: Lifetime,
    start_time: Duration,
    category: Option<Category>,
    mixer_group: Option<String>,
}

impl SoundDefinition {
    /// Creates a new definition with unity volume, 2D, fixed pitch, disposed on clip end.
    pub fn new(name: impl Into<String>, clips: Vec<Arc<Clip>>) -> SoundDefinition {
        SoundDefinition {
            name: name.into(),
            clips,
            volume: 1.0,
            spatial_blend: 0.0,
            pitch: PitchPolicy::Fixed,
            repeating: false,
            lifetime: Lifetime::ClipEnd,
            start_time: Duration::ZERO,
            category: Some(Category::SoundEffect),
            mixer_group: None,
        }
    }

    /// Sets the base volume. Negative volumes are clamped to zero.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.max(0.0);
        self
    }

    /// Sets the spatial blend, clamped to `[0, 1]`.
    pub fn with_spatial_blend(mut self, spatial_blend: f32) -> Self {
        self.spatial_blend = spatial_blend.clamp(0.0, 1.0);
        self
    }

    /// Sets the pitch policy. Random bounds are normalized as in [PitchPolicy::random].
    pub fn with_pitch(mut self, pitch: PitchPolicy) -> Self {
        self.pitch = match pitch {
            PitchPolicy::Random { min, max } => PitchPolicy::random(min, max),
            PitchPolicy::Fixed => PitchPolicy::Fixed,
        };
        self
    }

    /// Sets whether the backend loops the clip.
    pub fn with_repeating(mut self, repeating: bool) -> Self {
        self.repeating = repeating;
        self
    }

    /// Sets when playbacks are disposed.
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sets the offset into the clip. It is clamped to each clip's length at play time.
    pub fn with_start_time(mut self, start_time: Duration) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sets the category. Sounds without one are never scaled.
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Sets the mixer group playbacks are routed to.
    pub fn with_mixer_group(mut self, mixer_group: Option<String>) -> Self {
        self.mixer_group = mixer_group;
        self
    }

    /// Gets the name of the sound.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the candidate clips.
    pub fn clips(&self) -> &[Arc<Clip>] {
        &self.clips
    }

    /// Gets the base volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Gets the spatial blend.
    pub fn spatial_blend(&self) -> f32 {
        self.spatial_blend
    }

    /// Gets the pitch policy.
    pub fn pitch(&self) -> PitchPolicy {
        self.pitch
    }

    /// Gets whether the sound loops.
    pub fn repeating(&self) -> bool {
        self.repeating
    }

    /// Gets the lifetime policy.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Gets the configured start time, before clamping to a clip.
    pub fn start_time(&self) -> Duration {
        self.start_time
    }

    /// Gets the category, if the sound has one.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Gets the mixer routing group, if the sound has one.
    pub fn mixer_group(&self) -> Option<&str> {
        self.mixer_group.as_deref()
    }
}

/// An ordered collection of sound definitions.
///
/// Names are expected to be unique but this is not enforced: lookups scan in configuration
/// order and the first match wins.
#[derive(Debug, Clone, Default)]
pub struct SoundRegistry {
    definitions: Vec<SoundDefinition>,
}

impl SoundRegistry {
    /// Creates a new registry. Duplicate names are logged.
    pub fn new(definitions: Vec<SoundDefinition>) -> SoundRegistry {
        let registry = SoundRegistry { definitions };
        for name in registry.duplicate_names() {
            warn!(
                sound = name,
                "Sound name is defined more than once, only the first definition is reachable"
            );
        }
        registry
    }

    /// Finds the first definition with exactly the given name.
    pub fn lookup_by_name(&self, name: &str) -> Option<&SoundDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Gets all definitions of the given category, in configuration order.
    pub fn lookup_by_category(&self, category: Category) -> Vec<&SoundDefinition> {
        let found: Vec<&SoundDefinition> = self
            .definitions
            .iter()
            .filter(|d| d.category == Some(category))
            .collect();

        if found.is_empty() {
            warn!(%category, "Could not find sounds of category");
        }
        found
    }

    /// Names that appear more than once, each reported once, in configuration order.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.definitions
            .iter()
            .map(|d| d.name.as_str())
            .filter(|name| !seen.insert(*name) && reported.insert(*name))
            .collect()
    }

    /// Iterates definitions in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &SoundDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(name: &str) -> Arc<Clip> {
        Arc::new(Clip::new(name, Duration::from_secs(1)))
    }

    fn registry() -> SoundRegistry {
        SoundRegistry::new(vec![
            SoundDefinition::new("jump", vec![clip("jump-a")]),
            SoundDefinition::new("theme", vec![clip("theme")]).with_category(Some(Category::Music)),
            SoundDefinition::new("jump", vec![clip("jump-b")]),
            SoundDefinition::new("land", vec![clip("land")]),
            SoundDefinition::new("ui", vec![clip("click")]).with_category(None),
        ])
    }

    #[test]
    fn test_lookup_by_name_first_match_wins() {
        let registry = registry();
        let jump = registry.lookup_by_name("jump").unwrap();
        assert_eq!(jump.clips()[0].name(), "jump-a");
    }

    #[test]
    fn test_lookup_by_name_is_exact() {
        let registry = registry();
        assert!(registry.lookup_by_name("Jump").is_none());
        assert!(registry.lookup_by_name("jum").is_none());
        assert!(registry.lookup_by_name("").is_none());
    }

    #[test]
    fn test_lookup_by_category() {
        let registry = registry();
        let effects: Vec<&str> = registry
            .lookup_by_category(Category::SoundEffect)
            .iter()
            .map(|d| d.name())
            .collect();
        assert_eq!(effects, vec!["jump", "jump", "land"]);

        let music = registry.lookup_by_category(Category::Music);
        assert_eq!(music.len(), 1);
        assert_eq!(music[0].name(), "theme");

        assert!(registry.lookup_by_category(Category::Other).is_empty());
    }

    #[test]
    fn test_duplicate_names() {
        let mut definitions: Vec<SoundDefinition> = registry().iter().cloned().collect();
        definitions.push(SoundDefinition::new("jump", vec![clip("jump-c")]));
        let registry = SoundRegistry::new(definitions);
        assert_eq!(registry.duplicate_names(), vec!["jump"]);
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_definition_normalization() {
        let definition = SoundDefinition::new("x", vec![])
            .with_volume(-1.0)
            .with_spatial_blend(3.0)
            .with_pitch(PitchPolicy::Random { min: 2.0, max: 0.5 });

        assert_eq!(definition.volume(), 0.0);
        assert_eq!(definition.spatial_blend(), 1.0);
        assert_eq!(definition.pitch(), PitchPolicy::Random { min: 0.5, max: 2.0 });
    }

    #[test]
    fn test_pitch_bounds_are_limited() {
        assert_eq!(
            PitchPolicy::random(3.0e38, -3.0e38),
            PitchPolicy::Random {
                min: -PITCH_LIMIT,
                max: PITCH_LIMIT
            }
        );
        assert_eq!(
            PitchPolicy::random(0.5, f32::INFINITY),
            PitchPolicy::Random {
                min: 0.5,
                max: PITCH_LIMIT
            }
        );
        assert_eq!(PitchPolicy::random(f32::NAN, 1.0), PitchPolicy::Fixed);

        let definition = SoundDefinition::new("x", vec![]).with_pitch(PitchPolicy::Random {
            min: f32::NEG_INFINITY,
            max: f32::NAN,
        });
        assert_eq!(definition.pitch(), PitchPolicy::Fixed);
    }
}
