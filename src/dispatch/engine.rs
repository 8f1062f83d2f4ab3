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

//! The dispatcher: turns sound names into started playback instances.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};

use super::disposal::DisposalScheduler;
use super::error::DispatchError;
use super::instance::{Disposal, ParentRef, PlaybackInstance, Position};
use crate::audio::{Backend, Clip};
use crate::config::sounds::{Category, SoundsConfig};
use crate::config::ConfigError;
use crate::mixer::{CategoryGains, MixerBridge, VolumeBridge};
use crate::registry::{Lifetime, PitchPolicy, SoundDefinition, SoundRegistry};

/// Resolves sounds by name, starts them on the backend and disposes them on time.
pub struct Dispatcher {
    /// Sound definitions by name.
    registry: SoundRegistry,
    /// Where playback instances are started and disposed.
    backend: Arc<dyn Backend>,
    /// Category gains, shared with whatever controls the volume.
    gains: Arc<CategoryGains>,
    /// Whether volumes are multiplied by their category gain.
    category_scaling: bool,
    /// Forwards category gains to an external mixer, if there is one.
    volume_bridge: Option<VolumeBridge>,
    /// Pending disposals and the frame clock.
    disposals: Mutex<DisposalScheduler>,
    /// Randomness for clip and pitch selection.
    rng: Mutex<StdRng>,
}

impl Dispatcher {
    /// Creates a new dispatcher with category scaling off and no mixer bridge.
    pub fn new(registry: SoundRegistry, backend: Arc<dyn Backend>) -> Self {
        Self {
            registry,
            backend,
            gains: Arc::new(CategoryGains::new()),
            category_scaling: false,
            volume_bridge: None,
            disposals: Mutex::new(DisposalScheduler::new()),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a dispatcher from a sounds configuration. The mixer is only used if the
    /// configuration has a mixer section.
    pub fn from_config(
        config: &SoundsConfig,
        backend: Arc<dyn Backend>,
        mixer: Option<Arc<dyn MixerBridge>>,
    ) -> Result<Self, ConfigError> {
        let registry = config.to_registry()?;
        info!(
            sounds = registry.len(),
            clips = config.clips().len(),
            category_scaling = config.category_scaling(),
            "Sounds configuration loaded"
        );

        let gains = Arc::new(CategoryGains::new());
        for category in Category::ALL {
            gains.set(category, config.category_gains().gain(category));
        }

        let mut dispatcher = Self::new(registry, backend)
            .with_gains(gains)
            .with_category_scaling(config.category_scaling());

        match (mixer, config.mixer()) {
            (Some(mixer), Some(mixer_config)) => {
                dispatcher = dispatcher.with_volume_bridge(VolumeBridge::new(mixer, mixer_config));
            }
            (Some(_), None) => {
                debug!("Mixer given but no mixer section is configured, gains won't be forwarded")
            }
            _ => {}
        }

        Ok(dispatcher)
    }

    /// Uses the given category gain table.
    pub fn with_gains(mut self, gains: Arc<CategoryGains>) -> Self {
        self.gains = gains;
        self
    }

    /// Turns category scaling on or off.
    pub fn with_category_scaling(mut self, category_scaling: bool) -> Self {
        self.category_scaling = category_scaling;
        self
    }

    /// Forwards category gains through the given bridge on every update.
    pub fn with_volume_bridge(mut self, volume_bridge: VolumeBridge) -> Self {
        self.volume_bridge = Some(volume_bridge);
        self
    }

    /// Seeds clip and pitch selection, for reproducible runs.
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    /// Plays a sound in world space at the origin.
    pub fn play(&self, name: &str) -> Result<Arc<PlaybackInstance>, DispatchError> {
        self.play_at(name, Position::ORIGIN, None)
    }

    /// Plays a sound attached to the given parent.
    pub fn play_attached(
        &self,
        name: &str,
        parent: ParentRef,
    ) -> Result<Arc<PlaybackInstance>, DispatchError> {
        self.play_at(name, Position::ORIGIN, Some(parent))
    }

    /// Plays a sound at a position relative to the parent, or in world space without one.
    ///
    /// Exactly one instance is started on success. On failure nothing is started and the
    /// failure is logged.
    pub fn play_at(
        &self,
        name: &str,
        position: Position,
        parent: Option<ParentRef>,
    ) -> Result<Arc<PlaybackInstance>, DispatchError> {
        let definition = match self.registry.lookup_by_name(name) {
            Some(definition) => definition,
            None => {
                error!(sound = name, "Couldn't find sound");
                return Err(DispatchError::SoundNotFound(name.to_string()));
            }
        };

        if definition.clips().is_empty() {
            error!(sound = name, "Sound has no clips to play");
            return Err(DispatchError::EmptyClipSet(name.to_string()));
        }

        let instance = Arc::new(self.resolve(definition, position, parent));

        if let Err(e) = self.backend.start(Arc::clone(&instance)) {
            error!(sound = name, err = e.as_ref(), "Failed to start playback");
            return Err(DispatchError::Backend {
                sound: name.to_string(),
                message: e.to_string(),
            });
        }

        if let Disposal::After(delay) = instance.disposal() {
            self.disposals.lock().schedule(instance.id(), delay);
        }

        debug!(
            sound = name,
            id = %instance.id(),
            clip = instance.clip().name(),
            pitch = instance.pitch(),
            volume = instance.volume(),
            disposal = %instance.disposal(),
            "Sound played"
        );

        Ok(instance)
    }

    /// Picks the clip and playback parameters for one playback of the definition.
    /// The definition must have at least one clip.
    fn resolve(
        &self,
        definition: &SoundDefinition,
        position: Position,
        parent: Option<ParentRef>,
    ) -> PlaybackInstance {
        let (clip, pitch) = {
            let mut rng = self.rng.lock();
            let clip = &definition.clips()[rng.gen_range(0..definition.clips().len())];
            let pitch = match definition.pitch() {
                PitchPolicy::Fixed => 1.0,
                PitchPolicy::Random { min, max } => rng.gen_range(min..=max),
            };
            (Arc::clone(clip), pitch)
        };

        let volume = self.resolve_volume(definition);
        let start_offset = definition.start_time().min(clip.length());
        let disposal = Self::disposal_for(definition, &clip, start_offset);

        PlaybackInstance::new(
            definition.name().to_string(),
            clip,
            pitch,
            volume,
            definition.spatial_blend(),
            definition.repeating(),
            start_offset,
            position,
            parent,
            definition.category(),
            definition.mixer_group().map(str::to_string),
            disposal,
        )
    }

    /// Base volume, times the category gain when category scaling is on.
    fn resolve_volume(&self, definition: &SoundDefinition) -> f32 {
        match definition.category() {
            Some(category) if self.category_scaling => {
                definition.volume() * self.gains.get(category)
            }
            _ => definition.volume(),
        }
    }

    /// Works out when the playback should be disposed. Looping playback never uses the
    /// clip length, since the clip never ends.
    fn disposal_for(definition: &SoundDefinition, clip: &Clip, start_offset: Duration) -> Disposal {
        match definition.lifetime() {
            Lifetime::ClipEnd if definition.repeating() => Disposal::Never,
            Lifetime::ClipEnd => Disposal::After(clip.length().saturating_sub(start_offset)),
            Lifetime::After(delay) => Disposal::After(delay),
            Lifetime::Never => Disposal::Never,
        }
    }

    /// Advances the frame clock, disposes everything that is due and forwards the category
    /// gains to the mixer. Call once per host frame.
    pub fn update(&self, elapsed: Duration) {
        let due = self.disposals.lock().advance(elapsed);
        for id in due {
            match self.backend.dispose(id) {
                Ok(()) => debug!(%id, "Playback disposed"),
                Err(e) => warn!(%id, err = e.as_ref(), "Failed to dispose playback"),
            }
        }

        self.bridge_volumes();
    }

    /// Forwards the current category gains to the mixer bridge. Does nothing without one.
    pub fn bridge_volumes(&self) {
        if let Some(bridge) = &self.volume_bridge {
            bridge.push(&self.gains);
        }
    }

    /// Gets the first definition with the given name.
    pub fn definition(&self, name: &str) -> Option<&SoundDefinition> {
        self.registry.lookup_by_name(name)
    }

    /// Gets all definitions of a category, in configuration order.
    pub fn definitions_by_category(&self, category: Category) -> Vec<&SoundDefinition> {
        self.registry.lookup_by_category(category)
    }

    /// Gets the candidate clips of a sound.
    pub fn clips(&self, name: &str) -> Result<Vec<Arc<Clip>>, DispatchError> {
        match self.registry.lookup_by_name(name) {
            Some(definition) => Ok(definition.clips().to_vec()),
            None => {
                error!(sound = name, "Couldn't find sound");
                Err(DispatchError::SoundNotFound(name.to_string()))
            }
        }
    }

    /// The category gain table. Volume controls write to it.
    pub fn gains(&self) -> &Arc<CategoryGains> {
        &self.gains
    }

    pub fn registry(&self) -> &SoundRegistry {
        &self.registry
    }

    /// The number of scheduled disposals that haven't fired yet.
    pub fn pending_disposals(&self) -> usize {
        self.disposals.lock().pending()
    }

    /// Time elapsed on the frame clock.
    pub fn clock(&self) -> Duration {
        self.disposals.lock().now()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("backend", &self.backend.to_string())
            .field("sounds", &self.registry.len())
            .field("category_scaling", &self.category_scaling)
            .field("volume_bridge", &self.volume_bridge)
            .field("pending_disposals", &self.pending_disposals())
            .finish()
    }
}
