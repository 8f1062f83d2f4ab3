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

//! Category volume handling.
//!
//! Every sound may belong to a category (sound effect, music, other). Each category has a
//! linear gain that an external volume control can change at any time, and which is read
//! once per resolved playback. The same gains are forwarded, in decibels, to an optional
//! mixer bridge on every dispatcher tick.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tracing::{trace, warn};

use crate::config::mixer::MixerConfig;
use crate::config::sounds::Category;

/// The decibel value treated as effective silence when none is configured.
pub const DEFAULT_FLOOR_DB: f32 = -55.0;

/// Whether the given decibel value can be used as a floor: finite and at most 0 dB.
pub fn is_valid_floor_db(floor_db: f32) -> bool {
    floor_db.is_finite() && floor_db <= 0.0
}

/// Converts a linear volume into a mixer gain in decibels.
///
/// The result is `20 * log10(linear)` clamped to `[floor_db, 0]`. Zero, negative and NaN
/// volumes map straight to the floor so the logarithm of zero is never taken. An unusable
/// floor is replaced by [DEFAULT_FLOOR_DB].
pub fn log_convert(linear: f32, floor_db: f32) -> f32 {
    let floor_db = if is_valid_floor_db(floor_db) {
        floor_db
    } else {
        DEFAULT_FLOOR_DB
    };
    if linear.is_nan() || linear <= 0.0 {
        return floor_db;
    }
    (20.0 * linear.log10()).max(floor_db).min(0.0)
}

/// Per-category linear gains, indexed by category tag.
///
/// Stored as the bit patterns of `f32` values so reads and writes are single atomic
/// operations and no lock is needed between the volume control and the dispatcher.
#[derive(Debug)]
pub struct CategoryGains {
    gains: [AtomicU32; Category::ALL.len()],
}

impl CategoryGains {
    /// Creates a gain table with every category at unity.
    pub fn new() -> CategoryGains {
        CategoryGains {
            gains: [
                AtomicU32::new(1.0f32.to_bits()),
                AtomicU32::new(1.0f32.to_bits()),
                AtomicU32::new(1.0f32.to_bits()),
            ],
        }
    }

    /// Gets the current linear gain for the given category.
    pub fn get(&self, category: Category) -> f32 {
        f32::from_bits(self.gains[category.index()].load(Ordering::Relaxed))
    }

    /// Sets the linear gain for the given category. Negative values are clamped to zero.
    pub fn set(&self, category: Category, gain: f32) {
        let gain = if gain.is_nan() { 0.0 } else { gain.max(0.0) };
        self.gains[category.index()].store(gain.to_bits(), Ordering::Relaxed);
    }
}

impl Default for CategoryGains {
    fn default() -> Self {
        Self::new()
    }
}

/// An external audio-routing collaborator that accepts named gain channels in decibels.
pub trait MixerBridge: Send + Sync {
    /// Sets the gain of the named channel.
    fn set_gain_db(&self, channel: &str, db: f32);
}

/// Forwards category gains to a mixer bridge using the configured channel names.
pub struct VolumeBridge {
    /// The mixer to push gains to.
    mixer: Arc<dyn MixerBridge>,
    /// Categories that have a channel on the mixer, with the channel name.
    channels: Vec<(Category, String)>,
    /// The gain, in decibels, used for silence.
    floor_db: f32,
}

impl VolumeBridge {
    /// Creates a new volume bridge from the mixer configuration. An unusable floor falls
    /// back to [DEFAULT_FLOOR_DB].
    pub fn new(mixer: Arc<dyn MixerBridge>, config: &MixerConfig) -> VolumeBridge {
        let mut floor_db = config.floor_db();
        if !is_valid_floor_db(floor_db) {
            warn!(
                floor_db,
                default = DEFAULT_FLOOR_DB,
                "Mixer floor is unusable, using the default"
            );
            floor_db = DEFAULT_FLOOR_DB;
        }

        let channels = Category::ALL
            .iter()
            .filter_map(|category| {
                config
                    .channel(*category)
                    .map(|channel| (*category, channel.to_string()))
            })
            .collect();

        VolumeBridge {
            mixer,
            channels,
            floor_db,
        }
    }

    /// Pushes the current value of every mapped category to the mixer.
    pub fn push(&self, gains: &CategoryGains) {
        for (category, channel) in &self.channels {
            let db = log_convert(gains.get(*category), self.floor_db);
            trace!(%category, channel, db, "Pushing category gain");
            self.mixer.set_gain_db(channel, db);
        }
    }

    /// The floor used for conversions.
    pub fn floor_db(&self) -> f32 {
        self.floor_db
    }
}

impl std::fmt::Debug for VolumeBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeBridge")
            .field("channels", &self.channels)
            .field("floor_db", &self.floor_db)
            .finish()
    }
}
