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
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::dispatch::{InstanceId, PlaybackInstance};

/// A mock backend. Doesn't actually play anything, it records what it is asked to do.
#[derive(Clone)]
pub struct Backend {
    name: String,
    started: Arc<Mutex<Vec<Arc<PlaybackInstance>>>>,
    disposed: Arc<Mutex<Vec<InstanceId>>>,
    fail_starts: Arc<AtomicBool>,
}

impl Backend {
    /// Gets the given mock backend.
    pub fn get(name: &str) -> Backend {
        Backend {
            name: name.to_string(),
            started: Arc::new(Mutex::new(Vec::new())),
            disposed: Arc::new(Mutex::new(Vec::new())),
            fail_starts: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every subsequent start fail (or succeed again).
    pub fn set_fail_starts(&self, fail: bool) {
        self.fail_starts.store(fail, Ordering::Relaxed);
    }

    /// All instances started so far, in start order.
    pub fn started(&self) -> Vec<Arc<PlaybackInstance>> {
        self.started.lock().clone()
    }

    /// All instances disposed so far, in disposal order.
    pub fn disposed(&self) -> Vec<InstanceId> {
        self.disposed.lock().clone()
    }

    /// The number of started instances that have not been disposed.
    pub fn live_count(&self) -> usize {
        let disposed = self.disposed.lock();
        self.started
            .lock()
            .iter()
            .filter(|instance| !disposed.contains(&instance.id()))
            .count()
    }
}

impl crate::audio::Backend for Backend {
    fn start(&self, instance: Arc<PlaybackInstance>) -> Result<(), Box<dyn Error>> {
        if self.fail_starts.load(Ordering::Relaxed) {
            return Err(format!("mock backend {} refused to start playback", self.name).into());
        }

        info!(
            backend = self.name,
            id = %instance.id(),
            sound = instance.sound(),
            clip = instance.clip().name(),
            pitch = instance.pitch(),
            volume = instance.volume(),
            "Starting playback (mock)."
        );
        self.started.lock().push(instance);
        Ok(())
    }

    fn dispose(&self, id: InstanceId) -> Result<(), Box<dyn Error>> {
        debug!(backend = self.name, %id, "Disposing playback (mock).");
        self.disposed.lock().push(id);
        Ok(())
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}

/// A mock mixer bridge that remembers the last gain pushed to each channel.
#[derive(Clone, Default)]
pub struct Mixer {
    gains: Arc<Mutex<HashMap<String, f32>>>,
    pushes: Arc<Mutex<usize>>,
}

impl Mixer {
    /// Creates a new mock mixer.
    pub fn new() -> Mixer {
        Mixer::default()
    }

    /// Gets the last gain pushed to the given channel.
    pub fn gain(&self, channel: &str) -> Option<f32> {
        self.gains.lock().get(channel).copied()
    }

    /// The total number of gain updates received.
    pub fn push_count(&self) -> usize {
        *self.pushes.lock()
    }
}

impl crate::mixer::MixerBridge for Mixer {
    fn set_gain_db(&self, channel: &str, db: f32) {
        self.gains.lock().insert(channel.to_string(), db);
        *self.pushes.lock() += 1;
    }
}
