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

//! Playback instances: one resolved, in-flight realization of a sound.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::audio::Clip;
use crate::config::sounds::Category;
use crate::util::duration_seconds;

/// Global instance ID counter.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a playback instance for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub(super) fn next() -> InstanceId {
        InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// The raw ID value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A position relative to the parent, or in world space when there is no parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Position {
        Position { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// An opaque reference to a host object a playback is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentRef(pub u64);

/// When the backend should destroy a playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposal {
    /// After the given time has passed on the frame clock.
    After(Duration),
    /// Never.
    Never,
}

impl fmt::Display for Disposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposal::After(delay) => write!(f, "after {}", duration_seconds(*delay)),
            Disposal::Never => f.write_str("never"),
        }
    }
}

/// A resolved playback, as handed to the backend.
#[derive(Debug, Clone)]
pub struct PlaybackInstance {
    id: InstanceId,
    sound: String,
    clip: Arc<Clip>,
    pitch: f32,
    volume: f32,
    spatial_blend: f32,
    looping: bool,
    start_offset: Duration,
    position: Position,
    parent: Option<ParentRef>,
    category: Option<Category>,
    mixer_group: Option<String>,
    disposal: Disposal,
}

impl PlaybackInstance {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        sound: String,
        clip: Arc<Clip>,
        pitch: f32,
        volume: f32,
        spatial_blend: f32,
        looping: bool,
        start_offset: Duration,
        position: Position,
        parent: Option<ParentRef>,
        category: Option<Category>,
        mixer_group: Option<String>,
        disposal: Disposal,
    ) -> PlaybackInstance {
        PlaybackInstance {
            id: InstanceId::next(),
            sound,
            clip,
            pitch,
            volume,
            spatial_blend,
            looping,
            start_offset,
            position,
            parent,
            category,
            mixer_group,
            disposal,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The name of the sound this instance was resolved from.
    pub fn sound(&self) -> &str {
        &self.sound
    }

    pub fn clip(&self) -> &Arc<Clip> {
        &self.clip
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Base volume times the category gain, when category scaling applied.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn spatial_blend(&self) -> f32 {
        self.spatial_blend
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Where in the clip playback begins.
    pub fn start_offset(&self) -> Duration {
        self.start_offset
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn parent(&self) -> Option<ParentRef> {
        self.parent
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn mixer_group(&self) -> Option<&str> {
        self.mixer_group.as_deref()
    }

    pub fn disposal(&self) -> Disposal {
        self.disposal
    }
}

impl fmt::Display for PlaybackInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: clip={} pitch={:.3} volume={:.3} blend={} loop={} start={} at={} dispose={}",
            self.id,
            self.sound,
            self.clip,
            self.pitch,
            self.volume,
            self.spatial_blend,
            self.looping,
            duration_seconds(self.start_offset),
            self.position,
            self.disposal,
        )?;
        if let Some(parent) = self.parent {
            write!(f, " parent={}", parent.0)?;
        }
        if let Some(group) = &self.mixer_group {
            write!(f, " group={}", group)?;
        }
        Ok(())
    }
}
