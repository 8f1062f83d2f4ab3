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
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::{InstanceId, PlaybackInstance};

pub mod mock;

/// A resident audio clip. The audio data itself lives with the backend; the dispatcher only
/// needs a name to hand over and a length to time disposal with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clip {
    name: String,
    length: Duration,
}

impl Clip {
    /// Creates a new clip reference.
    pub fn new(name: impl Into<String>, length: Duration) -> Clip {
        Clip {
            name: name.into(),
            length,
        }
    }

    /// Gets the clip name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the clip length.
    pub fn length(&self) -> Duration {
        self.length
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.name,
            crate::util::duration_seconds(self.length)
        )
    }
}

/// An audio playback backend. It owns playback instances once they are started.
pub trait Backend: fmt::Display + Send + Sync {
    /// Starts playing the given instance immediately. The instance carries the clip, volume,
    /// pitch, loop flag, spatial blend, start offset, routing group, position and parent.
    fn start(&self, instance: Arc<PlaybackInstance>) -> Result<(), Box<dyn Error>>;

    /// Destroys a previously started instance. Called once its disposal time is reached.
    fn dispose(&self, id: InstanceId) -> Result<(), Box<dyn Error>>;
}
