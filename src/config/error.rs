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

/// Typed error for config load/parse failures so callers can distinguish
/// e.g. file-not-found from a sound that references an undeclared clip.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("sound \"{sound}\" references unknown clip \"{clip}\"")]
    UnknownClip { sound: String, clip: String },

    #[error("invalid duration for {field}: \"{value}\" ({reason})")]
    InvalidDuration {
        field: String,
        value: String,
        reason: String,
    },

    #[error("mixer floor_db must be a finite value at or below 0 dB, got {0}")]
    InvalidFloor(f32),

    #[error("sound \"{sound}\" has an unusable pitch range {min}..{max}")]
    InvalidPitch { sound: String, min: f32, max: f32 },
}
