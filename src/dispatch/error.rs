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

/// Errors from a play request. None of these are fatal: the caller gets no playback and the
/// failure has already been logged.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("couldn't find sound \"{0}\"")]
    SoundNotFound(String),

    #[error("sound \"{0}\" has no clips")]
    EmptyClipSet(String),

    #[error("backend failed to start sound \"{sound}\": {message}")]
    Backend { sound: String, message: String },
}
