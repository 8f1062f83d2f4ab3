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

//! Name-driven sound dispatch.
//!
//! This module provides:
//! - Resolution of a sound name into concrete playback parameters
//! - Playback instances handed to the audio backend
//! - Frame-clock driven disposal of finished instances
//! - A slot that holds the application's single dispatcher

mod disposal;
mod engine;
mod error;
mod instance;
mod slot;

pub use disposal::DisposalScheduler;
pub use engine::Dispatcher;
pub use error::DispatchError;
pub use instance::{Disposal, InstanceId, ParentRef, PlaybackInstance, Position};
pub use slot::DispatcherSlot;
