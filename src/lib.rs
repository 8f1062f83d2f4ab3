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

//! Registry-driven sound dispatch for interactive applications.
//!
//! Sounds are configured once by name. Playing a sound picks one of its clips and resolves
//! pitch, volume and lifetime, starts a playback instance on an audio backend and schedules
//! the instance's disposal on the host's frame clock.

pub mod audio;
pub mod config;
pub mod dispatch;
pub mod mixer;
pub mod registry;
pub mod util;
pub mod verify;
