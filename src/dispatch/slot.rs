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
use std::sync::{Arc, OnceLock};

use tracing::{error, info};

use super::engine::Dispatcher;

/// Holds the one dispatcher of an application.
///
/// The slot is filled once at start-up and the installed dispatcher is then handed to every
/// consumer explicitly. Installing a second dispatcher is a configuration error: the newcomer
/// is dropped and the first one stays installed.
#[derive(Debug, Default)]
pub struct DispatcherSlot {
    installed: OnceLock<Arc<Dispatcher>>,
}

impl DispatcherSlot {
    pub const fn new() -> DispatcherSlot {
        DispatcherSlot {
            installed: OnceLock::new(),
        }
    }

    /// Installs the dispatcher unless one is already installed, and returns whichever
    /// dispatcher is installed afterwards.
    pub fn install(&self, dispatcher: Dispatcher) -> Arc<Dispatcher> {
        let candidate = Arc::new(dispatcher);
        let installed = self.installed.get_or_init(|| Arc::clone(&candidate));

        if Arc::ptr_eq(installed, &candidate) {
            info!("Sound dispatcher installed");
        } else {
            error!(
                discarded = ?candidate,
                "Discarding dispatcher, there can only be one sound dispatcher"
            );
        }
        Arc::clone(installed)
    }

    /// Gets the installed dispatcher.
    pub fn get(&self) -> Option<Arc<Dispatcher>> {
        self.installed.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::mock;
    use crate::registry::SoundRegistry;

    fn dispatcher(name: &str) -> Dispatcher {
        Dispatcher::new(
            SoundRegistry::default(),
            Arc::new(mock::Backend::get(name)),
        )
    }

    #[test]
    fn test_empty_slot() {
        let slot = DispatcherSlot::new();
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_first_install_wins() {
        let slot = DispatcherSlot::new();

        let first = slot.install(dispatcher("first"));
        let second = slot.install(dispatcher("second"));

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &slot.get().unwrap()));
        assert!(format!("{:?}", slot.get().unwrap()).contains("first (Mock)"));
    }

    #[test]
    fn test_static_slot() {
        static SLOT: DispatcherSlot = DispatcherSlot::new();
        let installed = SLOT.install(dispatcher("static"));
        assert!(Arc::ptr_eq(&installed, &SLOT.get().unwrap()));
    }
}
