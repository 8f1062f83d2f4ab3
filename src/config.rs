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
use std::path::Path;

use tracing::info;

pub mod error;
pub mod mixer;
pub mod sounds;

pub use error::ConfigError;
pub use sounds::{Category, SoundsConfig};

/// Parses the sounds configuration at the given path.
pub fn load_sounds(path: &Path) -> Result<SoundsConfig, ConfigError> {
    let config = SoundsConfig::deserialize(path)?;
    info!(
        path = %path.display(),
        sounds = config.sounds().len(),
        clips = config.clips().len(),
        "Parsed sounds configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_sounds_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            r#"
clips:
  jump: 500ms
sounds:
  - name: jump
    clips: [jump]
    volume: 0.5
"#
        )
        .unwrap();

        let config = load_sounds(file.path()).unwrap();
        assert_eq!(config.sounds().len(), 1);
        assert_eq!(config.sounds()[0].name(), "jump");
    }

    #[test]
    fn test_load_sounds_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_sounds(&dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
