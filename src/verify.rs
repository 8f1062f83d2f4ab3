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

//! Static checks over a sounds configuration, run before anything is played.

use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};

use crate::config::sounds::{SoundDefinition, SoundsConfig};
use crate::registry::PITCH_LIMIT;
use crate::util::{parse_duration, parse_lifetime};

/// Severity level for a verification issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.pad("warning"),
            Severity::Error => f.pad("error"),
        }
    }
}

/// What an issue is about. Clips and sounds live in separate namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Clip(String),
    Sound(String),
}

/// A single verification issue.
#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: Severity,
    /// Short name of the check that raised the issue, e.g. `pitch-range`.
    pub check: &'static str,
    pub subject: Subject,
    pub message: String,
}

impl Issue {
    fn sound(severity: Severity, check: &'static str, sound: &str, message: String) -> Issue {
        Issue {
            severity,
            check,
            subject: Subject::Sound(sound.to_string()),
            message,
        }
    }
}

/// Result of verifying a sounds configuration.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub issues: Vec<Issue>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Number of issues with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    /// Issues raised against declared clips.
    pub fn clip_issues(&self) -> impl Iterator<Item = (&str, &Issue)> {
        self.issues.iter().filter_map(|issue| match &issue.subject {
            Subject::Clip(clip) => Some((clip.as_str(), issue)),
            Subject::Sound(_) => None,
        })
    }

    /// Issues raised against the sound with the given name.
    pub fn sound_issues<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues
            .iter()
            .filter(move |issue| matches!(&issue.subject, Subject::Sound(sound) if sound == name))
    }
}

/// Checks a single sound definition against the configured clips.
pub fn check_sound(sound: &SoundDefinition, config: &SoundsConfig) -> Vec<Issue> {
    let mut issues = Vec::new();
    let name = sound.name();

    if sound.clips().is_empty() {
        issues.push(Issue::sound(
            Severity::Error,
            "clips",
            name,
            "sound has no clips and can never be played".to_string(),
        ));
    }
    for clip in sound.clips() {
        if !config.clips().contains_key(clip) {
            issues.push(Issue::sound(
                Severity::Error,
                "clips",
                name,
                format!("clip \"{}\" is not declared", clip),
            ));
        }
    }

    if sound.random_pitch() {
        issues.extend(check_pitch_range(sound));
    }

    if sound.repeating() && sound.destroy_on_end() {
        issues.push(Issue::sound(
            Severity::Warning,
            "lifetime",
            name,
            "repeating sound is set to destroy on end and will never be disposed".to_string(),
        ));
    }
    if !sound.destroy_on_end() {
        if let Err(e) = parse_lifetime(name, sound.time_until_destroyed()) {
            issues.push(Issue::sound(Severity::Error, "durations", name, e.to_string()));
        }
    }
    if let Some(start_time) = sound.start_time() {
        if let Err(e) = parse_duration(name, start_time) {
            issues.push(Issue::sound(Severity::Error, "durations", name, e.to_string()));
        }
    }

    if config.category_scaling() && sound.category().is_none() {
        issues.push(Issue::sound(
            Severity::Warning,
            "category",
            name,
            "sound has no category and won't follow category volumes".to_string(),
        ));
    }

    issues
}

fn check_pitch_range(sound: &SoundDefinition) -> Option<Issue> {
    let (min_pitch, max_pitch) = sound.pitch_range();
    let (severity, message) = if !min_pitch.is_finite() || !max_pitch.is_finite() {
        (
            Severity::Error,
            format!("pitch range {}..{} is not finite", min_pitch, max_pitch),
        )
    } else if min_pitch.abs() > PITCH_LIMIT || max_pitch.abs() > PITCH_LIMIT {
        (
            Severity::Warning,
            format!(
                "pitch range {}..{} goes past +/-{}, the bounds will be clamped",
                min_pitch, max_pitch, PITCH_LIMIT
            ),
        )
    } else if min_pitch > max_pitch {
        (
            Severity::Warning,
            format!(
                "min_pitch {} is above max_pitch {}, the bounds will be swapped",
                min_pitch, max_pitch
            ),
        )
    } else {
        return None;
    };
    Some(Issue::sound(severity, "pitch-range", sound.name(), message))
}

/// Reports every sound name defined more than once. Only the first definition is reachable.
pub fn check_duplicate_names(config: &SoundsConfig) -> Vec<Issue> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    config
        .sounds()
        .iter()
        .filter(|sound| !seen.insert(sound.name()) && reported.insert(sound.name()))
        .map(|sound| {
            Issue::sound(
                Severity::Warning,
                "duplicate-name",
                sound.name(),
                "sound is defined more than once, only the first definition is used".to_string(),
            )
        })
        .collect()
}

/// Checks that every declared clip has a valid length.
pub fn check_clip_lengths(config: &SoundsConfig) -> Vec<Issue> {
    let mut clips: Vec<(&String, &String)> = config.clips().iter().collect();
    clips.sort();
    clips
        .into_iter()
        .filter_map(|(clip, length)| {
            parse_duration(clip, length).err().map(|e| Issue {
                severity: Severity::Error,
                check: "clip-length",
                subject: Subject::Clip(clip.clone()),
                message: format!("clip length is invalid: {}", e),
            })
        })
        .collect()
}

/// Verifies a whole sounds configuration.
pub fn verify(config: &SoundsConfig) -> VerificationReport {
    let mut issues = check_clip_lengths(config);
    issues.extend(check_duplicate_names(config));
    for sound in config.sounds() {
        issues.extend(check_sound(sound, config));
    }
    VerificationReport { issues }
}

/// Writes the report with clip issues first, then every sound name in configuration order.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &VerificationReport,
    config: &SoundsConfig,
) -> io::Result<()> {
    let clip_issues: Vec<(&str, &Issue)> = report.clip_issues().collect();
    if !clip_issues.is_empty() {
        writeln!(out, "Clips:")?;
        for (clip, issue) in clip_issues {
            writeln!(out, "  {:<8} {}: {}", issue.severity, clip, issue.message)?;
        }
    }

    let mut seen = HashSet::new();
    let mut clean = 0;
    writeln!(out, "Verification:")?;
    for sound in config.sounds() {
        if !seen.insert(sound.name()) {
            continue;
        }
        let mut issues = report.sound_issues(sound.name()).peekable();
        if issues.peek().is_none() {
            clean += 1;
            writeln!(out, "  {:<8} {}", "ok", sound.name())?;
            continue;
        }
        for issue in issues {
            writeln!(
                out,
                "  {:<8} {} [{}] {}",
                issue.severity,
                sound.name(),
                issue.check,
                issue.message
            )?;
        }
    }

    writeln!(
        out,
        "{} of {} sound(s) clean, {} error(s), {} warning(s).",
        clean,
        seen.len(),
        report.count(Severity::Error),
        report.count(Severity::Warning)
    )
}

/// Prints the report to stdout.
pub fn print_report(report: &VerificationReport, config: &SoundsConfig) -> io::Result<()> {
    write_report(&mut io::stdout().lock(), report, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> SoundsConfig {
        SoundsConfig::from_yaml(yaml).unwrap()
    }

    fn checks(report: &VerificationReport) -> Vec<&str> {
        report.issues.iter().map(|i| i.check).collect()
    }

    #[test]
    fn test_clean_config() {
        let config = config(
            r#"
            clips:
              step1: 350ms
            sounds:
              - name: footstep
                clips: [step1]
                random_pitch: true
            "#,
        );
        let report = verify(&config);
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_empty_and_unknown_clips() {
        let config = config(
            r#"
            clips:
              step1: 350ms
            sounds:
              - name: silent
              - name: broken
                clips: [step1, nope]
            "#,
        );
        let report = verify(&config);
        assert_eq!(report.issues.len(), 2);
        assert!(report.has_errors());
        assert_eq!(report.sound_issues("silent").count(), 1);
        let broken: Vec<&Issue> = report.sound_issues("broken").collect();
        assert_eq!(broken.len(), 1);
        assert!(broken[0].message.contains("nope"));
    }

    #[test]
    fn test_reversed_pitch_range() {
        let config = config(
            r#"
            clips:
              a: 1s
            sounds:
              - name: reversed
                clips: [a]
                random_pitch: true
                min_pitch: 1.5
                max_pitch: 0.5
              - name: ignored
                clips: [a]
                min_pitch: 1.5
                max_pitch: 0.5
            "#,
        );
        let report = verify(&config);
        assert_eq!(checks(&report), vec!["pitch-range"]);
        assert_eq!(report.issues[0].severity, Severity::Warning);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_pitch_range_limits() {
        let config = config(
            r#"
            clips:
              a: 1s
            sounds:
              - name: wide
                clips: [a]
                random_pitch: true
                min_pitch: -3.0e38
                max_pitch: 3.0e38
              - name: overflowing
                clips: [a]
                random_pitch: true
                min_pitch: 0.5
                max_pitch: 1e39
            "#,
        );
        let report = verify(&config);
        let wide: Vec<&Issue> = report.sound_issues("wide").collect();
        assert_eq!(wide.len(), 1);
        assert_eq!(wide[0].severity, Severity::Warning);

        let overflowing: Vec<&Issue> = report.sound_issues("overflowing").collect();
        assert_eq!(overflowing.len(), 1);
        assert_eq!(overflowing[0].severity, Severity::Error);
    }

    #[test]
    fn test_duplicate_names() {
        let config = config(
            r#"
            clips:
              a: 1s
            sounds:
              - name: hit
                clips: [a]
              - name: hit
                clips: [a]
              - name: hit
                clips: [a]
            "#,
        );
        let issues = check_duplicate_names(&config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].subject, Subject::Sound("hit".to_string()));
    }

    #[test]
    fn test_lifetime_and_category_checks() {
        let config = config(
            r#"
            category_scaling: true
            clips:
              a: 1s
              b: forever
            sounds:
              - name: loop
                clips: [a]
                repeating: true
              - name: timed
                clips: [a]
                destroy_on_end: false
                time_until_destroyed: later
                category: ~
            "#,
        );
        let report = verify(&config);
        assert_eq!(
            checks(&report),
            vec!["clip-length", "lifetime", "durations", "category"]
        );
    }

    #[test]
    fn test_clip_issues_are_kept_apart_from_sounds() {
        let config = config(
            r#"
            clips:
              door: someday
              creak: 2s
            sounds:
              - name: door
                clips: [creak]
            "#,
        );
        let report = verify(&config);
        assert_eq!(report.sound_issues("door").count(), 0);
        let clips: Vec<&str> = report.clip_issues().map(|(clip, _)| clip).collect();
        assert_eq!(clips, vec!["door"]);

        let mut out = Vec::new();
        write_report(&mut out, &report, &config).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Clips:\n  error    door: clip length is invalid"), "{}", out);
        assert!(out.contains("  ok       door\n"), "{}", out);
        assert!(out.ends_with("1 of 1 sound(s) clean, 1 error(s), 0 warning(s).\n"), "{}", out);
    }

    #[test]
    fn test_write_report_lists_each_name_once() {
        let config = config(
            r#"
            clips:
              a: 1s
            sounds:
              - name: hit
                clips: [a]
              - name: hit
                clips: [a]
              - name: miss
                clips: [a]
            "#,
        );
        let report = verify(&config);

        let mut out = Vec::new();
        write_report(&mut out, &report, &config).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(" hit ").count(), 1, "{}", out);
        assert!(!out.contains("Clips:"));
        assert!(out.ends_with("1 of 2 sound(s) clean, 0 error(s), 1 warning(s).\n"), "{}", out);
    }
}
