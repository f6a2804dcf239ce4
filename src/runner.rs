//! Run driver
//!
//! Builds the property store once, then processes every target in order.
//! The first fatal error stops the run. A strict-mode miss lets the current
//! target be written and reported before the run fails.

use std::io::Write;

use tracing::{debug, info};

use crate::error::SubstError;
use crate::limits::SubstitutionLimits;
use crate::placeholder::PlaceholderResolver;
use crate::properties::{PropertySource, PropertyStore};
use crate::report::{ReportFormat, SubstitutionReport};
use crate::stream::{StreamSubstitutor, Target};

/// Everything a run needs, independent of how it was parsed
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Property sources in precedence order (later wins)
    pub sources: Vec<PropertySource>,
    pub targets: Vec<Target>,
    pub in_place: bool,
    pub fail_if_not_found: bool,
    pub report_format: ReportFormat,
    /// Suppress the per-file summary of in-place runs
    pub quiet: bool,
    pub limits: SubstitutionLimits,
}

impl RunConfig {
    /// Assemble sources in precedence order: env, files, inline declarations
    pub fn with_sources(
        env: bool,
        files: impl IntoIterator<Item = std::path::PathBuf>,
        inline: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut sources = Vec::new();
        if env {
            sources.push(PropertySource::Env);
        }
        sources.extend(files.into_iter().map(PropertySource::File));
        sources.extend(inline.into_iter().map(PropertySource::Inline));
        Self {
            sources,
            ..Self::default()
        }
    }
}

/// Per-target results of a successful run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<(Target, SubstitutionReport)>,
}

impl RunSummary {
    /// Total substitutions over all targets
    pub fn replaced(&self) -> usize {
        self.reports.iter().map(|(_, report)| report.len()).sum()
    }
}

pub struct Runner {
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Execute the run, writing transformed text (or in-place summaries) to `stdout`
    pub fn run<W: Write>(&self, stdout: &mut W) -> Result<RunSummary, SubstError> {
        let config = &self.config;

        if config.in_place && config.targets.contains(&Target::Stdin) {
            return Err(SubstError::StdinInPlace);
        }

        let store = PropertyStore::from_sources(&config.sources)?;
        debug!(properties = store.len(), "property store ready");

        let resolver = PlaceholderResolver::new(&store)
            .strict(config.fail_if_not_found)
            .limits(config.limits);
        let substitutor = StreamSubstitutor::new(resolver);

        let mut summary = RunSummary::default();
        for target in &config.targets {
            let outcome = substitutor.process_target(target, config.in_place, stdout)?;

            if config.in_place && !config.quiet {
                let rendered = outcome
                    .report
                    .render(outcome.target.path(), config.report_format)?;
                writeln!(stdout, "{}", rendered.trim_end())?;
            }

            let target = outcome.target.clone();
            let report = outcome.into_result()?;
            summary.reports.push((target, report));
        }

        info!(
            targets = summary.reports.len(),
            replaced = summary.replaced(),
            "run complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_sources_precedence_order() {
        let config = RunConfig::with_sources(
            true,
            [PathBuf::from("a.properties")],
            ["k=v".to_string()],
        );
        assert_eq!(
            config.sources,
            vec![
                PropertySource::Env,
                PropertySource::File(PathBuf::from("a.properties")),
                PropertySource::Inline("k=v".to_string()),
            ]
        );
    }

    #[test]
    fn test_stdout_run_concatenates_targets() {
        let dir = tempfile::tempdir().unwrap();
        let one = write(&dir, "one.txt", "1=${a}\n");
        let two = write(&dir, "two.txt", "2=${b:dflt}\n");

        let mut config = RunConfig::with_sources(false, [], ["a=A".to_string()]);
        config.targets = vec![Target::File(one), Target::File(two)];

        let mut out = Vec::new();
        let summary = Runner::new(config).run(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1=A\n2=dflt\n");
        assert_eq!(summary.replaced(), 2);
    }

    #[test]
    fn test_in_place_run_prints_summary() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(&dir, "app.conf", "x=${a} y=${a}\n");
        let props = write(&dir, "app.properties", "a=1\n");

        let mut config = RunConfig::with_sources(false, [props], []);
        config.targets = vec![Target::File(file.clone())];
        config.in_place = true;

        let mut out = Vec::new();
        Runner::new(config).run(&mut out).unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "x=1 y=1\n");
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("1 placeholder(s) replaced"));
        assert!(printed.contains("'${a}' => '1'"));
    }

    #[test]
    fn test_quiet_in_place_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(&dir, "app.conf", "x=${a}\n");

        let mut config = RunConfig::with_sources(false, [], ["a=1".to_string()]);
        config.targets = vec![Target::File(file)];
        config.in_place = true;
        config.quiet = true;

        let mut out = Vec::new();
        Runner::new(config).run(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_strict_failure_stops_after_current_target() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(&dir, "first.conf", "x=${missing} y=${a}\n");
        let second = write(&dir, "second.conf", "z=${a}\n");

        let mut config = RunConfig::with_sources(false, [], ["a=1".to_string()]);
        config.targets = vec![Target::File(first.clone()), Target::File(second.clone())];
        config.in_place = true;
        config.fail_if_not_found = true;

        let err = Runner::new(config).run(&mut Vec::<u8>::new()).unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "x=${missing} y=1\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "z=${a}\n");
    }

    #[test]
    fn test_unreadable_property_file_aborts_before_targets() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(&dir, "app.conf", "x=${a}\n");

        let mut config = RunConfig::with_sources(false, [dir.path().join("nope")], []);
        config.targets = vec![Target::File(file.clone())];
        config.in_place = true;

        let err = Runner::new(config).run(&mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, SubstError::SourceRead { .. }));
        assert_eq!(fs::read_to_string(&file).unwrap(), "x=${a}\n");
    }

    #[test]
    fn test_stdin_with_in_place_is_rejected_up_front() {
        let config = RunConfig {
            targets: vec![Target::Stdin],
            in_place: true,
            ..RunConfig::default()
        };
        let err = Runner::new(config).run(&mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, SubstError::StdinInPlace));
    }

    // procfs rejects writes even for root, unlike a chmod'ed temp file
    #[cfg(target_os = "linux")]
    #[test]
    fn test_unwritable_target_aborts_remaining_targets() {
        let dir = tempfile::tempdir().unwrap();
        let second = write(&dir, "second.conf", "z=${a}\n");

        let mut config = RunConfig::with_sources(false, [], ["a=1".to_string()]);
        config.targets = vec![
            Target::File(PathBuf::from("/proc/version")),
            Target::File(second.clone()),
        ];
        config.in_place = true;

        let err = Runner::new(config).run(&mut Vec::<u8>::new()).unwrap_err();
        assert!(
            matches!(err, SubstError::SourceWrite { ref path, .. } if path == Path::new("/proc/version"))
        );
        assert_eq!(fs::read_to_string(&second).unwrap(), "z=${a}\n");
    }
}
