use std::path::{Path, PathBuf};

use citecheck_core::config_file::ConfigFile;
use citecheck_parsing::config::{DEFAULT_MIN_ENTRY_CHARS, DEFAULT_WINDOW_PAGES};
use citecheck_reporting::ReportFormat;

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub document: Option<PathBuf>,
    pub sources: Option<PathBuf>,
    pub bibliography: bool,
    pub window: Option<usize>,
    pub min_entry_chars: Option<usize>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
}

/// Values read from `CITECHECK_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    pub document: Option<String>,
    pub sources: Option<String>,
    pub output: Option<String>,
}

impl EnvVars {
    pub fn from_process() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            document: var("CITECHECK_DOCUMENT"),
            sources: var("CITECHECK_SOURCES"),
            output: var("CITECHECK_OUTPUT"),
        }
    }
}

/// Fully resolved settings for one `check` run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub document: PathBuf,
    pub sources: PathBuf,
    pub extract_bibliography: bool,
    pub window_pages: usize,
    pub min_entry_chars: usize,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
}

/// Resolve configuration: CLI flags > env vars > config file > defaults
pub fn resolve(flags: Flags, env: EnvVars, config: &ConfigFile) -> anyhow::Result<Settings> {
    let inputs = config.inputs.clone().unwrap_or_default();
    let bibliography = config.bibliography.clone().unwrap_or_default();
    let report = config.report.clone().unwrap_or_default();

    let Some(document) = flags
        .document
        .or_else(|| env.document.map(PathBuf::from))
        .or_else(|| inputs.document.map(PathBuf::from))
    else {
        anyhow::bail!(
            "No document given. Pass DOCUMENT, set CITECHECK_DOCUMENT, or add inputs.document to the config file"
        );
    };
    let Some(sources) = flags
        .sources
        .or_else(|| env.sources.map(PathBuf::from))
        .or_else(|| inputs.sources.map(PathBuf::from))
    else {
        anyhow::bail!(
            "No source list given. Pass SOURCES, set CITECHECK_SOURCES, or add inputs.sources to the config file"
        );
    };

    let output = flags
        .output
        .or_else(|| env.output.map(PathBuf::from))
        .or_else(|| report.output.map(PathBuf::from));

    let format = match flags.format.or(report.format) {
        Some(f) => f.parse::<ReportFormat>()?,
        None => output
            .as_deref()
            .and_then(format_from_extension)
            .unwrap_or_default(),
    };

    Ok(Settings {
        document,
        sources,
        extract_bibliography: flags.bibliography || bibliography.extract.unwrap_or(false),
        window_pages: flags
            .window
            .or(bibliography.window_pages)
            .unwrap_or(DEFAULT_WINDOW_PAGES),
        min_entry_chars: flags
            .min_entry_chars
            .or(bibliography.min_entry_chars)
            .unwrap_or(DEFAULT_MIN_ENTRY_CHARS),
        format,
        output,
    })
}

fn format_from_extension(path: &Path) -> Option<ReportFormat> {
    let ext = path.extension()?.to_str()?;
    ReportFormat::all()
        .iter()
        .copied()
        .find(|f| ext.eq_ignore_ascii_case(f.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use citecheck_core::config_file::{BibliographyConfig, InputsConfig, ReportConfig};

    fn config() -> ConfigFile {
        ConfigFile {
            inputs: Some(InputsConfig {
                document: Some("cfg.pdf".into()),
                sources: Some("cfg.txt".into()),
            }),
            bibliography: Some(BibliographyConfig {
                extract: Some(true),
                window_pages: Some(8),
                min_entry_chars: None,
            }),
            report: Some(ReportConfig {
                format: None,
                output: Some("cfg-report.md".into()),
            }),
        }
    }

    #[test]
    fn test_flags_beat_env_and_config() {
        let flags = Flags {
            document: Some("flag.pdf".into()),
            window: Some(3),
            ..Flags::default()
        };
        let env = EnvVars {
            document: Some("env.pdf".into()),
            sources: Some("env.txt".into()),
            output: None,
        };
        let s = resolve(flags, env, &config()).unwrap();
        assert_eq!(s.document, PathBuf::from("flag.pdf"));
        assert_eq!(s.sources, PathBuf::from("env.txt"));
        assert_eq!(s.window_pages, 3);
        assert_eq!(s.min_entry_chars, DEFAULT_MIN_ENTRY_CHARS);
        assert!(s.extract_bibliography);
    }

    #[test]
    fn test_config_fills_gaps_and_output_implies_format() {
        let s = resolve(Flags::default(), EnvVars::default(), &config()).unwrap();
        assert_eq!(s.document, PathBuf::from("cfg.pdf"));
        assert_eq!(s.window_pages, 8);
        assert_eq!(s.output, Some(PathBuf::from("cfg-report.md")));
        assert_eq!(s.format, ReportFormat::Markdown);
    }

    #[test]
    fn test_explicit_format_wins_over_extension() {
        let flags = Flags {
            format: Some("json".into()),
            ..Flags::default()
        };
        let s = resolve(flags, EnvVars::default(), &config()).unwrap();
        assert_eq!(s.format, ReportFormat::Json);
    }

    #[test]
    fn test_defaults() {
        let flags = Flags {
            document: Some("a.txt".into()),
            sources: Some("b.txt".into()),
            ..Flags::default()
        };
        let s = resolve(flags, EnvVars::default(), &ConfigFile::default()).unwrap();
        assert!(!s.extract_bibliography);
        assert_eq!(s.window_pages, DEFAULT_WINDOW_PAGES);
        assert_eq!(s.format, ReportFormat::Text);
        assert_eq!(s.output, None);
    }

    #[test]
    fn test_missing_inputs_error() {
        let err = resolve(Flags::default(), EnvVars::default(), &ConfigFile::default())
            .unwrap_err();
        assert!(err.to_string().contains("No document given"));

        let flags = Flags {
            document: Some("a.txt".into()),
            ..Flags::default()
        };
        let err = resolve(flags, EnvVars::default(), &ConfigFile::default()).unwrap_err();
        assert!(err.to_string().contains("No source list given"));
    }

    #[test]
    fn test_bad_format_error() {
        let flags = Flags {
            document: Some("a.txt".into()),
            sources: Some("b.txt".into()),
            format: Some("html".into()),
            ..Flags::default()
        };
        assert!(resolve(flags, EnvVars::default(), &ConfigFile::default()).is_err());
    }
}
