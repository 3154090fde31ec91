//! Configuration types for timestamper
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - config.yaml loading (extra parameters for the convert command)

use crate::error::ConfigError;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Name of the optional configuration file looked up beside the executable
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Parallel timestamp overlay for JPEG directories
#[derive(Parser, Debug, Clone)]
#[command(
    name = "timestamper",
    version,
    about = "Timestamp all JPEG files in a directory, in parallel",
    long_about = "Overlays each JPEG's embedded capture time (EXIF DateTimeOriginal) onto the\n\
                  image itself by invoking ImageMagick's convert, fanning the work out over a\n\
                  pool of worker threads. Files are modified in place.",
    after_help = "EXAMPLES:\n    \
        timestamper /data/timelapse\n    \
        timestamper /data/timelapse -c 8\n    \
        timestamper /data/timelapse --config params.yaml -v\n    \
        timestamper /data/timelapse --tool magick  # ImageMagick 7"
)]
pub struct CliArgs {
    /// Directory containing the JPEG files to timestamp
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Number of worker threads
    #[arg(
        short = 'c',
        long,
        default_value_t = default_concurrency(),
        value_name = "NUM"
    )]
    pub concurrency: usize,

    /// Configuration file with convert parameters (default: config.yaml beside the executable)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Image manipulation command to invoke
    #[arg(long, default_value = "convert", value_name = "PATH")]
    pub tool: String,

    /// Quiet mode - suppress header and summary output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (echo each file as it is processed)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn default_concurrency() -> usize {
    num_cpus::get()
}

/// Parameters passed to the convert command between the input and output path
///
/// Deserialized from config.yaml:
///
/// ```yaml
/// convert_params:
///   - -font
///   - courier-bold
///   - -annotate
///   - +20+20
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConvertParams {
    pub convert_params: Vec<String>,
}

impl ConvertParams {
    /// Built-in annotation parameters used when no config file is present
    ///
    /// Renders the EXIF original capture time in the bottom-right corner,
    /// white on black, and writes the image back at full quality.
    pub fn default_annotation() -> Vec<String> {
        [
            "-font",
            "courier-bold",
            "-pointsize",
            "36",
            "-fill",
            "white",
            "-undercolor",
            "black",
            "-gravity",
            "SouthEast",
            "-quality",
            "100",
            "-annotate",
            "+20+20",
            " %[exif:DateTimeOriginal] ",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Load convert parameters from a YAML file
    pub fn load(path: &Path) -> Result<Vec<String>, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileRead {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let params: ConvertParams =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::MalformedConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(params.convert_params)
    }

    /// Resolve convert parameters from an explicit config path or the default
    /// config.yaml beside the executable
    ///
    /// - Explicit path given: the file must exist and parse.
    /// - No path given: config.yaml beside the executable is used if present
    ///   (and must parse); otherwise the built-in annotation parameters apply.
    pub fn resolve(explicit: Option<&Path>) -> Result<Vec<String>, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::ConfigFileMissing {
                    path: path.to_path_buf(),
                });
            }
            return Self::load(path);
        }

        if let Some(default_path) = Self::default_config_path() {
            if default_path.exists() {
                return Self::load(&default_path);
            }
        }

        Ok(Self::default_annotation())
    }

    /// Path of config.yaml next to the current executable, if determinable
    fn default_config_path() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        Some(exe.parent()?.join(CONFIG_FILE_NAME))
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct StampConfig {
    /// Canonicalized target directory
    pub directory: PathBuf,

    /// Number of worker threads
    pub worker_count: usize,

    /// External image manipulation command
    pub tool: String,

    /// Extra arguments passed to the command between input and output path
    pub convert_params: Vec<String>,

    /// Show header/summary output
    pub show_progress: bool,
}

impl StampConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Validate worker count
        if args.concurrency == 0 || args.concurrency > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.concurrency,
                max: MAX_WORKERS,
            });
        }

        // Canonicalize the target directory; this also verifies it exists.
        // Work items must carry absolute paths.
        let directory =
            std::fs::canonicalize(&args.directory).map_err(|e| ConfigError::InvalidDirectory {
                path: args.directory.clone(),
                reason: e.to_string(),
            })?;

        if !directory.is_dir() {
            return Err(ConfigError::InvalidDirectory {
                path: args.directory,
                reason: "not a directory".to_string(),
            });
        }

        let convert_params = ConvertParams::resolve(args.config.as_deref())?;

        Ok(Self {
            directory,
            worker_count: args.concurrency,
            tool: args.tool,
            convert_params,
            show_progress: !args.quiet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_args(dir: PathBuf) -> CliArgs {
        CliArgs {
            directory: dir,
            concurrency: 2,
            config: None,
            tool: "convert".into(),
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn test_from_args_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = StampConfig::from_args(base_args(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.worker_count, 2);
        assert!(config.directory.is_absolute());
        assert!(!config.convert_params.is_empty());
    }

    #[test]
    fn test_from_args_zero_workers() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = base_args(dir.path().to_path_buf());
        args.concurrency = 0;
        let err = StampConfig::from_args(args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWorkerCount { .. }));
    }

    #[test]
    fn test_from_args_missing_directory() {
        let err = StampConfig::from_args(base_args(PathBuf::from("/no/such/dir"))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDirectory { .. }));
    }

    #[test]
    fn test_from_args_directory_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::File::create(&file).unwrap();
        let err = StampConfig::from_args(base_args(file)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDirectory { .. }));
    }

    #[test]
    fn test_load_convert_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "convert_params:").unwrap();
        writeln!(f, "  - -resize").unwrap();
        writeln!(f, "  - 50%").unwrap();

        let params = ConvertParams::load(&path).unwrap();
        assert_eq!(params, vec!["-resize".to_string(), "50%".to_string()]);
    }

    #[test]
    fn test_load_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "not_the_right_key: 42").unwrap();

        let err = ConvertParams::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedConfig { .. }));
    }

    #[test]
    fn test_resolve_explicit_missing() {
        let err = ConvertParams::resolve(Some(Path::new("/no/such/config.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileMissing { .. }));
    }

    #[test]
    fn test_default_annotation_shape() {
        let params = ConvertParams::default_annotation();
        // Flags and their values come in pairs, plus the annotation text
        assert_eq!(params.len() % 2, 1);
        assert!(params.contains(&"-annotate".to_string()));
    }
}
