use crate::config::settings::DebugLogRotation;
use crate::config::Config;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "lowview-debug.log";

#[allow(dead_code)]
pub struct LogGuard(WorkerGuard);

/// Initialize debug logging.
///
/// When `debug` is enabled, logs are written to `~/.config/lowview/lowview-debug.log` by default.
/// When `debug` is disabled, this is a no-op.
/// `RUST_LOG` replaces the default filter when set.
pub fn init(config: &Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        return Ok(None);
    }

    let rotation = config.debug_log_rotation.unwrap_or(DebugLogRotation::Session);
    let base = resolve_base_log_path(config.debug_log_path.as_deref())?;

    let (writer, log_file, guard): (NonBlocking, PathBuf, WorkerGuard) = match rotation {
        DebugLogRotation::None => {
            let (writer, guard) = tracing_appender::non_blocking(open_append(&base)?);
            (writer, base, guard)
        }
        DebugLogRotation::Daily => {
            let (dir, base_name) = split_dir_and_name(&base)?;
            ensure_dir(&dir)?;
            cleanup_rotated_logs(
                &dir,
                RotationKind::Daily {
                    base_name: base_name.clone(),
                },
                config.debug_log_keep,
            )?;

            let appender = tracing_appender::rolling::daily(&dir, &base_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (writer, base, guard)
        }
        DebugLogRotation::Session => {
            let (dir, base_name) = split_dir_and_name(&base)?;
            ensure_dir(&dir)?;
            cleanup_rotated_logs(
                &dir,
                RotationKind::Session {
                    base_name: base_name.clone(),
                },
                config.debug_log_keep,
            )?;

            let session_path = build_session_log_path(&dir, &base_name);
            let (writer, guard) = tracing_appender::non_blocking(open_append(&session_path)?);
            (writer, session_path, guard)
        }
    };

    // Default: debug our crate, warn for everything else.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("lowview=debug,warn"))
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok(); // If already initialized (e.g., in tests), don't crash.

    tracing::info!("debug logging enabled");
    tracing::info!(log_file = %log_file.display(), rotation = ?rotation, "writing logs to file");

    Ok(Some(LogGuard(guard)))
}

fn default_log_path() -> Result<PathBuf> {
    let config_path = crate::config::config_path()?;
    Ok(config_path.with_file_name(LOG_FILE_NAME))
}

fn resolve_base_log_path(config_value: Option<&str>) -> Result<PathBuf> {
    let Some(raw) = config_value else {
        return default_log_path();
    };

    let expanded = expand_tilde(raw);
    let path = PathBuf::from(expanded);

    // If it ends with a path separator, treat as directory.
    if raw.ends_with(std::path::MAIN_SEPARATOR) {
        return Ok(path.join(LOG_FILE_NAME));
    }

    // If it exists and is a directory, treat as directory.
    if path.is_dir() {
        return Ok(path.join(LOG_FILE_NAME));
    }

    // If it has an extension, treat as file path. Otherwise also treat as file path.
    Ok(path)
}

fn expand_tilde(raw: &str) -> String {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let suffix = raw.strip_prefix('~').unwrap_or("");
            return format!("{}{}", home.display(), suffix);
        }
    }
    raw.to_string()
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))
}

fn open_append(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

fn split_dir_and_name(path: &Path) -> Result<(PathBuf, String)> {
    let dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .context("Invalid debug_log_path: not valid UTF-8")?
        .to_string();
    Ok((dir, name))
}

fn build_session_log_path(dir: &Path, base_name: &str) -> PathBuf {
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let file_name = format!("{base_name}.session-{ts}");
    dir.join(file_name)
}

enum RotationKind {
    Daily { base_name: String },
    Session { base_name: String },
}

fn cleanup_rotated_logs(dir: &Path, kind: RotationKind, keep: Option<usize>) -> Result<()> {
    let keep = keep.unwrap_or(match kind {
        RotationKind::Daily { .. } => 7,
        RotationKind::Session { .. } => 20,
    });

    if keep == 0 {
        return Ok(());
    }

    let prefix = match &kind {
        // tracing_appender::rolling::daily uses: `{base_name}.{YYYY-MM-DD}`
        RotationKind::Daily { base_name } => format!("{base_name}."),
        RotationKind::Session { base_name } => format!("{base_name}.session-"),
    };

    let mut candidates: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory: {}", dir.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else { continue };
        if name.starts_with(&prefix) {
            candidates.push(name.to_string());
        }
    }

    candidates.sort();
    candidates.reverse(); // newest first (lexicographic works for our suffix formats)

    for (idx, name) in candidates.iter().enumerate() {
        if idx < keep {
            continue;
        }
        let path = dir.join(name);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::debug!(error = %e, file = %path.display(), "failed to remove old log file");
        }
    }

    Ok(())
}

/// Best-effort redaction of Google API keys (`AIza...`) and `key=` query values.
pub fn redact_secrets(input: &str) -> String {
    static GOOGLE_KEY: OnceLock<Regex> = OnceLock::new();
    static KEY_PARAM: OnceLock<Regex> = OnceLock::new();

    let google_key = GOOGLE_KEY.get_or_init(|| {
        Regex::new(r"AIza[0-9A-Za-z_\-]{8,}").expect("static regex")
    });
    let key_param = KEY_PARAM.get_or_init(|| {
        Regex::new(r"([?&]key=)[^&\s#]+").expect("static regex")
    });

    let out = google_key.replace_all(input, "AIza***REDACTED***");
    key_param.replace_all(&out, "${1}***REDACTED***").into_owned()
}
