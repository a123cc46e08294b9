use chrono::{DateTime, Utc};
use colored::*;
use log::kv::{Key, Source};
use log::{Level, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::AppConfig;

static FLUX_LOGGER: Lazy<FluxLogger> = Lazy::new(FluxLogger::new);

pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Structured keys lifted out of a record into their own fields, e.g.
/// `log::info!(request_id = id.as_str(); "...")`.
pub const REQUEST_ID_KEY: &str = "request_id";
pub const DURATION_MS_KEY: &str = "duration_ms";

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    FLUX_LOGGER.update_config(config.clone());

    if let Err(e) = log::set_logger(&*FLUX_LOGGER) {
        return Err(format!("Failed to set logger: {:?}", e));
    }

    log::set_max_level(config.min_level.to_log_level_filter());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }

    pub fn from_log_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// One formatted log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String, module: String, file: String, line: u32) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message,
            module,
            file,
            line,
            request_id: None,
            duration_ms: None,
        }
    }

    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_file_location: bool,
    pub show_module: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub output_json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_file_location: false,
            show_module: true,
            include_timestamp: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            show_emojis: true,
            output_json: false,
            show_file_location: true,
            ..Default::default()
        }
    }

    /// `LOG_FORMAT=json` selects the production preset; `LOG_LEVEL` overrides
    /// the level of either preset. Unknown values fall back silently.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(LOG_FORMAT_VAR).as_deref().map(str::trim) {
            Some("json") => Self::production(),
            _ => Self::default(),
        };
        if let Some(level) = lookup(LOG_LEVEL_VAR).and_then(|raw| raw.parse().ok()) {
            config.min_level = level;
        }
        config
    }
}

pub struct FluxLogger {
    config: Mutex<LoggerConfig>,
}

impl FluxLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) {
        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }
    }

    fn create_log_entry(&self, record: &Record) -> LogEntry {
        let mut entry = LogEntry::new(
            LogLevel::from_log_level(record.level()),
            record.args().to_string(),
            record.module_path().unwrap_or("unknown").to_string(),
            record.file().unwrap_or("unknown").to_string(),
            record.line().unwrap_or(0),
        );

        let fields = record.key_values();
        if let Some(request_id) = fields.get(Key::from_str(REQUEST_ID_KEY)) {
            entry = entry.with_request_id(request_id.to_string());
        }
        if let Some(ms) = fields.get(Key::from_str(DURATION_MS_KEY)).and_then(|v| v.to_u64()) {
            entry = entry.with_duration(Duration::from_millis(ms));
        }
        entry
    }
}

impl Default for FluxLogger {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_entry(entry: &LogEntry, config: &LoggerConfig) -> String {
    if config.output_json {
        return serde_json::to_string(entry).unwrap_or_default();
    }

    let mut output = String::new();

    if config.include_timestamp {
        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        if config.show_colors {
            output.push_str(&format!("{} ", timestamp.bright_black()));
        } else {
            output.push_str(&format!("{} ", timestamp));
        }
    }

    let level_str = if config.show_emojis {
        format!("{} {}", entry.level.emoji(), entry.level.as_str())
    } else {
        entry.level.as_str().to_string()
    };
    if config.show_colors {
        output.push_str(&format!("[{}] ", level_str.color(entry.level.color()).bold()));
    } else {
        output.push_str(&format!("[{}] ", level_str));
    }

    if config.show_module && !entry.module.is_empty() {
        if config.show_colors {
            output.push_str(&format!("{}: ", entry.module.bright_blue()));
        } else {
            output.push_str(&format!("{}: ", entry.module));
        }
    }

    if config.show_colors {
        output.push_str(&entry.message.white().bold().to_string());
    } else {
        output.push_str(&entry.message);
    }

    if let Some(request_id) = &entry.request_id {
        if config.show_colors {
            output.push_str(&format!(" [req:{}]", request_id.bright_yellow()));
        } else {
            output.push_str(&format!(" [req:{}]", request_id));
        }
    }

    if let Some(duration) = entry.duration_ms {
        if config.show_colors {
            output.push_str(&format!(" [{}ms]", duration.to_string().bright_magenta()));
        } else {
            output.push_str(&format!(" [{}ms]", duration));
        }
    }

    if config.show_file_location {
        let location = format!("{}:{}", entry.file, entry.line);
        if config.show_colors {
            output.push_str(&format!(" ({})", location.bright_black()));
        } else {
            output.push_str(&format!(" ({})", location));
        }
    }

    output
}

impl log::Log for FluxLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => {
                LogLevel::from_log_level(metadata.level()) >= config.min_level
            }
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = self.create_log_entry(record);
        if let Ok(config) = self.config.lock() {
            let line = format_entry(&entry, &config);
            // stderr keeps stdout free for anything piped out of the binary
            let _ = writeln!(io::stderr(), "{}", line);
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Logs how long a named operation took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
    request_id: Option<String>,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn stop(&self) {
        let duration_ms = self.elapsed().as_millis() as u64;
        match &self.request_id {
            Some(request_id) => log::info!(
                request_id = request_id.as_str(), duration_ms = duration_ms;
                "⏱️  {} finished",
                self.name
            ),
            None => log::info!(duration_ms = duration_ms; "⏱️  {} finished", self.name),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_startup_info(app_name: &str, version: &str, host: &str, port: u16) {
    log::info!("🚀 Starting {} v{}", app_name, version);
    log::info!("🌐 Web form will be served on http://{}:{}", host, port);
}

pub fn log_config_info(config: &AppConfig) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Image endpoint: {}", config.flux_api_url);
    log::info!("   Translation endpoint: {}", config.translation_api_url);
    log::info!(
        "   Auth token: {}",
        if config.auth_token.is_some() { "✅ set" } else { "❌ missing" }
    );
}
