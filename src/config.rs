//! Fixed settings of the application.
//!
//! Nothing here is read from disk or the environment; these defaults are the
//! single place where the downloader's behaviour is tuned. The two failure
//! policies are picked with cargo features.

use std::path::PathBuf;

/// Browser identity presented to the video host.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// What to do when the file browser cannot be opened on a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPolicy {
    /// Log at debug level and carry on.
    Ignore,
    /// Show a warning dialog.
    Notify,
}

impl Default for RevealPolicy {
    /// Chosen at build time with the `reveal-errors` feature.
    fn default() -> Self {
        if cfg!(feature = "reveal-errors") {
            RevealPolicy::Notify
        } else {
            RevealPolicy::Ignore
        }
    }
}

/// How yt-dlp treats an output file that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Pass no flag and let yt-dlp decide.
    LibraryDefault,
    Overwrite,
    Skip,
}

impl Default for OverwritePolicy {
    /// Chosen at build time with the `force-overwrites` or `no-overwrites`
    /// feature; the first one wins when both are enabled.
    fn default() -> Self {
        if cfg!(feature = "force-overwrites") {
            OverwritePolicy::Overwrite
        } else if cfg!(feature = "no-overwrites") {
            OverwritePolicy::Skip
        } else {
            OverwritePolicy::LibraryDefault
        }
    }
}

impl OverwritePolicy {
    pub fn flag(self) -> Option<&'static str> {
        match self {
            OverwritePolicy::LibraryDefault => None,
            OverwritePolicy::Overwrite => Some("--force-overwrites"),
            OverwritePolicy::Skip => Some("--no-overwrites"),
        }
    }
}

/// Options shared by every yt-dlp invocation.
#[derive(Debug, Clone)]
pub struct ExtractorProfile {
    /// Program to run, looked up on `PATH` unless absolute
    pub program: PathBuf,
    pub user_agent: String,
    pub source_address: String,
    /// YouTube player clients, tried in order
    pub player_clients: Vec<String>,
    pub audio_codec: String,
    pub audio_bitrate_kbps: u32,
    pub video_container: String,
    pub overwrite: OverwritePolicy,
}

impl Default for ExtractorProfile {
    fn default() -> Self {
        let program = if cfg!(target_os = "windows") { "yt-dlp.exe" } else { "yt-dlp" };
        Self {
            program: PathBuf::from(program),
            user_agent: USER_AGENT.to_string(),
            source_address: "0.0.0.0".to_string(),
            player_clients: vec!["android".to_string(), "web".to_string()],
            audio_codec: "mp3".to_string(),
            audio_bitrate_kbps: 192,
            video_container: "mp4".to_string(),
            overwrite: OverwritePolicy::default(),
        }
    }
}

/// Top-level application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Identifier used by the OS to group the window in the taskbar
    pub app_id: String,
    pub title: String,
    pub window_size: [f32; 2],
    /// Icon file looked up next to the executable
    pub icon_file: String,
    pub reveal: RevealPolicy,
    pub profile: ExtractorProfile,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: "tube-saver.desktop.downloader".to_string(),
            title: "Tube Saver".to_string(),
            window_size: [550.0, 420.0],
            icon_file: "icon.png".to_string(),
            reveal: RevealPolicy::default(),
            profile: ExtractorProfile::default(),
        }
    }
}
