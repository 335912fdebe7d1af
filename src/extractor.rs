//! yt-dlp invocation: one [`ExtractionJob`] per requested format.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;

use crate::{config::ExtractorProfile, error::ExtractError, model::DownloadRequest};

/// Kind of copy produced by a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Post-processing applied by yt-dlp after the download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcess {
    /// Re-encode the audio stream to `codec` at `bitrate_kbps`
    ExtractAudio { codec: String, bitrate_kbps: u32 },
    /// Merge video and audio streams into `container`
    Merge { container: String },
}

/// Everything needed for one yt-dlp run.
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    pub kind: MediaKind,
    pub url: String,
    pub format_selector: &'static str,
    pub output_template: PathBuf,
    pub post: PostProcess,
    profile: ExtractorProfile,
}

impl ExtractionJob {
    pub fn audio(profile: &ExtractorProfile, url: &str, folder: &Path) -> Self {
        Self {
            kind: MediaKind::Audio,
            url: url.to_string(),
            format_selector: "bestaudio/best",
            output_template: folder.join(format!("%(title)s.{}", profile.audio_codec)),
            post: PostProcess::ExtractAudio {
                codec: profile.audio_codec.clone(),
                bitrate_kbps: profile.audio_bitrate_kbps,
            },
            profile: profile.clone(),
        }
    }

    pub fn video(profile: &ExtractorProfile, url: &str, folder: &Path) -> Self {
        Self {
            kind: MediaKind::Video,
            url: url.to_string(),
            format_selector: "bestvideo+bestaudio/best",
            output_template: folder.join(format!("%(title)s.{}", profile.video_container)),
            post: PostProcess::Merge {
                container: profile.video_container.clone(),
            },
            profile: profile.clone(),
        }
    }

    /// Jobs for a request, audio first.
    pub fn plan(profile: &ExtractorProfile, request: &DownloadRequest) -> Vec<Self> {
        let formats = request.formats();
        let mut jobs = Vec::with_capacity(2);
        if formats.audio {
            jobs.push(Self::audio(profile, request.url(), request.folder()));
        }
        if formats.video {
            jobs.push(Self::video(profile, request.url(), request.folder()));
        }
        jobs
    }

    /// Command-line arguments for yt-dlp, URL last.
    pub fn args(&self) -> Vec<OsString> {
        let profile = &self.profile;
        let mut args: Vec<OsString> = vec![
            "--quiet".into(),
            "--no-warnings".into(),
            "--user-agent".into(),
            profile.user_agent.as_str().into(),
            "--source-address".into(),
            profile.source_address.as_str().into(),
            "--extractor-args".into(),
            format!("youtube:player_client={}", profile.player_clients.join(",")).into(),
            "-f".into(),
            self.format_selector.into(),
        ];

        match &self.post {
            PostProcess::ExtractAudio {
                codec,
                bitrate_kbps,
            } => {
                args.push("--extract-audio".into());
                args.push("--audio-format".into());
                args.push(codec.as_str().into());
                args.push("--audio-quality".into());
                args.push(format!("{bitrate_kbps}K").into());
            }
            PostProcess::Merge { container } => {
                args.push("--merge-output-format".into());
                args.push(container.as_str().into());
            }
        }

        if let Some(flag) = profile.overwrite.flag() {
            args.push(flag.into());
        }

        args.push("-o".into());
        args.push(self.output_template.clone().into_os_string());
        // Keeps a URL starting with '-' from being read as an option
        args.push("--".into());
        args.push(self.url.as_str().into());
        args
    }
}

/// Runs one extraction to completion.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, job: &ExtractionJob) -> Result<(), ExtractError>;
}

/// The `yt-dlp` executable.
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(profile: &ExtractorProfile) -> Self {
        Self {
            program: profile.program.clone(),
        }
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn extract(&self, job: &ExtractionJob) -> Result<(), ExtractError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(job.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!("yt-dlp params: {:?}", cmd);

        let output = cmd.output().await.map_err(|source| ExtractError::Launch {
            program: self.program.display().to_string(),
            source,
        })?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ExtractError::Failed(failure_message(
            &stderr,
            output.status.code(),
        )))
    }
}

/// Picks the message shown for a failed run: yt-dlp's `ERROR:` lines, else
/// all of stderr, else the exit status.
pub fn failure_message(stderr: &str, code: Option<i32>) -> String {
    let errors: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("ERROR:"))
        .collect();
    if !errors.is_empty() {
        return errors.join("\n");
    }

    let trimmed = stderr.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    match code {
        Some(code) => format!("yt-dlp exited with status {code}"),
        None => "yt-dlp was terminated by a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverwritePolicy;
    use crate::model::Formats;

    fn strings(job: &ExtractionJob) -> Vec<String> {
        job.args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn value_of<'a>(args: &'a [String], flag: &str) -> &'a str {
        let at = args.iter().position(|a| a == flag).unwrap();
        &args[at + 1]
    }

    #[test]
    fn audio_job_extracts_mp3_at_192k() {
        let folder = Path::new("downloads");
        let job = ExtractionJob::audio(&ExtractorProfile::default(), "https://youtu.be/x", folder);
        let args = strings(&job);

        assert_eq!(value_of(&args, "-f"), "bestaudio/best");
        assert!(args.contains(&"--extract-audio".to_string()));
        assert_eq!(value_of(&args, "--audio-format"), "mp3");
        assert_eq!(value_of(&args, "--audio-quality"), "192K");
        assert_eq!(
            value_of(&args, "-o"),
            folder.join("%(title)s.mp3").to_string_lossy()
        );
        assert!(!args.contains(&"--merge-output-format".to_string()));
    }

    #[test]
    fn video_job_merges_into_mp4() {
        let folder = Path::new("downloads");
        let job = ExtractionJob::video(&ExtractorProfile::default(), "https://youtu.be/x", folder);
        let args = strings(&job);

        assert_eq!(value_of(&args, "-f"), "bestvideo+bestaudio/best");
        assert_eq!(value_of(&args, "--merge-output-format"), "mp4");
        assert_eq!(
            value_of(&args, "-o"),
            folder.join("%(title)s.mp4").to_string_lossy()
        );
        assert!(!args.contains(&"--extract-audio".to_string()));
    }

    #[test]
    fn identity_is_fixed() {
        let job = ExtractionJob::video(&ExtractorProfile::default(), "u", Path::new("."));
        let args = strings(&job);

        assert_eq!(&args[..2], ["--quiet", "--no-warnings"]);
        assert_eq!(value_of(&args, "--user-agent"), crate::config::USER_AGENT);
        assert_eq!(value_of(&args, "--source-address"), "0.0.0.0");
        assert_eq!(
            value_of(&args, "--extractor-args"),
            "youtube:player_client=android,web"
        );
        assert_eq!(&args[args.len() - 2..], ["--", "u"]);
    }

    #[test]
    fn overwrite_policy_adds_flag() {
        let mut profile = ExtractorProfile::default();
        let plain = strings(&ExtractionJob::audio(&profile, "u", Path::new(".")));
        assert!(!plain.iter().any(|a| a.contains("overwrites")));

        profile.overwrite = OverwritePolicy::Skip;
        let skip = strings(&ExtractionJob::audio(&profile, "u", Path::new(".")));
        assert!(skip.contains(&"--no-overwrites".to_string()));
    }

    #[test]
    fn plan_orders_audio_before_video() {
        let request = DownloadRequest::new(
            "https://youtu.be/abc123",
            std::env::temp_dir(),
            Formats { audio: true, video: true },
        )
        .unwrap();
        let kinds: Vec<MediaKind> = ExtractionJob::plan(&ExtractorProfile::default(), &request)
            .iter()
            .map(|j| j.kind)
            .collect();
        assert_eq!(kinds, [MediaKind::Audio, MediaKind::Video]);
    }

    #[test]
    fn failure_message_prefers_error_lines() {
        let stderr = "WARNING: something\nERROR: [youtube] abc: HTTP Error 403: Forbidden\n";
        assert_eq!(
            failure_message(stderr, Some(1)),
            "ERROR: [youtube] abc: HTTP Error 403: Forbidden"
        );
    }

    #[test]
    fn failure_message_falls_back() {
        assert_eq!(failure_message("  boom \n", Some(2)), "boom");
        assert_eq!(failure_message("", Some(2)), "yt-dlp exited with status 2");
        assert_eq!(failure_message("", None), "yt-dlp was terminated by a signal");
    }

    #[tokio::test]
    async fn missing_program_reports_launch_error() {
        let mut profile = ExtractorProfile::default();
        profile.program = PathBuf::from("tube-saver-definitely-not-installed");
        let job = ExtractionJob::audio(&profile, "https://youtu.be/x", Path::new("."));

        let err = YtDlp::new(&profile).extract(&job).await.unwrap_err();
        assert!(matches!(err, ExtractError::Launch { .. }));
        assert!(err.to_string().contains("tube-saver-definitely-not-installed"));
    }
}
