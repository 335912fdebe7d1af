//! Main window of the downloader

use std::{path::Path, sync::Arc};

use eframe::{App, Frame, egui};
use egui::{Color32, RichText};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use tokio::runtime::Handle;

use crate::{
    config::{AppConfig, RevealPolicy},
    downloader::{Orchestrator, spawn_download},
    extractor::YtDlp,
    link::{ClipboardSource, SystemClipboard},
    model::{DownloadRequest, UiState},
    platform,
    shell::{Notice, NoticeLevel, Shell, Submission, Tone, reveal_failure},
};

/// Application state for the GUI
pub struct DownloaderApp {
    /// Input and download state
    shell: Shell,
    /// Runs yt-dlp for each request
    orchestrator: Arc<Orchestrator<YtDlp>>,
    /// Runtime the downloads are spawned on
    runtime: Handle,
    clipboard: Box<dyn ClipboardSource>,
    reveal: RevealPolicy,
}

impl DownloaderApp {
    pub fn new(config: &AppConfig, runtime: Handle) -> Self {
        let mut clipboard: Box<dyn ClipboardSource> = Box::new(SystemClipboard);
        let shell = Shell::new(clipboard.read_text());
        let extractor = YtDlp::new(&config.profile);
        Self {
            shell,
            orchestrator: Arc::new(Orchestrator::new(extractor, config.profile.clone())),
            runtime,
            clipboard,
            reveal: config.reveal,
        }
    }

    fn start_download(&mut self, ctx: &egui::Context) {
        let start = self.shell.last_folder().map(Path::to_path_buf);
        let pick_folder = move || {
            let dialog = FileDialog::new();
            match start {
                Some(dir) => dialog.set_directory(dir).pick_folder(),
                None => dialog.pick_folder(),
            }
        };

        let orchestrator = Arc::clone(&self.orchestrator);
        let runtime = self.runtime.clone();
        let repaint = ctx.clone();
        let launch = move |request: DownloadRequest| {
            spawn_download(&runtime, orchestrator, request, move || {
                repaint.request_repaint()
            })
        };

        match self.shell.submit(pick_folder, launch) {
            Submission::Rejected(err) => show_notice(&Notice::from(err)),
            Submission::Cancelled | Submission::Busy | Submission::Started => {}
        }
    }

    /// Opens `folder`, applying the reveal policy to failures.
    fn reveal(&self, folder: &Path) {
        if let Err(err) = platform::reveal_folder(folder) {
            if let Some(notice) = reveal_failure(self.reveal, folder, &err) {
                show_notice(&notice);
            }
        }
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for DownloaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Pick up the outcome of a finished download
        if let Some(notice) = self.shell.poll() {
            show_notice(&notice);
            if let Some(folder) = &notice.reveal {
                self.reveal(folder);
            }
        }

        let controls = self.shell.controls();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("YouTube Downloader").size(24.0).strong());
                ui.label(
                    RichText::new("Save audio or video to your computer")
                        .size(11.0)
                        .italics()
                        .color(Color32::from_gray(0x88)),
                );
                ui.add_space(12.0);

                let status = self.shell.status();
                ui.label(RichText::new(status.text()).color(tone_color(status.tone())));
            });
            ui.add_space(8.0);

            // Link field and paste button
            ui.horizontal(|ui| {
                let field_width = ui.available_width() - 80.0;
                ui.add_enabled(
                    controls.url_input,
                    egui::TextEdit::singleline(&mut self.shell.url)
                        .hint_text("https://youtube.com/...")
                        .desired_width(field_width),
                );
                if ui
                    .add_enabled(controls.paste, egui::Button::new("Paste"))
                    .clicked()
                {
                    let text = self.clipboard.read_text();
                    self.shell.paste(text);
                }
            });
            ui.add_space(8.0);

            // Format choice
            ui.horizontal(|ui| {
                ui.add_enabled(
                    controls.formats,
                    egui::Checkbox::new(&mut self.shell.formats.audio, "MP3 (audio)"),
                );
                ui.add_space(20.0);
                ui.add_enabled(
                    controls.formats,
                    egui::Checkbox::new(&mut self.shell.formats.video, "MP4 (video)"),
                );
            });
            ui.add_space(8.0);

            ui.vertical_centered_justified(|ui| {
                let start = egui::Button::new("Choose a folder and start downloading");
                if ui.add_enabled(controls.start, start).clicked() {
                    self.start_download(ctx);
                }

                let last_folder = self.shell.last_folder().map(Path::to_path_buf);
                let open = egui::Button::new("📂 Open download folder");
                if ui.add_enabled(last_folder.is_some(), open).clicked() {
                    if let Some(folder) = last_folder {
                        self.reveal(&folder);
                    }
                }

                if self.shell.state() == UiState::Downloading {
                    ui.add_space(8.0);
                    ui.add(egui::Spinner::new());
                }
            });
        });
    }
}

fn tone_color(tone: Tone) -> Color32 {
    match tone {
        Tone::Muted => Color32::from_rgb(0xaa, 0xaa, 0xaa),
        Tone::Accent => Color32::from_rgb(0x00, 0x78, 0xd4),
        Tone::Positive => Color32::from_rgb(0x00, 0xe6, 0x76),
        Tone::Negative => Color32::from_rgb(0xff, 0x52, 0x52),
    }
}

/// Shows a blocking message box.
fn show_notice(notice: &Notice) {
    let level = match notice.level {
        NoticeLevel::Info => MessageLevel::Info,
        NoticeLevel::Warning => MessageLevel::Warning,
        NoticeLevel::Error => MessageLevel::Error,
    };
    MessageDialog::new()
        .set_level(level)
        .set_title(notice.title)
        .set_description(&notice.message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
