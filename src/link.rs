/// Hosts whose links are picked up from the clipboard.
const VIDEO_HOSTS: [&str; 2] = ["youtube.com", "youtu.be"];

/// Returns true when `text` looks like a link to a supported video host.
pub fn is_video_link(text: &str) -> bool {
    let text = text.trim();
    VIDEO_HOSTS.iter().any(|host| text.contains(host))
}

/// Text source for the paste shortcut; the system clipboard in the app.
pub trait ClipboardSource {
    fn read_text(&mut self) -> Option<String>;
}

/// The OS clipboard. Every read opens a fresh handle, since some platforms
/// drop ownership when a handle lingers.
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Option<String> {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::debug!("clipboard unavailable: {err}");
                None
            }
        }
    }
}
