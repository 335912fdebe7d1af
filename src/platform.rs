//! Host OS integration: file browser and window icon.

use std::{
    io,
    path::Path,
    process::{Command, ExitStatus},
    thread::{self, JoinHandle},
};

use eframe::egui::IconData;

/// Opens `folder` in the platform's file browser.
pub fn reveal_folder(folder: &Path) -> io::Result<()> {
    if !folder.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a folder", folder.display()),
        ));
    }

    #[cfg(target_os = "windows")]
    let program = "explorer";
    #[cfg(target_os = "macos")]
    let program = "open";
    #[cfg(all(unix, not(target_os = "macos")))]
    let program = "xdg-open";

    launch_detached(program, folder).map(drop)
}

/// Starts `program` on `arg` and reaps it on a background thread.
fn launch_detached(program: &str, arg: &Path) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = Command::new(program).arg(arg).spawn()?;
    Ok(thread::spawn(move || child.wait()))
}

/// Loads the window icon from `file_name` next to the executable.
pub fn load_icon(file_name: &str) -> Option<IconData> {
    let exe = std::env::current_exe().ok()?;
    let path = exe.parent()?.join(file_name);
    if !path.exists() {
        tracing::debug!("no icon at {}", path.display());
        return None;
    }
    decode_icon(&path)
}

fn decode_icon(path: &Path) -> Option<IconData> {
    match image::open(path) {
        Ok(img) => {
            let img = img.to_rgba8();
            let (width, height) = img.dimensions();
            Some(IconData {
                rgba: img.into_raw(),
                width,
                height,
            })
        }
        Err(err) => {
            tracing::warn!("could not read icon {}: {err}", path.display());
            None
        }
    }
}
