use std::io::{Write, stdout};

use base64::Engine;

use crate::api::FetchWorker;
use crate::app::{App, Message, Model};
use crate::notify::Notifier;

impl App {
    /// Hand queued jobs to the worker.
    pub(super) fn dispatch_jobs(model: &mut Model, worker: &FetchWorker) {
        for job in model.take_jobs() {
            tracing::debug!(?job, "dispatching job");
            if !worker.submit(job) {
                model
                    .search
                    .notifier_mut()
                    .error("Background downloader stopped unexpectedly.");
            }
        }
    }

    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::OpenInBrowser => {
                let Some(url) = focused_link(model) else {
                    return;
                };
                match open_external_link(&url) {
                    Ok(()) => model.search.notifier_mut().info(&format!("Opened {url}")),
                    Err(err) => model
                        .search
                        .notifier_mut()
                        .error(&format!("Open failed: {err}")),
                }
            }
            Message::CopyLink => {
                let Some(url) = focused_link(model) else {
                    return;
                };
                match copy_to_clipboard(&url) {
                    Ok(()) => model.search.notifier_mut().info("Copied image link"),
                    Err(err) => model
                        .search
                        .notifier_mut()
                        .error(&format!("Copy failed: {err}")),
                }
            }
            _ => {}
        }
    }
}

/// Link of the image in the lightbox, or of the selected card.
fn focused_link(model: &Model) -> Option<String> {
    model
        .lightbox()
        .current_link()
        .map(str::to_string)
        .or_else(|| model.selected_card().map(|card| card.full_image_url.clone()))
}

fn open_external_link(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()?
            .wait()?;
        Ok(())
    }
    #[cfg(target_os = "windows")]
    {
        use std::process::Stdio;
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        return Ok(());
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        use std::process::Stdio;
        std::process::Command::new("xdg-open")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    let mut out = stdout();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
