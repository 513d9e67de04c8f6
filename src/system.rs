use log::{error, info};
use start_deck::OpenMethod;
use std::process::Command;

/// Hands a bookmark target to the desktop's default handler.
pub fn shell_open(target: &str, method: OpenMethod) -> bool {
    info!("opening {target} ({method:?})");
    match opener_command(target).spawn() {
        Ok(_) => true,
        Err(err) => {
            error!("failed to open {target}: {err}");
            false
        }
    }
}

#[cfg(target_os = "windows")]
fn opener_command(target: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", target]);
    cmd
}

#[cfg(target_os = "macos")]
fn opener_command(target: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(target);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener_command(target: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(target);
    cmd
}
