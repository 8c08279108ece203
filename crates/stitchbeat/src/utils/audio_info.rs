//! Audio system diagnostics for Unix platforms.
//!
//! Capturing what a music player is outputting usually means recording from a
//! monitor source, and finding the right one is the most common setup issue.
//! This dump shows which audio server is running and which monitors exist.

use std::process::Command;

/// Prints audio server and device diagnostics.
pub fn log_audio_info() {
    println!("\n=== Audio System Diagnostics ===\n");

    println!("--- Audio Server ---");
    for server in ["pipewire", "pulseaudio"] {
        if is_running(server) {
            println!("{}: running", server);
            run_cmd(server, &["--version"]);
        } else {
            println!("{}: not running", server);
        }
    }

    println!("\n--- Input Devices (Sources) ---");
    run_cmd("pactl", &["list", "sources", "short"]);

    println!("\n--- Output Devices (Sinks) ---");
    run_cmd("pactl", &["list", "sinks", "short"]);

    println!("\n--- Default Devices ---");
    run_cmd("pactl", &["get-default-source"]);
    run_cmd("pactl", &["get-default-sink"]);

    println!("\n--- Monitor Sources (for capturing player output) ---");
    if let Ok(output) = Command::new("pactl")
        .args(["list", "sources", "short"])
        .output()
    {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut found = false;
        for line in stdout.lines().filter(|l| l.contains(".monitor")) {
            println!("  {}", line);
            found = true;
        }
        if !found {
            println!("  (none found - set last_device to a capture-capable input instead)");
        }
    }

    println!("\n=== End Diagnostics ===\n");
}

fn is_running(process: &str) -> bool {
    Command::new("pgrep")
        .arg("-x")
        .arg(process)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn run_cmd(cmd: &str, args: &[&str]) {
    match Command::new(cmd).args(args).output() {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stdout.is_empty() {
                for line in stdout.lines() {
                    println!("  {}", line);
                }
            }
            if !stderr.is_empty() && !output.status.success() {
                eprintln!("  (error: {})", stderr.trim());
            }
        }
        Err(_) => {
            println!("  ({} not found)", cmd);
        }
    }
}
