/*!
 * Clipboard support for promptpack
 *
 * Provides copy and paste against the system clipboard with automatic
 * detection of available clipboard mechanisms. Aggregate mode uses the
 * copy side (`--clip`), apply mode uses the paste side (`--apply`).
 */

use std::env;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// The command is not available on the system
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Trait for clipboard operations
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy(&self, text: &str) -> Result<()>;

    /// Read the current clipboard text
    fn paste(&self) -> Result<String>;
}

/// Available clipboard providers
#[derive(Debug, Clone, Copy)]
enum ClipboardProvider {
    /// tmux buffer
    Tmux,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Wayland clipboard
    Wayland,
    /// macOS clipboard
    MacOS,
    /// Windows clipboard (via WSL)
    Wsl,
    /// Termux clipboard
    Termux,
}

impl ClipboardProvider {
    /// Command and arguments that write stdin to the clipboard
    fn copy_command(&self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::Tmux => ("tmux", vec!["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", vec!["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", vec!["-b", "-i"]),
            Self::Wayland => ("wl-copy", vec![]),
            Self::MacOS => ("pbcopy", vec![]),
            Self::Wsl => ("clip.exe", vec![]),
            Self::Termux => ("termux-clipboard-set", vec![]),
        }
    }

    /// Command and arguments that print the clipboard to stdout
    fn paste_command(&self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::Tmux => ("tmux", vec!["show-buffer"]),
            Self::Xclip => ("xclip", vec!["-selection", "clipboard", "-out"]),
            Self::Xsel => ("xsel", vec!["-b", "-o"]),
            Self::Wayland => ("wl-paste", vec!["--no-newline"]),
            Self::MacOS => ("pbpaste", vec![]),
            Self::Wsl => ("powershell.exe", vec!["-NoProfile", "-Command", "Get-Clipboard"]),
            Self::Termux => ("termux-clipboard-get", vec![]),
        }
    }
}

impl Clipboard for ClipboardProvider {
    fn copy(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.copy_command();
        execute_copy_command(cmd, &args, text)
    }

    fn paste(&self) -> Result<String> {
        let (cmd, args) = self.paste_command();
        execute_paste_command(cmd, &args)
    }
}

//--------------------------------------------------------------------
// Public API
//--------------------------------------------------------------------

/// Copy text to the system clipboard.
///
/// Automatically detects the most appropriate clipboard mechanism
/// and uses it to copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let clipboard = get_clipboard()?;
    clipboard.copy(text)
}

/// Read the current text content of the system clipboard.
pub fn read_from_clipboard() -> Result<String> {
    let clipboard = get_clipboard()?;
    clipboard.paste()
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    // First check if the command exists in the PATH
    if let Ok(paths) = env::var("PATH") {
        for path in paths.split(':') {
            let p = Path::new(path).join(command);
            if p.exists() {
                return true;
            }
        }
    }

    // Try to run the command with '--version' flag as fallback
    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

//--------------------------------------------------------------------
// Internal Implementation
//--------------------------------------------------------------------

/// Get the appropriate clipboard implementation based on the system
fn get_clipboard() -> Result<Box<dyn Clipboard>> {
    let providers = determine_clipboard_providers();

    if let Some(provider) = providers.into_iter().next() {
        return Ok(Box::new(provider));
    }

    Err(ClipboardError::NoClipboardFound)
}

/// Spawn a copy command, feed it `text` on stdin and wait for completion
fn execute_copy_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to spawn {}", cmd)))?;

    let stdin = child.stdin.as_mut().ok_or_else(|| {
        ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
    })?;

    stdin
        .write_all(text.as_bytes())
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to write to {}", cmd)))?;

    let status = child
        .wait()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to wait for {}", cmd)))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

/// Spawn a paste command and collect its stdout
fn execute_paste_command(cmd: &str, args: &[&str]) -> Result<String> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to spawn {}", cmd)))?;

    let mut output = String::new();
    if let Some(stdout) = child.stdout.as_mut() {
        stdout
            .read_to_string(&mut output)
            .map_err(|_| ClipboardError::CommandFailed(format!("Failed to read from {}", cmd)))?;
    }

    let status = child
        .wait()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to wait for {}", cmd)))?;

    if status.success() {
        Ok(output)
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

/// Platform detection cache (using thread-safe lazy initialization)
static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else if cfg!(target_os = "android") {
            "android"
        } else {
            "unknown"
        }
    })
}

/// Determine which clipboard providers to try based on platform and preference
fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::with_capacity(3);

    // Always try tmux first if available and running (user preference)
    if command_exists("tmux") && is_tmux_running() {
        providers.push(ClipboardProvider::Tmux);
    }

    // Add platform-specific providers
    match get_platform() {
        "macos" => {
            if command_exists("pbcopy") {
                providers.push(ClipboardProvider::MacOS);
            }
        }
        "windows" | "wsl" => {
            if command_exists("clip.exe") {
                providers.push(ClipboardProvider::Wsl);
            }
        }
        "linux" => {
            // Try Wayland first
            if command_exists("wl-copy") {
                providers.push(ClipboardProvider::Wayland);
            }

            // Then X11 mechanisms
            if command_exists("xsel") {
                providers.push(ClipboardProvider::Xsel);
            }

            if command_exists("xclip") {
                providers.push(ClipboardProvider::Xclip);
            }
        }
        "android" => {
            if command_exists("termux-clipboard-set") {
                providers.push(ClipboardProvider::Termux);
            }
        }
        _ => {}
    }

    providers
}

/// Check if tmux is running and available for clipboard operations
fn is_tmux_running() -> bool {
    // Check if TMUX environment variable is set (inside tmux session)
    if env::var("TMUX").is_ok() {
        return true;
    }

    // Try running tmux list-buffers as a fallback check
    let status = Command::new("tmux")
        .args(["list-buffers"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    status.map(|s| s.success()).unwrap_or(false)
}
