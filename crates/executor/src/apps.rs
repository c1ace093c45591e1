//! Installed application discovery.
//!
//! Windows: `.lnk`/`.exe` entries under the Start Menu program folders.
//! Elsewhere: freedesktop `.desktop` entries.

use lucy_tools::InstalledApp;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// Levels below each root, Start Menu folders nest a few deep.
const MAX_DEPTH: usize = 7;

pub fn default_app_dirs() -> Vec<PathBuf> {
    if cfg!(windows) {
        let mut dirs = vec![PathBuf::from(
            "C:\\ProgramData\\Microsoft\\Windows\\Start Menu\\Programs",
        )];
        if let Ok(profile) = std::env::var("USERPROFILE") {
            dirs.push(
                Path::new(&profile)
                    .join("AppData\\Roaming\\Microsoft\\Windows\\Start Menu\\Programs"),
            );
        }
        dirs
    } else {
        let mut dirs = vec![
            PathBuf::from("/usr/share/applications"),
            PathBuf::from("/usr/local/share/applications"),
        ];
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(Path::new(&home).join(".local/share/applications"));
        }
        dirs
    }
}

/// Walk `dirs` and collect every launchable entry. Unreadable directories
/// are skipped.
pub fn scan(dirs: &[PathBuf]) -> Vec<InstalledApp> {
    let mut apps = Vec::new();
    let mut seen = HashSet::new();

    for root in dirs {
        let entries = WalkDir::new(root)
            .follow_links(false)
            .max_depth(MAX_DEPTH)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| !entry.file_type().is_dir());
        for entry in entries {
            if let Some(app) = app_from_file(entry.path()) {
                if seen.insert(app.path.clone()) {
                    apps.push(app);
                }
            }
        }
    }

    apps.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    apps
}

fn app_from_file(path: &Path) -> Option<InstalledApp> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "lnk" | "exe" => {
            let name = path.file_stem()?.to_string_lossy().to_string();
            if name.to_lowercase().contains("uninstall") {
                return None;
            }
            Some(InstalledApp {
                name,
                path: path.to_string_lossy().to_string(),
            })
        }
        "desktop" => {
            let content = std::fs::read_to_string(path).ok()?;
            parse_desktop_entry(&content)
        }
        _ => None,
    }
}

/// Name and Exec from the `[Desktop Entry]` group. Hidden entries and
/// field codes (`%u`, `%F`, ...) are dropped.
pub fn parse_desktop_entry(content: &str) -> Option<InstalledApp> {
    let mut in_entry = false;
    let mut name = None;
    let mut exec = None;

    for line in content.lines().map(str::trim) {
        if line.starts_with('[') {
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry {
            continue;
        }
        if let Some(value) = line.strip_prefix("Name=") {
            name.get_or_insert_with(|| value.to_string());
        } else if let Some(value) = line.strip_prefix("Exec=") {
            exec.get_or_insert_with(|| value.to_string());
        } else if line == "NoDisplay=true" || line == "Hidden=true" {
            return None;
        }
    }

    let exec = exec?
        .split_whitespace()
        .filter(|part| !part.starts_with('%'))
        .collect::<Vec<_>>()
        .join(" ");
    if exec.is_empty() {
        return None;
    }

    Some(InstalledApp { name: name?, path: exec })
}
