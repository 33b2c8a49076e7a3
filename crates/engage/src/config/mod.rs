use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

pub const DEFAULT_STORE_DIR: &str = ".engage";
pub const DEFAULT_STORE_FILE: &str = "engagement.sqlite";

/// Absolute, lexically normalized locations a command runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub home_dir: PathBuf,
    pub cwd: PathBuf,
    pub db_path: PathBuf,
}

impl RuntimePaths {
    /// Resolves a user-supplied path the same way `--db` is resolved.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        resolve_user_path(path, &self.home_dir, &self.cwd)
    }
}

pub fn resolve_runtime_paths(
    home_dir: &Path,
    cwd: &Path,
    db_override: Option<&Path>,
) -> Result<RuntimePaths> {
    if !home_dir.is_absolute() {
        bail!("home_dir must be absolute: {}", home_dir.display());
    }
    if !cwd.is_absolute() {
        bail!("cwd must be absolute: {}", cwd.display());
    }

    let home_dir = normalize_lexical(home_dir);
    let cwd = normalize_lexical(cwd);
    let db_path = match db_override {
        Some(path) => resolve_user_path(path, &home_dir, &cwd)?,
        None => home_dir.join(DEFAULT_STORE_DIR).join(DEFAULT_STORE_FILE),
    };

    Ok(RuntimePaths {
        home_dir,
        cwd,
        db_path,
    })
}

fn resolve_user_path(path: &Path, home_dir: &Path, cwd: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    let expanded = match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            components.fold(home_dir.to_path_buf(), |mut expanded, component| {
                expanded.push(component.as_os_str());
                expanded
            })
        }
        Some(Component::Normal(first))
            if first.to_str().is_some_and(|segment| segment.starts_with('~')) =>
        {
            bail!(
                "only `~` and `~/...` home expansion is supported: {}",
                path.display()
            )
        }
        _ if path.is_absolute() => path.to_path_buf(),
        _ => cwd.join(path),
    };

    Ok(normalize_lexical(&expanded))
}

fn normalize_lexical(path: &Path) -> PathBuf {
    path.components()
        .fold(PathBuf::new(), |mut normalized, component| {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        normalized.push(component.as_os_str());
                    }
                }
                _ => normalized.push(component.as_os_str()),
            }
            normalized
        })
}
