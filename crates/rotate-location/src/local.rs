//! Backup directories on the local filesystem

use std::fs;
use std::path::{Path, PathBuf};

use rotate_domain::{Location, RemovalCommand};

use crate::command::{elevate, find_command, run, split_nul, succeeds};
use crate::LocationError;

/// A directory on this host
///
/// Without `sudo` every inspection goes through `std::fs`. With `sudo` the
/// inspections and the listing run as `sudo test ...` and `sudo find ...`
/// so directories the current user cannot read are still handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLocation {
    directory: PathBuf,
    recursive: bool,
    sudo: bool,
}

impl LocalLocation {
    /// Create a location for `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            recursive: false,
            sudo: false,
        }
    }

    /// List regular files at any depth instead of direct children
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Run inspections and removals through `sudo`
    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    /// The backup directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn directory_arg(&self) -> String {
        self.directory.to_string_lossy().into_owned()
    }

    fn test(&self, flag: &str) -> bool {
        succeeds(&elevate(
            vec!["test".to_string(), flag.to_string(), self.directory_arg()],
            true,
        ))
    }

    fn list_children(&self) -> Result<Vec<String>, LocationError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            entries.push(entry?.path().to_string_lossy().into_owned());
        }
        Ok(entries)
    }

    fn list_files(&self) -> Result<Vec<String>, LocationError> {
        let mut files = Vec::new();
        let mut pending = vec![self.directory.clone()];
        while let Some(directory) = pending.pop() {
            for entry in fs::read_dir(&directory)? {
                let entry = entry?;
                let file_type = entry.file_type()?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    files.push(entry.path().to_string_lossy().into_owned());
                }
            }
        }
        Ok(files)
    }
}

impl Location for LocalLocation {
    type Error = LocationError;

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        let mut entries = if self.sudo {
            let argv = elevate(find_command(&self.directory_arg(), self.recursive), true);
            split_nul(&run(&argv)?.stdout)
        } else if self.recursive {
            self.list_files()?
        } else {
            self.list_children()?
        };
        entries.sort();
        Ok(entries)
    }

    fn remove(&self, entry: &str, command: &RemovalCommand) -> Result<(), Self::Error> {
        run(&elevate(command.command_line(entry), self.sudo))?;
        Ok(())
    }

    fn exists(&self) -> bool {
        if self.sudo {
            self.test("-d")
        } else {
            self.directory.is_dir()
        }
    }

    fn is_readable(&self) -> bool {
        if self.sudo {
            self.test("-r")
        } else {
            fs::read_dir(&self.directory).is_ok()
        }
    }

    fn is_writable(&self) -> bool {
        if self.sudo {
            self.test("-w")
        } else {
            tempfile::tempfile_in(&self.directory).is_ok()
        }
    }

    fn identity_key(&self) -> String {
        format!("local:{}", mount_point(&self.directory).display())
    }

    fn is_remote(&self) -> bool {
        false
    }

    fn name(&self) -> String {
        self.directory.display().to_string()
    }
}

/// Closest ancestor of `path` on the same device
///
/// Falls back to the path itself when it cannot be resolved.
#[cfg(unix)]
fn mount_point(path: &Path) -> PathBuf {
    use std::os::unix::fs::MetadataExt;

    let Ok(canonical) = path.canonicalize() else {
        return path.to_path_buf();
    };
    let Ok(metadata) = canonical.metadata() else {
        return canonical;
    };

    let device = metadata.dev();
    let mut mount = canonical.as_path();
    while let Some(parent) = mount.parent() {
        match parent.metadata() {
            Ok(parent_metadata) if parent_metadata.dev() == device => mount = parent,
            _ => break,
        }
    }
    mount.to_path_buf()
}

#[cfg(not(unix))]
fn mount_point(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
