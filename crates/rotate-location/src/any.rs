//! Tagged union over the supported location kinds

use std::fmt;

use rotate_domain::{Location, RemovalCommand};

use crate::{LocalLocation, LocationError, RemoteLocation};

/// Options shared by every location built from a string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationOptions {
    /// List regular files at any depth
    pub recursive: bool,

    /// Elevate commands with `sudo`
    pub sudo: bool,

    /// Login user for remote locations
    pub ssh_user: Option<String>,
}

/// A local or remote location
///
/// Callers work through the [`Location`] trait and never need to match on
/// the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyLocation {
    /// Directory on this host
    Local(LocalLocation),

    /// Directory on an SSH host
    Remote(RemoteLocation),
}

impl AnyLocation {
    /// Parse `host:/path` or a local path
    ///
    /// A spec is remote when the part before the first colon is non-empty
    /// and contains no `/`, and a directory follows the colon.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotate_domain::Location;
    /// use rotate_location::{AnyLocation, LocationOptions};
    ///
    /// let options = LocationOptions::default();
    /// let remote = AnyLocation::parse("db4:/var/backups", &options).unwrap();
    /// assert!(remote.is_remote());
    ///
    /// let local = AnyLocation::parse("/srv/backups:old", &options).unwrap();
    /// assert!(!local.is_remote());
    /// ```
    pub fn parse(spec: &str, options: &LocationOptions) -> Result<Self, LocationError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(LocationError::InvalidSpec("empty location".to_string()));
        }

        if let Some((host, directory)) = spec.split_once(':') {
            if !host.is_empty() && !host.contains('/') && !directory.is_empty() {
                return Ok(AnyLocation::Remote(
                    RemoteLocation::new(host, directory)
                        .with_user(options.ssh_user.clone())
                        .with_recursive(options.recursive)
                        .with_sudo(options.sudo),
                ));
            }
        }

        Ok(AnyLocation::Local(
            LocalLocation::new(spec)
                .with_recursive(options.recursive)
                .with_sudo(options.sudo),
        ))
    }
}

impl From<LocalLocation> for AnyLocation {
    fn from(location: LocalLocation) -> Self {
        AnyLocation::Local(location)
    }
}

impl From<RemoteLocation> for AnyLocation {
    fn from(location: RemoteLocation) -> Self {
        AnyLocation::Remote(location)
    }
}

impl Location for AnyLocation {
    type Error = LocationError;

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        match self {
            AnyLocation::Local(location) => location.list(),
            AnyLocation::Remote(location) => location.list(),
        }
    }

    fn remove(&self, entry: &str, command: &RemovalCommand) -> Result<(), Self::Error> {
        match self {
            AnyLocation::Local(location) => location.remove(entry, command),
            AnyLocation::Remote(location) => location.remove(entry, command),
        }
    }

    fn exists(&self) -> bool {
        match self {
            AnyLocation::Local(location) => location.exists(),
            AnyLocation::Remote(location) => location.exists(),
        }
    }

    fn is_readable(&self) -> bool {
        match self {
            AnyLocation::Local(location) => location.is_readable(),
            AnyLocation::Remote(location) => location.is_readable(),
        }
    }

    fn is_writable(&self) -> bool {
        match self {
            AnyLocation::Local(location) => location.is_writable(),
            AnyLocation::Remote(location) => location.is_writable(),
        }
    }

    fn identity_key(&self) -> String {
        match self {
            AnyLocation::Local(location) => location.identity_key(),
            AnyLocation::Remote(location) => location.identity_key(),
        }
    }

    fn is_remote(&self) -> bool {
        matches!(self, AnyLocation::Remote(_))
    }

    fn name(&self) -> String {
        match self {
            AnyLocation::Local(location) => location.name(),
            AnyLocation::Remote(location) => location.name(),
        }
    }
}

impl fmt::Display for AnyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
