//! Backup directories on SSH hosts

use rotate_domain::{Location, RemovalCommand};

use crate::command::{elevate, find_command, quote_command, run, split_nul, succeeds};
use crate::LocationError;

/// A directory on another host, reached through the `ssh` client
///
/// Every operation runs one `ssh` invocation in batch mode, so host keys and
/// credentials must already be set up (agent, `~/.ssh/config`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocation {
    host: String,
    user: Option<String>,
    directory: String,
    recursive: bool,
    sudo: bool,
}

impl RemoteLocation {
    /// Create a location for `directory` on `host`
    ///
    /// `host` may be anything `ssh` accepts, including `user@host` and
    /// aliases from `~/.ssh/config`.
    pub fn new(host: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: None,
            directory: directory.into(),
            recursive: false,
            sudo: false,
        }
    }

    /// Log in as `user` (`ssh -l`)
    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    /// List regular files at any depth instead of direct children
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Run remote commands through `sudo`
    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    /// SSH host (or alias)
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Login user, if overridden
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Backup directory on the remote host
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Local argument vector running `argv` on the remote host
    pub fn ssh_command(&self, argv: Vec<String>) -> Vec<String> {
        let mut ssh = vec!["ssh".to_string(), "-o".to_string(), "BatchMode=yes".to_string()];
        if let Some(user) = &self.user {
            ssh.push("-l".to_string());
            ssh.push(user.clone());
        }
        ssh.push(self.host.clone());
        ssh.push("--".to_string());
        ssh.push(quote_command(&elevate(argv, self.sudo)));
        ssh
    }

    fn test(&self, flag: &str) -> bool {
        succeeds(&self.ssh_command(vec![
            "test".to_string(),
            flag.to_string(),
            self.directory.clone(),
        ]))
    }
}

impl Location for RemoteLocation {
    type Error = LocationError;

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        let output = run(&self.ssh_command(find_command(&self.directory, self.recursive)))?;
        let mut entries = split_nul(&output.stdout);
        entries.sort();
        Ok(entries)
    }

    fn remove(&self, entry: &str, command: &RemovalCommand) -> Result<(), Self::Error> {
        run(&self.ssh_command(command.command_line(entry)))?;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.test("-d")
    }

    fn is_readable(&self) -> bool {
        self.test("-r")
    }

    fn is_writable(&self) -> bool {
        self.test("-w")
    }

    fn identity_key(&self) -> String {
        let host = self
            .host
            .rsplit_once('@')
            .map_or(self.host.as_str(), |(_, host)| host);
        format!("ssh:{}", host)
    }

    fn is_remote(&self) -> bool {
        true
    }

    fn name(&self) -> String {
        format!("{}:{}", self.host, self.directory)
    }
}
