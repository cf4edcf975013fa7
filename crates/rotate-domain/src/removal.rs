//! Removal commands and I/O scheduling hints

use serde::{Deserialize, Serialize};
use std::fmt;

/// Command used to remove a backup when no custom command is configured
pub const DEFAULT_REMOVAL_COMMAND: [&str; 2] = ["rm", "-Rf"];

/// I/O scheduling class passed to `ionice --class`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IoSchedulingClass {
    /// Only gets disk time when no other program asks for it
    Idle,

    /// Default scheduler class
    BestEffort,

    /// Gets first access to the disk
    Realtime,
}

impl IoSchedulingClass {
    /// Class name as understood by `ionice`
    pub fn as_str(&self) -> &'static str {
        match self {
            IoSchedulingClass::Idle => "idle",
            IoSchedulingClass::BestEffort => "best-effort",
            IoSchedulingClass::Realtime => "realtime",
        }
    }

    /// Parse a class name or the numeric form accepted by `ionice`
    /// (1 = realtime, 2 = best-effort, 3 = idle)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "idle" | "3" => Some(IoSchedulingClass::Idle),
            "best-effort" | "2" => Some(IoSchedulingClass::BestEffort),
            "realtime" | "1" => Some(IoSchedulingClass::Realtime),
            _ => None,
        }
    }
}

impl fmt::Display for IoSchedulingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IoSchedulingClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Invalid I/O scheduling class: {} (expected idle, best-effort or realtime)",
                s
            )
        })
    }
}

/// Template of the command that removes one backup
///
/// The entry path is appended as the last argument.
///
/// # Examples
///
/// ```
/// use rotate_domain::{IoSchedulingClass, RemovalCommand};
///
/// let command = RemovalCommand::default().with_io_scheduling_class(Some(IoSchedulingClass::Idle));
/// assert_eq!(
///     command.command_line("/b/2014-06-30"),
///     vec!["ionice", "--class", "idle", "rm", "-Rf", "/b/2014-06-30"]
/// );
/// assert!(!command.is_custom());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalCommand {
    template: Vec<String>,
    io_scheduling_class: Option<IoSchedulingClass>,
}

impl Default for RemovalCommand {
    fn default() -> Self {
        Self {
            template: DEFAULT_REMOVAL_COMMAND.iter().map(|s| s.to_string()).collect(),
            io_scheduling_class: None,
        }
    }
}

impl RemovalCommand {
    /// Create a removal command from a program and its leading arguments
    pub fn new(template: Vec<String>) -> Result<Self, String> {
        if template.is_empty() || template[0].trim().is_empty() {
            return Err("Removal command must name a program".to_string());
        }
        Ok(Self {
            template,
            io_scheduling_class: None,
        })
    }

    /// Wrap the command with `ionice` when a class is given
    pub fn with_io_scheduling_class(mut self, class: Option<IoSchedulingClass>) -> Self {
        self.io_scheduling_class = class;
        self
    }

    /// Whether the template differs from [`DEFAULT_REMOVAL_COMMAND`]
    ///
    /// Custom commands carry their own semantics, so the planner skips the
    /// writability check for them.
    pub fn is_custom(&self) -> bool {
        self.template.len() != DEFAULT_REMOVAL_COMMAND.len()
            || self
                .template
                .iter()
                .zip(DEFAULT_REMOVAL_COMMAND)
                .any(|(actual, default)| actual != default)
    }

    /// Full argument vector removing `entry`
    pub fn command_line(&self, entry: &str) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.template.len() + 4);
        if let Some(class) = self.io_scheduling_class {
            argv.push("ionice".to_string());
            argv.push("--class".to_string());
            argv.push(class.as_str().to_string());
        }
        argv.extend(self.template.iter().cloned());
        argv.push(entry.to_string());
        argv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_io_scheduling_class() {
        assert_eq!("idle".parse(), Ok(IoSchedulingClass::Idle));
        assert_eq!("Best-Effort".parse(), Ok(IoSchedulingClass::BestEffort));
        assert_eq!("3".parse(), Ok(IoSchedulingClass::Idle));
        assert_eq!("1".parse(), Ok(IoSchedulingClass::Realtime));
        assert!("unsupported-class".parse::<IoSchedulingClass>().is_err());
    }

    #[test]
    fn test_default_command_line() {
        let command = RemovalCommand::default();
        assert_eq!(command.command_line("/b/x"), vec!["rm", "-Rf", "/b/x"]);
        assert!(!command.is_custom());
    }

    #[test]
    fn test_custom_command() {
        let command = RemovalCommand::new(vec!["rmdir".to_string()]).unwrap();
        assert!(command.is_custom());
        assert_eq!(command.command_line("/b/x"), vec!["rmdir", "/b/x"]);

        let same_as_default =
            RemovalCommand::new(vec!["rm".to_string(), "-Rf".to_string()]).unwrap();
        assert!(!same_as_default.is_custom());
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(RemovalCommand::new(Vec::new()).is_err());
        assert!(RemovalCommand::new(vec![" ".to_string()]).is_err());
    }
}
