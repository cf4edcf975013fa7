//! Rotate Location Layer
//!
//! Implements the [`Location`](rotate_domain::Location) trait for local
//! directories and directories on SSH hosts.
//!
//! # Architecture
//!
//! - `std::fs` for local inspection and listing
//! - External `find`, `test`, `ssh` and `sudo` processes where the
//!   filesystem cannot be reached directly
//! - The removal command is chosen by the caller; the location only decides
//!   how to execute it
//!
//! # Examples
//!
//! ```no_run
//! use rotate_domain::Location;
//! use rotate_location::{AnyLocation, LocationOptions};
//!
//! let location = AnyLocation::parse("/srv/backups", &LocationOptions::default()).unwrap();
//! let entries = location.list().unwrap();
//! ```

#![warn(missing_docs)]

mod any;
pub mod command;
mod error;
mod local;
mod remote;

pub use any::{AnyLocation, LocationOptions};
pub use error::LocationError;
pub use local::LocalLocation;
pub use remote::RemoteLocation;
