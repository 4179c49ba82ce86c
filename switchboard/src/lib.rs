//! # Switchboard
//!
//! A simulated phone network: switchboards identified by area code, joined
//! by trunk lines, each hosting local phones that can call each other
//! across the switchboard graph.
//!
//! ## Modules
//!
//! - **phone**: phone numbers, addresses and per-phone call state
//! - **switchboard**: local phones, trunk lines and call routing
//! - **network**: the switchboard graph, calls, and the replayable command log
//! - **command**: operator commands and the persisted log format
//! - **session**: the interactive context that owns the current network
//! - **config**: TOML configuration
//!
//! ## Usage
//!
//! ```rust
//! use phonenet_switchboard::config::Config;
//! use phonenet_switchboard::session::{Outcome, Session};
//!
//! let mut session = Session::new(Config::default());
//! session.execute("switch-add 100");
//! session.execute("phone-add 100-5555");
//! session.execute("phone-add 100-7777");
//! assert_eq!(
//!     Outcome::Continue("100-5555 and 100-7777 are now connected.".to_string()),
//!     session.execute("start-call 100-5555 100-7777"),
//! );
//! ```

pub mod command;
pub mod config;
pub mod network;
pub mod phone;
pub mod session;
pub mod switchboard;
