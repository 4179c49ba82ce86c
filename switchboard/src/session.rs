use crate::command::{Command, CommandError, Mutation};
use crate::config::Config;
use crate::network::{Network, NetworkError};
use crate::phone::PhoneAddress;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Text to show the operator. Empty when there is nothing to say.
    Continue(String),
    Quit,
}

/// One operator session. Owns the current network and swaps it out
/// wholesale on `network-load`.
pub struct Session {
    network: Network,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            network: Network::new(config.routing),
            config,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one line of operator input. Failures are reported in the
    /// returned text; nothing here ends the session except `quit`.
    pub fn execute(&mut self, line: &str) -> Outcome {
        let command = match Command::from_str(line) {
            Ok(command) => command,
            Err(CommandError::Empty) => return Outcome::Continue(String::new()),
            Err(e) => {
                warn!(line = line.trim(), "invalid command: {e}");
                return Outcome::Continue(format!("Invalid command: {e}"));
            }
        };

        let output = match command {
            Command::Quit => return Outcome::Quit,
            Command::Mutate(mutation) => self.mutate(mutation),
            Command::StartCall(src, dst) => self.start_call(src, dst),
            Command::EndCall(address) => self.end_call(address),
            Command::Save(path) => self.save(&path),
            Command::Load(path) => self.load(&path),
            Command::Display => self.network.display(),
        };
        Outcome::Continue(output)
    }

    fn mutate(&mut self, mutation: Mutation) -> String {
        let done = match &mutation {
            Mutation::AddSwitchboard(a) => format!("Switchboard {a} added."),
            Mutation::ConnectSwitchboards(a, b) => {
                format!("Switchboards {a} and {b} connected.")
            }
            Mutation::AddPhone(phone) => format!("Phone {phone} added."),
        };
        match self.network.apply(mutation) {
            Ok(()) => done,
            Err(e) => capitalize(&e.to_string()),
        }
    }

    /// A caller already in a call is hung up first, and the notice is
    /// reported whether or not the new call then goes through.
    fn start_call(&mut self, src: PhoneAddress, dst: PhoneAddress) -> String {
        let mut lines = Vec::new();
        let in_call = self
            .network
            .find_phone(src)
            .map(|phone| phone.is_in_call())
            .unwrap_or(false);
        if in_call && src != dst {
            lines.push("Disconnecting current call to make new call".to_string());
            if let Err(e) = self.network.end_call(src) {
                lines.push(capitalize(&e.to_string()));
                return lines.join("\n");
            }
        }

        let result = match self.network.start_call(src, dst) {
            Ok(_) => format!("{src} and {dst} are now connected."),
            Err(NetworkError::NotFound(_)) => {
                format!("{src} and {dst} were not connected.")
            }
            Err(e) => capitalize(&e.to_string()),
        };
        lines.push(result);
        lines.join("\n")
    }

    fn end_call(&mut self, address: PhoneAddress) -> String {
        match self.network.end_call(address) {
            Ok(peer) => format!(
                "Hanging up...\nConnection Terminated.\nDisconnected ({address}) and ({peer})"
            ),
            Err(e) => capitalize(&e.to_string()),
        }
    }

    fn save(&self, path: &Path) -> String {
        match self.network.save(path) {
            Ok(_) => format!("Network saved to {}.", path.display()),
            Err(e) => format!("Could not save network to {}: {e}", path.display()),
        }
    }

    fn load(&mut self, path: &Path) -> String {
        match Network::load(path, self.config.routing) {
            Ok((network, report)) => {
                self.network = network;
                info!(path = %path.display(), "current network replaced");
                match report.skipped.len() {
                    0 => format!("Network loaded from {}.", path.display()),
                    n => format!(
                        "Network loaded from {} ({n} lines skipped).",
                        path.display()
                    ),
                }
            }
            Err(e) => format!("Could not load network from {}: {e}", path.display()),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
