use crate::command::Mutation;
use crate::phone::{AreaCode, Call, Phone, PhoneAddress};
use crate::switchboard::{RouteStrategy, Switchboard, SwitchboardError};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

const INDENT_SWITCHBOARD: &str = "     ";
const INDENT_ENTRY: &str = "         ";

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("area code {0} already exists")]
    DuplicateAreaCode(AreaCode),

    #[error("area code {0} does not exist")]
    UnknownAreaCode(AreaCode),

    #[error("phone {0} does not exist")]
    UnknownPhone(PhoneAddress),

    #[error("no route to {0}")]
    NotFound(PhoneAddress),

    #[error("{0} is not in a call")]
    NotInCall(PhoneAddress),

    #[error("{0} can't call itself")]
    SelfCall(PhoneAddress),

    #[error("{0} is busy")]
    PhoneBusy(PhoneAddress),

    #[error(transparent)]
    Switchboard(#[from] SwitchboardError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result of a successful `start_call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSetup {
    /// Switchboard the call was routed to.
    pub switchboard: AreaCode,
    /// Peer of the call the caller was in before, which was hung up first.
    pub replaced: Option<PhoneAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_no: usize,
    pub text: String,
    pub reason: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub applied: usize,
    pub skipped: Vec<SkippedLine>,
}

/// The switchboard graph. Switchboards are keyed by area code and kept in
/// the order they were added; trunk lines and calls refer to other
/// switchboards and phones by key.
#[derive(Debug, Default, Clone)]
pub struct Network {
    switchboards: IndexMap<AreaCode, Switchboard>,
    history: Vec<Mutation>,
    strategy: RouteStrategy,
}

impl Network {
    pub fn new(strategy: RouteStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn strategy(&self) -> RouteStrategy {
        self.strategy
    }

    pub fn find_switchboard(&self, area_code: AreaCode) -> Option<&Switchboard> {
        self.switchboards.get(&area_code)
    }

    pub fn has_switchboard(&self, area_code: AreaCode) -> bool {
        self.switchboards.contains_key(&area_code)
    }

    pub fn switchboards(&self) -> impl Iterator<Item = &Switchboard> + '_ {
        self.switchboards.values()
    }

    /// Mutations applied through `apply` since this network was created or
    /// loaded.
    pub fn history(&self) -> &[Mutation] {
        &self.history
    }

    pub fn find_phone(&self, address: PhoneAddress) -> Result<&Phone, NetworkError> {
        self.find_switchboard(address.area_code)
            .ok_or(NetworkError::UnknownAreaCode(address.area_code))?
            .find_phone(address.number)
            .ok_or(NetworkError::UnknownPhone(address))
    }

    fn find_phone_mut(&mut self, address: PhoneAddress) -> Result<&mut Phone, NetworkError> {
        self.switchboards
            .get_mut(&address.area_code)
            .ok_or(NetworkError::UnknownAreaCode(address.area_code))?
            .find_phone_mut(address.number)
            .ok_or(NetworkError::UnknownPhone(address))
    }

    pub fn add_switchboard(&mut self, area_code: AreaCode) -> Result<(), NetworkError> {
        if self.has_switchboard(area_code) {
            return Err(NetworkError::DuplicateAreaCode(area_code));
        }
        self.switchboards
            .insert(area_code, Switchboard::new(area_code));
        info!(area_code, "switchboard added");
        Ok(())
    }

    /// Links both switchboards to each other. Either both trunk lines are
    /// added or neither is.
    pub fn connect_switchboards(
        &mut self,
        a: AreaCode,
        b: AreaCode,
    ) -> Result<(), NetworkError> {
        for area_code in [a, b] {
            if !self.has_switchboard(area_code) {
                return Err(NetworkError::UnknownAreaCode(area_code));
            }
        }
        let has_trunk = self
            .find_switchboard(a)
            .map(|s| s.has_trunk_to(b))
            .unwrap_or(false);
        if has_trunk {
            return Err(SwitchboardError::DuplicateTrunk.into());
        }

        for (from, to) in [(a, b), (b, a)] {
            if let Some(switchboard) = self.switchboards.get_mut(&from) {
                if !switchboard.has_trunk_to(to) {
                    switchboard.add_trunk_line(to)?;
                }
            }
        }
        info!(a, b, "trunk line connected");
        Ok(())
    }

    pub fn add_phone(&mut self, address: PhoneAddress) -> Result<(), NetworkError> {
        let switchboard = self
            .switchboards
            .get_mut(&address.area_code)
            .ok_or(NetworkError::UnknownAreaCode(address.area_code))?;
        switchboard.add_phone(address.number)?;
        info!(phone = %address, "phone added");
        Ok(())
    }

    fn execute(&mut self, mutation: &Mutation) -> Result<(), NetworkError> {
        match mutation {
            Mutation::AddSwitchboard(area_code) => self.add_switchboard(*area_code),
            Mutation::ConnectSwitchboards(a, b) => self.connect_switchboards(*a, *b),
            Mutation::AddPhone(address) => self.add_phone(*address),
        }
    }

    /// Executes a mutation and records it for `save` when it succeeds.
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), NetworkError> {
        self.execute(&mutation)?;
        self.history.push(mutation);
        Ok(())
    }

    /// Routes a call from `src` to `dst` and connects both phones.
    ///
    /// A caller that is already in a call hangs that call up before the new
    /// one is routed, so the old call stays down even if the new one fails.
    pub fn start_call(
        &mut self,
        src: PhoneAddress,
        dst: PhoneAddress,
    ) -> Result<CallSetup, NetworkError> {
        let caller = self.find_phone(src)?;
        if src == dst {
            return Err(NetworkError::SelfCall(src));
        }

        let replaced = if caller.is_in_call() {
            info!(phone = %src, "disconnecting current call to make new call");
            Some(self.end_call(src)?)
        } else {
            None
        };

        let origin = self
            .find_switchboard(src.area_code)
            .ok_or(NetworkError::UnknownAreaCode(src.area_code))?;
        let mut visited = HashSet::new();
        let via = origin
            .route_to_phone(&self.switchboards, dst, &mut visited, self.strategy)
            .map_err(|_| NetworkError::NotFound(dst))?;

        if self.find_phone(dst)?.is_in_call() {
            return Err(NetworkError::PhoneBusy(dst));
        }

        self.find_phone_mut(src)?.attach(Call {
            switchboard: via,
            peer: dst.number,
        });
        self.find_phone_mut(dst)?.attach(Call {
            switchboard: src.area_code,
            peer: src.number,
        });
        info!(src = %src, dst = %dst, hops = visited.len(), "call connected");

        Ok(CallSetup {
            switchboard: via,
            replaced,
        })
    }

    /// Hangs up the call `address` is in and returns the peer that was
    /// disconnected along with it.
    pub fn end_call(&mut self, address: PhoneAddress) -> Result<PhoneAddress, NetworkError> {
        let call = self
            .find_phone_mut(address)?
            .detach()
            .ok_or(NetworkError::NotInCall(address))?;
        let peer = call.peer_address();
        let back = self.find_phone_mut(peer)?.detach();
        debug_assert_eq!(Some(address), back.map(|c| c.peer_address()));
        info!(phone = %address, peer = %peer, "call disconnected");
        Ok(peer)
    }

    /// Appends the recorded mutations to `path`, one per line. Repeated saves
    /// to the same file accumulate.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize, NetworkError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for mutation in &self.history {
            writeln!(file, "{mutation}")?;
        }
        file.flush()?;
        info!(path = %path.display(), lines = self.history.len(), "network saved");
        Ok(self.history.len())
    }

    /// Builds a fresh network by replaying the command log at `path`.
    pub fn load(
        path: impl AsRef<Path>,
        strategy: RouteStrategy,
    ) -> Result<(Network, LoadReport), NetworkError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let (network, report) = Network::replay(&contents, strategy);
        info!(
            path = %path.display(),
            applied = report.applied,
            skipped = report.skipped.len(),
            "network loaded"
        );
        Ok((network, report))
    }

    /// Replays a command log. Lines that don't parse or can't be applied
    /// are skipped and listed in the report; blank lines are ignored.
    pub fn replay(log: &str, strategy: RouteStrategy) -> (Network, LoadReport) {
        let mut network = Network::new(strategy);
        let mut report = LoadReport::default();

        for (i, line) in log.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let result = Mutation::from_str(line)
                .map_err(|e| e.to_string())
                .and_then(|mutation| {
                    network.execute(&mutation).map_err(|e| e.to_string())
                });
            match result {
                Ok(()) => report.applied += 1,
                Err(reason) => {
                    warn!(line_no = i + 1, line, %reason, "skip replay line");
                    report.skipped.push(SkippedLine {
                        line_no: i + 1,
                        text: line.to_string(),
                        reason,
                    });
                }
            }
        }

        (network, report)
    }

    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for switchboard in self.switchboards.values() {
            writeln!(f, "Switchboard with area code: {}", switchboard.area_code())?;
            writeln!(f, "{INDENT_SWITCHBOARD}Trunk lines are:")?;
            for trunk in switchboard.trunk_lines() {
                writeln!(f, "{INDENT_ENTRY}Trunkline connection to: {trunk}")?;
            }
            writeln!(f, "{INDENT_SWITCHBOARD}Local phone numbers are:")?;
            for phone in switchboard.phones() {
                writeln!(f, "{INDENT_ENTRY}{}", phone.describe())?;
            }
        }
        Ok(())
    }
}
