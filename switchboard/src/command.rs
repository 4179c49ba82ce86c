//! # Commands
//!
//! Text commands accepted from the operator, and the narrower set of
//! network mutations that is recorded and replayed from a saved log.
//!
//! Interactive phone arguments are hyphen-joined (`phone-add 100-5555`);
//! the persisted form splits them into tokens (`phone-add 100 5555`).

use crate::phone::{AreaCode, PhoneAddress, PhoneNumber};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use strum_macros;
use strum_macros::EnumString;
use thiserror::Error;

#[derive(strum_macros::Display, EnumString, Debug, PartialEq, Eq, Clone, Copy)]
#[strum(ascii_case_insensitive)]
pub enum Keyword {
    #[strum(to_string = "switch-add", serialize = "add-switchboard")]
    SwitchAdd,
    #[strum(to_string = "switch-connect", serialize = "connect-switchboards")]
    SwitchConnect,
    #[strum(to_string = "phone-add", serialize = "add-phone")]
    PhoneAdd,
    #[strum(serialize = "start-call")]
    StartCall,
    #[strum(serialize = "end-call")]
    EndCall,
    #[strum(serialize = "network-save")]
    NetworkSave,
    #[strum(serialize = "network-load")]
    NetworkLoad,
    #[strum(serialize = "display")]
    Display,
    #[strum(serialize = "quit")]
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command {0}")]
    UnknownCommand(String),

    #[error("malformed {0} command")]
    MalformedCommand(Keyword),
}

/// A change to the network topology. These are the only commands that are
/// recorded and written out by `network-save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddSwitchboard(AreaCode),
    ConnectSwitchboards(AreaCode, AreaCode),
    AddPhone(PhoneAddress),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mutate(Mutation),
    StartCall(PhoneAddress, PhoneAddress),
    EndCall(PhoneAddress),
    Save(PathBuf),
    Load(PathBuf),
    Display,
    Quit,
}

fn split(s: &str) -> Result<(Keyword, Vec<&str>), CommandError> {
    let mut tokens = s.split_whitespace();
    let first = tokens.next().ok_or(CommandError::Empty)?;
    let keyword = Keyword::from_str(first)
        .map_err(|_| CommandError::UnknownCommand(first.to_string()))?;
    Ok((keyword, tokens.collect()))
}

fn area(keyword: Keyword, token: &str) -> Result<AreaCode, CommandError> {
    token
        .parse::<AreaCode>()
        .map_err(|_| CommandError::MalformedCommand(keyword))
}

fn number(keyword: Keyword, token: &str) -> Result<PhoneNumber, CommandError> {
    token
        .parse::<PhoneNumber>()
        .map_err(|_| CommandError::MalformedCommand(keyword))
}

fn address(keyword: Keyword, token: &str) -> Result<PhoneAddress, CommandError> {
    PhoneAddress::from_str(token).map_err(|_| CommandError::MalformedCommand(keyword))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (keyword, args) = split(s)?;
        let command = match (keyword, args.as_slice()) {
            (Keyword::SwitchAdd, [a]) => {
                Command::Mutate(Mutation::AddSwitchboard(area(keyword, a)?))
            }
            (Keyword::SwitchConnect, [a, b]) => Command::Mutate(
                Mutation::ConnectSwitchboards(area(keyword, a)?, area(keyword, b)?),
            ),
            (Keyword::PhoneAdd, [phone]) => {
                Command::Mutate(Mutation::AddPhone(address(keyword, phone)?))
            }
            (Keyword::StartCall, [src, dst]) => {
                Command::StartCall(address(keyword, src)?, address(keyword, dst)?)
            }
            (Keyword::EndCall, [phone]) => Command::EndCall(address(keyword, phone)?),
            (Keyword::NetworkSave, [path]) => Command::Save(PathBuf::from(path)),
            (Keyword::NetworkLoad, [path]) => Command::Load(PathBuf::from(path)),
            // trailing tokens after display are ignored
            (Keyword::Display, _) => Command::Display,
            (Keyword::Quit, []) => Command::Quit,
            _ => return Err(CommandError::MalformedCommand(keyword)),
        };
        Ok(command)
    }
}

/// Parses a line of a saved command log.
impl FromStr for Mutation {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (keyword, args) = split(s)?;
        let mutation = match (keyword, args.as_slice()) {
            (Keyword::SwitchAdd, [a]) => Mutation::AddSwitchboard(area(keyword, a)?),
            (Keyword::SwitchConnect, [a, b]) => {
                Mutation::ConnectSwitchboards(area(keyword, a)?, area(keyword, b)?)
            }
            (Keyword::PhoneAdd, [a, n]) => Mutation::AddPhone(PhoneAddress::new(
                area(keyword, a)?,
                number(keyword, n)?,
            )),
            (Keyword::SwitchAdd | Keyword::SwitchConnect | Keyword::PhoneAdd, _) => {
                return Err(CommandError::MalformedCommand(keyword))
            }
            (other, _) => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(mutation)
    }
}

/// Writes the persisted form.
impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mutation::AddSwitchboard(a) => write!(f, "{} {a}", Keyword::SwitchAdd),
            Mutation::ConnectSwitchboards(a, b) => {
                write!(f, "{} {a} {b}", Keyword::SwitchConnect)
            }
            Mutation::AddPhone(phone) => write!(
                f,
                "{} {} {}",
                Keyword::PhoneAdd,
                phone.area_code,
                phone.number
            ),
        }
    }
}
