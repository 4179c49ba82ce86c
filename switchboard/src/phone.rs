use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

pub type AreaCode = u32;
pub type PhoneNumber = u64;

const HYPHEN: char = '-';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("invalid phone address")]
    InvalidAddress,
}

/// Full number of a phone: the area code of its switchboard plus the local
/// number. Written as `<area>-<number>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhoneAddress {
    pub area_code: AreaCode,
    pub number: PhoneNumber,
}

impl PhoneAddress {
    pub fn new(area_code: AreaCode, number: PhoneNumber) -> Self {
        Self { area_code, number }
    }
}

impl FromStr for PhoneAddress {
    type Err = PhoneError;

    // everything after the first hyphen is the local number, so
    // `100-555-1234` reads as area 100, number 5551234
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (area, rest) = s.split_once(HYPHEN).ok_or(PhoneError::InvalidAddress)?;
        let number: String = rest.split(HYPHEN).collect();
        if area.is_empty() || number.is_empty() {
            return Err(PhoneError::InvalidAddress);
        }
        let area_code = area
            .parse::<AreaCode>()
            .map_err(|_| PhoneError::InvalidAddress)?;
        let number = number
            .parse::<PhoneNumber>()
            .map_err(|_| PhoneError::InvalidAddress)?;
        Ok(Self { area_code, number })
    }
}

impl Display for PhoneAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.area_code, self.number)
    }
}

/// One side of an active call. `switchboard` is the switchboard the call is
/// routed through, which is where `peer` lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub switchboard: AreaCode,
    pub peer: PhoneNumber,
}

impl Call {
    pub fn peer_address(&self) -> PhoneAddress {
        PhoneAddress::new(self.switchboard, self.peer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    number: PhoneNumber,
    area_code: AreaCode,
    call: Option<Call>,
}

impl Phone {
    pub fn new(number: PhoneNumber, area_code: AreaCode) -> Self {
        Self {
            number,
            area_code,
            call: None,
        }
    }

    pub fn number(&self) -> PhoneNumber {
        self.number
    }

    /// Area code of the owning switchboard.
    pub fn area_code(&self) -> AreaCode {
        self.area_code
    }

    pub fn address(&self) -> PhoneAddress {
        PhoneAddress::new(self.area_code, self.number)
    }

    pub fn call(&self) -> Option<&Call> {
        self.call.as_ref()
    }

    pub fn is_in_call(&self) -> bool {
        self.call.is_some()
    }

    pub(crate) fn attach(&mut self, call: Call) {
        self.call = Some(call);
    }

    pub(crate) fn detach(&mut self) -> Option<Call> {
        self.call.take()
    }

    pub fn describe(&self) -> String {
        match &self.call {
            None => format!("Phone with number: {} is not in use.", self.number),
            Some(call) => format!(
                "Phone with number: {} is connected to {}",
                self.number,
                call.peer_address()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_from_string() {
        let address = PhoneAddress::from_str("100-5555").unwrap();
        assert_eq!(PhoneAddress::new(100, 5555), address);
        assert_eq!("100-5555", address.to_string());

        let address = PhoneAddress::from_str("443-555-1234").unwrap();
        assert_eq!(PhoneAddress::new(443, 5551234), address);
    }

    #[test]
    fn invalid_address() {
        for s in ["100", "100-", "-5555", "abc-5555", "100-55x5", ""] {
            assert_eq!(
                Err(PhoneError::InvalidAddress),
                PhoneAddress::from_str(s),
                "{s}"
            );
        }
    }

    #[test]
    fn describe_idle_and_connected() {
        let mut phone = Phone::new(5555, 100);
        assert_eq!(PhoneAddress::new(100, 5555), phone.address());
        assert_eq!("Phone with number: 5555 is not in use.", phone.describe());

        phone.attach(Call {
            switchboard: 200,
            peer: 7777,
        });
        assert!(phone.is_in_call());
        assert_eq!(
            "Phone with number: 5555 is connected to 200-7777",
            phone.describe()
        );

        let call = phone.detach().unwrap();
        assert_eq!(PhoneAddress::new(200, 7777), call.peer_address());
        assert!(!phone.is_in_call());
    }
}
