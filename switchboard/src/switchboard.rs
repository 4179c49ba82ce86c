use crate::phone::{AreaCode, Phone, PhoneAddress, PhoneNumber};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::collections::HashSet;
use strum_macros;
use strum_macros::EnumString;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwitchboardError {
    #[error("phone number already exists")]
    DuplicatePhone,

    #[error("trunk line already exists")]
    DuplicateTrunk,

    #[error("no route to phone")]
    NotFound,
}

/// How `route_to_phone` walks the trunk lines.
#[derive(
    strum_macros::Display,
    EnumString,
    Deserialize,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RouteStrategy {
    /// Only the first unvisited trunk line is followed at every hop. A miss
    /// down that line is final even if another line leads to the target.
    #[default]
    FirstTrunk,
    /// Every unvisited trunk line is tried until one reaches the target.
    Exhaustive,
}

#[derive(Debug, Clone)]
pub struct Switchboard {
    area_code: AreaCode,
    phones: IndexMap<PhoneNumber, Phone>,
    trunk_lines: IndexSet<AreaCode>,
}

impl Switchboard {
    pub fn new(area_code: AreaCode) -> Self {
        Self {
            area_code,
            phones: IndexMap::new(),
            trunk_lines: IndexSet::new(),
        }
    }

    pub fn area_code(&self) -> AreaCode {
        self.area_code
    }

    pub fn has_phone(&self, number: PhoneNumber) -> bool {
        self.phones.contains_key(&number)
    }

    pub fn has_trunk_to(&self, other: AreaCode) -> bool {
        self.trunk_lines.contains(&other)
    }

    pub fn add_phone(
        &mut self,
        number: PhoneNumber,
    ) -> Result<&Phone, SwitchboardError> {
        if self.has_phone(number) {
            return Err(SwitchboardError::DuplicatePhone);
        }
        let phone = self
            .phones
            .entry(number)
            .or_insert_with(|| Phone::new(number, self.area_code));
        Ok(phone)
    }

    /// Adds `other` to this switchboard's trunk lines only. The reverse link
    /// is the caller's job, see `Network::connect_switchboards`.
    pub fn add_trunk_line(&mut self, other: AreaCode) -> Result<(), SwitchboardError> {
        if !self.trunk_lines.insert(other) {
            return Err(SwitchboardError::DuplicateTrunk);
        }
        Ok(())
    }

    pub fn find_phone(&self, number: PhoneNumber) -> Option<&Phone> {
        self.phones.get(&number)
    }

    pub(crate) fn find_phone_mut(&mut self, number: PhoneNumber) -> Option<&mut Phone> {
        self.phones.get_mut(&number)
    }

    /// Phones in the order they were added.
    pub fn phones(&self) -> impl Iterator<Item = &Phone> + '_ {
        self.phones.values()
    }

    pub fn phone_count(&self) -> usize {
        self.phones.len()
    }

    /// Trunk-line neighbors in the order they were linked.
    pub fn trunk_lines(&self) -> impl Iterator<Item = AreaCode> + '_ {
        self.trunk_lines.iter().copied()
    }

    /// Depth-first search for the switchboard hosting `target`, starting here.
    ///
    /// `visited` collects every area code the search entered; an area code in
    /// it is never entered again, so the search ends after at most one visit
    /// per switchboard even on cyclic trunk graphs. Returns the area code of
    /// the switchboard that hosts the target phone.
    pub fn route_to_phone(
        &self,
        switchboards: &IndexMap<AreaCode, Switchboard>,
        target: PhoneAddress,
        visited: &mut HashSet<AreaCode>,
        strategy: RouteStrategy,
    ) -> Result<AreaCode, SwitchboardError> {
        visited.insert(self.area_code);

        if self.area_code == target.area_code {
            if self.has_phone(target.number) {
                return Ok(self.area_code);
            }
            return Err(SwitchboardError::NotFound);
        }

        for neighbor in self.trunk_lines.iter() {
            if visited.contains(neighbor) {
                continue;
            }
            let Some(next) = switchboards.get(neighbor) else {
                continue;
            };
            debug!(
                from = self.area_code,
                to = *neighbor,
                dst = %target,
                "probe trunk line"
            );
            let result = next.route_to_phone(switchboards, target, visited, strategy);
            match strategy {
                RouteStrategy::FirstTrunk => return result,
                RouteStrategy::Exhaustive => {
                    if result.is_ok() {
                        return result;
                    }
                }
            }
        }

        Err(SwitchboardError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn graph(
        codes: &[AreaCode],
        links: &[(AreaCode, AreaCode)],
    ) -> IndexMap<AreaCode, Switchboard> {
        let mut switchboards: IndexMap<AreaCode, Switchboard> = codes
            .iter()
            .map(|code| (*code, Switchboard::new(*code)))
            .collect();
        for (a, b) in links {
            switchboards.get_mut(a).unwrap().add_trunk_line(*b).unwrap();
            switchboards.get_mut(b).unwrap().add_trunk_line(*a).unwrap();
        }
        switchboards
    }

    fn route(
        switchboards: &IndexMap<AreaCode, Switchboard>,
        from: AreaCode,
        target: PhoneAddress,
        strategy: RouteStrategy,
    ) -> (Result<AreaCode, SwitchboardError>, HashSet<AreaCode>) {
        let mut visited = HashSet::new();
        let result = switchboards[&from].route_to_phone(
            switchboards,
            target,
            &mut visited,
            strategy,
        );
        (result, visited)
    }

    #[test]
    fn add_phone_twice() {
        let mut switchboard = Switchboard::new(100);
        assert_eq!(5555, switchboard.add_phone(5555).unwrap().number());
        assert_eq!(
            Err(SwitchboardError::DuplicatePhone),
            switchboard.add_phone(5555).map(|_| ())
        );
        assert_eq!(1, switchboard.phone_count());
        assert!(switchboard.has_phone(5555));
        assert_eq!(100, switchboard.find_phone(5555).unwrap().area_code());
        assert!(switchboard.find_phone(1234).is_none());
    }

    #[test]
    fn add_trunk_line_twice() {
        let mut switchboard = Switchboard::new(100);
        switchboard.add_trunk_line(200).unwrap();
        assert_eq!(
            Err(SwitchboardError::DuplicateTrunk),
            switchboard.add_trunk_line(200)
        );
        assert!(switchboard.has_trunk_to(200));
        assert!(!switchboard.has_trunk_to(300));
        assert_eq!(vec![200], switchboard.trunk_lines().collect::<Vec<_>>());
    }

    #[test]
    fn route_to_local_phone() {
        let mut switchboards = graph(&[100], &[]);
        switchboards.get_mut(&100).unwrap().add_phone(5555).unwrap();

        let target = PhoneAddress::from_str("100-5555").unwrap();
        let (result, _) = route(&switchboards, 100, target, RouteStrategy::FirstTrunk);
        assert_eq!(Ok(100), result);

        let target = PhoneAddress::from_str("100-1111").unwrap();
        let (result, _) = route(&switchboards, 100, target, RouteStrategy::FirstTrunk);
        assert_eq!(Err(SwitchboardError::NotFound), result);
    }

    #[test]
    fn route_across_chain() {
        let mut switchboards = graph(&[100, 200, 300], &[(100, 200), (200, 300)]);
        switchboards.get_mut(&300).unwrap().add_phone(7777).unwrap();

        let (result, visited) = route(
            &switchboards,
            100,
            PhoneAddress::new(300, 7777),
            RouteStrategy::FirstTrunk,
        );
        assert_eq!(Ok(300), result);
        assert_eq!(HashSet::from([100, 200, 300]), visited);
    }

    #[test]
    fn route_terminates_on_cycle() {
        let switchboards = graph(&[100, 200, 300], &[(100, 200), (200, 300), (300, 100)]);

        for strategy in [RouteStrategy::FirstTrunk, RouteStrategy::Exhaustive] {
            let (result, visited) =
                route(&switchboards, 100, PhoneAddress::new(400, 1), strategy);
            assert_eq!(Err(SwitchboardError::NotFound), result);
            assert_eq!(HashSet::from([100, 200, 300]), visited);
        }
    }

    #[test]
    fn first_trunk_does_not_backtrack() {
        // 100 links to 200 (dead end) before 300, which hosts the phone
        let mut switchboards = graph(&[100, 200, 300], &[(100, 200), (100, 300)]);
        switchboards.get_mut(&300).unwrap().add_phone(7777).unwrap();
        let target = PhoneAddress::new(300, 7777);

        let (result, visited) = route(&switchboards, 100, target, RouteStrategy::FirstTrunk);
        assert_eq!(Err(SwitchboardError::NotFound), result);
        assert!(!visited.contains(&300));

        let (result, _) = route(&switchboards, 100, target, RouteStrategy::Exhaustive);
        assert_eq!(Ok(300), result);
    }

    #[test]
    fn route_strategy_names() {
        assert_eq!("first-trunk", RouteStrategy::FirstTrunk.to_string());
        assert_eq!(
            RouteStrategy::Exhaustive,
            RouteStrategy::from_str("exhaustive").unwrap()
        );
        assert_eq!(RouteStrategy::FirstTrunk, RouteStrategy::default());
    }
}
