use std::collections::HashMap;

use crate::{ids::MemberId, member::Member};

/// All registered members, keyed by member ID
#[derive(Debug, Clone, Default)]
pub struct Roster {
    /// Members by ID
    members: HashMap<MemberId, Member>,
}

impl Roster {
    /// Create an empty roster
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member, replacing any existing member with the same ID
    pub fn add_member(&mut self, member: Member) -> Option<Member> {
        self.members.insert(member.id(), member)
    }

    /// Look up a member by ID
    #[must_use]
    pub fn find(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    /// Mutable lookup for the circulation engine
    pub(crate) fn find_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.members.get_mut(&id)
    }

    /// Whether a member with this ID is registered
    #[must_use]
    pub fn contains(&self, id: MemberId) -> bool {
        self.members.contains_key(&id)
    }

    /// All members, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Number of registered members
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no members are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find() {
        let mut roster = Roster::new();
        assert!(roster.is_empty());
        assert!(roster.add_member(Member::new("John Doe", "555-1234", MemberId::new(1))).is_none());
        assert!(!roster.is_empty());
        assert!(roster.contains(MemberId::new(1)));

        assert_eq!(roster.find(MemberId::new(1)).map(Member::name), Some("John Doe"));
        assert!(roster.find(MemberId::new(2)).is_none());
    }

    #[test]
    fn test_add_member_overwrites_same_id() {
        let mut roster = Roster::new();
        roster.add_member(Member::new("John Doe", "555-1234", MemberId::new(1)));
        let replaced = roster.add_member(Member::new("Johnny Doe", "555-0000", MemberId::new(1)));

        assert_eq!(replaced.map(|m| m.name().to_string()), Some("John Doe".to_string()));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.find(MemberId::new(1)).map(Member::contact), Some("555-0000"));
    }
}
