use crate::messages::SessionEntityIdentifier;
use std::collections::HashMap;

/// One-to-one mapping between role names and the entities filling them.
///
/// Both directions are updated by the same call; inserting a pair first drops
/// any mapping either side previously held.
#[derive(Debug, Default)]
pub struct RoleIndex {
    by_role: HashMap<String, SessionEntityIdentifier>,
    by_entity: HashMap<SessionEntityIdentifier, String>,
}

impl RoleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `role` to `entity`. Returns the entity displaced from the role, if any.
    pub fn insert(
        &mut self,
        role: &str,
        entity: SessionEntityIdentifier,
    ) -> Option<SessionEntityIdentifier> {
        if let Some(old_role) = self.by_entity.remove(&entity) {
            self.by_role.remove(&old_role);
        }
        let displaced = self.by_role.insert(role.to_string(), entity);
        if let Some(displaced) = displaced.filter(|displaced| *displaced != entity) {
            self.by_entity.remove(&displaced);
        }
        self.by_entity.insert(entity, role.to_string());
        displaced.filter(|displaced| *displaced != entity)
    }

    pub fn remove_entity(&mut self, entity: &SessionEntityIdentifier) -> Option<String> {
        let role = self.by_entity.remove(entity)?;
        self.by_role.remove(&role);
        Some(role)
    }

    pub fn remove_role(&mut self, role: &str) -> Option<SessionEntityIdentifier> {
        let entity = self.by_role.remove(role)?;
        self.by_entity.remove(&entity);
        Some(entity)
    }

    pub fn entity(&self, role: &str) -> Option<SessionEntityIdentifier> {
        self.by_role.get(role).copied()
    }

    pub fn role(&self, entity: &SessionEntityIdentifier) -> Option<&str> {
        self.by_entity.get(entity).map(String::as_str)
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, &SessionEntityIdentifier)> {
        self.by_role.iter().map(|(role, entity)| (role.as_str(), entity))
    }

    pub fn len(&self) -> usize {
        self.by_role.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_role.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_role.clear();
        self.by_entity.clear();
    }

    /// Both directions describe the same set of pairs.
    pub fn is_consistent(&self) -> bool {
        self.by_role.len() == self.by_entity.len()
            && self
                .by_role
                .iter()
                .all(|(role, entity)| self.by_entity.get(entity) == Some(role))
    }
}
