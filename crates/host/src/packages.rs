use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PackageId(pub u32);

/// Interned behavior packages, resolvable by symbolic name. Registration
/// is idempotent per name.
#[derive(Debug, Default)]
pub struct PackageRegistry {
    packages: Vec<(PackageId, String)>,
    next: u32,
}

impl PackageRegistry {
    pub fn register(&mut self, name: &str) -> PackageId {
        if let Some(existing) = self.package_id_by_name(name) {
            return existing;
        }
        let id = PackageId(self.next);
        self.next = self.next.saturating_add(1);
        self.packages.push((id, name.to_string()));
        id
    }

    pub fn package_id_by_name(&self, name: &str) -> Option<PackageId> {
        self.packages
            .iter()
            .find(|(_, entry)| entry == name)
            .map(|(id, _)| *id)
    }

    pub fn package_name(&self, id: PackageId) -> Option<&str> {
        self.packages
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, name)| name.as_str())
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent_per_name() {
        let mut registry = PackageRegistry::default();
        let first = registry.register("PlayerDialoguePackage");
        let second = registry.register("PlayerDialoguePackage");
        assert_eq!(first, second);
        assert_eq!(registry.package_count(), 1);
    }

    #[test]
    fn lookup_by_name_round_trips() {
        let mut registry = PackageRegistry::default();
        let id = registry.register("NpcDialoguePackage");
        assert_eq!(registry.package_id_by_name("NpcDialoguePackage"), Some(id));
        assert_eq!(registry.package_name(id), Some("NpcDialoguePackage"));
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let registry = PackageRegistry::default();
        assert_eq!(registry.package_id_by_name("Missing"), None);
        assert_eq!(registry.package_name(PackageId(7)), None);
    }
}
