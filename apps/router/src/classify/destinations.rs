use std::collections::HashMap;

use tracing::warn;

use crate::classify::role::Role;
use crate::classify::table::RoutingTable;

/// Role → course page URL, templated from the static base URL.
#[derive(Debug, Clone)]
pub struct Destinations {
    base_url: String,
    urls: HashMap<Role, String>,
}

impl Destinations {
    pub fn new(base_url: &str, table: &RoutingTable) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let urls = table
            .profiles()
            .iter()
            .map(|p| (p.role, format!("{base_url}/{}", p.page)))
            .collect();
        Self { base_url, urls }
    }

    #[cfg(test)]
    pub fn from_parts(base_url: &str, urls: HashMap<Role, String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            urls,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Falls back to the base URL when `role` has no page; that is a configuration
    /// defect, so it is logged rather than surfaced to the caller.
    pub fn url_for(&self, role: Role) -> &str {
        match self.urls.get(&role) {
            Some(url) => url,
            None => {
                warn!(%role, "no destination configured for role, using base url");
                &self.base_url
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_templated_from_base() {
        let table = RoutingTable::embedded().unwrap();
        let destinations = Destinations::new("https://courses.example.com/", &table);
        assert_eq!(destinations.base_url(), "https://courses.example.com");
        assert_eq!(
            destinations.url_for(Role::PcbDesigner),
            "https://courses.example.com/pcb-designer.html"
        );
        assert_eq!(
            destinations.url_for(Role::ProductArchitect),
            "https://courses.example.com/product-architect.html"
        );
    }

    #[test]
    fn test_every_role_has_a_destination() {
        let table = RoutingTable::embedded().unwrap();
        let destinations = Destinations::new("https://b", &table);
        for role in Role::ALL {
            assert_ne!(destinations.url_for(role), "https://b", "{role}");
        }
    }

    #[test]
    fn test_missing_destination_falls_back_to_base() {
        let mut urls = HashMap::new();
        urls.insert(Role::MechDesigner, "https://b/mech.html".to_string());
        let destinations = Destinations::from_parts("https://b", urls);
        assert_eq!(destinations.url_for(Role::MechDesigner), "https://b/mech.html");
        assert_eq!(destinations.url_for(Role::DomainExpert), "https://b");
    }
}
