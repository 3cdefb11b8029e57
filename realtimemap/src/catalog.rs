//! Static reference data: organizations, geofences and which organization
//! watches which geofence.
//!
//! The catalog is loaded once at startup and never changes afterwards. A
//! Helsinki data set is compiled into the binary; a JSON document with the
//! same shape can replace it.
//!
//! ```json
//! {
//!   "geofences": [
//!     { "name": "Railway Square",
//!       "center": { "latitude": 60.171285, "longitude": 24.943936 },
//!       "radiusInMeters": 150 }
//!   ],
//!   "organizations": [
//!     { "id": "0012", "name": "Helsingin Bussiliikenne Oy",
//!       "geofences": ["Railway Square"] }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::{CircularGeofence, Organization};

const HELSINKI: &str = include_str!("../data/helsinki.json");

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    geofences: Vec<CircularGeofence>,
    organizations: Vec<OrganizationEntry>,
}

#[derive(Debug, Deserialize)]
struct OrganizationEntry {
    id: String,
    name: String,
    #[serde(default)]
    geofences: Vec<String>,
}

/// An operator and the zones it watches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogOrganization {
    /// Organization id (HFP operator id).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owned geofences, unique by name, in declaration order.
    pub geofences: Vec<CircularGeofence>,
}

/// Immutable reference data.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    geofences: BTreeMap<String, CircularGeofence>,
    organizations: BTreeMap<String, CatalogOrganization>,
}

impl Catalog {
    /// The compiled-in Helsinki data set.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(HELSINKI)
    }

    /// Load a catalog document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a catalog document.
    ///
    /// Geofence names must be unique and every organization may only
    /// reference declared geofences. A geofence listed twice for the same
    /// organization is kept once.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;

        let mut geofences = BTreeMap::new();
        for geofence in document.geofences {
            if geofences.contains_key(&geofence.name) {
                return Err(CatalogError::DuplicateGeofence(geofence.name));
            }
            geofences.insert(geofence.name.clone(), geofence);
        }

        let mut organizations = BTreeMap::new();
        for entry in document.organizations {
            let mut seen = HashSet::new();
            let mut owned = Vec::with_capacity(entry.geofences.len());
            for name in entry.geofences {
                if !seen.insert(name.clone()) {
                    continue;
                }
                let geofence = geofences.get(&name).cloned().ok_or_else(|| {
                    CatalogError::UnknownGeofence {
                        organization: entry.id.clone(),
                        geofence: name.clone(),
                    }
                })?;
                owned.push(geofence);
            }

            organizations.insert(
                entry.id.clone(),
                CatalogOrganization {
                    id: entry.id,
                    name: entry.name,
                    geofences: owned,
                },
            );
        }

        Ok(Self {
            geofences,
            organizations,
        })
    }

    /// All geofences, sorted by name.
    pub fn geofences(&self) -> impl Iterator<Item = &CircularGeofence> {
        self.geofences.values()
    }

    /// Look up a geofence by name.
    pub fn geofence(&self, name: &str) -> Option<&CircularGeofence> {
        self.geofences.get(name)
    }

    /// All organizations, sorted by id.
    pub fn organizations(&self) -> impl Iterator<Item = &CatalogOrganization> {
        self.organizations.values()
    }

    /// Look up an organization by id.
    pub fn organization(&self, id: &str) -> Option<&CatalogOrganization> {
        self.organizations.get(id)
    }

    /// Display name of an organization.
    pub fn organization_name(&self, id: &str) -> Option<&str> {
        self.organizations.get(id).map(|org| org.name.as_str())
    }

    /// Organizations owning at least one geofence, sorted by name.
    pub fn organizations_with_geofences(&self) -> Vec<Organization> {
        let mut result: Vec<Organization> = self
            .organizations
            .values()
            .filter(|org| !org.geofences.is_empty())
            .map(|org| Organization {
                id: org.id.clone(),
                name: org.name.clone(),
            })
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }
}
