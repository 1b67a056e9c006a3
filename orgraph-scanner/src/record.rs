//! Registry records as returned by the entity data source.
//!
//! Field names on the wire follow the Pappers JSON API. Lists that the API
//! sends as `null` decode to empty vectors.

use serde::{Deserialize, Deserializer, Serialize};

/// Roles that never enter the graph.
const STATUTORY_AUDITOR_ROLES: &[&str] = &["commissaire aux comptes", "statutory auditor"];

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A SIREN is exactly nine ASCII digits.
pub fn is_valid_siren(siren: &str) -> bool {
    siren.len() == 9 && siren.bytes().all(|b| b.is_ascii_digit())
}

/// Deterministic id for a natural person that has no registry identifier.
///
/// `("de la Tour", "Anne", Some("1970-02-01"))` becomes `DE_LA_TOUR_ANNE_1970-02-01`.
pub fn person_key(last_name: &str, first_name: &str, birth_date: Option<&str>) -> String {
    let base = format!("{} {}", last_name, first_name).to_uppercase();
    let base = base.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{}_{}", base, birth_date.unwrap_or("UNK"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Deregistered,
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "ville", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "code_postal", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectiveProcedure {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "date_debut", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "date_fin", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Legal announcement (BODACC). Only consulted as a fallback alert signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<String>,
    #[serde(rename = "famille", default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "date_jugement", default, skip_serializing_if = "Option::is_none")]
    pub judgment_date: Option<String>,
}

/// An entity listed under another entity's ownership, before it is fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siren: Option<String>,
    #[serde(rename = "denomination", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "qualite", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl EntitySummary {
    /// The registry marks deregistered entities in their listed name.
    pub fn looks_deregistered(&self) -> bool {
        self.name
            .as_deref()
            .map(|n| {
                let n = n.to_lowercase();
                n.contains("(radiée)") || n.contains("(radiee)")
            })
            .unwrap_or(false)
    }
}

/// One hit from a reverse mandate search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandateSummary {
    pub siren: String,
    pub name: String,
}

/// Identity attributes used to search for a person's other mandates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonQuery {
    pub last_name: String,
    pub first_name: String,
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NaturalPerson {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub full_name: Option<String>,
    pub birth_date: Option<String>,
    pub role: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegalPerson {
    pub siren: Option<String>,
    pub name: Option<String>,
    pub role: String,
    pub current: bool,
}

/// A person or company holding a role over an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRepresentative", into = "RawRepresentative")]
pub enum Representative {
    Natural(NaturalPerson),
    Legal(LegalPerson),
}

impl Representative {
    pub fn role(&self) -> &str {
        match self {
            Representative::Natural(p) => &p.role,
            Representative::Legal(p) => &p.role,
        }
    }

    pub fn is_current(&self) -> bool {
        match self {
            Representative::Natural(p) => p.current,
            Representative::Legal(p) => p.current,
        }
    }

    pub fn is_statutory_auditor(&self) -> bool {
        let role = self.role().to_lowercase();
        STATUTORY_AUDITOR_ROLES.iter().any(|r| role.contains(r))
    }

    /// Graph id: the SIREN for companies, a name/birth-date composite otherwise.
    pub fn node_id(&self) -> String {
        match self {
            Representative::Legal(p) => match &p.siren {
                Some(siren) if !siren.trim().is_empty() => siren.trim().to_string(),
                _ => person_key(p.name.as_deref().unwrap_or(""), "", None),
            },
            Representative::Natural(p) => person_key(
                p.last_name.as_deref().unwrap_or(""),
                p.first_name.as_deref().unwrap_or(""),
                p.birth_date.as_deref(),
            ),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Representative::Legal(p) => p.name.clone().unwrap_or_else(|| self.node_id()),
            Representative::Natural(p) => {
                if let Some(full) = p.full_name.as_deref().filter(|f| !f.trim().is_empty()) {
                    return full.trim().to_string();
                }
                let joined = format!(
                    "{} {}",
                    p.first_name.as_deref().unwrap_or(""),
                    p.last_name.as_deref().unwrap_or("")
                );
                let joined = joined.trim();
                if joined.is_empty() {
                    self.node_id()
                } else {
                    joined.to_string()
                }
            }
        }
    }

    /// Search attributes, if this is a natural person with both names.
    pub fn person_query(&self) -> Option<PersonQuery> {
        let Representative::Natural(p) = self else {
            return None;
        };
        let last_name = p.last_name.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let first_name = p.first_name.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some(PersonQuery {
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            birth_date: p.birth_date.clone(),
        })
    }
}

/// Flat wire shape of a representative; `personne_morale` selects the variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawRepresentative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qualite: Option<String>,
    #[serde(default)]
    personne_morale: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prenom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nom_complet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_naissance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    denomination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    siren: Option<String>,
    #[serde(default)]
    actuel: Option<bool>,
}

impl From<RawRepresentative> for Representative {
    fn from(raw: RawRepresentative) -> Self {
        let role = raw.qualite.unwrap_or_default();
        let current = raw.actuel != Some(false);
        if raw.personne_morale == Some(true) {
            Representative::Legal(LegalPerson {
                siren: raw.siren,
                name: raw.denomination.or(raw.nom_complet),
                role,
                current,
            })
        } else {
            Representative::Natural(NaturalPerson {
                last_name: raw.nom,
                first_name: raw.prenom,
                full_name: raw.nom_complet,
                birth_date: raw.date_naissance,
                role,
                current,
            })
        }
    }
}

impl From<Representative> for RawRepresentative {
    fn from(rep: Representative) -> Self {
        match rep {
            Representative::Natural(p) => RawRepresentative {
                qualite: Some(p.role),
                personne_morale: Some(false),
                nom: p.last_name,
                prenom: p.first_name,
                nom_complet: p.full_name,
                date_naissance: p.birth_date,
                actuel: Some(p.current),
                ..Default::default()
            },
            Representative::Legal(p) => RawRepresentative {
                qualite: Some(p.role),
                personne_morale: Some(true),
                denomination: p.name,
                siren: p.siren,
                actuel: Some(p.current),
                ..Default::default()
            },
        }
    }
}

/// Full record for one registered entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub siren: String,
    #[serde(rename = "denomination", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "nom_entreprise", default, skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
    #[serde(rename = "forme_juridique", default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    #[serde(rename = "date_creation", default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(rename = "statut_rcs", default, skip_serializing_if = "Option::is_none")]
    pub registry_status: Option<String>,
    #[serde(rename = "siege", default, skip_serializing_if = "Option::is_none")]
    pub head_office: Option<Location>,
    #[serde(rename = "representants", default, deserialize_with = "nullable_vec")]
    pub representatives: Vec<Representative>,
    #[serde(
        rename = "entreprises_dirigees",
        default,
        deserialize_with = "nullable_vec"
    )]
    pub controlled_entities: Vec<EntitySummary>,
    #[serde(
        rename = "procedures_collectives",
        default,
        deserialize_with = "nullable_vec"
    )]
    pub procedures: Vec<CollectiveProcedure>,
    #[serde(
        rename = "publications_bodacc",
        default,
        deserialize_with = "nullable_vec"
    )]
    pub publications: Vec<Publication>,
}

impl EntityRecord {
    /// Name, then trade name, then the SIREN itself.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .or(self.trade_name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .map(|n| n.to_string())
            .unwrap_or_else(|| self.siren.clone())
    }

    /// Reads the leading word of the register status, so negated forms
    /// such as "non inscrit" or "unregistered" stay unknown.
    pub fn registration_status(&self) -> RegistrationStatus {
        let Some(status) = self.registry_status.as_deref() else {
            return RegistrationStatus::Unknown;
        };
        let status = status.to_lowercase();
        let word = status
            .split(|c: char| !c.is_alphanumeric())
            .find(|w| !w.is_empty())
            .unwrap_or_default();

        match word {
            "radié" | "radiée" | "radie" | "deregistered" => RegistrationStatus::Deregistered,
            "inscrit" | "inscrite" | "registered" => RegistrationStatus::Registered,
            _ => RegistrationStatus::Unknown,
        }
    }
}
