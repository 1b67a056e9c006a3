// Offline entity source producing a deterministic network keyed on SIREN digits

use crate::error::Result;
use crate::record::{
    CollectiveProcedure, EntityRecord, EntitySummary, LegalPerson, Location, MandateSummary,
    NaturalPerson, PersonQuery, Representative,
};
use crate::source::EntitySource;
use futures::future::BoxFuture;
use std::time::Duration;

pub const DEMO_ROOT_SIREN: &str = "443061841";

const COMPANY_PREFIXES: &[&str] = &[
    "ALPHA", "BETA", "GAMMA", "DELTA", "OMEGA", "NEXUS", "VERTEX", "AXIOM", "PRISM", "ZENITH",
];
const COMPANY_SUFFIXES: &[&str] = &[
    "TECH",
    "INVEST",
    "CAPITAL",
    "HOLDINGS",
    "GROUP",
    "VENTURES",
    "PARTNERS",
    "SOLUTIONS",
    "DYNAMICS",
    "SYSTEMS",
];
const FIRST_NAMES: &[&str] = &[
    "Jean", "Marie", "Pierre", "Sophie", "Antoine", "Camille", "Louis", "Emma", "Hugo", "Léa",
    "Lucas", "Chloé",
];
const LAST_NAMES: &[&str] = &[
    "MARTIN", "BERNARD", "DUBOIS", "THOMAS", "ROBERT", "RICHARD", "PETIT", "DURAND", "LEROY",
    "MOREAU", "SIMON", "LAURENT",
];
const ROLES: &[&str] = &["Président", "Directeur Général", "Gérant", "Administrateur"];
const LEGAL_FORMS: &[&str] = &["SAS", "SARL", "SA", "SCI"];
const CITIES: &[&str] = &[
    "PARIS", "LYON", "MARSEILLE", "TOULOUSE", "NICE", "NANTES", "BORDEAUX", "LILLE",
];

/// Left-pads with `4` so generated identifiers stay nine digits long.
fn pad_siren(n: u64) -> String {
    let s = (n % 1_000_000_000).to_string();
    format!("{}{}", "4".repeat(9usize.saturating_sub(s.len())), s)
}

fn pick<'a>(list: &[&'a str], n: u64) -> &'a str {
    list[(n % list.len() as u64) as usize]
}

fn company_name(num: u64) -> String {
    format!(
        "{} {}",
        pick(COMPANY_PREFIXES, num),
        pick(COMPANY_SUFFIXES, num + 3)
    )
}

/// Builds the record the demo registry returns for `siren`.
pub fn generate_record(siren: &str) -> EntityRecord {
    let is_root = siren == DEMO_ROOT_SIREN;
    let num: u64 = siren.parse().unwrap_or(443_061_841);
    let last_digit = siren.chars().last().unwrap_or('0');
    let depth_digit = siren
        .chars()
        .rev()
        .nth(3)
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0) as u64;

    let active_with_procedure = last_digit == '2';
    let deregistered_only = last_digit == '3';
    let deregistered_with_procedure = last_digit == '4';
    let deregistered = deregistered_only || deregistered_with_procedure;
    let has_procedure = active_with_procedure || deregistered_with_procedure;

    let prefix = pick(COMPANY_PREFIXES, num);
    let name = if is_root {
        "GOOGLE FRANCE".to_string()
    } else if active_with_procedure {
        format!("{} (Proc. Coll.)", prefix)
    } else if deregistered_only {
        format!("{} (Radiée)", prefix)
    } else if deregistered_with_procedure {
        format!("{} (Radiée + Proc.)", prefix)
    } else {
        company_name(num)
    };

    let mut representatives = Vec::new();
    for i in 0..(1 + num % 2) {
        representatives.push(Representative::Natural(NaturalPerson {
            last_name: Some(pick(LAST_NAMES, num + i * 11).to_string()),
            first_name: Some(pick(FIRST_NAMES, num + i * 7).to_string()),
            full_name: None,
            birth_date: Some(format!(
                "{}-{:02}-{:02}",
                1960 + (num + i * 5) % 30,
                1 + (num + i) % 12,
                1 + (num + i * 3) % 28
            )),
            role: pick(ROLES, i).to_string(),
            current: true,
        }));
    }

    if is_root {
        representatives.push(Representative::Legal(LegalPerson {
            siren: Some(pad_siren(num + 100)),
            name: Some(format!("{} HOLDING", prefix)),
            role: "Holding".to_string(),
            current: true,
        }));
        representatives.push(Representative::Legal(LegalPerson {
            siren: Some(pad_siren(num + 7)),
            name: Some("AUDIT & ASSOCIES".to_string()),
            role: "Commissaire aux comptes titulaire".to_string(),
            current: true,
        }));
    }

    let subsidiaries = if is_root {
        3
    } else {
        2u64.saturating_sub(depth_digit)
    };
    let controlled_entities = (0..subsidiaries)
        .map(|i| {
            let sub_prefix = pick(COMPANY_PREFIXES, num + i * 17);
            let mut sub_name = format!("{} {}", sub_prefix, pick(COMPANY_SUFFIXES, num + i * 19));
            if is_root && i == 1 {
                sub_name = format!("{} (Proc. Coll.)", sub_prefix);
            }
            if is_root && i == 2 {
                sub_name = format!("{} (Radiée)", sub_prefix);
            }
            EntitySummary {
                siren: Some(pad_siren(num + 1000 + i * 111)),
                name: Some(sub_name),
                role: Some(pick(ROLES, i).to_string()),
            }
        })
        .collect();

    let procedures = if has_procedure {
        vec![CollectiveProcedure {
            kind: "Liquidation judiciaire".to_string(),
            start_date: Some(format!("2023-{:02}-15", 1 + num % 12)),
            end_date: None,
        }]
    } else {
        Vec::new()
    };

    EntityRecord {
        siren: siren.to_string(),
        name: Some(name),
        trade_name: None,
        legal_form: Some(pick(LEGAL_FORMS, num).to_string()),
        creation_date: Some(format!("{}-01-01", 2000 + num % 20)),
        registry_status: Some(if deregistered { "Radié" } else { "Inscrit" }.to_string()),
        head_office: Some(Location {
            city: Some(pick(CITIES, num).to_string()),
            postal_code: Some((75000 + num % 95).to_string()),
        }),
        representatives,
        controlled_entities,
        procedures,
        publications: Vec::new(),
    }
}

/// Each person holds exactly one outside mandate, derived from their names.
pub fn generate_mandates(person: &PersonQuery) -> Vec<MandateSummary> {
    let key: u64 = person
        .last_name
        .bytes()
        .chain(person.first_name.bytes())
        .map(u64::from)
        .sum();
    let siren = pad_siren(key * 7919 + 10_000);
    let name = generate_record(&siren).display_name();
    vec![MandateSummary { siren, name }]
}

#[derive(Debug, Clone, Default)]
pub struct DemoSource {
    latency: Duration,
}

impl DemoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated network delay per call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl EntitySource for DemoSource {
    fn fetch_entity<'a>(&'a self, siren: &'a str) -> BoxFuture<'a, Result<EntityRecord>> {
        Box::pin(async move {
            self.simulate_latency().await;
            Ok(generate_record(siren))
        })
    }

    fn search_mandates<'a>(
        &'a self,
        person: &'a PersonQuery,
    ) -> BoxFuture<'a, Result<Vec<MandateSummary>>> {
        Box::pin(async move {
            self.simulate_latency().await;
            Ok(generate_mandates(person))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{is_valid_siren, RegistrationStatus};

    #[test]
    fn test_root_record_shape() {
        let record = generate_record(DEMO_ROOT_SIREN);

        assert_eq!(record.display_name(), "GOOGLE FRANCE");
        assert_eq!(record.controlled_entities.len(), 3);
        assert!(record
            .representatives
            .iter()
            .any(|r| matches!(r, Representative::Legal(_)) && !r.is_statutory_auditor()));
        assert!(record.representatives.iter().any(|r| r.is_statutory_auditor()));
        assert!(record
            .controlled_entities
            .iter()
            .all(|c| c.siren.as_deref().is_some_and(is_valid_siren)));
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_record("552100554"), generate_record("552100554"));
    }

    #[test]
    fn test_suffix_controls_status_and_procedures() {
        let with_procedure = generate_record("552100552");
        assert_eq!(
            with_procedure.registration_status(),
            RegistrationStatus::Registered
        );
        assert_eq!(with_procedure.procedures.len(), 1);

        let closed = generate_record("552100553");
        assert_eq!(
            closed.registration_status(),
            RegistrationStatus::Deregistered
        );
        assert!(closed.procedures.is_empty());
    }

    #[test]
    fn test_pad_siren() {
        assert_eq!(pad_siren(1234), "444441234");
        assert_eq!(pad_siren(443_062_841), "443062841");
    }

    #[test]
    fn test_mandates_are_valid_sirens() {
        let person = PersonQuery {
            last_name: "MARTIN".to_string(),
            first_name: "Jean".to_string(),
            birth_date: None,
        };
        let mandates = generate_mandates(&person);
        assert_eq!(mandates.len(), 1);
        assert!(is_valid_siren(&mandates[0].siren));
    }
}
