// Collective-procedure (insolvency) detection on fetched records

use crate::record::{CollectiveProcedure, EntityRecord, Publication};

/// Insolvency-adjacent terms, French registry wording first.
pub const PROCEDURE_KEYWORDS: &[&str] = &[
    "conciliation",
    "sauvegarde",
    "safeguard",
    "redressement",
    "receivership",
    "liquidation",
    "surveillance",
    "administration judiciaire",
    "court supervision",
];

const COLLECTIVE_PROCEDURE_TAGS: &[&str] = &[
    "procédure collective",
    "procedure collective",
    "collective procedure",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskAssessment {
    pub has_alert: bool,
    pub procedures: Vec<CollectiveProcedure>,
}

pub fn matches_procedure_keyword(text: &str) -> bool {
    let text = text.to_lowercase();
    PROCEDURE_KEYWORDS.iter().any(|k| text.contains(k))
}

fn is_collective_procedure_publication(publication: &Publication) -> bool {
    publication
        .kind
        .as_deref()
        .map(|k| {
            let k = k.to_lowercase();
            COLLECTIVE_PROCEDURE_TAGS.iter().any(|t| k.contains(t))
        })
        .unwrap_or(false)
}

/// Turns a matching publication into the procedure it announces.
fn procedure_from_publication(publication: &Publication) -> Option<CollectiveProcedure> {
    if !is_collective_procedure_publication(publication) {
        return None;
    }
    let described = [publication.nature.as_deref(), publication.family.as_deref()]
        .into_iter()
        .flatten()
        .find(|text| matches_procedure_keyword(text))?;

    Some(CollectiveProcedure {
        kind: described.to_string(),
        start_date: publication
            .judgment_date
            .clone()
            .or_else(|| publication.date.clone()),
        end_date: None,
    })
}

/// Flags a record whose procedures match the keyword set. Publications are
/// only consulted when the procedure list yields nothing.
pub fn assess(record: &EntityRecord) -> RiskAssessment {
    let mut procedures: Vec<CollectiveProcedure> = record
        .procedures
        .iter()
        .filter(|p| matches_procedure_keyword(&p.kind))
        .cloned()
        .collect();

    if procedures.is_empty() {
        procedures = record
            .publications
            .iter()
            .filter_map(procedure_from_publication)
            .collect();
    }

    RiskAssessment {
        has_alert: !procedures.is_empty(),
        procedures,
    }
}
