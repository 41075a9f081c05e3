use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AgreementError {
    #[error("Party {0} cannot sign a surplus agreement with itself")]
    SelfAgreement(String),
    #[error("Party {0} appears in more than one surplus agreement")]
    DuplicateParty(String),
}

/// A pre-declared vote-sharing pact between two parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurplusAgreement {
    pub first: String,
    pub second: String,
}

impl SurplusAgreement {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Identifier of the combined entity while the pact is in effect.
    pub fn alliance_key(&self) -> String {
        format!("{} + {}", self.first, self.second)
    }
}

/// Surplus agreements signed for one election, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AgreementRegistry {
    agreements: Vec<SurplusAgreement>,
}

impl AgreementRegistry {
    /// Build a registry, rejecting self-pacts and parties bound twice.
    pub fn new(agreements: Vec<SurplusAgreement>) -> Result<Self, AgreementError> {
        let mut seen = HashSet::new();
        for agreement in &agreements {
            if agreement.first == agreement.second {
                return Err(AgreementError::SelfAgreement(agreement.first.clone()));
            }
            for party in [&agreement.first, &agreement.second] {
                if !seen.insert(party.as_str()) {
                    return Err(AgreementError::DuplicateParty(party.clone()));
                }
            }
        }

        Ok(Self { agreements })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SurplusAgreement> {
        self.agreements.iter()
    }

    pub fn len(&self) -> usize {
        self.agreements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agreements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alliance_key_joins_both_parties() {
        let agreement = SurplusAgreement::new("Likud", "Shas");
        assert_eq!(agreement.alliance_key(), "Likud + Shas");
    }

    #[test]
    fn rejects_party_bound_twice() {
        let result = AgreementRegistry::new(vec![
            SurplusAgreement::new("A", "B"),
            SurplusAgreement::new("C", "A"),
        ]);
        assert_eq!(result, Err(AgreementError::DuplicateParty("A".to_string())));
    }

    #[test]
    fn rejects_self_agreement() {
        let result = AgreementRegistry::new(vec![SurplusAgreement::new("A", "A")]);
        assert_eq!(result, Err(AgreementError::SelfAgreement("A".to_string())));
    }
}
