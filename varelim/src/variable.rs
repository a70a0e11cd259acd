//! Named discrete random variables.
//!
//! A variable is identified by its name. Its domain is an ordered list of distinct value
//! labels; the position of a label in the domain is the index used by factor tables.

use itertools::Itertools;

use crate::factor::FactorError;

type Result<T> = std::result::Result<T, FactorError>;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "VariableSer", into = "VariableSer")]
pub struct Variable {
    name: String,
    domain: Vec<String>,
    // index into domain, set per query by the caller
    evidence: Option<usize>,
}

// Evidence is per-query state and is never serialized.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct VariableSer {
    name: String,
    domain: Vec<String>,
}

impl TryFrom<VariableSer> for Variable {
    type Error = FactorError;
    fn try_from(v: VariableSer) -> Result<Self> {
        Variable::new(v.name, v.domain)
    }
}

impl From<Variable> for VariableSer {
    fn from(v: Variable) -> Self {
        Self {
            name: v.name,
            domain: v.domain,
        }
    }
}

impl Variable {
    /// Create a variable. The domain must be non-empty and without repeated values.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        domain: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let name = name.into();
        let domain: Vec<String> = domain.into_iter().map(Into::into).collect();
        if domain.is_empty() {
            return Err(FactorError::EmptyDomain(name));
        }
        if let Some(value) = domain.iter().duplicates().next() {
            return Err(FactorError::DuplicateValue {
                var: name,
                value: value.clone(),
            });
        }
        Ok(Self {
            name,
            domain,
            evidence: None,
        })
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn domain(&self) -> &[String] {
        &self.domain
    }
    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }
    /// Position of `value` in the domain.
    pub fn value_index(&self, value: &str) -> Result<usize> {
        self.domain
            .iter()
            .position(|v| v == value)
            .ok_or_else(|| FactorError::Domain {
                var: self.name.clone(),
                value: value.to_owned(),
            })
    }
    pub fn set_evidence(&mut self, value: &str) -> Result<()> {
        self.evidence = Some(self.value_index(value)?);
        Ok(())
    }
    /// Copy of this variable with its evidence set to `value`.
    pub fn observed(&self, value: &str) -> Result<Self> {
        let mut res = self.clone();
        res.set_evidence(value)?;
        Ok(res)
    }
    pub fn evidence(&self) -> Option<&str> {
        self.evidence.map(|i| self.domain[i].as_str())
    }
    pub fn evidence_index(&self) -> Option<usize> {
        self.evidence
    }
    pub fn clear_evidence(&mut self) {
        self.evidence = None;
    }
    /// Same name and same ordered domain, evidence ignored.
    pub(crate) fn same_definition(&self, other: &Variable) -> bool {
        self.name == other.name && self.domain == other.domain
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variable {}

impl std::hash::Hash for Variable {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
