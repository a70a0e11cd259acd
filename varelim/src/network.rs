//! Bayesian network container and builder.
//!
//! A [`BayesNet`] is read-only once built: inference never mutates its variables or its
//! factors, so that a network can be shared by concurrent queries.

use indexmap::IndexMap;
use thiserror::Error;

use crate::algebra::sum_out;
use crate::factor::{Factor, FactorError};
use crate::Variable;

type NamedList<T> = IndexMap<String, T>;

/// Maximum deviation from 1 of the sum of a CPT row.
const CPT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetError {
    #[error("Variable {0} declared twice.")]
    MultipleVarDecl(String),
    #[error("No variable named {0}.")]
    UnknownVariable(String),
    #[error("Variable {0} in a factor scope does not match the network variable.")]
    ForeignVariable(String),
    #[error("Multiple CPTs given for variable {0}.")]
    MultipleCpt(String),
    #[error("A row of the CPT of {var} sums to {sum}, not 1.")]
    CptNotNormalized { var: String, sum: f64 },
    #[error(transparent)]
    Factor(#[from] FactorError),
}

type Result<T> = std::result::Result<T, NetError>;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "BayesNetSer", into = "BayesNetSer")]
pub struct BayesNet {
    variables: NamedList<Variable>,
    factors: Vec<Factor>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct BayesNetSer {
    variables: Vec<Variable>,
    factors: Vec<Factor>,
}

impl TryFrom<BayesNetSer> for BayesNet {
    type Error = NetError;
    fn try_from(n: BayesNetSer) -> Result<Self> {
        BayesNet::new(n.variables, n.factors)
    }
}

impl From<BayesNet> for BayesNetSer {
    fn from(n: BayesNet) -> Self {
        Self {
            variables: n.variables.into_values().collect(),
            factors: n.factors,
        }
    }
}

impl BayesNet {
    /// Create a network. Variable names must be unique, and every factor scope must only
    /// contain variables of the network.
    pub fn new(variables: Vec<Variable>, factors: Vec<Factor>) -> Result<Self> {
        let mut named = NamedList::new();
        for mut var in variables {
            var.clear_evidence();
            let name = var.name().to_owned();
            if named.insert(name.clone(), var).is_some() {
                return Err(NetError::MultipleVarDecl(name));
            }
        }
        for factor in factors.iter() {
            for var in factor.scope() {
                let known = named
                    .get(var.name())
                    .ok_or_else(|| NetError::UnknownVariable(var.name().to_owned()))?;
                if !known.same_definition(var) {
                    return Err(NetError::ForeignVariable(var.name().to_owned()));
                }
            }
        }
        Ok(Self {
            variables: named,
            factors,
        })
    }
    pub fn builder() -> NetBuilder {
        NetBuilder::default()
    }
    pub fn variables(&self) -> impl ExactSizeIterator<Item = &Variable> {
        self.variables.values()
    }
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }
    pub fn var(&self, name: &str) -> Result<&Variable> {
        self.variable(name)
            .ok_or_else(|| NetError::UnknownVariable(name.to_owned()))
    }
}

/// Incremental construction of a network from its variables and CPTs.
///
/// The CPT of `child` given `parents` has scope `[child, parents...]`.
#[derive(Debug, Clone, Default)]
pub struct NetBuilder {
    variables: NamedList<Variable>,
    cpts: NamedList<Factor>,
}

impl NetBuilder {
    pub fn add_variable<S: Into<String>>(
        &mut self,
        name: &str,
        domain: impl IntoIterator<Item = S>,
    ) -> Result<()> {
        if self.variables.contains_key(name) {
            return Err(NetError::MultipleVarDecl(name.to_owned()));
        }
        let var = Variable::new(name, domain)?;
        self.variables.insert(name.to_owned(), var);
        Ok(())
    }
    fn cpt_scope(&self, child: &str, parents: &[&str]) -> Result<Vec<Variable>> {
        if self.cpts.contains_key(child) {
            return Err(NetError::MultipleCpt(child.to_owned()));
        }
        std::iter::once(child)
            .chain(parents.iter().copied())
            .map(|name| {
                self.variables
                    .get(name)
                    .cloned()
                    .ok_or_else(|| NetError::UnknownVariable(name.to_owned()))
            })
            .collect()
    }
    /// Add the CPT of `child`, with `values` in mixed-radix order over `[child, parents...]`.
    pub fn add_cpt(&mut self, child: &str, parents: &[&str], values: Vec<f64>) -> Result<()> {
        let scope = self.cpt_scope(child, parents)?;
        let cpt = Factor::new(scope, values)?;
        self.cpts.insert(child.to_owned(), cpt);
        Ok(())
    }
    /// Add the CPT of `child` from `(assignment, probability)` rows, where assignments are
    /// ordered as `[child, parents...]`. Missing rows are zero.
    pub fn add_cpt_rows<S, I>(&mut self, child: &str, parents: &[&str], rows: I) -> Result<()>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (Vec<S>, f64)>,
    {
        let scope = self.cpt_scope(child, parents)?;
        let mut cpt = Factor::zeros(scope)?;
        cpt.set_values(rows)?;
        self.cpts.insert(child.to_owned(), cpt);
        Ok(())
    }
    /// Build the network, checking that every CPT row is a probability distribution.
    pub fn build(self) -> Result<BayesNet> {
        for (child, cpt) in self.cpts.iter() {
            let child_var = &cpt.scope()[0];
            let rows = sum_out(cpt, child_var)?;
            if let Some(sum) = rows
                .values()
                .iter()
                .find(|s| (**s - 1.0).abs() > CPT_TOLERANCE)
            {
                return Err(NetError::CptNotNormalized {
                    var: child.clone(),
                    sum: *sum,
                });
            }
        }
        BayesNet::new(
            self.variables.into_values().collect(),
            self.cpts.into_values().collect(),
        )
    }
}
