//! Variable elimination.
//!
//! A query runs four phases, in sequence:
//! 1. restrict every CPT to the evidence,
//! 2. compute the elimination ordering of the non-query variables,
//! 3. for each variable of the ordering, multiply the factors that mention it and sum it out,
//! 4. multiply the remaining factors and normalize over the query domain.
//!
//! All the factors built during a query are owned by that query and dropped when it returns.

use indexmap::IndexMap;
use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;

use crate::algebra::{multiply, normalize, restrict, sum_out};
use crate::ordering::elimination_order;
use crate::{BayesNet, Config, Factor, InferenceError, Result, Variable};

/// A posterior query: distribution of `query` given `evidence`.
#[derive(Debug, Clone)]
pub struct Query {
    pub query: Variable,
    /// Observed variables, each with its evidence set.
    pub evidence: Vec<Variable>,
}

impl Query {
    pub fn new(query: Variable, evidence: Vec<Variable>) -> Self {
        Self { query, evidence }
    }
}

/// Observed network variables and their values.
type Observations<'a> = IndexMap<&'a str, (&'a Variable, &'a str)>;

#[derive(Debug, Clone, Default)]
pub struct VariableElimination {
    config: Config,
}

impl VariableElimination {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Posterior distribution of `query` given `evidence`, ordered as the query domain.
    ///
    /// Every evidence variable must have its evidence set. If the evidence has probability
    /// zero, the result is all zeros.
    pub fn infer(
        &self,
        net: &BayesNet,
        query: &Variable,
        evidence: &[Variable],
    ) -> Result<Array1<f64>> {
        let query = net.var(query.name())?;
        let observations = observations(net, evidence)?;
        log::debug!(
            "query {} with {} observed variable(s)",
            query,
            observations.len()
        );
        let factors = self.restrict_factors(net.factors(), &observations)?;
        let order = elimination_order(&factors, query, self.config.heuristic);
        log::debug!(
            "elimination order: [{}]",
            order.iter().map(Variable::name).collect::<Vec<_>>().join(", ")
        );
        let factors = eliminate(factors, &order)?;
        let res = finalize(&factors, query, observations.get(query.name()))?;
        log::debug!("posterior of {}: {}", query, res);
        Ok(res)
    }

    /// Elimination ordering that [`Self::infer`] uses for the same query.
    pub fn elimination_order(
        &self,
        net: &BayesNet,
        query: &Variable,
        evidence: &[Variable],
    ) -> Result<Vec<Variable>> {
        let query = net.var(query.name())?;
        let observations = observations(net, evidence)?;
        let factors = self.restrict_factors(net.factors(), &observations)?;
        Ok(elimination_order(&factors, query, self.config.heuristic))
    }

    /// Run independent queries in parallel. Results are in the order of `queries`.
    pub fn infer_many(&self, net: &BayesNet, queries: &[Query]) -> Vec<Result<Array1<f64>>> {
        queries
            .par_iter()
            .map(|q| self.infer(net, &q.query, &q.evidence))
            .collect()
    }

    fn restrict_factors(
        &self,
        factors: &[Factor],
        observations: &Observations,
    ) -> Result<Vec<Factor>> {
        let restrict_one = |f: &Factor| {
            observations
                .values()
                .try_fold(f.clone(), |f, (var, value)| restrict(&f, var, value))
        };
        let res = if self.config.parallel_restrict {
            factors
                .par_iter()
                .map(&restrict_one)
                .collect::<std::result::Result<Vec<Factor>, _>>()?
        } else {
            factors
                .iter()
                .map(&restrict_one)
                .collect::<std::result::Result<Vec<Factor>, _>>()?
        };
        Ok(res)
    }
}

/// Posterior of `query` given `evidence` with the default configuration.
pub fn infer(net: &BayesNet, query: &Variable, evidence: &[Variable]) -> Result<Array1<f64>> {
    VariableElimination::default().infer(net, query, evidence)
}

/// Match evidence variables to network variables, by name.
fn observations<'a>(net: &'a BayesNet, evidence: &'a [Variable]) -> Result<Observations<'a>> {
    let mut res = Observations::new();
    for ev in evidence {
        let var = net.var(ev.name())?;
        let value = ev
            .evidence()
            .ok_or_else(|| InferenceError::MissingEvidence(ev.name().to_owned()))?;
        // the value must be valid for the network variable, not only for the given one
        var.value_index(value)?;
        if let Some((_, prev)) = res.insert(var.name(), (var, value)) {
            if prev != value {
                return Err(InferenceError::ConflictingEvidence(var.name().to_owned()));
            }
        }
    }
    Ok(res)
}

fn eliminate(mut factors: Vec<Factor>, order: &[Variable]) -> Result<Vec<Factor>> {
    let mut max_scope = 0;
    for var in order {
        let (mentioning, rest): (Vec<Factor>, Vec<Factor>) =
            factors.into_iter().partition(|f| f.contains(var));
        factors = rest;
        if mentioning.is_empty() {
            log::trace!("no factor mentions {}, skipped", var);
            continue;
        }
        let product = multiply(&mentioning)?;
        max_scope = max_scope.max(product.scope().len());
        log::trace!(
            "eliminate {}: product of {} factor(s) over {} variable(s)",
            var,
            mentioning.len(),
            product.scope().len()
        );
        factors.push(sum_out(&product, var)?);
    }
    log::debug!("largest intermediate scope: {} variable(s)", max_scope);
    Ok(factors)
}

fn finalize(
    factors: &[Factor],
    query: &Variable,
    observed: Option<&(&Variable, &str)>,
) -> Result<Array1<f64>> {
    let product = multiply(factors)?;
    let unnormalized = if product.contains(query) {
        query
            .domain()
            .iter()
            .map(|v| product.get_value(&[v]))
            .collect::<std::result::Result<Vec<f64>, _>>()?
    } else {
        // Query restricted away by its own evidence, or not mentioned by any factor.
        let mass = product.total();
        match observed {
            Some((_, value)) => {
                let idx = query.value_index(value)?;
                (0..query.domain_size())
                    .map(|i| if i == idx { mass } else { 0.0 })
                    .collect()
            }
            None => vec![mass; query.domain_size()],
        }
    };
    Ok(normalize(ArrayView1::from(&unnormalized)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // A -> B
    fn two_nodes() -> BayesNet {
        let mut b = BayesNet::builder();
        b.add_variable("A", ["a0", "a1"]).unwrap();
        b.add_variable("B", ["b0", "b1"]).unwrap();
        b.add_cpt("A", &[], vec![0.3, 0.7]).unwrap();
        // rows: [B, A]
        b.add_cpt("B", &["A"], vec![0.9, 0.2, 0.1, 0.8]).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn prior_and_posterior() {
        let net = two_nodes();
        let a = net.var("A").unwrap();
        let b = net.var("B").unwrap();
        // P(B=b0) = 0.3*0.9 + 0.7*0.2
        let pb = infer(&net, b, &[]).unwrap();
        assert_abs_diff_eq!(pb, array![0.41, 0.59], epsilon = 1e-12);
        // P(A=a0 | B=b0) = 0.27 / 0.41
        let pa = infer(&net, a, &[b.observed("b0").unwrap()]).unwrap();
        assert_abs_diff_eq!(pa, array![0.27 / 0.41, 0.14 / 0.41], epsilon = 1e-12);
    }

    #[test]
    fn observed_query() {
        let net = two_nodes();
        let a = net.var("A").unwrap();
        let p = infer(&net, a, &[a.observed("a1").unwrap()]).unwrap();
        assert_eq!(p, array![0.0, 1.0]);
    }

    #[test]
    fn evidence_errors() {
        let net = two_nodes();
        let a = net.var("A").unwrap();
        let b = net.var("B").unwrap();
        assert_eq!(
            infer(&net, a, &[b.clone()]).unwrap_err(),
            InferenceError::MissingEvidence("B".to_owned())
        );
        assert_eq!(
            infer(
                &net,
                a,
                &[b.observed("b0").unwrap(), b.observed("b1").unwrap()]
            )
            .unwrap_err(),
            InferenceError::ConflictingEvidence("B".to_owned())
        );
        let c = Variable::new("C", ["c0"]).unwrap().observed("c0").unwrap();
        assert_eq!(
            infer(&net, a, &[c]).unwrap_err(),
            InferenceError::Net(NetError::UnknownVariable("C".to_owned()))
        );
        // same name, value that only exists in the caller's domain
        let other_b = Variable::new("B", ["b0", "b1", "b2"])
            .unwrap()
            .observed("b2")
            .unwrap();
        assert!(infer(&net, a, &[other_b]).unwrap_err().is_domain_error());
    }

    #[test]
    fn variable_without_factor() {
        let c = Variable::new("C", ["c0", "c1", "c2", "c3"]).unwrap();
        let net = BayesNet::new(vec![c.clone()], vec![]).unwrap();
        let p = infer(&net, &c, &[]).unwrap();
        assert_abs_diff_eq!(p, array![0.25, 0.25, 0.25, 0.25], epsilon = 1e-12);
    }

    #[test]
    fn impossible_evidence() {
        let mut b = BayesNet::builder();
        b.add_variable("A", ["a0", "a1"]).unwrap();
        b.add_variable("B", ["b0", "b1"]).unwrap();
        b.add_cpt("A", &[], vec![1.0, 0.0]).unwrap();
        // B = A
        b.add_cpt("B", &["A"], vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let net = b.build().unwrap();
        let a = net.var("A").unwrap();
        let b = net.var("B").unwrap();
        let p = infer(&net, a, &[b.observed("b1").unwrap()]).unwrap();
        assert_eq!(p, array![0.0, 0.0]);
    }
}
