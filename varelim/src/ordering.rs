//! Greedy elimination ordering.
//!
//! The scopes of the factors are seen as the hyperedges ("cliques") of a hypergraph over the
//! variables. Eliminating a variable merges all the cliques that contain it into one clique,
//! its fill scope: the union of those cliques, minus the variable itself. At each step, the
//! variable with the cheapest fill scope is eliminated next. Ties go to the variable seen
//! first when walking the factor scopes in order, so that the ordering is reproducible.

use indexmap::IndexSet;

use crate::{Factor, Variable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EliminationHeuristic {
    /// Cost is the number of variables in the fill scope.
    #[default]
    MinFill,
    /// Cost is the size of the table over the fill scope (product of domain sizes).
    MinWeight,
}

impl EliminationHeuristic {
    fn cost(&self, fill: &IndexSet<usize>, vars: &IndexSet<&Variable>) -> usize {
        match self {
            Self::MinFill => fill.len(),
            Self::MinWeight => fill.iter().fold(1usize, |acc, v| {
                acc.saturating_mul(vars[*v].domain_size())
            }),
        }
    }
}

type Clique = IndexSet<usize>;

fn fill_scope(cliques: &[Clique], var: usize) -> Clique {
    cliques
        .iter()
        .filter(|c| c.contains(&var))
        .flatten()
        .copied()
        .filter(|v| *v != var)
        .collect()
}

/// Elimination ordering for all the variables in the scopes of `factors`, except `query`.
pub fn elimination_order(
    factors: &[Factor],
    query: &Variable,
    heuristic: EliminationHeuristic,
) -> Vec<Variable> {
    let vars: IndexSet<&Variable> = factors.iter().flat_map(|f| f.scope()).collect();
    let mut cliques: Vec<Clique> = factors
        .iter()
        .map(|f| {
            f.scope()
                .iter()
                .filter_map(|v| vars.get_index_of(v))
                .collect()
        })
        .collect();
    let mut remaining: IndexSet<usize> = (0..vars.len())
        .filter(|i| vars[*i] != query)
        .collect();
    let mut order = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let mut best: Option<(usize, usize, Clique)> = None;
        for &v in remaining.iter() {
            let fill = fill_scope(&cliques, v);
            let cost = heuristic.cost(&fill, &vars);
            // strict comparison: first seen wins ties
            if best.as_ref().map_or(true, |(best_cost, _, _)| cost < *best_cost) {
                best = Some((cost, v, fill));
            }
        }
        let Some((cost, v, fill)) = best else {
            break;
        };
        log::trace!("eliminate {} (cost {})", vars[v], cost);
        cliques.retain(|c| !c.contains(&v));
        if !fill.is_empty() {
            cliques.push(fill);
        }
        remaining.shift_remove(&v);
        order.push(vars[v].clone());
    }
    order
}
