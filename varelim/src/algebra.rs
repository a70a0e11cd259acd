//! Factor algebra: product, evidence restriction, marginalization and normalization.
//!
//! All operations are pure: they read their inputs and build new factors.

use itertools::Itertools;
use ndarray::{Array1, ArrayView1, Axis};

use crate::assignment::{strides, AssignmentCounter};
use crate::factor::{Factor, FactorError};
use crate::Variable;

type Result<T> = std::result::Result<T, FactorError>;

/// Product of `factors`.
///
/// The scope of the product is the union of the input scopes, ordered by first occurrence
/// when walking the inputs in order (and each input scope in its own order). The product of
/// a single factor is a copy of it, and the product of no factor is the constant 1.
pub fn multiply<'a>(factors: impl IntoIterator<Item = &'a Factor>) -> Result<Factor> {
    let factors: Vec<&Factor> = factors.into_iter().collect();
    match factors.as_slice() {
        [] => return Ok(Factor::constant(1.0)),
        [f] => return Ok((*f).clone()),
        _ => {}
    }
    let scope: Vec<Variable> = factors
        .iter()
        .flat_map(|f| f.scope())
        .unique()
        .cloned()
        .collect();
    // For each input: position in the product scope of each of its axes, and its strides.
    let layouts = factors
        .iter()
        .map(|f| {
            let axes = f
                .scope()
                .iter()
                .map(|v| {
                    let pos = scope.iter().position(|u| u == v).unwrap_or_default();
                    if scope[pos].same_definition(v) {
                        Ok(pos)
                    } else {
                        Err(FactorError::ConflictingDomains(v.name().to_owned()))
                    }
                })
                .collect::<Result<Vec<usize>>>()?;
            Ok((axes, strides(&f.shape()), f.values()))
        })
        .collect::<Result<Vec<_>>>()?;
    let shape: Vec<usize> = scope.iter().map(Variable::domain_size).collect();
    let mut counter = AssignmentCounter::new(&shape);
    let mut values = Vec::with_capacity(counter.len());
    while let Some(a) = counter.next() {
        values.push(
            layouts
                .iter()
                .map(|(axes, strides, table)| {
                    let idx: usize = axes.iter().zip(strides).map(|(ax, st)| a[*ax] * st).sum();
                    table[idx]
                })
                .product(),
        );
    }
    Factor::new(scope, values)
}

/// Restrict `factor` to the assignment `var = value`.
///
/// The result does not contain `var` in its scope. If `var` is not in the scope of `factor`,
/// the result is an unchanged copy.
pub fn restrict(factor: &Factor, var: &Variable, value: &str) -> Result<Factor> {
    let idx = var.value_index(value)?;
    let Some(pos) = factor.position(var.name()) else {
        return Ok(factor.clone());
    };
    if !factor.scope()[pos].same_definition(var) {
        return Err(FactorError::ConflictingDomains(var.name().to_owned()));
    }
    let table = factor.table()?;
    let values = table.index_axis(Axis(pos), idx).iter().copied().collect();
    let mut scope = factor.scope().to_vec();
    scope.remove(pos);
    Factor::new(scope, values)
}

/// Sum `var` out of `factor`.
///
/// Fails with [`FactorError::NotInScope`] if `var` is not in the scope of `factor`.
pub fn sum_out(factor: &Factor, var: &Variable) -> Result<Factor> {
    let pos = factor
        .position(var.name())
        .ok_or_else(|| FactorError::NotInScope(var.name().to_owned()))?;
    let summed = factor.table()?.sum_axis(Axis(pos));
    let mut scope = factor.scope().to_vec();
    scope.remove(pos);
    Factor::from_table(scope, summed)
}

/// Scale `values` so that they sum to one.
///
/// If the total mass is not positive, the result is all zeros (degenerate distribution).
pub fn normalize(values: ArrayView1<f64>) -> Array1<f64> {
    let total = values.sum();
    if total > 0.0 {
        values.mapv(|x| x / total)
    } else {
        Array1::zeros(values.len())
    }
}
