//! Factor tables over discrete variables.
//!
//! A factor maps every joint assignment of its scope to a number. The table is stored flat,
//! in the mixed-radix order of [`crate::assignment`]. Lookups always take an explicit
//! assignment: nothing about "the current assignment" is stored on factors or variables.

use indexmap::IndexMap;
use itertools::Itertools;
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use thiserror::Error;

use crate::assignment::flat_index;
use crate::Variable;

/// Assignment given as a variable name → value mapping. It may cover more variables than the
/// scope of the factor it is used with.
pub type Assignment = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorError {
    #[error("Value {value:?} is not in the domain of variable {var}.")]
    Domain { var: String, value: String },
    #[error("Assignment has {got} values, but the factor scope has {expected} variables.")]
    AssignmentLength { expected: usize, got: usize },
    #[error("Variable {0} is not in the factor scope.")]
    NotInScope(String),
    #[error("No value assigned to variable {0}.")]
    Unassigned(String),
    #[error("Assignment value {value:?} is outside the domain of scope variable {var}.")]
    OutOfDomain { var: String, value: String },
    #[error("Variable {0} is used with two different domains.")]
    ConflictingDomains(String),
    #[error("Variable {0} appears more than once in the scope.")]
    RepeatedVariable(String),
    #[error("Domain of variable {0} is empty.")]
    EmptyDomain(String),
    #[error("Value {value:?} appears more than once in the domain of variable {var}.")]
    DuplicateValue { var: String, value: String },
    #[error("Wrong table size: got {got}, expected {expected}.")]
    TableSize { expected: usize, got: usize },
    #[error("Table shape error: {0}.")]
    Shape(String),
}

impl FactorError {
    /// A value outside of a variable domain.
    pub fn is_domain_error(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }
    /// An assignment or a sum-out target that does not match a factor scope.
    pub fn is_scope_mismatch(&self) -> bool {
        matches!(
            self,
            Self::AssignmentLength { .. }
                | Self::NotInScope(_)
                | Self::Unassigned(_)
                | Self::OutOfDomain { .. }
                | Self::ConflictingDomains(_)
        )
    }
}

type Result<T> = std::result::Result<T, FactorError>;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "FactorSer", into = "FactorSer")]
pub struct Factor {
    scope: Vec<Variable>,
    // len == product of the domain sizes of scope
    values: Vec<f64>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct FactorSer {
    scope: Vec<Variable>,
    values: Vec<f64>,
}

impl TryFrom<FactorSer> for Factor {
    type Error = FactorError;
    fn try_from(f: FactorSer) -> Result<Self> {
        Factor::new(f.scope, f.values)
    }
}

impl From<Factor> for FactorSer {
    fn from(f: Factor) -> Self {
        Self {
            scope: f.scope,
            values: f.values,
        }
    }
}

fn check_scope(scope: &[Variable]) -> Result<()> {
    if let Some(var) = scope.iter().duplicates().next() {
        return Err(FactorError::RepeatedVariable(var.name().to_owned()));
    }
    Ok(())
}

fn table_len(scope: &[Variable]) -> usize {
    scope.iter().map(Variable::domain_size).product()
}

impl Factor {
    /// Create a factor from its flat table, laid out in mixed-radix order over `scope`.
    pub fn new(scope: Vec<Variable>, values: Vec<f64>) -> Result<Self> {
        check_scope(&scope)?;
        let expected = table_len(&scope);
        if values.len() != expected {
            return Err(FactorError::TableSize {
                expected,
                got: values.len(),
            });
        }
        Ok(Self { scope, values })
    }
    pub fn zeros(scope: Vec<Variable>) -> Result<Self> {
        check_scope(&scope)?;
        let values = vec![0.0; table_len(&scope)];
        Ok(Self { scope, values })
    }
    /// Factor with an empty scope and the single value `value`.
    pub fn constant(value: f64) -> Self {
        Self {
            scope: Vec::new(),
            values: vec![value],
        }
    }
    /// Create a factor from an n-dimensional table whose axes follow `scope`.
    pub fn from_table(scope: Vec<Variable>, table: ArrayD<f64>) -> Result<Self> {
        check_scope(&scope)?;
        let shape: Vec<usize> = scope.iter().map(Variable::domain_size).collect();
        if table.shape() != shape.as_slice() {
            return Err(FactorError::Shape(format!(
                "expected {:?}, got {:?}",
                shape,
                table.shape()
            )));
        }
        // logical iteration order is row-major whatever the memory layout
        let values = table.iter().copied().collect();
        Ok(Self { scope, values })
    }
    pub fn scope(&self) -> &[Variable] {
        &self.scope
    }
    pub fn values(&self) -> &[f64] {
        &self.values
    }
    pub fn shape(&self) -> Vec<usize> {
        self.scope.iter().map(Variable::domain_size).collect()
    }
    /// Number of table entries.
    pub fn size(&self) -> usize {
        self.values.len()
    }
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
    /// Position of the variable named `name` in the scope.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.scope.iter().position(|v| v.name() == name)
    }
    pub fn contains(&self, var: &Variable) -> bool {
        self.position(var.name()).is_some()
    }
    /// View of the table with one axis per scope variable.
    pub fn table(&self) -> Result<ArrayViewD<'_, f64>> {
        ArrayViewD::from_shape(IxDyn(&self.shape()), &self.values)
            .map_err(|e| FactorError::Shape(e.to_string()))
    }
    fn indices<S: AsRef<str>>(&self, assignment: &[S]) -> Result<Vec<usize>> {
        if assignment.len() != self.scope.len() {
            return Err(FactorError::AssignmentLength {
                expected: self.scope.len(),
                got: assignment.len(),
            });
        }
        self.scope
            .iter()
            .zip(assignment)
            .map(|(var, value)| {
                var.value_index(value.as_ref())
                    .map_err(|_| FactorError::OutOfDomain {
                        var: var.name().to_owned(),
                        value: value.as_ref().to_owned(),
                    })
            })
            .collect()
    }
    fn flat<S: AsRef<str>>(&self, assignment: &[S]) -> Result<usize> {
        let idx = self.indices(assignment)?;
        Ok(flat_index(&self.shape(), &idx))
    }
    /// Value for `assignment`, given as one value per scope variable, in scope order.
    pub fn get_value<S: AsRef<str>>(&self, assignment: &[S]) -> Result<f64> {
        let idx = self.flat(assignment)?;
        Ok(self.values[idx])
    }
    /// Value for an assignment given by variable name. Extra variables are ignored.
    pub fn value_of(&self, assignment: &Assignment) -> Result<f64> {
        let values = self
            .scope
            .iter()
            .map(|var| {
                assignment
                    .get(var.name())
                    .map(String::as_str)
                    .ok_or_else(|| FactorError::Unassigned(var.name().to_owned()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.get_value(&values)
    }
    pub fn set_value<S: AsRef<str>>(&mut self, assignment: &[S], value: f64) -> Result<()> {
        let idx = self.flat(assignment)?;
        self.values[idx] = value;
        Ok(())
    }
    /// Bulk-load `(assignment, value)` rows, in any order. Either all rows are written, or
    /// none is (on error).
    pub fn set_values<S, I>(&mut self, rows: I) -> Result<()>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (Vec<S>, f64)>,
    {
        let cells = rows
            .into_iter()
            .map(|(assignment, value)| Ok((self.flat(&assignment)?, value)))
            .collect::<Result<Vec<_>>>()?;
        for (idx, value) in cells {
            self.values[idx] = value;
        }
        Ok(())
    }
}
