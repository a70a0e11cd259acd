//! Joint assignment enumeration.
//!
//! A joint assignment over a scope is a list of domain indices, one per scope variable. The
//! assignments of a scope are enumerated in mixed-radix order: the last variable varies
//! fastest, which is also the order of the flat factor tables.

/// Row-major strides of `shape`: `strides[i] = Π_{j>i} shape[j]`.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut res = vec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        res[i] = res[i + 1] * shape[i + 1];
    }
    res
}

/// Flat index of the assignment `idx` in a table of the given `shape`.
pub fn flat_index(shape: &[usize], idx: &[usize]) -> usize {
    debug_assert_eq!(shape.len(), idx.len());
    idx.iter().zip(shape).fold(0, |acc, (i, n)| acc * n + i)
}

/// Single-pass counter over all the joint assignments of a shape.
///
/// The empty shape has exactly one (empty) assignment.
#[derive(Debug, Clone)]
pub struct AssignmentCounter {
    shape: Vec<usize>,
    current: Vec<usize>,
    started: bool,
    done: bool,
}

impl AssignmentCounter {
    pub fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            current: vec![0; shape.len()],
            started: false,
            done: shape.iter().any(|n| *n == 0),
        }
    }
    /// Number of assignments that the counter goes through.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Advance to the next assignment and return it, or `None` once all have been visited.
    pub fn next(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.current);
        }
        for pos in (0..self.shape.len()).rev() {
            self.current[pos] += 1;
            if self.current[pos] < self.shape[pos] {
                return Some(&self.current);
            }
            self.current[pos] = 0;
        }
        // wrapped around
        self.done = true;
        None
    }
}
