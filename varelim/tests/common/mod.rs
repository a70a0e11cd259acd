// Shared fixtures: the "Asia" chest-clinic network and a brute-force reference posterior.
#![allow(dead_code)]

use ndarray::Array1;
use varelim::assignment::AssignmentCounter;
use varelim::{Assignment, BayesNet, Variable};

pub fn asia() -> BayesNet {
    let mut b = BayesNet::builder();
    b.add_variable("VisitAsia", ["visit", "no_visit"]).unwrap();
    b.add_variable("Smoking", ["smoker", "nonsmoker"]).unwrap();
    b.add_variable("Tuberculosis", ["present", "absent"]).unwrap();
    b.add_variable("Cancer", ["present", "absent"]).unwrap();
    b.add_variable("Bronchitis", ["present", "absent"]).unwrap();
    b.add_variable("TBorCA", ["yes", "no"]).unwrap();
    b.add_variable("Dyspnea", ["present", "absent"]).unwrap();
    b.add_variable("XRay", ["abnormal", "normal"]).unwrap();

    b.add_cpt("VisitAsia", &[], vec![0.01, 0.99]).unwrap();
    b.add_cpt("Smoking", &[], vec![0.5, 0.5]).unwrap();
    b.add_cpt("Tuberculosis", &["VisitAsia"], vec![0.05, 0.01, 0.95, 0.99])
        .unwrap();
    b.add_cpt("Cancer", &["Smoking"], vec![0.1, 0.01, 0.9, 0.99])
        .unwrap();
    b.add_cpt("Bronchitis", &["Smoking"], vec![0.6, 0.3, 0.4, 0.7])
        .unwrap();
    // deterministic OR
    b.add_cpt_rows(
        "TBorCA",
        &["Tuberculosis", "Cancer"],
        vec![
            (vec!["yes", "present", "present"], 1.0),
            (vec!["yes", "present", "absent"], 1.0),
            (vec!["yes", "absent", "present"], 1.0),
            (vec!["no", "absent", "absent"], 1.0),
        ],
    )
    .unwrap();
    b.add_cpt(
        "Dyspnea",
        &["TBorCA", "Bronchitis"],
        vec![0.9, 0.7, 0.8, 0.1, 0.1, 0.3, 0.2, 0.9],
    )
    .unwrap();
    b.add_cpt("XRay", &["TBorCA"], vec![0.98, 0.05, 0.02, 0.95])
        .unwrap();
    b.build().unwrap()
}

pub fn var(net: &BayesNet, name: &str) -> Variable {
    net.var(name).unwrap().clone()
}

pub fn observe(net: &BayesNet, name: &str, value: &str) -> Variable {
    net.var(name).unwrap().observed(value).unwrap()
}

/// Posterior by summing the full joint distribution.
pub fn brute_force(net: &BayesNet, query: &Variable, evidence: &[Variable]) -> Array1<f64> {
    let vars: Vec<&Variable> = net.variables().collect();
    let shape: Vec<usize> = vars.iter().map(|v| v.domain_size()).collect();
    let mut res = Array1::<f64>::zeros(query.domain_size());
    let mut counter = AssignmentCounter::new(&shape);
    while let Some(idx) = counter.next() {
        let assignment: Assignment = vars
            .iter()
            .zip(idx)
            .map(|(v, i)| (v.name().to_owned(), v.domain()[*i].clone()))
            .collect();
        let consistent = evidence
            .iter()
            .all(|e| Some(assignment[e.name()].as_str()) == e.evidence());
        if !consistent {
            continue;
        }
        let joint: f64 = net
            .factors()
            .iter()
            .map(|f| f.value_of(&assignment).unwrap())
            .product();
        let q = query.value_index(&assignment[query.name()]).unwrap();
        res[q] += joint;
    }
    let total = res.sum();
    if total > 0.0 {
        res / total
    } else {
        res
    }
}
