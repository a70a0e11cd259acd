mod common;

use common::{asia, observe, var};
use varelim::{Config, InferenceError, Query, VariableElimination};

#[test]
fn parallel_queries_agree_with_sequential() {
    let net = asia();
    let mut queries = Vec::new();
    for q in net.variables() {
        queries.push(Query::new(q.clone(), vec![]));
        queries.push(Query::new(
            q.clone(),
            vec![observe(&net, "XRay", "abnormal")],
        ));
        queries.push(Query::new(
            q.clone(),
            vec![
                observe(&net, "Smoking", "nonsmoker"),
                observe(&net, "Dyspnea", "present"),
            ],
        ));
    }
    let ve = VariableElimination::new(Config::default().with_parallel_restrict(true));
    let results = ve.infer_many(&net, &queries);
    assert_eq!(results.len(), queries.len());
    for (q, res) in queries.iter().zip(results) {
        let expected = ve.infer(&net, &q.query, &q.evidence).unwrap();
        assert_eq!(res.unwrap(), expected);
    }
}

#[test]
fn failures_stay_with_their_query() {
    let net = asia();
    let queries = vec![
        Query::new(var(&net, "Cancer"), vec![]),
        Query::new(var(&net, "Cancer"), vec![var(&net, "XRay")]),
    ];
    let results = VariableElimination::default().infer_many(&net, &queries);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().unwrap_err(),
        &InferenceError::MissingEvidence("XRay".to_owned())
    );
}
