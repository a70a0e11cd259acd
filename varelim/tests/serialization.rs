mod common;

use common::{asia, observe, var};
use varelim::{infer, BayesNet, Config, Factor, Variable};

#[test]
fn network_bincode_roundtrip() {
    let net = asia();
    let bytes = bincode::serialize(&net).unwrap();
    let back: BayesNet = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back.factors(), net.factors());
    let evidence = [observe(&back, "XRay", "abnormal")];
    assert_eq!(
        infer(&back, &var(&back, "Cancer"), &evidence).unwrap(),
        infer(&net, &var(&net, "Cancer"), &evidence).unwrap()
    );
}

#[test]
fn evidence_is_not_serialized() {
    let v = Variable::new("XRay", ["abnormal", "normal"])
        .unwrap()
        .observed("normal")
        .unwrap();
    let back: Variable = bincode::deserialize(&bincode::serialize(&v).unwrap()).unwrap();
    assert_eq!(back.evidence(), None);
    assert_eq!(back.domain(), v.domain());
}

#[test]
fn invalid_factor_is_rejected() {
    // encoded as the same fields as a factor, with a table that is too short
    #[derive(serde::Serialize)]
    struct RawFactor {
        scope: Vec<Variable>,
        values: Vec<f64>,
    }
    let raw = RawFactor {
        scope: vec![Variable::new("A", ["a0", "a1"]).unwrap()],
        values: vec![1.0],
    };
    let bytes = bincode::serialize(&raw).unwrap();
    assert!(bincode::deserialize::<Factor>(&bytes).is_err());
}

#[test]
fn config_roundtrip() {
    let config = Config::min_weight().with_parallel_restrict(true);
    let back: Config = bincode::deserialize(&bincode::serialize(&config).unwrap()).unwrap();
    assert_eq!(back, config);
}
