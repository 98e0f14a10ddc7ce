use ferrite_backprop::{
    Activation, Engine, EngineError, InitMethod, LossFunction, Matrix, NetworkParameters,
    TrainingConfig,
};

fn params_2_3_1() -> NetworkParameters {
    NetworkParameters {
        w1: Matrix::from_rows(vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]]).unwrap(),
        b1: vec![0.01, 0.02, 0.03],
        w2: Matrix::from_rows(vec![vec![-0.1, -0.2, -0.3]]).unwrap(),
        b2: vec![0.5],
    }
}

#[test]
fn invalid_configs_are_rejected_at_construction() {
    let bad = [
        TrainingConfig::new(0, 3, 1),
        TrainingConfig::new(2, 0, 1),
        TrainingConfig::new(2, 3, 0),
        TrainingConfig::new(2, 3, 1).with_learning_rate(0.0),
        TrainingConfig::new(2, 3, 1).with_learning_rate(-0.1),
        TrainingConfig::new(2, 3, 1).with_learning_rate(f64::NAN),
        TrainingConfig::new(2, 3, 1).with_activation(Activation::LeakyReLU { alpha: f64::INFINITY }),
    ];
    for config in bad {
        assert!(matches!(Engine::new(config), Err(EngineError::Config(_))));
    }
}

#[test]
fn initial_parameters_have_configured_shapes_and_zero_biases() {
    let config = TrainingConfig::new(4, 5, 2).with_init(InitMethod::Random).with_seed(1);
    let params = Engine::new(config).unwrap().parameters();
    assert_eq!(params.w1.shape(), (5, 4));
    assert_eq!(params.w2.shape(), (2, 5));
    assert_eq!(params.b1, vec![0.0; 5]);
    assert_eq!(params.b2, vec![0.0; 2]);
    assert_eq!(params.len(), 20 + 5 + 10 + 2);
}

#[test]
fn parameters_round_trip_through_set_parameters() {
    let mut engine = Engine::new(TrainingConfig::new(2, 3, 1).with_seed(4)).unwrap();
    let p = params_2_3_1();
    engine.set_parameters(p.clone()).unwrap();
    assert_eq!(engine.parameters(), p);
}

#[test]
fn returned_parameters_are_a_deep_copy() {
    let mut engine = Engine::new(TrainingConfig::new(2, 3, 1).with_seed(4)).unwrap();
    engine.set_parameters(params_2_3_1()).unwrap();

    let mut copy = engine.parameters();
    *copy.w1.get_mut(0, 0) = 99.0;
    copy.b2[0] = -99.0;

    let fresh = engine.parameters();
    assert_eq!(fresh.w1.get(0, 0), 0.1);
    assert_eq!(fresh.b2[0], 0.5);
}

#[test]
fn wrongly_shaped_parameters_are_rejected() {
    let mut engine = Engine::new(TrainingConfig::new(2, 3, 1).with_seed(4)).unwrap();
    let before = engine.parameters();
    let mut p = params_2_3_1();
    p.b1.pop();
    assert!(matches!(engine.set_parameters(p), Err(EngineError::Shape { .. })));
    assert_eq!(engine.parameters(), before);
}

#[test]
fn config_is_fixed_after_construction() {
    let config = TrainingConfig::new(2, 3, 1)
        .with_activation(Activation::ReLU)
        .with_loss(LossFunction::BinaryCrossEntropy)
        .with_learning_rate(0.05);
    let engine = Engine::new(config.clone()).unwrap();
    assert_eq!(engine.config(), &config);
    assert_eq!(engine.config().init_method(), InitMethod::He);
}

#[test]
fn ragged_input_never_reaches_the_engine() {
    let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
    assert!(matches!(err, EngineError::Shape { .. }));
}
