use approx::assert_abs_diff_eq;
use ferrite_backprop::activation::{sigmoid, tanh};
use ferrite_backprop::{Activation, Engine, EngineError, Matrix, NetworkParameters, TrainingConfig};

fn fixed_params() -> NetworkParameters {
    NetworkParameters {
        w1: Matrix::from_rows(vec![vec![0.5, -0.25], vec![1.0, 0.75], vec![-0.5, 0.5]]).unwrap(),
        b1: vec![0.1, -0.2, 0.0],
        w2: Matrix::from_rows(vec![vec![0.3, -0.7, 1.1]]).unwrap(),
        b2: vec![-0.05],
    }
}

fn engine_with(activation: Activation) -> Engine {
    let config = TrainingConfig::new(2, 3, 1).with_activation(activation).with_seed(1);
    let mut engine = Engine::new(config).unwrap();
    engine.set_parameters(fixed_params()).unwrap();
    engine
}

#[test]
fn cache_shapes_follow_batch_and_layer_sizes() {
    let engine = engine_with(Activation::Sigmoid);
    let x = Matrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 1.0], vec![2.0, -1.0], vec![0.5, 0.5]]).unwrap();
    let cache = engine.forward(&x).unwrap();
    assert_eq!(cache.z1.shape(), (4, 3));
    assert_eq!(cache.h.shape(), (4, 3));
    assert_eq!(cache.z2.shape(), (4, 1));
    assert_eq!(cache.output.shape(), (4, 1));
    assert_eq!(cache.batch_size(), 4);
}

#[test]
fn hidden_activation_is_configurable_but_output_is_always_sigmoid() {
    let x = Matrix::from_rows(vec![vec![1.0, -2.0]]).unwrap();
    let params = fixed_params();
    let z1: Vec<f64> = (0..3)
        .map(|k| params.w1.get(k, 0) * 1.0 + params.w1.get(k, 1) * -2.0 + params.b1[k])
        .collect();

    for act in [Activation::Sigmoid, Activation::Tanh, Activation::ReLU, Activation::leaky_relu()] {
        let cache = engine_with(act).forward(&x).unwrap();
        let mut z2 = params.b2[0];
        for k in 0..3 {
            let h = act.function(z1[k]);
            assert_abs_diff_eq!(cache.z1.get(0, k), z1[k], epsilon = 1e-12);
            assert_abs_diff_eq!(cache.h.get(0, k), h, epsilon = 1e-12);
            z2 += params.w2.get(0, k) * h;
        }
        assert_abs_diff_eq!(cache.z2.get(0, 0), z2, epsilon = 1e-12);
        assert_abs_diff_eq!(cache.output.get(0, 0), sigmoid(z2), epsilon = 1e-12);
    }

    let cache = engine_with(Activation::Tanh).forward(&x).unwrap();
    assert_abs_diff_eq!(cache.h.get(0, 1), tanh(z1[1]), epsilon = 1e-12);
}

#[test]
fn rows_are_independent() {
    let engine = engine_with(Activation::Tanh);
    let a = vec![0.3, -0.8];
    let b = vec![-1.5, 2.0];
    let batch = engine.forward(&Matrix::from_rows(vec![a.clone(), b.clone()]).unwrap()).unwrap();
    let single_b = engine.forward(&Matrix::from_rows(vec![b]).unwrap()).unwrap();
    assert_eq!(batch.output.row(1), single_b.output.row(0));
    assert_eq!(batch.z1.row(1), single_b.z1.row(0));
}

#[test]
fn forward_does_not_touch_parameters() {
    let engine = engine_with(Activation::ReLU);
    let before = engine.parameters();
    engine.forward(&Matrix::from_rows(vec![vec![4.0, 4.0]]).unwrap()).unwrap();
    assert_eq!(engine.parameters(), before);
}

#[test]
fn huge_inputs_saturate_instead_of_producing_nan() {
    let engine = engine_with(Activation::ReLU);
    let x = Matrix::from_rows(vec![vec![1e6, -1e6], vec![-1e6, 1e6]]).unwrap();
    let cache = engine.forward(&x).unwrap();
    for p in cache.output.iter_rows().flatten() {
        assert!(p.is_finite());
        assert!((0.0..=1.0).contains(p));
    }
}

#[test]
fn wrong_feature_count_is_a_shape_error() {
    let engine = engine_with(Activation::Sigmoid);
    let x = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
    assert!(matches!(engine.forward(&x), Err(EngineError::Shape { .. })));
}

#[test]
fn empty_batch_is_a_shape_error() {
    let engine = engine_with(Activation::Sigmoid);
    assert!(matches!(engine.forward(&Matrix::default()), Err(EngineError::Shape { .. })));
}
