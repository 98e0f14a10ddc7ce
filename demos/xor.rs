use ferrite_backprop::{
    check_gradients, gradcheck::DEFAULT_EPSILON, Activation, Engine, LossFunction, Matrix,
    TrainingConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> ferrite_backprop::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TrainingConfig::new(2, 4, 1)
        .with_activation(Activation::Sigmoid)
        .with_loss(LossFunction::BinaryCrossEntropy)
        .with_learning_rate(1.0)
        .with_seed(42);
    let mut engine = Engine::new(config)?;

    let inputs = Matrix::from_rows(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ])?;
    let expected_outputs = Matrix::from_rows(vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]])?;

    let report = check_gradients(&engine, &inputs, &expected_outputs, DEFAULT_EPSILON)?;
    println!(
        "Gradient check before training: max difference {:.2e} ({:?})",
        report.max_difference, report.verdict
    );

    let history = engine.fit(&inputs, &expected_outputs, 2000, true)?;
    if let Some(last) = history.last() {
        println!("Epoch {}: loss = {:.6}, accuracy = {:.2}", last.epoch, last.loss, last.accuracy);
    }

    let proba = engine.predict_proba(&inputs)?;
    let labels = engine.predict(&inputs)?;
    for ((input, p), label) in inputs.iter_rows().zip(proba.iter_rows()).zip(labels) {
        println!("Input: {:?} -> Output: {:.4} (class {label})", input, p[0]);
    }

    Ok(())
}
