use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::engine::{batch_loss, Engine};
use crate::train::evaluate::accuracy_of;
use crate::train::history::TrainingHistory;

impl Engine {
    /// Full-batch gradient descent for `epochs` epochs.
    ///
    /// Each epoch runs forward → loss → backward → record, in that order, over
    /// the whole of `x`. There is no shuffling and no early stopping, so a
    /// seeded engine trains identically on every run.
    ///
    /// With `verbose`, progress is logged at `info` roughly ten times per run
    /// and on the last epoch; otherwise every epoch is logged at `debug`.
    ///
    /// Shapes are checked once before the first epoch, so a mismatched call
    /// returns an error without touching the parameters.
    pub fn fit(&mut self, x: &Matrix, y: &Matrix, epochs: usize, verbose: bool) -> Result<TrainingHistory> {
        self.check_targets(x, y, "Engine::fit")?;

        let mut history = TrainingHistory::with_capacity(epochs);
        let report_every = (epochs / 10).max(1);
        let t_start = Instant::now();

        for epoch in 1..=epochs {
            let cache = self.forward(x)?;
            let loss = batch_loss(self.config().loss_function, y, &cache.output)?;
            let accuracy = accuracy_of(&cache.output, y);

            self.backward(x, y, &cache)?;
            history.record(epoch, loss, accuracy);

            if verbose && (epoch % report_every == 0 || epoch == epochs) {
                info!(epoch, epochs, loss, accuracy, "training progress");
            } else {
                debug!(epoch, loss, accuracy, "epoch complete");
            }
        }

        if verbose {
            info!(
                epochs,
                elapsed_ms = t_start.elapsed().as_millis() as u64,
                final_loss = history.final_loss(),
                "training finished"
            );
        }

        Ok(history)
    }
}
