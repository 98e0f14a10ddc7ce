use serde::{Serialize, Deserialize};

/// Statistics for one completed epoch of `Engine::fit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mean training loss, measured on the forward pass before this epoch's update.
    pub loss: f64,
    /// Training accuracy in [0, 1] from the same forward pass.
    pub accuracy: f64,
}

/// Append-only log of `(epoch, loss, accuracy)`; one record per completed epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    records: Vec<EpochRecord>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        TrainingHistory::default()
    }

    pub(crate) fn with_capacity(epochs: usize) -> Self {
        TrainingHistory { records: Vec::with_capacity(epochs) }
    }

    pub(crate) fn record(&mut self, epoch: usize, loss: f64, accuracy: f64) {
        self.records.push(EpochRecord { epoch, loss, accuracy });
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    pub fn final_loss(&self) -> Option<f64> {
        self.last().map(|r| r.loss)
    }

    /// Lowest recorded loss and the epoch it occurred in.
    pub fn best_loss(&self) -> Option<(usize, f64)> {
        self.records
            .iter()
            .filter(|r| !r.loss.is_nan())
            .min_by(|a, b| a.loss.total_cmp(&b.loss))
            .map(|r| (r.epoch, r.loss))
    }

    pub fn losses(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.loss).collect()
    }

    pub fn accuracies(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.accuracy).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_loss_reports_its_epoch() {
        let mut history = TrainingHistory::new();
        history.record(1, 0.9, 0.5);
        history.record(2, 0.4, 0.75);
        history.record(3, 0.6, 0.75);
        assert_eq!(history.best_loss(), Some((2, 0.4)));
        assert_eq!(history.final_loss(), Some(0.6));
        assert_eq!(history.len(), 3);
    }
}
