use std::fmt;

use dataset::LabelColumn;
use machine_learning::metrics::ColumnErrors;

/// The outcome of one evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// The network's output columns, in order.
    pub columns: Vec<LabelColumn>,
    pub train_size: usize,
    pub test_size: usize,
    /// The columns whose errors were wrapped around `period`, empty if disabled.
    pub circular_columns: Vec<LabelColumn>,
    pub mae: ColumnErrors,
    pub mse: ColumnErrors,
    /// Plain MSE between normalized predictions and normalized test labels.
    pub normalized_mse: f32,
    /// Cosine loss between normalized predictions and normalized test labels.
    pub circular_loss: f32,
}

impl Report {
    /// MAE of `column`, if it was evaluated.
    pub fn mae_of(&self, column: LabelColumn) -> Option<f32> {
        self.position(column).and_then(|k| self.mae.get(k))
    }

    /// MSE of `column`, if it was evaluated.
    pub fn mse_of(&self, column: LabelColumn) -> Option<f32> {
        self.position(column).and_then(|k| self.mse.get(k))
    }

    fn position(&self, column: LabelColumn) -> Option<usize> {
        self.columns.iter().position(|&c| c == column)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "evaluated {} test samples (trained on {})",
            self.test_size, self.train_size
        )?;

        if !self.circular_columns.is_empty() {
            let names: Vec<_> = self.circular_columns.iter().map(|c| c.name()).collect();
            writeln!(f, "circular correction on: {}", names.join(", "))?;
        }

        writeln!(f, "{:<10} {:>14} {:>14}", "column", "mae", "mse")?;
        for (k, column) in self.columns.iter().enumerate() {
            writeln!(
                f,
                "{:<10} {:>14.6} {:>14.6}",
                column.name(),
                self.mae.get(k).unwrap_or(f32::NAN),
                self.mse.get(k).unwrap_or(f32::NAN)
            )?;
        }
        writeln!(
            f,
            "{:<10} {:>14.6} {:>14.6}",
            "overall",
            self.mae.overall(),
            self.mse.overall()
        )?;

        writeln!(f, "normalized mse loss:      {:.6}", self.normalized_mse)?;
        write!(f, "normalized circular loss: {:.6}", self.circular_loss)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn report() -> Report {
        Report {
            columns: vec![LabelColumn::HeadingX, LabelColumn::RotZ],
            train_size: 90,
            test_size: 10,
            circular_columns: vec![LabelColumn::HeadingX],
            mae: ColumnErrors::new(array![20., 0.5]),
            mse: ColumnErrors::new(array![400., 0.25]),
            normalized_mse: 0.125,
            circular_loss: 0.0625,
        }
    }

    #[test]
    fn lookups_by_column() {
        let report = report();

        assert_eq!(report.mae_of(LabelColumn::RotZ), Some(0.5));
        assert_eq!(report.mse_of(LabelColumn::HeadingX), Some(400.));
        assert_eq!(report.mae_of(LabelColumn::RotY), None);
    }

    #[test]
    fn display_lists_every_column_and_the_overall_means() {
        let text = report().to_string();

        assert!(text.contains("evaluated 10 test samples (trained on 90)"));
        assert!(text.contains("circular correction on: heading_x"));
        assert!(text.contains("heading_x"));
        assert!(text.contains("rot_z"));
        assert!(text.contains("10.250000"));
        assert!(text.contains("200.125000"));
        assert!(text.contains("normalized mse loss:      0.125000"));
    }
}
