//! Solution of one integration run: one state vector per time grid point.
//!
//! The accessors hand the data out as plain `Vec<f64>` sequences so that plotting
//! or export code does not depend on the solver internals.
use crate::ReactorsIVP::reactor_error::ReactorError;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    time: Vec<f64>,
    states: Vec<DVector<f64>>,
    labels: Vec<String>,
}

/// column-oriented form used for JSON export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub time: Vec<f64>,
    pub labels: Vec<String>,
    pub columns: Vec<Vec<f64>>,
}

impl Trajectory {
    /// `time` and `states` must have equal length and every state the length of `labels`
    pub(crate) fn new(time: Vec<f64>, states: Vec<DVector<f64>>, labels: Vec<String>) -> Self {
        debug_assert_eq!(time.len(), states.len());
        debug_assert!(states.iter().all(|s| s.len() == labels.len()));
        Self {
            time,
            states,
            labels,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn states(&self) -> &[DVector<f64>] {
        &self.states
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn state_at(&self, index: usize) -> Option<&DVector<f64>> {
        self.states.get(index)
    }

    pub fn initial_state(&self) -> Option<&DVector<f64>> {
        self.states.first()
    }

    pub fn final_state(&self) -> Option<&DVector<f64>> {
        self.states.last()
    }

    /// values of one state component over the whole grid
    pub fn component(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.dim() {
            return None;
        }
        Some(self.states.iter().map(|s| s[index]).collect())
    }

    pub fn component_by_label(&self, label: &str) -> Option<Vec<f64>> {
        let index = self.labels.iter().position(|l| l == label)?;
        self.component(index)
    }

    /// states as a (n_points x dim) matrix, rows aligned to the time grid
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.len(), self.dim(), |i, j| self.states[i][j])
    }

    pub fn to_record(&self) -> TrajectoryRecord {
        TrajectoryRecord {
            time: self.time.clone(),
            labels: self.labels.clone(),
            columns: (0..self.dim())
                .filter_map(|j| self.component(j))
                .collect(),
        }
    }

    pub fn save_json(&self, path: &str) -> Result<(), ReactorError> {
        let json = serde_json::to_string_pretty(&self.to_record())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Prints every `every`-th row (and always the last one) as a table.
    pub fn pretty_print(&self, every: usize) {
        use prettytable::{Cell, Row, Table};
        let every = every.max(1);
        let mut table = Table::new();
        let mut header = vec![Cell::new("t")];
        header.extend(self.labels.iter().map(|l| Cell::new(l)));
        table.add_row(Row::new(header));
        for (i, (t, state)) in self.time.iter().zip(self.states.iter()).enumerate() {
            if i % every != 0 && i + 1 != self.len() {
                continue;
            }
            let mut cells = vec![Cell::new(&format!("{:.4}", t))];
            cells.extend(state.iter().map(|v| Cell::new(&format!("{:.4e}", v))));
            table.add_row(Row::new(cells));
        }
        table.printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        Trajectory::new(
            vec![0.0, 1.0, 2.0],
            vec![
                DVector::from_vec(vec![10.0, 1.0]),
                DVector::from_vec(vec![8.0, 2.0]),
                DVector::from_vec(vec![5.0, 3.0]),
            ],
            vec!["S".to_string(), "X".to_string()],
        )
    }

    #[test]
    fn test_components() {
        let traj = sample();
        assert_eq!(traj.len(), 3);
        assert_eq!(traj.dim(), 2);
        assert_eq!(traj.component(0).unwrap(), vec![10.0, 8.0, 5.0]);
        assert_eq!(traj.component_by_label("X").unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(traj.component(2).is_none());
        assert!(traj.component_by_label("C").is_none());
        assert_eq!(traj.final_state().unwrap()[0], 5.0);
    }

    #[test]
    fn test_matrix_and_record() {
        let traj = sample();
        let m = traj.to_matrix();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m[(1, 1)], 2.0);
        let record = traj.to_record();
        assert_eq!(record.columns[0], vec![10.0, 8.0, 5.0]);
        assert_eq!(record.labels, vec!["S".to_string(), "X".to_string()]);
    }

    #[test]
    fn test_save_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.json");
        let path = path.to_str().unwrap();
        sample().save_json(path).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        let record: TrajectoryRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(record, sample().to_record());
    }
}
