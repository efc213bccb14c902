//! Rolling triaxial sample window
//!
//! Fixed-capacity FIFO buffer of acceleration samples with a decoupled,
//! dynamically estimated sampling rate. Mutated only by the sensor ingest
//! path; the periodic analysis task takes owned snapshots so no slice ever
//! aliases the live buffer across the task boundary.

use std::collections::VecDeque;

/// Fixed-capacity rolling buffer of triaxial acceleration samples.
#[derive(Debug, Clone)]
pub struct SignalWindow {
    vertical: VecDeque<f64>,
    horizontal_x: VecDeque<f64>,
    horizontal_y: VecDeque<f64>,
    capacity: usize,
    /// Instantaneous sampling rate from the most recent admitted pair of
    /// timestamps (1/dt), not an average. 0 until the first sample lands.
    sampling_rate: f64,
}

impl SignalWindow {
    /// Create an empty window with the given fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            vertical: VecDeque::with_capacity(capacity),
            horizontal_x: VecDeque::with_capacity(capacity),
            horizontal_y: VecDeque::with_capacity(capacity),
            capacity,
            sampling_rate: 0.0,
        }
    }

    /// Admit one sample.
    ///
    /// Rejects the sample (no-op, rate estimate untouched) when `dt <= 0`,
    /// which covers duplicate and out-of-order timestamps. Otherwise the
    /// sampling rate becomes `1/dt` and the sample is appended, evicting
    /// the oldest entry if the buffer is already at capacity.
    ///
    /// Returns whether the sample was admitted.
    pub fn add_sample(&mut self, vertical: f64, horizontal_x: f64, horizontal_y: f64, dt: f64) -> bool {
        if dt <= 0.0 {
            tracing::trace!(dt, "Dropping sample with non-positive dt");
            return false;
        }

        self.sampling_rate = 1.0 / dt;

        if self.vertical.len() >= self.capacity {
            self.vertical.pop_front();
            self.horizontal_x.pop_front();
            self.horizontal_y.pop_front();
        }
        self.vertical.push_back(vertical);
        self.horizontal_x.push_back(horizontal_x);
        self.horizontal_y.push_back(horizontal_y);
        true
    }

    /// Owned copy of the vertical-axis contents, oldest first.
    pub fn snapshot_vertical(&self) -> Vec<f64> {
        self.vertical.iter().copied().collect()
    }

    /// Owned copy of the horizontal-X contents, oldest first.
    pub fn snapshot_horizontal_x(&self) -> Vec<f64> {
        self.horizontal_x.iter().copied().collect()
    }

    /// Owned copy of the horizontal-Y contents, oldest first.
    pub fn snapshot_horizontal_y(&self) -> Vec<f64> {
        self.horizontal_y.iter().copied().collect()
    }

    /// Empty the buffer and reset the rate estimate to 0.
    pub fn clear(&mut self) {
        self.vertical.clear();
        self.horizontal_x.clear();
        self.horizontal_y.clear();
        self.sampling_rate = 0.0;
    }

    /// Number of samples currently buffered.
    pub fn len(&self) -> usize {
        self.vertical.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty()
    }

    /// Whether the buffer has reached its fixed capacity.
    pub fn is_full(&self) -> bool {
        self.vertical.len() >= self.capacity
    }

    /// Fixed capacity this window was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent instantaneous sampling-rate estimate in Hz.
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut window = SignalWindow::new(3);
        for i in 0..5 {
            assert!(window.add_sample(i as f64, 0.0, 0.0, 0.02));
        }
        assert_eq!(window.len(), 3);
        assert!(window.is_full());
        // Oldest two evicted, order preserved
        assert_eq!(window.snapshot_vertical(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_non_positive_dt_is_dropped() {
        let mut window = SignalWindow::new(4);
        window.add_sample(1.0, 0.0, 0.0, 0.05);
        let rate_before = window.sampling_rate();

        assert!(!window.add_sample(2.0, 0.0, 0.0, 0.0));
        assert!(!window.add_sample(3.0, 0.0, 0.0, -0.01));

        assert_eq!(window.len(), 1);
        // Rate estimate left unchanged by rejected samples
        assert!((window.sampling_rate() - rate_before).abs() < 1e-12);
    }

    #[test]
    fn test_sampling_rate_is_instantaneous() {
        let mut window = SignalWindow::new(8);
        window.add_sample(0.0, 0.0, 0.0, 0.02); // 50 Hz
        assert!((window.sampling_rate() - 50.0).abs() < 1e-9);
        window.add_sample(0.0, 0.0, 0.0, 0.01); // 100 Hz, not averaged
        assert!((window.sampling_rate() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_axes_stay_aligned() {
        let mut window = SignalWindow::new(2);
        window.add_sample(1.0, 10.0, 100.0, 0.02);
        window.add_sample(2.0, 20.0, 200.0, 0.02);
        window.add_sample(3.0, 30.0, 300.0, 0.02);

        assert_eq!(window.snapshot_vertical(), vec![2.0, 3.0]);
        assert_eq!(window.snapshot_horizontal_x(), vec![20.0, 30.0]);
        assert_eq!(window.snapshot_horizontal_y(), vec![200.0, 300.0]);
    }

    #[test]
    fn test_clear_resets_rate() {
        let mut window = SignalWindow::new(4);
        window.add_sample(1.0, 2.0, 3.0, 0.02);
        window.clear();

        assert!(window.is_empty());
        assert_eq!(window.sampling_rate(), 0.0);
        assert!(window.snapshot_vertical().is_empty());
    }

    #[test]
    fn test_snapshot_is_owned_copy() {
        let mut window = SignalWindow::new(4);
        window.add_sample(1.0, 0.0, 0.0, 0.02);
        let snapshot = window.snapshot_vertical();
        window.add_sample(2.0, 0.0, 0.0, 0.02);
        // Snapshot unaffected by later writes
        assert_eq!(snapshot, vec![1.0]);
    }
}
