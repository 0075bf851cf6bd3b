// Bounded moving-average smoothing for chart series

/// Smooths `values` with a truncated moving-average window.
///
/// `output[i]` is the arithmetic mean of `values[max(0, i-w) ..= min(n-1, i+w)]`.
/// Edge windows shrink instead of wrapping or zero-padding, so boundary
/// averages cover fewer samples. An empty input yields an empty output.
pub fn moving_average(values: &[f64], half_window: usize) -> Vec<f64> {
    let n = values.len();
    let mut smoothed = Vec::with_capacity(n);

    for i in 0..n {
        let start = i.saturating_sub(half_window);
        let end = usize::min(n - 1, i.saturating_add(half_window));
        let window = &values[start..=end];
        let sum: f64 = window.iter().sum();
        smoothed.push(sum / window.len() as f64);
    }

    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_length_matches_input() {
        for len in [1, 2, 5, 17] {
            let values: Vec<f64> = (0..len).map(|i| i as f64).collect();
            assert_eq!(moving_average(&values, 3).len(), len);
        }
    }

    #[test]
    fn test_zero_window_is_identity() {
        let values = vec![4.0, -2.5, 0.0, 9.75];
        assert_eq!(moving_average(&values, 0), values);
    }

    #[test]
    fn test_constant_input_is_a_fixed_point() {
        let values = vec![7.0; 6];
        assert_eq!(moving_average(&values, 2), values);
    }

    #[test]
    fn test_edge_windows_truncate() {
        assert_eq!(moving_average(&[1.0, 2.0, 3.0], 1), vec![1.5, 2.0, 2.5]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(moving_average(&[], 3).is_empty());
    }

    #[test]
    fn test_window_wider_than_input_averages_everything() {
        let smoothed = moving_average(&[2.0, 4.0, 6.0], 10);
        assert_eq!(smoothed, vec![4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_enormous_windows_saturate_instead_of_overflowing() {
        let smoothed = moving_average(&[2.0, 6.0], usize::MAX);
        assert_eq!(smoothed, vec![4.0, 4.0]);
    }
}
