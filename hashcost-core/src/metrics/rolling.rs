//! Trailing simple moving average.
//!
//! Window of `window` samples ending at the current index. The first
//! `window - 1` outputs have no value. A window containing a non-finite
//! sample yields no value.

/// Trailing mean over `window` samples.
///
/// Returns one entry per input; `None` where a full finite window is not
/// available. `window == 0` yields all `None`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];
    if window == 0 || n < window {
        return result;
    }

    let mut sum = 0.0;
    let mut bad_in_window = 0usize;
    for (i, &entering) in values.iter().enumerate() {
        if entering.is_finite() {
            sum += entering;
        } else {
            bad_in_window += 1;
        }

        if i >= window {
            let leaving = values[i - window];
            if leaving.is_finite() {
                sum -= leaving;
            } else {
                bad_in_window -= 1;
            }
        }

        if i + 1 >= window && bad_in_window == 0 {
            result[i] = Some(sum / window as f64);
        }
    }

    result
}
