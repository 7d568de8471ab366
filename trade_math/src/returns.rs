//! Price-change transforms
//!
//! Row-aligned differences, percent returns, rate of change and lags. Rows
//! without enough history are `None`.

use crate::{ensure_period, Result, Series};

/// `values[t] - values[t - lag]`
pub fn diff(values: &[f64], lag: usize) -> Result<Series> {
    ensure_period(lag)?;

    Ok((0..values.len())
        .map(|t| t.checked_sub(lag).map(|prev| values[t] - values[prev]))
        .collect())
}

/// Fractional change `values[t] / values[t - lag] - 1`
///
/// A zero base gives an infinite (or NaN) entry rather than `None`.
pub fn pct_change(values: &[f64], lag: usize) -> Result<Series> {
    ensure_period(lag)?;

    Ok((0..values.len())
        .map(|t| {
            t.checked_sub(lag)
                .map(|prev| values[t] / values[prev] - 1.0)
        })
        .collect())
}

/// Rate of change in percent over `lag` rows
pub fn rate_of_change(values: &[f64], lag: usize) -> Result<Series> {
    Ok(pct_change(values, lag)?
        .into_iter()
        .map(|v| v.map(|change| change * 100.0))
        .collect())
}

/// Momentum over `lag` rows, the absolute price change
pub fn momentum(values: &[f64], lag: usize) -> Result<Series> {
    diff(values, lag)
}

/// Shift a column by `offset` rows.
///
/// Positive offsets look back (row `t` takes `values[t - offset]`), negative
/// offsets look ahead. Positions that fall off either end are `None`.
pub fn shift(values: &[Option<f64>], offset: isize) -> Series {
    let len = values.len() as isize;

    (0..len)
        .map(|t| {
            let source = t - offset;
            if (0..len).contains(&source) {
                values[source as usize]
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_diff_and_momentum() {
        let values = [1.0, 3.0, 6.0, 10.0];
        assert_eq!(diff(&values, 1).unwrap(), vec![None, Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(momentum(&values, 2).unwrap(), vec![None, None, Some(5.0), Some(7.0)]);
    }

    #[test]
    fn test_pct_change_and_roc() {
        let values = [100.0, 110.0, 99.0];
        let changes = pct_change(&values, 1).unwrap();
        assert_eq!(changes[0], None);
        assert_relative_eq!(changes[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(changes[2].unwrap(), -0.1, epsilon = 1e-12);

        let roc = rate_of_change(&values, 2).unwrap();
        assert_relative_eq!(roc[2].unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pct_change_from_zero_is_infinite() {
        let changes = pct_change(&[0.0, 1.0], 1).unwrap();
        assert!(changes[1].unwrap().is_infinite());
    }

    #[test]
    fn test_shift_both_directions() {
        let column = vec![Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(shift(&column, 1), vec![None, Some(1.0), Some(2.0)]);
        assert_eq!(shift(&column, -2), vec![Some(3.0), None, None]);
    }
}
