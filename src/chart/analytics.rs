//! Pure series transforms feeding the chart builders.
//!
//! Undefined points are `None` so they serialize as gaps in the plot.

use crate::error::ChartError;

/// Trailing window for the moving-average chart.
pub const MOVING_AVERAGE_WINDOW: usize = 50;

/// `(v[t] - v[t-1]) / v[t-1]`; same length as the input, first slot `None`.
pub fn daily_returns(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(values.windows(2).map(|w| {
        let (prev, cur) = (w[0], w[1]);
        if prev == 0.0 || !prev.is_finite() {
            None
        } else {
            Some((cur - prev) / prev)
        }
    }));
    out
}

/// Trailing simple moving average; `None` until `window` samples are available.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        out.push(if i + 1 >= window {
            Some(sum / window as f64)
        } else {
            None
        });
    }
    out
}

/// Divide every value by the first so the series starts at exactly 1.0.
pub fn normalize(values: &[f64]) -> Result<Vec<f64>, ChartError> {
    let Some(&base) = values.first() else {
        return Err(ChartError::MalformedSeries("cannot normalize an empty series".into()));
    };
    if base == 0.0 || !base.is_finite() {
        return Err(ChartError::MalformedSeries(format!(
            "cannot normalize against first value {}",
            base
        )));
    }
    Ok(values.iter().map(|v| v / base).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_returns() {
        let r = daily_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 3);
        assert_eq!(r[0], None);
        assert!((r[1].unwrap() - 0.10).abs() < 1e-12);
        assert!((r[2].unwrap() + 0.10).abs() < 1e-12);

        assert!(daily_returns(&[]).is_empty());
        assert_eq!(daily_returns(&[5.0]), vec![None]);
        assert_eq!(daily_returns(&[0.0, 1.0])[1], None);
    }

    #[test]
    fn test_moving_average_constant_series() {
        let v = vec![42.5; 60];
        let ma = moving_average(&v, MOVING_AVERAGE_WINDOW);
        assert_eq!(ma.len(), 60);
        assert!(ma[..49].iter().all(Option::is_none));
        assert!(ma[49..].iter().all(|x| (x.unwrap() - 42.5).abs() < 1e-9));
    }

    #[test]
    fn test_moving_average_short_series_is_all_undefined() {
        let ma = moving_average(&[1.0; 49], MOVING_AVERAGE_WINDOW);
        assert_eq!(ma.len(), 49);
        assert!(ma.iter().all(Option::is_none));
    }

    #[test]
    fn test_moving_average_trails() {
        let ma = moving_average(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(ma, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_normalize() {
        let n = normalize(&[50.0, 55.0, 25.0]).unwrap();
        assert_eq!(n[0], 1.0);
        assert_eq!(n[1], 55.0 / 50.0);
        assert_eq!(n[2], 0.5);

        assert!(matches!(normalize(&[]), Err(ChartError::MalformedSeries(_))));
        assert!(matches!(normalize(&[0.0, 1.0]), Err(ChartError::MalformedSeries(_))));
    }
}
