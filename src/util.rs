use itertools::{Itertools, MinMaxResult};

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn minimum(data: &[f64]) -> Option<f64> {
    data.iter().copied().reduce(f64::min)
}

/// Smallest and largest value in one pass, `None` for an empty slice.
pub fn bounds(data: &[f64]) -> Option<(f64, f64)> {
    match data.iter().copied().minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(only) => Some((only, only)),
        MinMaxResult::MinMax(low, high) => Some((low, high)),
    }
}
