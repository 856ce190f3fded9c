use statrs::statistics::{Data, OrderStatistics};

use crate::models::BoxSummary;

/// `part / whole * 100`, or `None` when there is nothing to divide by.
pub fn percentage(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        return None;
    }
    Some(part / whole * 100.0)
}

/// Win percentage from a win/loss record (basketball has no draws)
pub fn calculate_win_percentage(wins: u32, losses: u32) -> Option<f64> {
    percentage(wins as f64, (wins + losses) as f64)
}

/// Convert a chronological list of results to a form string, most recent first (e.g. "WLWWL")
pub fn results_to_form(results: &[bool]) -> String {
    results
        .iter()
        .rev()
        .take(5)
        .map(|&won| if won { 'W' } else { 'L' })
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut data = Data::new(values.to_vec());
    Some(data.median())
}

/// Min, quartiles, median and max of a sample. `None` for an empty sample.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut data = Data::new(values.to_vec());
    Some(BoxSummary {
        count: values.len(),
        min,
        q1: data.lower_quartile(),
        median: data.median(),
        q3: data.upper_quartile(),
        max,
    })
}

/// Format a count with thousands separators (e.g. 26,651)
pub fn format_thousands(num: usize) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_guards_zero() {
        assert_eq!(percentage(1.0, 4.0), Some(25.0));
        assert_eq!(percentage(0.0, 0.0), None);
    }

    #[test]
    fn test_calculate_win_percentage() {
        assert_eq!(calculate_win_percentage(3, 1), Some(75.0));
        assert_eq!(calculate_win_percentage(0, 0), None);
    }

    #[test]
    fn test_results_to_form() {
        let results = [true, true, false, true, false, false, true];
        assert_eq!(results_to_form(&results), "WLLWL");
        assert_eq!(results_to_form(&[]), "");
    }

    #[test]
    fn test_median() {
        assert!((median(&[3.0, 1.0, 2.0]).unwrap() - 2.0).abs() < 1e-9);
        assert!((median(&[4.0, 1.0, 3.0, 2.0]).unwrap() - 2.5).abs() < 1e-9);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_box_summary_ordering() {
        let summary = box_summary(&[0.2, 0.8, 0.5, 0.35, 0.65]).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 0.2);
        assert_eq!(summary.max, 0.8);
        assert!((summary.median - 0.5).abs() < 1e-9);
        assert!(summary.min <= summary.q1 && summary.q1 <= summary.median);
        assert!(summary.median <= summary.q3 && summary.q3 <= summary.max);
        assert!(box_summary(&[]).is_none());
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(7), "7");
        assert_eq!(format_thousands(26651), "26,651");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
