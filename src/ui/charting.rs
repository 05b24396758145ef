use crate::history::ResultRecord;

/// Plot points for a WPM trend: x is the 1-based run number in the window.
pub fn trend_points(records: &[ResultRecord]) -> Vec<(f64, f64)> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| ((i + 1) as f64, r.wpm))
        .collect()
}

/// X (runs) and Y (WPM) upper bounds for the trend chart
pub fn compute_chart_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let highest_wpm = points.iter().map(|&(_, wpm)| wpm).fold(0.0, f64::max);
    let runs = points.last().map_or(1.0, |p| p.0).max(1.0);

    // leave a little headroom above the best run
    let ceiling = if highest_wpm > 0.0 {
        (highest_wpm + highest_wpm / 10.0).ceil()
    } else {
        10.0
    };
    (runs, ceiling)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

/// Horizontal bar scaled against the best value in view.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * width as f64) as usize;
    "█".repeat(len.min(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_for_empty_trend() {
        assert_eq!(compute_chart_bounds(&[]), (1.0, 10.0));
    }

    #[test]
    fn bounds_cover_best_run() {
        let (x, y) = compute_chart_bounds(&[(1.0, 40.0), (2.0, 60.0), (3.0, 50.0)]);
        assert_eq!(x, 3.0);
        assert_eq!(y, 66.0);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }

    #[test]
    fn bars_scale_to_max() {
        assert_eq!(bar(50.0, 100.0, 10).chars().count(), 5);
        assert_eq!(bar(100.0, 100.0, 10).chars().count(), 10);
        assert_eq!(bar(5.0, 0.0, 10), "");
    }
}
