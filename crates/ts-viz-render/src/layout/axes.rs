use chrono::{Datelike, NaiveDate};

/// One plot axis: data range, tick positions with their labels, and a title.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
}

impl Axis {
    /// Linear value axis snapped outward to 1/2/5 × 10ⁿ steps.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (lo, hi) = if data_min <= data_max { (data_min, data_max) } else { (data_max, data_min) };
        if hi - lo < 1e-12 {
            return Self::auto_linear(lo - 1.0, hi + 1.0, target_ticks);
        }
        let step = tick_step((hi - lo) / target_ticks.max(2).saturating_sub(1) as f64);
        let first = (lo / step).floor() as i64;
        let last = (hi / step).ceil() as i64;
        let decimals = if step >= 1.0 { 0 } else { (-step.log10()).ceil() as usize };

        let tick_positions: Vec<f64> = (first..=last).map(|i| i as f64 * step).collect();
        let tick_labels = tick_positions
            .iter()
            .map(|&v| {
                // Keep "-0" out of the labels.
                let v = if v.abs() < step * 1e-6 { 0.0 } else { v };
                format!("{v:.decimals$}")
            })
            .collect();

        Self {
            min: first as f64 * step,
            max: last as f64 * step,
            label: String::new(),
            tick_positions,
            tick_labels,
        }
    }

    /// Time axis in fractional years, one labeled tick per January 1st.
    ///
    /// The range is padded by a quarter on both sides of the data.
    pub fn years(first: NaiveDate, last: NaiveDate) -> Self {
        let (lo, hi) = if first <= last { (first, last) } else { (last, first) };
        let min = year_fraction(lo) - 0.25;
        let max = year_fraction(hi) + 0.25;

        let years: Vec<i32> = (lo.year()..=hi.year() + 1).filter(|&y| (min..=max).contains(&f64::from(y))).collect();
        Self {
            min,
            max,
            label: String::new(),
            tick_positions: years.iter().map(|&y| f64::from(y)).collect(),
            tick_labels: years.iter().map(i32::to_string).collect(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// `(position, label)` pairs.
    pub fn ticks(&self) -> impl Iterator<Item = (f64, &str)> {
        self.tick_positions.iter().copied().zip(self.tick_labels.iter().map(String::as_str))
    }

    /// Linear map of a data value onto `[px_min, px_max]`.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        px_min + (value - self.min) / (self.max - self.min) * (px_max - px_min)
    }
}

/// Date as fractional year (`2021-01-20` → 2021.052).
pub fn year_fraction(date: NaiveDate) -> f64 {
    let days = if date.leap_year() { 366.0 } else { 365.0 };
    f64::from(date.year()) + f64::from(date.ordinal0()) / days
}

/// Smallest of 1, 2, 5, 10 × 10ⁿ that is near `rough`.
fn tick_step(rough: f64) -> f64 {
    let magnitude = 10.0_f64.powf(rough.log10().floor());
    let mantissa = rough / magnitude;
    let nice = match mantissa {
        m if m <= 1.5 => 1.0,
        m if m <= 3.5 => 2.0,
        m if m <= 7.5 => 5.0,
        _ => 10.0,
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employment_range_gets_round_ticks() {
        let ax = Axis::auto_linear(38.2, 121.7, 6);
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("20"));
        assert_eq!(ax.tick_labels.last().map(String::as_str), Some("140"));
        assert!(ax.min <= 38.2 && ax.max >= 121.7);
    }

    #[test]
    fn fractional_steps_keep_decimals() {
        let ax = Axis::auto_linear(0.0, 1.0, 6);
        assert_eq!(ax.tick_labels, ["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);
    }

    #[test]
    fn flat_data_is_widened() {
        let ax = Axis::auto_linear(5.0, 5.0, 6);
        assert!(ax.min < 5.0 && ax.max > 5.0);
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::auto_linear(0.0, 100.0, 5);
        assert!((ax.data_to_pixel(50.0, 0.0, 500.0) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn tick_steps() {
        assert!((tick_step(3.2) - 2.0).abs() < 1e-9);
        assert!((tick_step(0.7) - 0.5).abs() < 1e-9);
        assert!((tick_step(15.0) - 10.0).abs() < 1e-9);
        assert!((tick_step(4.5) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn year_axis_ticks() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let ax = Axis::years(d(2016, 1, 1), d(2023, 10, 1));
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("2016"));
        assert_eq!(ax.tick_labels.last().map(String::as_str), Some("2023"));
        assert!(ax.min < 2016.0 && ax.max > 2023.9);
        assert!((year_fraction(d(2021, 1, 1)) - 2021.0).abs() < 1e-12);
        assert!((year_fraction(d(2018, 7, 2)) - 2018.49863).abs() < 1e-4);
    }
}
