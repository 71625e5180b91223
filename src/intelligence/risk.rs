use crate::models::enums::RiskLabel;

/// Normalised deviation of a value from a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskScore {
    /// 0–100.
    pub percentage: u8,
    pub label: RiskLabel,
}

impl RiskScore {
    pub const NORMAL: RiskScore = RiskScore {
        percentage: 0,
        label: RiskLabel::Normal,
    };
}

/// Distance from the nearest violated bound as a percentage of the band
/// width, rounded and capped at 100.
pub fn score(value: f64, lower: f64, upper: f64) -> RiskScore {
    let (deviation, label) = if value < lower {
        (lower - value, RiskLabel::Low)
    } else if value > upper {
        (value - upper, RiskLabel::High)
    } else {
        return RiskScore::NORMAL;
    };

    let width = upper - lower;
    let raw = if width == 0.0 {
        100.0
    } else {
        (deviation / width * 100.0).round()
    };

    RiskScore {
        percentage: clamp_percentage(raw),
        label,
    }
}

fn clamp_percentage(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0) as u8
}
