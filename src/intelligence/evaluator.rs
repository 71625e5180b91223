use std::sync::LazyLock;

use regex::Regex;

use crate::hl7::parse_numeric;
use crate::models::enums::RangeSource;
use crate::models::{Metric, Observation};

use super::types::{Band, Verdict};

/// Unanchored; the first match decides.
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([<>]?)(\d+\.?\d*)\s*-?\s*([<>]?)(\d+\.?\d*)?").unwrap()
});

/// Shape of a lab-supplied reference-range string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InlineRange {
    /// `<u`: normal strictly below `u`.
    UpperOnly(f64),
    /// `>l`: normal strictly above `l`.
    LowerOnly(f64),
    /// `l-u` inclusive. A missing upper leaves the top unbounded.
    Band { lower: f64, upper: Option<f64> },
    /// Numbers were found but with comparators in positions that carry no
    /// usable meaning, e.g. `5-<10`.
    Unusable,
}

/// Patient age/gender gate. `max_age` of 0 means unrestricted.
pub fn is_eligible(metric: &Metric, age: u32, gender: &str) -> bool {
    if metric.min_age.is_some_and(|min| age < min) {
        return false;
    }
    if metric.max_age.filter(|&max| max > 0).is_some_and(|max| age > max) {
        return false;
    }
    match metric.gender.as_deref() {
        Some(required) => {
            required.eq_ignore_ascii_case("any") || required.eq_ignore_ascii_case(gender)
        }
        None => true,
    }
}

/// Interpret reference-range text. `None` when nothing usable was found and
/// the metric's stricter bounds should apply.
pub fn parse_inline_range(text: &str) -> Option<InlineRange> {
    let text = text.trim();

    if let Some(rest) = text.strip_prefix('<') {
        return parse_numeric(rest).map(InlineRange::UpperOnly);
    }
    if let Some(rest) = text.strip_prefix('>') {
        return parse_numeric(rest).map(InlineRange::LowerOnly);
    }

    let caps = RANGE_RE.captures(text)?;
    let lower_op = caps.get(1).map_or("", |m| m.as_str());
    let lower: f64 = caps.get(2)?.as_str().parse().ok()?;
    let upper_op = caps.get(3).map_or("", |m| m.as_str());
    let upper: Option<f64> = caps.get(4).and_then(|m| m.as_str().parse().ok());

    let range = match (lower_op, upper_op, upper) {
        ("<", _, _) => InlineRange::UpperOnly(lower),
        (_, ">", Some(upper)) => InlineRange::LowerOnly(upper),
        ("", "", upper) => InlineRange::Band { lower, upper },
        _ => InlineRange::Unusable,
    };
    Some(range)
}

/// Decide whether an observation is abnormal against its matched metric.
///
/// `None` means no verdict: no metric, or the patient falls outside the
/// metric's age/gender criteria.
pub fn evaluate(
    observation: &Observation,
    metric: Option<&Metric>,
    age: u32,
    gender: &str,
) -> Option<Verdict> {
    let metric = metric?;

    if !is_eligible(metric, age, gender) {
        tracing::debug!(
            code = %observation.code,
            metric = %metric.name,
            age,
            gender,
            "Patient criteria not met, skipping"
        );
        return None;
    }

    let value = observation.value;
    let inline = observation.reference_range.as_deref().and_then(|text| {
        let parsed = parse_inline_range(text);
        if parsed.is_none() {
            tracing::debug!(
                code = %observation.code,
                range = text,
                "Could not parse reference range, using metric bounds"
            );
        }
        parsed
    });

    let verdict = match inline {
        Some(InlineRange::UpperOnly(upper)) => Verdict {
            is_abnormal: value >= upper,
            band: Some(Band::new(0.0, upper)),
            source: RangeSource::InlineUpper,
        },
        Some(InlineRange::LowerOnly(lower)) => Verdict {
            is_abnormal: value <= lower,
            band: Some(Band::new(lower, lower * 2.0)),
            source: RangeSource::InlineLower,
        },
        Some(InlineRange::Band { lower, upper }) => {
            let above = upper.is_some_and(|u| value > u);
            // A zero upper still bounds the check but scores like a missing one.
            let scoring_upper = upper.filter(|&u| u != 0.0).unwrap_or(lower * 2.0);
            Verdict {
                is_abnormal: value < lower || above,
                band: Some(Band::new(lower, scoring_upper)),
                source: RangeSource::InlineBand,
            }
        }
        Some(InlineRange::Unusable) => Verdict {
            is_abnormal: false,
            band: None,
            source: RangeSource::InlineBand,
        },
        None => Verdict {
            is_abnormal: value < metric.everlab_lower || value > metric.everlab_higher,
            band: Some(Band::new(metric.everlab_lower, metric.everlab_higher)),
            source: RangeSource::Everlab,
        },
    };

    tracing::trace!(
        code = %observation.code,
        value,
        source = verdict.source.as_str(),
        abnormal = verdict.is_abnormal,
        "Range evaluated"
    );

    Some(verdict)
}
