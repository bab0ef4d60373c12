use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Classification, Field, Severity};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BandError {
    #[error("band has no ranges")]
    Empty,
    #[error("range {index}: the last range must be open-ended and no other range may be")]
    OpenRangePlacement { index: usize },
    #[error("range {index}: set either `below` or `at_most`, not both")]
    AmbiguousLimit { index: usize },
    #[error("range {index}: limit {limit} is not finite")]
    NonFiniteLimit { index: usize, limit: f64 },
    #[error("range {index}: limits must ascend (overlapping or empty range at {limit})")]
    NotAscending { index: usize, limit: f64 },
}

/// Upper end of a bounded range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    /// value < x
    Below(f64),
    /// value <= x
    AtMost(f64),
}

impl Limit {
    fn admits(self, value: f64) -> bool {
        match self {
            Limit::Below(x) => value < x,
            Limit::AtMost(x) => value <= x,
        }
    }

    fn value(self) -> f64 {
        match self {
            Limit::Below(x) | Limit::AtMost(x) => x,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Cut {
    upper: Limit,
    tier: Classification,
}

/// Wire form of one range: `{"below": 50, "label": "low", "severity": "caution"}`.
/// The final range carries no limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_most: Option<f64>,
    pub label: String,
    pub severity: Severity,
}

/// Ordered ranges partitioning the real line.
///
/// Each bounded range covers everything above the previous limit up to its
/// own; the last range is open-ended. Every value therefore falls in exactly
/// one range. NaN compares false against every limit and lands in the
/// open-ended range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BandRange>", into = "Vec<BandRange>")]
pub struct ThresholdBand {
    cuts: Vec<Cut>,
    above: Classification,
}

impl ThresholdBand {
    pub fn builder() -> BandBuilder {
        BandBuilder::default()
    }

    /// A band with a single tier covering everything.
    pub fn uniform(label: &str, severity: Severity) -> Self {
        Self {
            cuts: Vec::new(),
            above: Classification::new(label, severity),
        }
    }

    pub fn classify(&self, value: f64) -> &Classification {
        self.cuts
            .iter()
            .find(|c| c.upper.admits(value))
            .map(|c| &c.tier)
            .unwrap_or(&self.above)
    }

    pub fn ranges(&self) -> Vec<BandRange> {
        self.clone().into()
    }
}

/// First matching range of `band` for `value`.
pub fn classify(value: f64, band: &ThresholdBand) -> Classification {
    band.classify(value).clone()
}

#[derive(Debug, Default)]
pub struct BandBuilder {
    cuts: Vec<Cut>,
}

impl BandBuilder {
    pub fn below(mut self, limit: f64, label: &str, severity: Severity) -> Self {
        self.cuts.push(Cut {
            upper: Limit::Below(limit),
            tier: Classification::new(label, severity),
        });
        self
    }

    pub fn at_most(mut self, limit: f64, label: &str, severity: Severity) -> Self {
        self.cuts.push(Cut {
            upper: Limit::AtMost(limit),
            tier: Classification::new(label, severity),
        });
        self
    }

    /// Closes the band with its open-ended range.
    pub fn above(self, label: &str, severity: Severity) -> Result<ThresholdBand, BandError> {
        validate_cuts(&self.cuts)?;
        Ok(ThresholdBand {
            cuts: self.cuts,
            above: Classification::new(label, severity),
        })
    }
}

fn validate_cuts(cuts: &[Cut]) -> Result<(), BandError> {
    let mut prev: Option<Limit> = None;
    for (index, cut) in cuts.iter().enumerate() {
        let limit = cut.upper.value();
        if !limit.is_finite() {
            return Err(BandError::NonFiniteLimit { index, limit });
        }
        if let Some(p) = prev {
            // `below x` followed by `at_most x` leaves the single point x.
            let ascending = p.value() < limit
                || (p.value() == limit
                    && matches!((p, cut.upper), (Limit::Below(_), Limit::AtMost(_))));
            if !ascending {
                return Err(BandError::NotAscending { index, limit });
            }
        }
        prev = Some(cut.upper);
    }
    Ok(())
}

impl TryFrom<Vec<BandRange>> for ThresholdBand {
    type Error = BandError;

    fn try_from(ranges: Vec<BandRange>) -> Result<Self, Self::Error> {
        let last = ranges.len().checked_sub(1).ok_or(BandError::Empty)?;
        let mut cuts = Vec::with_capacity(last);
        let mut above = None;

        for (index, r) in ranges.into_iter().enumerate() {
            let tier = Classification::new(r.label, r.severity);
            let upper = match (r.below, r.at_most) {
                (Some(_), Some(_)) => return Err(BandError::AmbiguousLimit { index }),
                (Some(x), None) => Some(Limit::Below(x)),
                (None, Some(x)) => Some(Limit::AtMost(x)),
                (None, None) => None,
            };
            match (upper, index == last) {
                (Some(upper), false) => cuts.push(Cut { upper, tier }),
                (None, true) => above = Some(tier),
                _ => return Err(BandError::OpenRangePlacement { index }),
            }
        }

        validate_cuts(&cuts)?;
        let above = above.ok_or(BandError::OpenRangePlacement { index: last })?;
        Ok(ThresholdBand { cuts, above })
    }
}

impl From<ThresholdBand> for Vec<BandRange> {
    fn from(band: ThresholdBand) -> Self {
        let mut out: Vec<BandRange> = band
            .cuts
            .into_iter()
            .map(|c| {
                let (below, at_most) = match c.upper {
                    Limit::Below(x) => (Some(x), None),
                    Limit::AtMost(x) => (None, Some(x)),
                };
                BandRange {
                    below,
                    at_most,
                    label: c.tier.label,
                    severity: c.tier.severity,
                }
            })
            .collect();
        out.push(BandRange {
            below: None,
            at_most: None,
            label: band.above.label,
            severity: band.above.severity,
        });
        out
    }
}

fn cut(upper: Limit, label: &str, severity: Severity) -> Cut {
    Cut {
        upper,
        tier: Classification::new(label, severity),
    }
}

fn band(cuts: Vec<Cut>, label: &str, severity: Severity) -> ThresholdBand {
    ThresholdBand {
        cuts,
        above: Classification::new(label, severity),
    }
}

/// bpm: <50 low, 50..=120 normal, >120 high
pub fn default_heart_rate_band() -> ThresholdBand {
    band(
        vec![
            cut(Limit::Below(50.0), "low", Severity::Caution),
            cut(Limit::AtMost(120.0), "normal", Severity::Normal),
        ],
        "high",
        Severity::Critical,
    )
}

/// %: <90 critical, 90..92 low, >=92 normal
pub fn default_spo2_band() -> ThresholdBand {
    band(
        vec![
            cut(Limit::Below(90.0), "critical", Severity::Critical),
            cut(Limit::Below(92.0), "low", Severity::Caution),
        ],
        "normal",
        Severity::Normal,
    )
}

/// °C: <35 low, 35..=37.8 normal, 37.8..=38.5 high, >38.5 fever
pub fn default_temperature_band() -> ThresholdBand {
    band(
        vec![
            cut(Limit::Below(35.0), "low", Severity::Critical),
            cut(Limit::AtMost(37.8), "normal", Severity::Normal),
            cut(Limit::AtMost(38.5), "high", Severity::Caution),
        ],
        "fever",
        Severity::Critical,
    )
}

/// GPS fix quality: fewer than 4 satellites is a weak fix.
pub fn default_satellites_band() -> ThresholdBand {
    band(
        vec![cut(Limit::Below(4.0), "weak", Severity::Caution)],
        "normal",
        Severity::Normal,
    )
}

/// Static band table, one band per field. Loaded once at startup and never
/// mutated afterwards; fields missing from a config file keep the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub heart_rate: ThresholdBand,
    pub spo2: ThresholdBand,
    pub temperature: ThresholdBand,
    pub speed: ThresholdBand,
    pub satellites: ThresholdBand,
    pub altitude: ThresholdBand,
}

impl ThresholdConfig {
    pub fn band(&self, field: Field) -> &ThresholdBand {
        match field {
            Field::HeartRate => &self.heart_rate,
            Field::Spo2 => &self.spo2,
            Field::Temperature => &self.temperature,
            Field::Speed => &self.speed,
            Field::Satellites => &self.satellites,
            Field::Altitude => &self.altitude,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            heart_rate: default_heart_rate_band(),
            spo2: default_spo2_band(),
            temperature: default_temperature_band(),
            speed: ThresholdBand::uniform("normal", Severity::Normal),
            satellites: default_satellites_band(),
            altitude: ThresholdBand::uniform("normal", Severity::Normal),
        }
    }
}
