use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelStyle {
    #[default]
    Budget,
    #[serde(rename = "Mid-range")]
    MidRange,
    Luxury,
}

impl TravelStyle {
    pub const ALL: [TravelStyle; 3] = [Self::Budget, Self::MidRange, Self::Luxury];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::MidRange => "Mid-range",
            Self::Luxury => "Luxury",
        }
    }

    /// Accepts labels case-insensitively, plus a few spellings of mid-range.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Some(Self::Budget),
            "mid-range" | "midrange" | "mid_range" | "mid range" => Some(Self::MidRange),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated trip request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub source_city: String,
    pub destination: String,
    pub days: u32,
    pub interests: String,
    pub travel_style: TravelStyle,
    #[serde(default)]
    pub budget: Option<u64>,
}

impl TripRequest {
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(Error::invalid_request("destination is required"));
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&self.days) {
            return Err(Error::invalid_request(format!(
                "number of days must be between {MIN_DAYS} and {MAX_DAYS}, got {}",
                self.days
            )));
        }
        Ok(())
    }
}

/// Raw form submission. Every field is text so a bad value can be reported
/// back on the form instead of being rejected by the extractor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TripForm {
    #[serde(default)]
    pub source_city: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default = "default_days")]
    pub days: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub travel_style: String,
    #[serde(default)]
    pub budget: String,
}

fn default_days() -> String {
    MIN_DAYS.to_string()
}

impl Default for TripForm {
    fn default() -> Self {
        Self {
            source_city: String::new(),
            destination: String::new(),
            days: default_days(),
            interests: String::new(),
            travel_style: TravelStyle::default().label().into(),
            budget: String::new(),
        }
    }
}

impl From<&TripRequest> for TripForm {
    fn from(req: &TripRequest) -> Self {
        Self {
            source_city: req.source_city.clone(),
            destination: req.destination.clone(),
            days: req.days.to_string(),
            interests: req.interests.clone(),
            travel_style: req.travel_style.label().into(),
            budget: req.budget.map(|b| b.to_string()).unwrap_or_default(),
        }
    }
}

impl TryFrom<&TripForm> for TripRequest {
    type Error = Error;

    fn try_from(form: &TripForm) -> Result<Self> {
        let days = form
            .days
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::invalid_request(format!("invalid number of days: {:?}", form.days)))?;

        let travel_style = if form.travel_style.trim().is_empty() {
            TravelStyle::default()
        } else {
            TravelStyle::parse(&form.travel_style).ok_or_else(|| {
                Error::invalid_request(format!("unknown travel style: {:?}", form.travel_style))
            })?
        };

        let budget = match form.budget.trim() {
            "" => None,
            b => Some(
                b.replace([',', '_'], "")
                    .parse::<u64>()
                    .map_err(|_| Error::invalid_request(format!("invalid budget: {b:?}")))?,
            ),
        };

        let request = TripRequest {
            source_city: form.source_city.trim().to_string(),
            destination: form.destination.trim().to_string(),
            days,
            interests: form.interests.trim().to_string(),
            travel_style,
            budget,
        };
        request.validate()?;
        Ok(request)
    }
}
