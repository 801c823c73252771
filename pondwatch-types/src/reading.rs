//! Reading - one timestamped set of pond measurements.

use chrono::{DateTime, Utc};

use crate::{classify, Parameter, ParameterDefinition, ParameterStatus, PARAMETERS};

/// One timestamped set of the seven water-quality measurements.
///
/// Every measurement is optional; an absent value means "unknown", never zero.
///
/// # Example
///
/// ```rust
/// use pondwatch_types::{Parameter, ParameterStatus, Reading};
///
/// let reading = Reading::builder()
///     .value(Parameter::DissolvedOxygen, 3.5)
///     .value(Parameter::Ph, 8.0)
///     .build();
///
/// assert_eq!(reading.status(Parameter::DissolvedOxygen), ParameterStatus::Low);
/// assert_eq!(reading.status(Parameter::Ammonia), ParameterStatus::Unknown);
/// assert!(reading.has_warning());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// When the measurements were taken; the source of ordering.
    pub time: DateTime<Utc>,

    #[cfg_attr(feature = "serde", serde(rename = "suhu_ruang", default, deserialize_with = "lenient_measurement"))]
    pub room_temperature: Option<f64>,

    #[cfg_attr(feature = "serde", serde(rename = "suhu_air_permukaan", default, deserialize_with = "lenient_measurement"))]
    pub surface_temperature: Option<f64>,

    #[cfg_attr(feature = "serde", serde(rename = "suhu_air_dasar", default, deserialize_with = "lenient_measurement"))]
    pub bottom_temperature: Option<f64>,

    #[cfg_attr(feature = "serde", serde(rename = "salinitas", default, deserialize_with = "lenient_measurement"))]
    pub salinity: Option<f64>,

    #[cfg_attr(feature = "serde", serde(rename = "oxygen", default, deserialize_with = "lenient_measurement"))]
    pub dissolved_oxygen: Option<f64>,

    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient_measurement")
    )]
    pub ph: Option<f64>,

    #[cfg_attr(feature = "serde", serde(rename = "amonia", default, deserialize_with = "lenient_measurement"))]
    pub ammonia: Option<f64>,
}

/// Accept a number or a numeric string; anything else is an unknown value.
#[cfg(feature = "serde")]
fn lenient_measurement<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let value = match serde::Deserialize::deserialize(deserializer)? {
        Raw::Number(n) => Some(n),
        Raw::Text(text) => text.trim().parse::<f64>().ok(),
        Raw::Other(_) => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

impl Reading {
    /// Create a reading with no measurements.
    pub fn empty(time: DateTime<Utc>) -> Self {
        Self {
            time,
            room_temperature: None,
            surface_temperature: None,
            bottom_temperature: None,
            salinity: None,
            dissolved_oxygen: None,
            ph: None,
            ammonia: None,
        }
    }

    /// Create a builder for constructing readings.
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::new()
    }

    /// The measured value for a parameter, if present.
    pub fn value(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::RoomTemperature => self.room_temperature,
            Parameter::SurfaceTemperature => self.surface_temperature,
            Parameter::BottomTemperature => self.bottom_temperature,
            Parameter::Salinity => self.salinity,
            Parameter::DissolvedOxygen => self.dissolved_oxygen,
            Parameter::Ph => self.ph,
            Parameter::Ammonia => self.ammonia,
        }
    }

    fn value_mut(&mut self, parameter: Parameter) -> &mut Option<f64> {
        match parameter {
            Parameter::RoomTemperature => &mut self.room_temperature,
            Parameter::SurfaceTemperature => &mut self.surface_temperature,
            Parameter::BottomTemperature => &mut self.bottom_temperature,
            Parameter::Salinity => &mut self.salinity,
            Parameter::DissolvedOxygen => &mut self.dissolved_oxygen,
            Parameter::Ph => &mut self.ph,
            Parameter::Ammonia => &mut self.ammonia,
        }
    }

    /// Classify one parameter against its fixed range.
    pub fn status(&self, parameter: Parameter) -> ParameterStatus {
        classify(self.value(parameter), &parameter.definition().range)
    }

    /// Every parameter with its value and status, in the fixed order.
    pub fn statuses(&self) -> impl Iterator<Item = ParameterReading> + '_ {
        PARAMETERS.iter().map(move |definition| {
            let value = self.value(definition.parameter);
            ParameterReading {
                definition,
                value,
                status: classify(value, &definition.range),
            }
        })
    }

    /// True if at least one parameter is `Low` or `High`.
    pub fn has_warning(&self) -> bool {
        self.statuses().any(|row| row.status.is_abnormal())
    }
}

/// A single parameter's value and status within a reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterReading {
    pub definition: &'static ParameterDefinition,
    pub value: Option<f64>,
    pub status: ParameterStatus,
}

/// Builder for `Reading`.
#[derive(Debug)]
pub struct ReadingBuilder {
    reading: Reading,
}

impl ReadingBuilder {
    /// Create a builder stamped with the current time.
    pub fn new() -> Self {
        Self {
            reading: Reading::empty(Utc::now()),
        }
    }

    /// Set the timestamp.
    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.reading.time = time;
        self
    }

    /// Set a measured value.
    pub fn value(mut self, parameter: Parameter, value: f64) -> Self {
        *self.reading.value_mut(parameter) = Some(value);
        self
    }

    /// Build the reading.
    pub fn build(self) -> Reading {
        self.reading
    }
}

impl Default for ReadingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
