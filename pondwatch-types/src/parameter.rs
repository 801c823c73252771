//! The fixed table of monitored water-quality parameters.

use crate::{Locale, Range};

/// One of the seven measured parameters, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    RoomTemperature,
    SurfaceTemperature,
    BottomTemperature,
    Salinity,
    DissolvedOxygen,
    Ph,
    Ammonia,
}

impl Parameter {
    /// All parameters in their fixed order.
    pub const ALL: [Parameter; 7] = [
        Parameter::RoomTemperature,
        Parameter::SurfaceTemperature,
        Parameter::BottomTemperature,
        Parameter::Salinity,
        Parameter::DissolvedOxygen,
        Parameter::Ph,
        Parameter::Ammonia,
    ];

    /// The static definition for this parameter.
    pub fn definition(self) -> &'static ParameterDefinition {
        &PARAMETERS[self as usize]
    }

    /// Human-readable label.
    pub fn label(self, locale: Locale) -> &'static str {
        locale.parameter_label(self)
    }
}

/// Static configuration describing one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub parameter: Parameter,
    /// Field name in the backend's reading JSON.
    pub id: &'static str,
    /// Display unit; empty for dimensionless values.
    pub unit: &'static str,
    pub range: Range,
    /// Decimal places used when formatting a value.
    pub decimals: usize,
}

impl ParameterDefinition {
    pub fn label(&self, locale: Locale) -> &'static str {
        self.parameter.label(locale)
    }
}

/// The parameter table, indexed by [`Parameter`] discriminant.
pub static PARAMETERS: [ParameterDefinition; 7] = [
    ParameterDefinition {
        parameter: Parameter::RoomTemperature,
        id: "suhu_ruang",
        unit: "°C",
        range: Range::between(25.0, 30.0),
        decimals: 2,
    },
    ParameterDefinition {
        parameter: Parameter::SurfaceTemperature,
        id: "suhu_air_permukaan",
        unit: "°C",
        range: Range::between(28.0, 32.0),
        decimals: 2,
    },
    ParameterDefinition {
        parameter: Parameter::BottomTemperature,
        id: "suhu_air_dasar",
        unit: "°C",
        range: Range::between(28.0, 32.0),
        decimals: 2,
    },
    ParameterDefinition {
        parameter: Parameter::Salinity,
        id: "salinitas",
        unit: "ppt",
        range: Range::between(15.0, 25.0),
        decimals: 2,
    },
    ParameterDefinition {
        parameter: Parameter::DissolvedOxygen,
        id: "oxygen",
        unit: "mg/L",
        range: Range::between(4.0, 8.0),
        decimals: 2,
    },
    ParameterDefinition {
        parameter: Parameter::Ph,
        id: "ph",
        unit: "",
        range: Range::between(7.5, 8.5),
        decimals: 2,
    },
    ParameterDefinition {
        parameter: Parameter::Ammonia,
        id: "amonia",
        unit: "mg/L",
        range: Range::at_most(0.5),
        decimals: 3,
    },
];
