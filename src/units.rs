//! This module defines distance unit types and their conversions.
use anyhow::{Result, bail};
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The number of metres in a statute mile
pub const METRES_PER_MILE: f64 = 1609.344;

/// The number of metres in a kilometre
pub const METRES_PER_KILOMETRE: f64 = 1000.0;

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a distance in a particular unit.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl From<f64> for $name {
            fn from(val: f64) -> Self {
                Self(val)
            }
        }

        impl ApproxEq for $name {
            type Margin = F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

unit_struct!(Miles);
unit_struct!(Kilometres);
unit_struct!(Metres);

impl From<Metres> for Miles {
    fn from(val: Metres) -> Self {
        Self(val.0 / METRES_PER_MILE)
    }
}

impl From<Metres> for Kilometres {
    fn from(val: Metres) -> Self {
        Self(val.0 / METRES_PER_KILOMETRE)
    }
}

impl From<Miles> for Metres {
    fn from(val: Miles) -> Self {
        Self(val.0 * METRES_PER_MILE)
    }
}

/// The unit in which a distance is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    /// Statute miles
    #[default]
    Miles,
    /// Kilometres
    Kilometres,
}

impl DistanceUnit {
    /// Convert a distance in metres into this unit
    pub fn from_metres(self, metres: Metres) -> f64 {
        match self {
            Self::Miles => Miles::from(metres).value(),
            Self::Kilometres => Kilometres::from(metres).value(),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mi" | "mile" | "miles" => Ok(Self::Miles),
            "km" | "kilometre" | "kilometres" | "kilometer" | "kilometers" => Ok(Self::Kilometres),
            _ => bail!("Invalid distance unit: {s}. Must be mi or km"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case("mi", DistanceUnit::Miles)]
    #[case("Miles", DistanceUnit::Miles)]
    #[case("km", DistanceUnit::Kilometres)]
    #[case(" KM ", DistanceUnit::Kilometres)]
    #[case("kilometers", DistanceUnit::Kilometres)]
    fn test_distance_unit_from_str(#[case] input: &str, #[case] expected: DistanceUnit) {
        assert_eq!(input.parse::<DistanceUnit>().unwrap(), expected);
    }

    #[rstest]
    #[case("m")]
    #[case("furlongs")]
    #[case("")]
    fn test_distance_unit_from_str_invalid(#[case] input: &str) {
        assert_error!(
            input.parse::<DistanceUnit>(),
            format!("Invalid distance unit: {input}. Must be mi or km")
        );
    }

    #[test]
    fn test_conversions() {
        assert_approx_eq!(Miles, Miles::from(Metres(METRES_PER_MILE)), Miles(1.0));
        assert_approx_eq!(Metres, Metres::from(Miles(2.0)), Metres(3218.688));
        assert_approx_eq!(
            f64,
            DistanceUnit::Kilometres.from_metres(Metres(1500.0)),
            1.5
        );
    }
}
