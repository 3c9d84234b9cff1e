//! Closed market enumerations
//!
//! Each enumeration knows its name and its market code and can be looked up
//! by either. Lookups fail with [`ValidationError::UnknownEnumerationValue`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::rules::ValidationError;

macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_name(name: &str) -> Result<Self, ValidationError> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(name.trim()))
                    .ok_or_else(|| ValidationError::UnknownEnumerationValue {
                        enumeration: stringify!($name),
                        value: name.to_string(),
                    })
            }

            pub fn from_code(code: &str) -> Result<Self, ValidationError> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.code() == code.trim())
                    .ok_or_else(|| ValidationError::UnknownEnumerationValue {
                        enumeration: stringify!($name),
                        value: code.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_name(s)
            }
        }
    };
}

enumeration! {
    MeteringPointType {
        Consumption => "E17",
        Production => "E18",
        Exchange => "E20",
    }
}

enumeration! {
    /// Physical connection state of a metering point
    PhysicalState {
        New => "D03",
        Connected => "E22",
        Disconnected => "E23",
        ClosedDown => "D02",
    }
}

enumeration! {
    MeteringMethod {
        Physical => "D01",
        Virtual => "D02",
        Calculated => "D03",
    }
}

enumeration! {
    /// Resolution at which the meter is read
    ReadingOccurrence {
        Yearly => "P1Y",
        Monthly => "P1M",
        Hourly => "PT1H",
        Quarterly => "PT15M",
    }
}

enumeration! {
    SettlementMethod {
        Flex => "D01",
        Profiled => "E01",
        NonProfiled => "E02",
    }
}

enumeration! {
    NetSettlementGroup {
        Zero => "0",
        One => "1",
        Two => "2",
        Three => "3",
        Six => "6",
        NinetyNine => "99",
    }
}

impl NetSettlementGroup {
    /// Groups with local production behind the meter. These need power
    /// plant, asset type and capacity details on consumption points.
    pub fn requires_production_details(&self) -> bool {
        matches!(self, Self::One | Self::Two | Self::Three | Self::Six)
    }
}

enumeration! {
    DisconnectionType {
        Remote => "D01",
        Manual => "D02",
    }
}

enumeration! {
    ConnectionType {
        Direct => "D01",
        Installation => "D02",
    }
}

enumeration! {
    /// Production technology behind a metering point
    AssetType {
        SteamTurbineWithBackPressureMode => "D01",
        GasTurbine => "D02",
        CombinedCycle => "D03",
        CombustionEngineGas => "D04",
        SteamTurbineWithCondensation => "D05",
        Boiler => "D06",
        StirlingEngine => "D07",
        FuelCells => "D10",
        PhotovoltaicCells => "D11",
        WindTurbines => "D12",
        HydroelectricPower => "D13",
        WavePower => "D14",
        DispatchableWindTurbines => "D17",
        DieselCombustionEngine => "D19",
        BioCells => "D20",
        NoTechnology => "D99",
    }
}

enumeration! {
    ProductType {
        Tariff => "5790001330590",
        FuelQuantity => "5790001330606",
        PowerActive => "8716867000016",
        PowerReactive => "8716867000023",
        EnergyActive => "8716867000030",
        EnergyReactive => "8716867000047",
    }
}

enumeration! {
    MeasurementUnitType {
        KWh => "KWH",
        MWh => "MWH",
        KW => "KWT",
        MW => "MAW",
        KVArh => "K3",
        MVAr => "Z14",
        Tonne => "TNE",
    }
}

enumeration! {
    CountryCode {
        DK => "DK",
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self::DK
    }
}

enumeration! {
    PriceAreaCode {
        DK1 => "DK1",
        DK2 => "DK2",
    }
}
