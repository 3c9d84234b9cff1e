//! Domain events recorded by the metering point aggregate

use crate::domain::enumerations::{MeteringPointType, PhysicalState};
use crate::domain::grid_area::GridAreaLinkId;
use crate::domain::values::{Address, EffectiveDate, GlnNumber, GsrnNumber};

use super::master_data::MeteringConfiguration;
use super::model::MeteringPointId;

#[derive(Debug, Clone, PartialEq)]
pub enum MeteringPointEvent {
    MeteringPointCreated {
        id: MeteringPointId,
        gsrn: GsrnNumber,
        metering_point_type: MeteringPointType,
        grid_area_link_id: GridAreaLinkId,
        effective_date: EffectiveDate,
    },
    MeteringPointConnected {
        gsrn: GsrnNumber,
        effective_date: EffectiveDate,
    },
    MeteringPointDisconnected {
        gsrn: GsrnNumber,
        effective_date: EffectiveDate,
    },
    MeteringPointReconnected {
        gsrn: GsrnNumber,
        effective_date: EffectiveDate,
    },
    AddressChanged {
        gsrn: GsrnNumber,
        address: Address,
        effective_date: EffectiveDate,
    },
    MeteringConfigurationChanged {
        gsrn: GsrnNumber,
        configuration: MeteringConfiguration,
        effective_date: EffectiveDate,
    },
    MeteringPointClosedDown {
        gsrn: GsrnNumber,
        previous_state: PhysicalState,
        effective_date: EffectiveDate,
    },
    EnergySupplierDetailsChanged {
        gsrn: GsrnNumber,
        energy_supplier_gln: GlnNumber,
        start_of_supply: EffectiveDate,
    },
}

impl MeteringPointEvent {
    pub fn gsrn(&self) -> &GsrnNumber {
        match self {
            Self::MeteringPointCreated { gsrn, .. }
            | Self::MeteringPointConnected { gsrn, .. }
            | Self::MeteringPointDisconnected { gsrn, .. }
            | Self::MeteringPointReconnected { gsrn, .. }
            | Self::AddressChanged { gsrn, .. }
            | Self::MeteringConfigurationChanged { gsrn, .. }
            | Self::MeteringPointClosedDown { gsrn, .. }
            | Self::EnergySupplierDetailsChanged { gsrn, .. } => gsrn,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MeteringPointCreated { .. } => "metering_point_created",
            Self::MeteringPointConnected { .. } => "metering_point_connected",
            Self::MeteringPointDisconnected { .. } => "metering_point_disconnected",
            Self::MeteringPointReconnected { .. } => "metering_point_reconnected",
            Self::AddressChanged { .. } => "address_changed",
            Self::MeteringConfigurationChanged { .. } => "metering_configuration_changed",
            Self::MeteringPointClosedDown { .. } => "metering_point_closed_down",
            Self::EnergySupplierDetailsChanged { .. } => "energy_supplier_details_changed",
        }
    }
}
