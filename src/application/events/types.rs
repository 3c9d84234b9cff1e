//! Integration events
//!
//! Published on the [`EventBus`](super::EventBus) for other systems after a
//! business process completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::rules::RejectionReason;
use crate::domain::MeteringPointEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "data")]
pub enum IntegrationEvent {
    MeteringPointCreated(MeteringPointCreatedEvent),
    MeteringPointConnected(PhysicalStateChangedEvent),
    MeteringPointDisconnected(PhysicalStateChangedEvent),
    MeteringPointReconnected(PhysicalStateChangedEvent),
    AddressChanged(AddressChangedEvent),
    MeteringConfigurationChanged(MeteringConfigurationChangedEvent),
    MeteringPointClosedDown(PhysicalStateChangedEvent),
    EnergySupplierChanged(EnergySupplierChangedEvent),
    MessageConfirmed(MessageConfirmedEvent),
    MessageRejected(MessageRejectedEvent),
}

impl IntegrationEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MeteringPointCreated(_) => "metering_point_created",
            Self::MeteringPointConnected(_) => "metering_point_connected",
            Self::MeteringPointDisconnected(_) => "metering_point_disconnected",
            Self::MeteringPointReconnected(_) => "metering_point_reconnected",
            Self::AddressChanged(_) => "address_changed",
            Self::MeteringConfigurationChanged(_) => "metering_configuration_changed",
            Self::MeteringPointClosedDown(_) => "metering_point_closed_down",
            Self::EnergySupplierChanged(_) => "energy_supplier_changed",
            Self::MessageConfirmed(_) => "message_confirmed",
            Self::MessageRejected(_) => "message_rejected",
        }
    }

    pub fn gsrn(&self) -> &str {
        match self {
            Self::MeteringPointCreated(e) => &e.gsrn,
            Self::MeteringPointConnected(e)
            | Self::MeteringPointDisconnected(e)
            | Self::MeteringPointReconnected(e)
            | Self::MeteringPointClosedDown(e) => &e.gsrn,
            Self::AddressChanged(e) => &e.gsrn,
            Self::MeteringConfigurationChanged(e) => &e.gsrn,
            Self::EnergySupplierChanged(e) => &e.gsrn,
            Self::MessageConfirmed(e) => &e.gsrn,
            Self::MessageRejected(e) => &e.gsrn,
        }
    }
}

impl From<MeteringPointEvent> for IntegrationEvent {
    fn from(event: MeteringPointEvent) -> Self {
        use MeteringPointEvent as E;

        fn state_change(
            gsrn: crate::domain::values::GsrnNumber,
            effective_date: crate::domain::values::EffectiveDate,
        ) -> PhysicalStateChangedEvent {
            PhysicalStateChangedEvent {
                gsrn: gsrn.to_string(),
                effective_date: effective_date.to_string(),
            }
        }

        match event {
            E::MeteringPointCreated {
                id,
                gsrn,
                metering_point_type,
                grid_area_link_id,
                effective_date,
            } => Self::MeteringPointCreated(MeteringPointCreatedEvent {
                metering_point_id: id.0,
                gsrn: gsrn.to_string(),
                metering_point_type: metering_point_type.name().to_string(),
                grid_area_link_id: grid_area_link_id.0,
                effective_date: effective_date.to_string(),
            }),
            E::MeteringPointConnected {
                gsrn,
                effective_date,
            } => Self::MeteringPointConnected(state_change(gsrn, effective_date)),
            E::MeteringPointDisconnected {
                gsrn,
                effective_date,
            } => Self::MeteringPointDisconnected(state_change(gsrn, effective_date)),
            E::MeteringPointReconnected {
                gsrn,
                effective_date,
            } => Self::MeteringPointReconnected(state_change(gsrn, effective_date)),
            E::MeteringPointClosedDown {
                gsrn,
                effective_date,
                ..
            } => Self::MeteringPointClosedDown(state_change(gsrn, effective_date)),
            E::AddressChanged {
                gsrn,
                address,
                effective_date,
            } => Self::AddressChanged(AddressChangedEvent {
                gsrn: gsrn.to_string(),
                street_name: address.street_name().map(String::from),
                building_number: address.building_number().map(String::from),
                post_code: address.post_code().map(String::from),
                city: address.city().map(String::from),
                country_code: address.country_code().name().to_string(),
                effective_date: effective_date.to_string(),
            }),
            E::MeteringConfigurationChanged {
                gsrn,
                configuration,
                effective_date,
            } => Self::MeteringConfigurationChanged(MeteringConfigurationChangedEvent {
                gsrn: gsrn.to_string(),
                metering_method: configuration.method.name().to_string(),
                meter_number: configuration.meter.map(|m| m.to_string()),
                effective_date: effective_date.to_string(),
            }),
            E::EnergySupplierDetailsChanged {
                gsrn,
                energy_supplier_gln,
                start_of_supply,
            } => Self::EnergySupplierChanged(EnergySupplierChangedEvent {
                gsrn: gsrn.to_string(),
                energy_supplier_gln: energy_supplier_gln.to_string(),
                start_of_supply: start_of_supply.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MeteringPointCreatedEvent {
    pub metering_point_id: Uuid,
    pub gsrn: String,
    pub metering_point_type: String,
    pub grid_area_link_id: Uuid,
    pub effective_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PhysicalStateChangedEvent {
    pub gsrn: String,
    pub effective_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddressChangedEvent {
    pub gsrn: String,
    pub street_name: Option<String>,
    pub building_number: Option<String>,
    pub post_code: Option<String>,
    pub city: Option<String>,
    pub country_code: String,
    pub effective_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MeteringConfigurationChangedEvent {
    pub gsrn: String,
    pub metering_method: String,
    pub meter_number: Option<String>,
    pub effective_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EnergySupplierChangedEvent {
    pub gsrn: String,
    pub energy_supplier_gln: String,
    pub start_of_supply: String,
}

/// Confirmation sent back to the sender of an accepted request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageConfirmedEvent {
    pub transaction_id: String,
    pub process_type: String,
    pub gsrn: String,
    pub receiver_gln: String,
}

/// Rejection sent back to the sender, with every reason code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRejectedEvent {
    pub transaction_id: String,
    pub process_type: String,
    pub gsrn: String,
    pub receiver_gln: String,
    pub reasons: Vec<RejectionReason>,
}

/// Envelope for every published event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: IntegrationEvent,
}

impl EventMessage {
    pub fn new(event: IntegrationEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}
