//! Metering point aggregate root

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::enumerations::{MeteringPointType, PhysicalState};
use crate::domain::grid_area::GridAreaLinkId;
use crate::domain::rules::{BusinessRule, BusinessRulesValidationResult};
use crate::domain::values::{Address, EffectiveDate, GsrnNumber};
use crate::domain::DomainResult;

use super::energy_suppliers::{EnergySupplierDetails, EnergySuppliers};
use super::events::MeteringPointEvent;
use super::master_data::{MasterData, MeteringConfiguration};
use super::rules::common::ValueNotAllowedRule;
use super::rules::state::{
    EnergySupplierStartIsUniqueRule, MeteringPointIsClosedDownRule, MustHaveEnergySupplierRule,
    PhysicalStateRule,
};
use super::rules::MasterDataValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeteringPointId(pub Uuid);

impl MeteringPointId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MeteringPointId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MeteringPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored state of a metering point, used by repositories to rebuild the
/// aggregate.
#[derive(Debug, Clone)]
pub struct MeteringPointState {
    pub id: MeteringPointId,
    pub gsrn: GsrnNumber,
    pub metering_point_type: MeteringPointType,
    pub grid_area_link_id: GridAreaLinkId,
    pub parent_related_metering_point: Option<MeteringPointId>,
    pub physical_state: PhysicalState,
    pub master_data: MasterData,
    pub energy_suppliers: EnergySuppliers,
    pub connected_at: Option<EffectiveDate>,
    pub closed_down_at: Option<EffectiveDate>,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

#[derive(Debug, Clone)]
pub struct MeteringPoint {
    state: MeteringPointState,
    /// Version the state had when it was created or restored. Repositories
    /// only write over a stored row still at this version.
    base_version: i32,
    events: Vec<MeteringPointEvent>,
}

impl MeteringPoint {
    pub fn can_create(
        metering_point_type: MeteringPointType,
        master_data: &MasterData,
    ) -> BusinessRulesValidationResult {
        MasterDataValidator::check_rules_for(metering_point_type, master_data)
    }

    pub fn create(
        id: MeteringPointId,
        gsrn: GsrnNumber,
        metering_point_type: MeteringPointType,
        grid_area_link_id: GridAreaLinkId,
        parent_related_metering_point: Option<MeteringPointId>,
        master_data: MasterData,
    ) -> DomainResult<Self> {
        Self::can_create(metering_point_type, &master_data).into_result()?;

        let effective_date = master_data.effective_date;
        let mut metering_point = Self::restore(MeteringPointState {
            id,
            gsrn: gsrn.clone(),
            metering_point_type,
            grid_area_link_id,
            parent_related_metering_point,
            physical_state: PhysicalState::New,
            master_data,
            energy_suppliers: EnergySuppliers::new(),
            connected_at: None,
            closed_down_at: None,
            created_at: Utc::now(),
            version: 1,
        });
        metering_point.events.push(MeteringPointEvent::MeteringPointCreated {
            id,
            gsrn,
            metering_point_type,
            grid_area_link_id,
            effective_date,
        });
        Ok(metering_point)
    }

    pub fn restore(state: MeteringPointState) -> Self {
        Self {
            base_version: state.version,
            state,
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> MeteringPointId {
        self.state.id
    }

    pub fn gsrn(&self) -> &GsrnNumber {
        &self.state.gsrn
    }

    pub fn metering_point_type(&self) -> MeteringPointType {
        self.state.metering_point_type
    }

    pub fn grid_area_link_id(&self) -> GridAreaLinkId {
        self.state.grid_area_link_id
    }

    pub fn parent_related_metering_point(&self) -> Option<MeteringPointId> {
        self.state.parent_related_metering_point
    }

    pub fn physical_state(&self) -> PhysicalState {
        self.state.physical_state
    }

    pub fn master_data(&self) -> &MasterData {
        &self.state.master_data
    }

    pub fn energy_suppliers(&self) -> &EnergySuppliers {
        &self.state.energy_suppliers
    }

    pub fn connected_at(&self) -> Option<EffectiveDate> {
        self.state.connected_at
    }

    pub fn closed_down_at(&self) -> Option<EffectiveDate> {
        self.state.closed_down_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.state.created_at
    }

    pub fn version(&self) -> i32 {
        self.state.version
    }

    pub fn base_version(&self) -> i32 {
        self.base_version
    }

    pub fn state(&self) -> &MeteringPointState {
        &self.state
    }

    /// Drain the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<MeteringPointEvent> {
        std::mem::take(&mut self.events)
    }

    fn not_closed_down(&self) -> Box<dyn BusinessRule + '_> {
        Box::new(MeteringPointIsClosedDownRule {
            gsrn: &self.state.gsrn,
            state: self.state.physical_state,
        })
    }

    fn in_state(
        &self,
        operation: &'static str,
        allowed: &'static [PhysicalState],
    ) -> Box<dyn BusinessRule + '_> {
        Box::new(PhysicalStateRule {
            operation,
            state: self.state.physical_state,
            allowed,
        })
    }

    fn record(&mut self, event: MeteringPointEvent) {
        self.state.version += 1;
        self.events.push(event);
    }

    pub fn can_connect(&self, effective_date: EffectiveDate) -> BusinessRulesValidationResult {
        let mut rules = vec![
            self.not_closed_down(),
            self.in_state("connect", &[PhysicalState::New]),
        ];
        if self.state.metering_point_type != MeteringPointType::Exchange {
            rules.push(Box::new(MustHaveEnergySupplierRule {
                gsrn: &self.state.gsrn,
                energy_suppliers: &self.state.energy_suppliers,
                effective_date,
            }));
        }
        BusinessRulesValidationResult::from_rules(rules)
    }

    pub fn connect(&mut self, effective_date: EffectiveDate) -> DomainResult<()> {
        self.can_connect(effective_date).into_result()?;
        self.state.physical_state = PhysicalState::Connected;
        self.state.connected_at = Some(effective_date);
        self.record(MeteringPointEvent::MeteringPointConnected {
            gsrn: self.state.gsrn.clone(),
            effective_date,
        });
        Ok(())
    }

    pub fn can_disconnect(&self) -> BusinessRulesValidationResult {
        BusinessRulesValidationResult::from_rules([
            self.not_closed_down(),
            self.in_state("disconnect", &[PhysicalState::Connected]),
        ])
    }

    pub fn disconnect(&mut self, effective_date: EffectiveDate) -> DomainResult<()> {
        self.can_disconnect().into_result()?;
        self.state.physical_state = PhysicalState::Disconnected;
        self.record(MeteringPointEvent::MeteringPointDisconnected {
            gsrn: self.state.gsrn.clone(),
            effective_date,
        });
        Ok(())
    }

    pub fn can_reconnect(&self) -> BusinessRulesValidationResult {
        BusinessRulesValidationResult::from_rules([
            self.not_closed_down(),
            self.in_state("reconnect", &[PhysicalState::Disconnected]),
        ])
    }

    pub fn reconnect(&mut self, effective_date: EffectiveDate) -> DomainResult<()> {
        self.can_reconnect().into_result()?;
        self.state.physical_state = PhysicalState::Connected;
        self.record(MeteringPointEvent::MeteringPointReconnected {
            gsrn: self.state.gsrn.clone(),
            effective_date,
        });
        Ok(())
    }

    pub fn can_change_address(&self, address: &Address) -> BusinessRulesValidationResult {
        BusinessRulesValidationResult::from_rules([self.not_closed_down()]).merge(
            MasterDataValidator::check_address(self.state.metering_point_type, address),
        )
    }

    pub fn change_address(
        &mut self,
        address: Address,
        effective_date: EffectiveDate,
    ) -> DomainResult<()> {
        self.can_change_address(&address).into_result()?;
        self.state.master_data.address = address.clone();
        self.state.master_data.effective_date = effective_date;
        self.record(MeteringPointEvent::AddressChanged {
            gsrn: self.state.gsrn.clone(),
            address,
            effective_date,
        });
        Ok(())
    }

    pub fn can_change_metering_configuration(
        &self,
        configuration: &MeteringConfiguration,
    ) -> BusinessRulesValidationResult {
        BusinessRulesValidationResult::from_rules([self.not_closed_down()]).merge(
            MasterDataValidator::check_metering_configuration(
                self.state.metering_point_type,
                &self.state.master_data,
                configuration,
            ),
        )
    }

    pub fn change_metering_configuration(
        &mut self,
        configuration: MeteringConfiguration,
        effective_date: EffectiveDate,
    ) -> DomainResult<()> {
        self.can_change_metering_configuration(&configuration)
            .into_result()?;
        self.state.master_data.metering_configuration = configuration.clone();
        self.state.master_data.effective_date = effective_date;
        self.record(MeteringPointEvent::MeteringConfigurationChanged {
            gsrn: self.state.gsrn.clone(),
            configuration,
            effective_date,
        });
        Ok(())
    }

    pub fn can_close_down(&self) -> BusinessRulesValidationResult {
        BusinessRulesValidationResult::from_rules([
            self.not_closed_down(),
            self.in_state(
                "close down",
                &[PhysicalState::New, PhysicalState::Disconnected],
            ),
        ])
    }

    pub fn close_down(&mut self, effective_date: EffectiveDate) -> DomainResult<()> {
        self.can_close_down().into_result()?;
        let previous_state = self.state.physical_state;
        self.state.physical_state = PhysicalState::ClosedDown;
        self.state.closed_down_at = Some(effective_date);
        self.record(MeteringPointEvent::MeteringPointClosedDown {
            gsrn: self.state.gsrn.clone(),
            previous_state,
            effective_date,
        });
        Ok(())
    }

    pub fn can_set_energy_supplier(
        &self,
        details: &EnergySupplierDetails,
    ) -> BusinessRulesValidationResult {
        let exchange = (self.state.metering_point_type == MeteringPointType::Exchange).then_some(());
        let rules: Vec<Box<dyn BusinessRule + '_>> = vec![
            self.not_closed_down(),
            Box::new(ValueNotAllowedRule::new(
                "energy_supplier",
                &exchange,
                "exchange metering points have no energy supplier",
            )),
            Box::new(EnergySupplierStartIsUniqueRule {
                energy_suppliers: &self.state.energy_suppliers,
                start_of_supply: details.start_of_supply,
            }),
        ];
        BusinessRulesValidationResult::from_rules(rules)
    }

    pub fn set_energy_supplier(&mut self, details: EnergySupplierDetails) -> DomainResult<()> {
        self.can_set_energy_supplier(&details).into_result()?;
        let event = MeteringPointEvent::EnergySupplierDetailsChanged {
            gsrn: self.state.gsrn.clone(),
            energy_supplier_gln: details.gln.clone(),
            start_of_supply: details.start_of_supply,
        };
        self.state.energy_suppliers.add(details)?;
        self.record(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enumerations::MeteringMethod;
    use crate::domain::metering_point::master_data::fixtures::consumption_master_data;
    use crate::domain::values::{AddressInput, GlnNumber, MeterId};
    use crate::domain::DomainError;

    fn date(s: &str) -> EffectiveDate {
        EffectiveDate::create(s).unwrap()
    }

    fn consumption_point() -> MeteringPoint {
        MeteringPoint::create(
            MeteringPointId::new(),
            GsrnNumber::create("571313100000000010").unwrap(),
            MeteringPointType::Consumption,
            GridAreaLinkId::new(),
            None,
            consumption_master_data(),
        )
        .unwrap()
    }

    fn with_supplier(mut mp: MeteringPoint) -> MeteringPoint {
        mp.set_energy_supplier(EnergySupplierDetails::new(
            date("2021-06-01T22:00:00Z"),
            GlnNumber::create("5790000000012").unwrap(),
        ))
        .unwrap();
        mp
    }

    fn rule_codes(err: DomainError) -> Vec<&'static str> {
        match err {
            DomainError::BusinessRules(errors) => errors.iter().map(|e| e.code()).collect(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn create_records_event() {
        let mut mp = consumption_point();
        assert_eq!(mp.physical_state(), PhysicalState::New);
        assert_eq!(mp.version(), 1);
        let events = mp.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "metering_point_created");
        assert!(mp.take_events().is_empty());
    }

    #[test]
    fn create_rejects_invalid_master_data() {
        let mut md = consumption_master_data();
        md.settlement_method = None;
        let err = MeteringPoint::create(
            MeteringPointId::new(),
            GsrnNumber::create("571313100000000010").unwrap(),
            MeteringPointType::Consumption,
            GridAreaLinkId::new(),
            None,
            md,
        )
        .unwrap_err();
        assert_eq!(rule_codes(err), vec!["E86"]);
    }

    #[test]
    fn connect_requires_energy_supplier() {
        let mut mp = consumption_point();
        let err = mp.connect(date("2021-07-01T22:00:00Z")).unwrap_err();
        assert_eq!(rule_codes(err), vec!["D36"]);
        assert_eq!(mp.physical_state(), PhysicalState::New);

        let mut mp = with_supplier(mp);
        mp.connect(date("2021-07-01T22:00:00Z")).unwrap();
        assert_eq!(mp.physical_state(), PhysicalState::Connected);
        assert_eq!(mp.connected_at(), Some(date("2021-07-01T22:00:00Z")));
    }

    #[test]
    fn supplier_must_start_before_connection() {
        let mut mp = with_supplier(consumption_point());
        let err = mp.connect(date("2021-05-01T22:00:00Z")).unwrap_err();
        assert_eq!(rule_codes(err), vec!["D36"]);
    }

    #[test]
    fn connect_twice_is_rejected() {
        let mut mp = with_supplier(consumption_point());
        mp.connect(date("2021-07-01T22:00:00Z")).unwrap();
        let err = mp.connect(date("2021-07-02T22:00:00Z")).unwrap_err();
        assert_eq!(rule_codes(err), vec!["D16"]);
    }

    #[test]
    fn disconnect_and_reconnect() {
        let mut mp = with_supplier(consumption_point());
        let err = mp.reconnect(date("2021-07-01T22:00:00Z")).unwrap_err();
        assert_eq!(rule_codes(err), vec!["D16"]);

        mp.connect(date("2021-07-01T22:00:00Z")).unwrap();
        mp.disconnect(date("2021-08-01T22:00:00Z")).unwrap();
        assert_eq!(mp.physical_state(), PhysicalState::Disconnected);
        mp.reconnect(date("2021-09-01T22:00:00Z")).unwrap();
        assert_eq!(mp.physical_state(), PhysicalState::Connected);
    }

    #[test]
    fn close_down_lifecycle() {
        let mut mp = with_supplier(consumption_point());
        mp.connect(date("2021-07-01T22:00:00Z")).unwrap();

        let err = mp.close_down(date("2021-08-01T22:00:00Z")).unwrap_err();
        assert_eq!(rule_codes(err), vec!["D16"]);

        mp.disconnect(date("2021-08-01T22:00:00Z")).unwrap();
        mp.close_down(date("2021-09-01T22:00:00Z")).unwrap();
        assert_eq!(mp.physical_state(), PhysicalState::ClosedDown);

        let err = mp.close_down(date("2021-10-01T22:00:00Z")).unwrap_err();
        assert_eq!(rule_codes(err), vec!["E19"]);
        let err = mp.connect(date("2021-10-01T22:00:00Z")).unwrap_err();
        assert_eq!(rule_codes(err), vec!["E19"]);
    }

    #[test]
    fn new_point_can_close_down() {
        let mut mp = consumption_point();
        mp.close_down(date("2021-07-01T22:00:00Z")).unwrap();
        let events = mp.take_events();
        assert!(matches!(
            events.last(),
            Some(MeteringPointEvent::MeteringPointClosedDown {
                previous_state: PhysicalState::New,
                ..
            })
        ));
    }

    #[test]
    fn change_address_validates_required_fields() {
        let mut mp = consumption_point();
        let blank = Address::create(AddressInput::default()).unwrap();
        let err = mp
            .change_address(blank, date("2021-07-01T22:00:00Z"))
            .unwrap_err();
        assert_eq!(rule_codes(err), vec!["E86", "E86", "E86"]);

        let address = Address::create(AddressInput {
            street_name: Some("Nørregade".into()),
            post_code: Some("1165".into()),
            city: Some("København K".into()),
            ..Default::default()
        })
        .unwrap();
        mp.change_address(address, date("2021-07-01T22:00:00Z"))
            .unwrap();
        assert_eq!(mp.master_data().address.street_name(), Some("Nørregade"));
        assert_eq!(mp.version(), 2);
        assert_eq!(mp.base_version(), 1);
    }

    #[test]
    fn change_metering_configuration() {
        let mut mp = consumption_point();
        let virtual_with_meter = MeteringConfiguration::new(
            MeteringMethod::Virtual,
            Some(MeterId::create("M1").unwrap()),
        );
        assert!(mp
            .change_metering_configuration(virtual_with_meter, date("2021-07-01T22:00:00Z"))
            .is_err());

        mp.change_metering_configuration(
            MeteringConfiguration::new(MeteringMethod::Virtual, None),
            date("2021-07-01T22:00:00Z"),
        )
        .unwrap();
        assert_eq!(
            mp.master_data().metering_configuration.method,
            MeteringMethod::Virtual
        );
    }

    #[test]
    fn duplicate_supplier_start_rejected() {
        let mut mp = with_supplier(consumption_point());
        let err = mp
            .set_energy_supplier(EnergySupplierDetails::new(
                date("2021-06-01T22:00:00Z"),
                GlnNumber::create("5790000000029").unwrap(),
            ))
            .unwrap_err();
        assert_eq!(rule_codes(err), vec!["E16"]);
        assert_eq!(mp.energy_suppliers().len(), 1);
    }
}
