//! Metering point business process handlers and queries

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::process::{parse_sender, rule_errors, Opened, Outcome, ProcessRunner};
use crate::application::events::SharedEventBus;
use crate::application::market::{
    validate_input, BusinessProcessResult, ChangeAddress, ChangeEnergySupplier,
    ChangeMeteringConfiguration, CreateMeteringPoint, MarketDocument, PhysicalStateChange,
};
use crate::domain::enumerations::MeteringPointType;
use crate::domain::metering_point::master_data::parse_enum;
use crate::domain::metering_point::{
    EnergySupplierDetails, MeteringConfiguration, MeteringPoint, MeteringPointId,
};
use crate::domain::rules::ValidationError;
use crate::domain::values::{Address, EffectiveDate, GlnNumber, GridAreaCode, GsrnNumber};
use crate::domain::{
    BusinessProcess, BusinessProcessType, DomainError, DomainResult, RepositoryProvider,
};
use crate::shared::pagination::{Page, PaginatedResult};

/// Energy supplier assignments as seen at one point in time.
#[derive(Debug, Clone)]
pub struct EnergySupplierSnapshot {
    pub at: EffectiveDate,
    pub current: Option<EnergySupplierDetails>,
    pub future: Vec<EnergySupplierDetails>,
}

/// A metering point with its parent resolved to a GSRN.
#[derive(Debug, Clone)]
pub struct MeteringPointDetails {
    pub metering_point: MeteringPoint,
    pub parent_gsrn: Option<GsrnNumber>,
}

pub struct MeteringPointService {
    runner: ProcessRunner,
}

impl MeteringPointService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, event_bus: SharedEventBus) -> Self {
        Self {
            runner: ProcessRunner { repos, event_bus },
        }
    }

    fn repos(&self) -> &dyn RepositoryProvider {
        self.runner.repos.as_ref()
    }

    // ── Business processes ─────────────────────────────────────

    pub async fn create_metering_point(
        &self,
        document: MarketDocument<CreateMeteringPoint>,
    ) -> DomainResult<BusinessProcessResult> {
        let gsrn = document.payload.gsrn.trim().to_string();
        let process = match self
            .runner
            .open(BusinessProcessType::CreateMeteringPoint, &gsrn, &document)
            .await?
        {
            Opened::Duplicate(result) => return Ok(result),
            Opened::Pending(process) => process,
        };

        let outcome = self.try_create(&document).await?;
        self.runner
            .complete(process, &document.sender_gln, outcome)
            .await
    }

    async fn try_create(
        &self,
        document: &MarketDocument<CreateMeteringPoint>,
    ) -> DomainResult<Outcome> {
        let payload = &document.payload;
        let mut errors = validate_input(payload);
        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        let sender = parse_sender(&document.sender_gln, &mut errors);
        let gsrn = collect(&mut errors, GsrnNumber::create(&payload.gsrn));
        let metering_point_type = collect(
            &mut errors,
            parse_enum::<MeteringPointType>(&payload.metering_point_type),
        );

        let grid_area = match collect(&mut errors, GridAreaCode::create(&payload.grid_area)) {
            Some(code) => {
                let area = self.repos().grid_areas().find_by_code(&code).await?;
                if area.is_none() {
                    errors.push(ValidationError::UnknownGridArea(code.to_string()));
                }
                area
            }
            None => None,
        };

        if let (Some(area), Some(sender)) = (&grid_area, &sender) {
            if !area.is_operated_by(sender) {
                errors.push(ValidationError::SenderNotGridOperator {
                    sender: sender.to_string(),
                    grid_area: area.code.to_string(),
                });
            }
        }

        if let Some(gsrn) = &gsrn {
            if self.repos().metering_points().exists(gsrn).await? {
                errors.push(ValidationError::GsrnAlreadyRegistered(gsrn.to_string()));
            }
        }

        let parent = self
            .resolve_parent(payload.parent_related_metering_point.as_deref(), &mut errors)
            .await?;
        let exchange_from = self
            .resolve_grid_area(payload.exchange_from_grid_area.as_deref(), &mut errors)
            .await?;
        let exchange_to = self
            .resolve_grid_area(payload.exchange_to_grid_area.as_deref(), &mut errors)
            .await?;

        let master_data = match payload.master_data_input(exchange_from, exchange_to).build() {
            Ok(md) => Some(md),
            Err(result) => {
                errors.extend(result.into_errors());
                None
            }
        };

        let (Some(gsrn), Some(metering_point_type), Some(grid_area), Some(master_data)) =
            (gsrn, metering_point_type, grid_area, master_data)
        else {
            return Ok(Err(errors));
        };
        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        match MeteringPoint::create(
            MeteringPointId::new(),
            gsrn,
            metering_point_type,
            grid_area.link_id,
            parent,
            master_data,
        ) {
            Ok(mut metering_point) => {
                self.repos().metering_points().add(&metering_point).await?;
                info!(
                    gsrn = %metering_point.gsrn(),
                    metering_point_type = %metering_point.metering_point_type(),
                    grid_area = %grid_area.code,
                    "Metering point created"
                );
                Ok(Ok(metering_point.take_events()))
            }
            Err(e) => Ok(Err(rule_errors(e)?)),
        }
    }

    async fn resolve_parent(
        &self,
        raw: Option<&str>,
        errors: &mut Vec<ValidationError>,
    ) -> DomainResult<Option<MeteringPointId>> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let Some(gsrn) = collect(errors, GsrnNumber::create(raw)) else {
            return Ok(None);
        };
        match self.repos().metering_points().find_by_gsrn(&gsrn).await? {
            Some(parent) => Ok(Some(parent.id())),
            None => {
                errors.push(ValidationError::UnknownParentMeteringPoint(gsrn.to_string()));
                Ok(None)
            }
        }
    }

    async fn resolve_grid_area(
        &self,
        raw: Option<&str>,
        errors: &mut Vec<ValidationError>,
    ) -> DomainResult<Option<Uuid>> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let Some(code) = collect(errors, GridAreaCode::create(raw)) else {
            return Ok(None);
        };
        match self.repos().grid_areas().find_by_code(&code).await? {
            Some(area) => Ok(Some(area.link_id.0)),
            None => {
                errors.push(ValidationError::UnknownGridArea(code.to_string()));
                Ok(None)
            }
        }
    }

    pub async fn connect(
        &self,
        gsrn: &str,
        document: MarketDocument<PhysicalStateChange>,
    ) -> DomainResult<BusinessProcessResult> {
        let input = parse_state_change(&document.payload);
        self.change(
            BusinessProcessType::ConnectMeteringPoint,
            gsrn,
            &document,
            input,
            |mp, date| mp.connect(date),
        )
        .await
    }

    pub async fn disconnect(
        &self,
        gsrn: &str,
        document: MarketDocument<PhysicalStateChange>,
    ) -> DomainResult<BusinessProcessResult> {
        let input = parse_state_change(&document.payload);
        self.change(
            BusinessProcessType::DisconnectMeteringPoint,
            gsrn,
            &document,
            input,
            |mp, date| mp.disconnect(date),
        )
        .await
    }

    pub async fn reconnect(
        &self,
        gsrn: &str,
        document: MarketDocument<PhysicalStateChange>,
    ) -> DomainResult<BusinessProcessResult> {
        let input = parse_state_change(&document.payload);
        self.change(
            BusinessProcessType::ReconnectMeteringPoint,
            gsrn,
            &document,
            input,
            |mp, date| mp.reconnect(date),
        )
        .await
    }

    pub async fn close_down(
        &self,
        gsrn: &str,
        document: MarketDocument<PhysicalStateChange>,
    ) -> DomainResult<BusinessProcessResult> {
        let input = parse_state_change(&document.payload);
        self.change(
            BusinessProcessType::CloseDownMeteringPoint,
            gsrn,
            &document,
            input,
            |mp, date| mp.close_down(date),
        )
        .await
    }

    pub async fn change_address(
        &self,
        gsrn: &str,
        document: MarketDocument<ChangeAddress>,
    ) -> DomainResult<BusinessProcessResult> {
        let input = parse_address_change(&document.payload);
        self.change(
            BusinessProcessType::ChangeAddress,
            gsrn,
            &document,
            input,
            |mp, (address, date)| mp.change_address(address, date),
        )
        .await
    }

    pub async fn change_metering_configuration(
        &self,
        gsrn: &str,
        document: MarketDocument<ChangeMeteringConfiguration>,
    ) -> DomainResult<BusinessProcessResult> {
        let input = parse_configuration_change(&document.payload);
        self.change(
            BusinessProcessType::ChangeMeteringConfiguration,
            gsrn,
            &document,
            input,
            |mp, (configuration, date)| mp.change_metering_configuration(configuration, date),
        )
        .await
    }

    pub async fn change_energy_supplier(
        &self,
        gsrn: &str,
        document: MarketDocument<ChangeEnergySupplier>,
    ) -> DomainResult<BusinessProcessResult> {
        let input = parse_supplier_change(&document.payload);
        self.change(
            BusinessProcessType::ChangeEnergySupplier,
            gsrn,
            &document,
            input,
            |mp, details| mp.set_energy_supplier(details),
        )
        .await
    }

    /// Pipeline for processes on an existing metering point.
    async fn change<T, I>(
        &self,
        process_type: BusinessProcessType,
        gsrn: &str,
        document: &MarketDocument<T>,
        input: Result<I, Vec<ValidationError>>,
        apply: impl FnOnce(&mut MeteringPoint, I) -> DomainResult<()> + Send,
    ) -> DomainResult<BusinessProcessResult>
    where
        T: Sync,
        I: Send,
    {
        let gsrn = gsrn.trim();
        let process = match self.runner.open(process_type, gsrn, document).await? {
            Opened::Duplicate(result) => return Ok(result),
            Opened::Pending(process) => process,
        };

        let outcome = self
            .try_change(gsrn, &document.sender_gln, input, apply)
            .await?;
        self.runner
            .complete(process, &document.sender_gln, outcome)
            .await
    }

    async fn try_change<I>(
        &self,
        gsrn: &str,
        sender_gln: &str,
        input: Result<I, Vec<ValidationError>>,
        apply: impl FnOnce(&mut MeteringPoint, I) -> DomainResult<()> + Send,
    ) -> DomainResult<Outcome>
    where
        I: Send,
    {
        let mut errors = Vec::new();
        let input = match input {
            Ok(input) => Some(input),
            Err(input_errors) => {
                errors.extend(input_errors);
                None
            }
        };
        let sender = parse_sender(sender_gln, &mut errors);

        let metering_point = match collect(&mut errors, GsrnNumber::create(gsrn)) {
            Some(gsrn) => {
                let found = self.repos().metering_points().find_by_gsrn(&gsrn).await?;
                if found.is_none() {
                    errors.push(ValidationError::UnknownMeteringPoint(gsrn.to_string()));
                }
                found
            }
            None => None,
        };

        if let (Some(mp), Some(sender)) = (&metering_point, &sender) {
            self.authorize(mp, sender, &mut errors).await?;
        }

        let (Some(mut metering_point), Some(input)) = (metering_point, input) else {
            return Ok(Err(errors));
        };
        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        match apply(&mut metering_point, input) {
            Ok(()) => {
                self.repos()
                    .metering_points()
                    .update(&metering_point)
                    .await?;
                debug!(
                    gsrn = %metering_point.gsrn(),
                    version = metering_point.version(),
                    "Metering point updated"
                );
                Ok(Ok(metering_point.take_events()))
            }
            Err(e) => Ok(Err(rule_errors(e)?)),
        }
    }

    /// The sender must operate the grid area the metering point belongs to.
    async fn authorize(
        &self,
        metering_point: &MeteringPoint,
        sender: &GlnNumber,
        errors: &mut Vec<ValidationError>,
    ) -> DomainResult<()> {
        let link_id = metering_point.grid_area_link_id();
        match self.repos().grid_areas().find_by_link_id(link_id).await? {
            Some(area) if area.is_operated_by(sender) => {}
            Some(area) => errors.push(ValidationError::SenderNotGridOperator {
                sender: sender.to_string(),
                grid_area: area.code.to_string(),
            }),
            None => errors.push(ValidationError::UnknownGridArea(link_id.to_string())),
        }
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────

    pub async fn get(&self, gsrn: &str) -> DomainResult<MeteringPoint> {
        let gsrn =
            GsrnNumber::create(gsrn).map_err(|e| DomainError::Validation(e.to_string()))?;
        self.repos()
            .metering_points()
            .find_by_gsrn(&gsrn)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "MeteringPoint",
                field: "gsrn",
                value: gsrn.to_string(),
            })
    }

    pub async fn list(&self, page: Page) -> DomainResult<PaginatedResult<MeteringPoint>> {
        let repo = self.repos().metering_points();
        let total = repo.count().await?;
        let items = repo.list(page).await?;
        Ok(PaginatedResult::new(items, total, page))
    }

    pub async fn details(&self, gsrn: &str) -> DomainResult<MeteringPointDetails> {
        let metering_point = self.get(gsrn).await?;
        self.with_parent(metering_point).await
    }

    pub async fn list_details(
        &self,
        page: Page,
    ) -> DomainResult<PaginatedResult<MeteringPointDetails>> {
        let result = self.list(page).await?;
        let mut items = Vec::with_capacity(result.items.len());
        for metering_point in result.items {
            items.push(self.with_parent(metering_point).await?);
        }
        Ok(PaginatedResult::new(items, result.total, page))
    }

    async fn with_parent(
        &self,
        metering_point: MeteringPoint,
    ) -> DomainResult<MeteringPointDetails> {
        let parent_gsrn = match metering_point.parent_related_metering_point() {
            Some(id) => {
                let parent = self.repos().metering_points().find_by_id(id).await?;
                let Some(parent) = parent else {
                    return Err(DomainError::Storage(format!(
                        "Parent {} of metering point {} is missing",
                        id,
                        metering_point.gsrn()
                    )));
                };
                Some(parent.gsrn().clone())
            }
            None => None,
        };
        Ok(MeteringPointDetails {
            metering_point,
            parent_gsrn,
        })
    }

    /// Supplier assignments at `at`, or now when absent.
    pub async fn energy_suppliers(
        &self,
        gsrn: &str,
        at: Option<&str>,
    ) -> DomainResult<EnergySupplierSnapshot> {
        let at = match at {
            Some(raw) => {
                EffectiveDate::create(raw).map_err(|e| DomainError::Validation(e.to_string()))?
            }
            None => EffectiveDate::now(),
        };
        let metering_point = self.get(gsrn).await?;
        let suppliers = metering_point.energy_suppliers();
        Ok(EnergySupplierSnapshot {
            at,
            current: suppliers.current_at(at).cloned(),
            future: suppliers.future_at(at).cloned().collect(),
        })
    }

    pub async fn business_process(&self, id: Uuid) -> DomainResult<BusinessProcess> {
        self.repos()
            .business_processes()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "BusinessProcess",
                field: "id",
                value: id.to_string(),
            })
    }

    /// Processes for a metering point, newest first.
    pub async fn business_processes_for(&self, gsrn: &str) -> DomainResult<Vec<BusinessProcess>> {
        let metering_point = self.get(gsrn).await?;
        self.repos()
            .business_processes()
            .list_for_gsrn(metering_point.gsrn().as_str())
            .await
    }
}

fn collect<T>(
    errors: &mut Vec<ValidationError>,
    result: Result<T, ValidationError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn parse_state_change(
    payload: &PhysicalStateChange,
) -> Result<EffectiveDate, Vec<ValidationError>> {
    let errors = validate_input(payload);
    if !errors.is_empty() {
        return Err(errors);
    }
    EffectiveDate::create(&payload.effective_date).map_err(|e| vec![e])
}

fn parse_address_change(
    payload: &ChangeAddress,
) -> Result<(Address, EffectiveDate), Vec<ValidationError>> {
    let mut errors = validate_input(payload);
    if !errors.is_empty() {
        return Err(errors);
    }
    let address = match Address::create(payload.address.clone().into()) {
        Ok(address) => Some(address),
        Err(result) => {
            errors.extend(result.into_errors());
            None
        }
    };
    let date = collect(&mut errors, EffectiveDate::create(&payload.effective_date));
    match (address, date) {
        (Some(address), Some(date)) => Ok((address, date)),
        _ => Err(errors),
    }
}

fn parse_configuration_change(
    payload: &ChangeMeteringConfiguration,
) -> Result<(MeteringConfiguration, EffectiveDate), Vec<ValidationError>> {
    let mut errors = validate_input(payload);
    if !errors.is_empty() {
        return Err(errors);
    }
    let configuration = match MeteringConfiguration::parse(
        Some(&payload.metering_method),
        payload.meter_number.as_deref(),
    ) {
        Ok(configuration) => Some(configuration),
        Err(result) => {
            errors.extend(result.into_errors());
            None
        }
    };
    let date = collect(&mut errors, EffectiveDate::create(&payload.effective_date));
    match (configuration, date) {
        (Some(configuration), Some(date)) => Ok((configuration, date)),
        _ => Err(errors),
    }
}

fn parse_supplier_change(
    payload: &ChangeEnergySupplier,
) -> Result<EnergySupplierDetails, Vec<ValidationError>> {
    let mut errors = validate_input(payload);
    if !errors.is_empty() {
        return Err(errors);
    }
    let gln = collect(&mut errors, GlnNumber::create(&payload.energy_supplier_gln));
    let start = collect(&mut errors, EffectiveDate::create(&payload.start_of_supply));
    match (gln, start) {
        (Some(gln), Some(start)) => Ok(EnergySupplierDetails::new(start, gln)),
        _ => Err(errors),
    }
}
