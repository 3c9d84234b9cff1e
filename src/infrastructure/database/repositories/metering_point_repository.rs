//! SeaORM implementation of MeteringPointRepository

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::enumerations::{MeteringPointType, PhysicalState};
use crate::domain::grid_area::GridAreaLinkId;
use crate::domain::metering_point::{
    EnergySupplierDetails, EnergySuppliers, MasterDataInput, MeteringPoint, MeteringPointId,
    MeteringPointRepository, MeteringPointState,
};
use crate::domain::values::{AddressInput, EffectiveDate, GlnNumber, GsrnNumber};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{energy_supplier, metering_point};
use crate::shared::pagination::Page;

use super::{corrupt, db_err, parse_uuid};

pub struct SeaOrmMeteringPointRepository {
    db: DatabaseConnection,
}

impl SeaOrmMeteringPointRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn to_active_model(mp: &MeteringPoint) -> metering_point::ActiveModel {
    let state = mp.state();
    let md = &state.master_data;
    let address = md.address.to_input();

    metering_point::ActiveModel {
        id: Set(state.id.to_string()),
        gsrn: Set(state.gsrn.to_string()),
        metering_point_type: Set(state.metering_point_type.name().to_string()),
        grid_area_link_id: Set(state.grid_area_link_id.to_string()),
        parent_related_metering_point: Set(state
            .parent_related_metering_point
            .map(|id| id.to_string())),
        physical_state: Set(state.physical_state.name().to_string()),
        street_name: Set(address.street_name),
        street_code: Set(address.street_code),
        building_number: Set(address.building_number),
        city: Set(address.city),
        city_sub_division: Set(address.city_sub_division),
        post_code: Set(address.post_code),
        country_code: Set(md.address.country_code().code().to_string()),
        floor: Set(address.floor),
        room: Set(address.room),
        municipality_code: Set(address.municipality_code),
        location_description: Set(address.location_description),
        geo_info_reference: Set(address.geo_info_reference.map(|id| id.to_string())),
        is_actual_address: Set(address.is_actual_address),
        metering_method: Set(md.metering_configuration.method.name().to_string()),
        meter_number: Set(md
            .metering_configuration
            .meter
            .as_ref()
            .map(|m| m.to_string())),
        reading_occurrence: Set(md.reading_occurrence.name().to_string()),
        product_type: Set(md.product_type.name().to_string()),
        unit_type: Set(md.unit_type.name().to_string()),
        maximum_power_kw: Set(md.power_limit.kw()),
        maximum_current: Set(md.power_limit.ampere()),
        settlement_method: Set(md.settlement_method.map(|v| v.name().to_string())),
        net_settlement_group: Set(md.net_settlement_group.map(|v| v.name().to_string())),
        disconnection_type: Set(md.disconnection_type.map(|v| v.name().to_string())),
        connection_type: Set(md.connection_type.map(|v| v.name().to_string())),
        asset_type: Set(md.asset_type.map(|v| v.name().to_string())),
        capacity: Set(md.capacity.map(|c| c.to_string())),
        scheduled_meter_reading_date: Set(md
            .scheduled_meter_reading_date
            .map(|d| d.to_string())),
        power_plant_gsrn: Set(md.power_plant_gsrn.as_ref().map(|g| g.to_string())),
        production_obligation: Set(md.production_obligation),
        exchange_from_grid_area: Set(md.exchange_from_grid_area.map(|id| id.to_string())),
        exchange_to_grid_area: Set(md.exchange_to_grid_area.map(|id| id.to_string())),
        effective_date: Set(md.effective_date.as_datetime()),
        connected_at: Set(state.connected_at.map(|d| d.as_datetime())),
        closed_down_at: Set(state.closed_down_at.map(|d| d.as_datetime())),
        version: Set(state.version),
        created_at: Set(state.created_at),
        updated_at: Set(Utc::now()),
    }
}

fn from_model(
    model: metering_point::Model,
    suppliers: Vec<energy_supplier::Model>,
) -> DomainResult<MeteringPoint> {
    let gsrn = GsrnNumber::create(&model.gsrn).map_err(|e| corrupt(&model.gsrn, e))?;
    let metering_point_type = MeteringPointType::from_name(&model.metering_point_type)
        .map_err(|e| corrupt(&model.gsrn, e))?;
    let physical_state =
        PhysicalState::from_name(&model.physical_state).map_err(|e| corrupt(&model.gsrn, e))?;

    let input = MasterDataInput {
        address: AddressInput {
            street_name: model.street_name,
            street_code: model.street_code,
            building_number: model.building_number,
            city: model.city,
            city_sub_division: model.city_sub_division,
            post_code: model.post_code,
            country_code: Some(model.country_code),
            floor: model.floor,
            room: model.room,
            municipality_code: model.municipality_code,
            location_description: model.location_description,
            geo_info_reference: model
                .geo_info_reference
                .as_deref()
                .map(Uuid::from_str)
                .transpose()
                .map_err(|e| corrupt(&model.gsrn, e))?,
            is_actual_address: model.is_actual_address,
        },
        metering_method: Some(model.metering_method),
        meter_number: model.meter_number,
        reading_occurrence: Some(model.reading_occurrence),
        product_type: Some(model.product_type),
        unit_type: Some(model.unit_type),
        maximum_power_kw: model.maximum_power_kw,
        maximum_current: model.maximum_current,
        settlement_method: model.settlement_method,
        net_settlement_group: model.net_settlement_group,
        disconnection_type: model.disconnection_type,
        connection_type: model.connection_type,
        asset_type: model.asset_type,
        capacity: model.capacity,
        scheduled_meter_reading_date: model.scheduled_meter_reading_date,
        power_plant_gsrn: model.power_plant_gsrn,
        production_obligation: model.production_obligation,
        exchange_from_grid_area: model
            .exchange_from_grid_area
            .as_deref()
            .map(parse_uuid)
            .transpose()?,
        exchange_to_grid_area: model
            .exchange_to_grid_area
            .as_deref()
            .map(parse_uuid)
            .transpose()?,
        effective_date: Some(EffectiveDate::from_datetime(model.effective_date).to_string()),
    };
    let master_data = input.build().map_err(|result| {
        let codes: Vec<_> = result.errors().iter().map(|e| e.code()).collect();
        corrupt(&model.gsrn, codes.join(", "))
    })?;

    let energy_suppliers = suppliers
        .into_iter()
        .map(|s| {
            let gln = GlnNumber::create(&s.gln).map_err(|e| corrupt(&model.gsrn, e))?;
            Ok(EnergySupplierDetails::new(
                EffectiveDate::from_datetime(s.start_of_supply),
                gln,
            ))
        })
        .collect::<DomainResult<Vec<_>>>()?;
    let energy_suppliers =
        EnergySuppliers::try_from(energy_suppliers).map_err(|e| corrupt(&model.gsrn, e))?;

    Ok(MeteringPoint::restore(MeteringPointState {
        id: MeteringPointId(parse_uuid(&model.id)?),
        gsrn,
        metering_point_type,
        grid_area_link_id: GridAreaLinkId(parse_uuid(&model.grid_area_link_id)?),
        parent_related_metering_point: model
            .parent_related_metering_point
            .as_deref()
            .map(|id| parse_uuid(id).map(MeteringPointId))
            .transpose()?,
        physical_state,
        master_data,
        energy_suppliers,
        connected_at: model.connected_at.map(EffectiveDate::from_datetime),
        closed_down_at: model.closed_down_at.map(EffectiveDate::from_datetime),
        created_at: model.created_at,
        version: model.version,
    }))
}

async fn load_suppliers<C: ConnectionTrait>(
    db: &C,
    metering_point_id: &str,
) -> DomainResult<Vec<energy_supplier::Model>> {
    energy_supplier::Entity::find()
        .filter(energy_supplier::Column::MeteringPointId.eq(metering_point_id))
        .order_by_asc(energy_supplier::Column::StartOfSupply)
        .all(db)
        .await
        .map_err(db_err)
}

async fn replace_suppliers<C: ConnectionTrait>(db: &C, mp: &MeteringPoint) -> DomainResult<()> {
    let id = mp.id().to_string();
    energy_supplier::Entity::delete_many()
        .filter(energy_supplier::Column::MeteringPointId.eq(id.as_str()))
        .exec(db)
        .await
        .map_err(db_err)?;

    for supplier in mp.energy_suppliers().iter() {
        let model = energy_supplier::ActiveModel {
            id: NotSet,
            metering_point_id: Set(id.clone()),
            gln: Set(supplier.gln.to_string()),
            start_of_supply: Set(supplier.start_of_supply.as_datetime()),
        };
        model.insert(db).await.map_err(db_err)?;
    }
    Ok(())
}

impl SeaOrmMeteringPointRepository {
    async fn hydrate(&self, model: metering_point::Model) -> DomainResult<MeteringPoint> {
        let suppliers = load_suppliers(&self.db, &model.id).await?;
        from_model(model, suppliers)
    }
}

// ── MeteringPointRepository impl ────────────────────────────────

#[async_trait]
impl MeteringPointRepository for SeaOrmMeteringPointRepository {
    async fn add(&self, mp: &MeteringPoint) -> DomainResult<()> {
        debug!(gsrn = %mp.gsrn(), "Saving metering point");

        if self.exists(mp.gsrn()).await? {
            return Err(DomainError::Conflict(format!(
                "Metering point {} already exists",
                mp.gsrn()
            )));
        }

        let txn = self.db.begin().await.map_err(db_err)?;
        to_active_model(mp).insert(&txn).await.map_err(db_err)?;
        replace_suppliers(&txn, mp).await?;
        txn.commit().await.map_err(db_err)
    }

    async fn update(&self, mp: &MeteringPoint) -> DomainResult<()> {
        debug!(
            gsrn = %mp.gsrn(),
            from = mp.base_version(),
            to = mp.version(),
            "Updating metering point"
        );

        let id = mp.id().to_string();
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut model = to_active_model(mp);
        model.id = NotSet;
        model.created_at = NotSet;
        let updated = metering_point::Entity::update_many()
            .set(model)
            .filter(metering_point::Column::Id.eq(id.as_str()))
            .filter(metering_point::Column::Version.eq(mp.base_version()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if updated.rows_affected == 0 {
            let stored = metering_point::Entity::find_by_id(id.clone())
                .one(&txn)
                .await
                .map_err(db_err)?;
            return Err(match stored {
                Some(stored) => DomainError::Conflict(format!(
                    "Metering point {} was modified concurrently (expected version {}, found {})",
                    mp.gsrn(),
                    mp.base_version(),
                    stored.version
                )),
                None => DomainError::NotFound {
                    entity: "MeteringPoint",
                    field: "gsrn",
                    value: mp.gsrn().to_string(),
                },
            });
        }

        replace_suppliers(&txn, mp).await?;
        txn.commit().await.map_err(db_err)
    }

    async fn find_by_id(&self, id: MeteringPointId) -> DomainResult<Option<MeteringPoint>> {
        let model = metering_point::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match model {
            Some(model) => self.hydrate(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_gsrn(&self, gsrn: &GsrnNumber) -> DomainResult<Option<MeteringPoint>> {
        let model = metering_point::Entity::find()
            .filter(metering_point::Column::Gsrn.eq(gsrn.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match model {
            Some(model) => self.hydrate(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn exists(&self, gsrn: &GsrnNumber) -> DomainResult<bool> {
        let count = metering_point::Entity::find()
            .filter(metering_point::Column::Gsrn.eq(gsrn.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn list(&self, page: Page) -> DomainResult<Vec<MeteringPoint>> {
        let models = metering_point::Entity::find()
            .order_by_asc(metering_point::Column::Gsrn)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut result = Vec::with_capacity(models.len());
        for model in models {
            result.push(self.hydrate(model).await?);
        }
        Ok(result)
    }

    async fn count(&self) -> DomainResult<u64> {
        metering_point::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
