//! Postal address of a metering point

use uuid::Uuid;

use crate::domain::enumerations::CountryCode;
use crate::domain::rules::{BusinessRulesValidationResult, ValidationError};

/// Raw address fields as received in a market document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
    pub street_name: Option<String>,
    pub street_code: Option<String>,
    pub building_number: Option<String>,
    pub city: Option<String>,
    pub city_sub_division: Option<String>,
    pub post_code: Option<String>,
    pub country_code: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub municipality_code: Option<i32>,
    pub location_description: Option<String>,
    pub geo_info_reference: Option<Uuid>,
    pub is_actual_address: Option<bool>,
}

/// A validated address. Every field is optional; which fields are required
/// depends on the metering point type and is checked by business rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    street_name: Option<String>,
    street_code: Option<String>,
    building_number: Option<String>,
    city: Option<String>,
    city_sub_division: Option<String>,
    post_code: Option<String>,
    country_code: CountryCode,
    floor: Option<String>,
    room: Option<String>,
    municipality_code: Option<i32>,
    location_description: Option<String>,
    geo_info_reference: Option<Uuid>,
    is_actual_address: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_max_length(
    result: &mut BusinessRulesValidationResult,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(v) = value {
        if v.chars().count() > max {
            result.push(ValidationError::InvalidAddressField {
                field,
                reason: format!("must be at most {} characters", max),
            });
        }
    }
}

impl Address {
    /// Validate every field, reporting all violations at once.
    pub fn create(input: AddressInput) -> Result<Self, BusinessRulesValidationResult> {
        let mut result = BusinessRulesValidationResult::valid();

        let country_code = match non_blank(input.country_code) {
            Some(code) => match CountryCode::from_code(&code) {
                Ok(c) => c,
                Err(_) => {
                    result.push(ValidationError::InvalidAddressField {
                        field: "country_code",
                        reason: format!("unsupported country code {}", code),
                    });
                    CountryCode::default()
                }
            },
            None => CountryCode::default(),
        };

        let address = Self {
            street_name: non_blank(input.street_name),
            street_code: non_blank(input.street_code),
            building_number: non_blank(input.building_number),
            city: non_blank(input.city),
            city_sub_division: non_blank(input.city_sub_division),
            post_code: non_blank(input.post_code),
            country_code,
            floor: non_blank(input.floor),
            room: non_blank(input.room),
            municipality_code: input.municipality_code,
            location_description: non_blank(input.location_description),
            geo_info_reference: input.geo_info_reference,
            is_actual_address: input.is_actual_address,
        };

        check_max_length(&mut result, "street_name", address.street_name(), 40);
        check_max_length(&mut result, "building_number", address.building_number(), 6);
        check_max_length(&mut result, "city", address.city(), 25);
        check_max_length(&mut result, "city_sub_division", address.city_sub_division(), 34);
        check_max_length(&mut result, "floor", address.floor(), 4);
        check_max_length(&mut result, "room", address.room(), 4);
        check_max_length(
            &mut result,
            "location_description",
            address.location_description(),
            60,
        );

        if let Some(code) = address.street_code() {
            let valid = code.len() == 4
                && code.bytes().all(|b| b.is_ascii_digit())
                && code != "0000";
            if !valid {
                result.push(ValidationError::InvalidAddressField {
                    field: "street_code",
                    reason: "must be four digits between 0001 and 9999".to_string(),
                });
            }
        }

        if let Some(post_code) = address.post_code() {
            let valid = match address.country_code {
                CountryCode::DK => {
                    post_code.len() == 4 && post_code.bytes().all(|b| b.is_ascii_digit())
                }
            };
            if !valid {
                result.push(ValidationError::InvalidAddressField {
                    field: "post_code",
                    reason: "must be four digits".to_string(),
                });
            }
        }

        if let Some(code) = address.municipality_code {
            if !(100..=999).contains(&code) {
                result.push(ValidationError::InvalidAddressField {
                    field: "municipality_code",
                    reason: "must be between 100 and 999".to_string(),
                });
            }
        }

        if result.success() {
            Ok(address)
        } else {
            Err(result)
        }
    }

    pub fn street_name(&self) -> Option<&str> {
        self.street_name.as_deref()
    }

    pub fn street_code(&self) -> Option<&str> {
        self.street_code.as_deref()
    }

    pub fn building_number(&self) -> Option<&str> {
        self.building_number.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn city_sub_division(&self) -> Option<&str> {
        self.city_sub_division.as_deref()
    }

    pub fn post_code(&self) -> Option<&str> {
        self.post_code.as_deref()
    }

    pub fn country_code(&self) -> CountryCode {
        self.country_code
    }

    pub fn floor(&self) -> Option<&str> {
        self.floor.as_deref()
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn municipality_code(&self) -> Option<i32> {
        self.municipality_code
    }

    pub fn location_description(&self) -> Option<&str> {
        self.location_description.as_deref()
    }

    pub fn geo_info_reference(&self) -> Option<Uuid> {
        self.geo_info_reference
    }

    pub fn is_actual_address(&self) -> Option<bool> {
        self.is_actual_address
    }

    /// Back to raw fields, used by persistence and API mapping.
    pub fn to_input(&self) -> AddressInput {
        AddressInput {
            street_name: self.street_name.clone(),
            street_code: self.street_code.clone(),
            building_number: self.building_number.clone(),
            city: self.city.clone(),
            city_sub_division: self.city_sub_division.clone(),
            post_code: self.post_code.clone(),
            country_code: Some(self.country_code.code().to_string()),
            floor: self.floor.clone(),
            room: self.room.clone(),
            municipality_code: self.municipality_code,
            location_description: self.location_description.clone(),
            geo_info_reference: self.geo_info_reference,
            is_actual_address: self.is_actual_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> AddressInput {
        AddressInput {
            street_name: Some("Vestergade".into()),
            street_code: Some("0405".into()),
            building_number: Some("12B".into()),
            city: Some("Aarhus C".into()),
            post_code: Some("8000".into()),
            municipality_code: Some(751),
            ..Default::default()
        }
    }

    #[test]
    fn valid_address() {
        let address = Address::create(input()).unwrap();
        assert_eq!(address.street_name(), Some("Vestergade"));
        assert_eq!(address.country_code(), CountryCode::DK);
    }

    #[test]
    fn blank_fields_become_none() {
        let address = Address::create(AddressInput {
            room: Some("   ".into()),
            ..input()
        })
        .unwrap();
        assert_eq!(address.room(), None);
    }

    #[test]
    fn reports_every_invalid_field() {
        let result = Address::create(AddressInput {
            street_code: Some("0000".into()),
            post_code: Some("80000".into()),
            municipality_code: Some(42),
            city: Some("A city name that is far too long".into()),
            ..input()
        })
        .unwrap_err();

        let fields: Vec<_> = result
            .errors()
            .iter()
            .filter_map(|e| match e {
                ValidationError::InvalidAddressField { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        assert_eq!(fields.len(), 4);
        assert!(fields.contains(&"street_code"));
        assert!(fields.contains(&"post_code"));
        assert!(fields.contains(&"municipality_code"));
        assert!(fields.contains(&"city"));
    }

    #[test]
    fn unsupported_country() {
        let result = Address::create(AddressInput {
            country_code: Some("SE".into()),
            ..input()
        })
        .unwrap_err();
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn to_input_round_trips() {
        let address = Address::create(input()).unwrap();
        assert_eq!(Address::create(address.to_input()).unwrap(), address);
    }
}
