use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::common::validate_not_blank;
use crate::uploads::UploadStore;

/// A catalog entry ("layanan") together with the name of its image file in
/// the uploads directory.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub reference_standard: String,
    pub tariff: String,
    pub product: String,
    pub image_file: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Service {
    pub const COLUMNS: &'static str = "id, name, description, reference_standard, tariff, \
         product, image_file, created_at, updated_at";
}

/// What clients see: the image as a public URL instead of a file name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub reference_standard: String,
    pub tariff: String,
    pub product: String,
    pub image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Service> for ServiceView {
    fn from(s: Service) -> Self {
        Self {
            image_url: UploadStore::public_url(&s.image_file),
            id: s.id,
            name: s.name,
            description: s.description,
            reference_standard: s.reference_standard,
            tariff: s.tariff,
            product: s.product,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Text fields collected from a multipart catalog form. Any of them may be
/// missing; create and update apply different rules.
#[derive(Debug, Default, Clone)]
pub struct ServiceFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub reference_standard: Option<String>,
    pub tariff: Option<String>,
    pub product: Option<String>,
}

impl ServiceFields {
    /// Store a form field by name. Returns false for names that are not
    /// catalog fields. The original camelCase form names are accepted too.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" | "namaLayanan" => &mut self.name,
            "description" | "deskripsi" => &mut self.description,
            "reference_standard" | "standarAcuan" => &mut self.reference_standard,
            "tariff" | "biayaTarif" => &mut self.tariff,
            "product" | "produk" => &mut self.product,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

#[derive(Debug, Validate)]
pub struct CreateServiceRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub reference_standard: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub tariff: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub product: String,
}

impl From<ServiceFields> for CreateServiceRequest {
    fn from(f: ServiceFields) -> Self {
        Self {
            name: f.name.unwrap_or_default(),
            description: f.description.unwrap_or_default(),
            reference_standard: f.reference_standard.unwrap_or_default(),
            tariff: f.tariff.unwrap_or_default(),
            product: f.product.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Validate)]
pub struct UpdateServiceRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub reference_standard: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub tariff: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub product: Option<String>,
}

impl From<ServiceFields> for UpdateServiceRequest {
    fn from(f: ServiceFields) -> Self {
        Self {
            name: f.name,
            description: f.description,
            reference_standard: f.reference_standard,
            tariff: f.tariff,
            product: f.product,
        }
    }
}
