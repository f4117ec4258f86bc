use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{validate_not_blank, Persistable};

lazy_static! {
    static ref PHONE_PATTERN: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// Supplier entity model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[validate(
        custom = "validate_not_blank",
        length(max = 100, message = "Company name must be less than 100 characters")
    )]
    pub company_name: String,

    #[validate(
        custom = "validate_not_blank",
        length(max = 100, message = "Contact name must be less than 100 characters")
    )]
    pub contact_name: String,

    #[sea_orm(unique)]
    #[validate(email(message = "Email should be valid"))]
    pub email: Option<String>,

    #[validate(regex(path = "PHONE_PATTERN", message = "Phone number must be 10 digits"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Address must be less than 255 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 100, message = "City must be less than 100 characters"))]
    pub city: Option<String>,

    #[validate(length(max = 100, message = "Country must be less than 100 characters"))]
    pub country: Option<String>,

    pub created_by: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Model {
    pub fn new(
        company_name: impl Into<String>,
        contact_name: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            company_name: company_name.into(),
            contact_name: contact_name.into(),
            email,
            phone: None,
            address: None,
            city: None,
            country: None,
            created_by: None,
            created_date: Utc::now(),
            last_modified_by: None,
            last_modified_date: None,
        }
    }
}

impl Persistable for Model {
    const NAME: &'static str = "Supplier";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

crate::impl_audit_stamp!();

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.stamp_audit(insert);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Model {
        Model::new("Acme Fasteners", "Jo Park", Some("orders@acme.test".into()))
    }

    #[test]
    fn valid_supplier_passes() {
        let mut supplier = acme();
        supplier.phone = Some("5551234567".into());
        assert!(supplier.validate().is_ok());
    }

    #[test]
    fn phone_must_be_ten_digits() {
        let mut supplier = acme();
        supplier.phone = Some("555-1234".into());
        let errors = supplier.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut supplier = acme();
        supplier.email = Some("not-an-email".into());
        let errors = supplier.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn contact_name_is_required() {
        let supplier = Model::new("Acme", " ", None);
        assert!(supplier.validate().is_err());
    }
}
