use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "billings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub bill_id: i32,
    pub patient_id: i32,
    pub appt_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub status: Option<String>, // 'pending', 'paid'
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::patient::Entity",
        from = "Column::PatientId",
        to = "super::patient::Column::PatientId"
    )]
    Patient,

    #[sea_orm(
        belongs_to = "super::appointment::Entity",
        from = "Column::ApptId",
        to = "super::appointment::Column::ApptId"
    )]
    Appointment,
}

impl ActiveModelBehavior for ActiveModel {}
