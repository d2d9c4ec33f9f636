use sea_orm::entity::prelude::*;

/// A licensed club player, mirrored from the federation roster. Rows are
/// created on first sync observation and updated in place afterwards;
/// `notes` belongs to the admins and is never touched by the sync.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "player")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub licence: String,
    pub first_name: String,
    pub last_name: String,
    pub points: i32,
    pub exact_points: f64,
    pub category: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
