use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub department: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::direct_reports::Entity")]
    DirectReports,
}

impl Related<super::direct_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DirectReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
