use sea_orm::entity::prelude::*;

/// One edge of the reporting graph. `ordinal` keeps the order in which the
/// reports were listed. `report_id` is deliberately not a foreign key: the
/// referenced employee may not exist.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "direct_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub manager_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ordinal: i32,
    #[sea_orm(indexed)]
    pub report_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::ManagerId",
        to = "super::employees::Column::EmployeeId",
        on_delete = "Cascade"
    )]
    Manager,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Manager.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
