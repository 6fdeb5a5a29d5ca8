use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub reference: String,
    pub venue_id: Uuid,
    pub renter_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub guests_count: i32,
    pub event_type: String,
    pub contact_phone: String,
    pub special_requests: Option<String>,
    pub subtotal: Decimal,
    pub commission: Decimal,
    pub deposit_amount: Decimal,
    pub total_amount: Decimal,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub deposit_paid: bool,
    pub full_payment_paid: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub confirmed_at: Option<DateTimeWithTimeZone>,
    pub completed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::venues::Entity",
        from = "Column::VenueId",
        to = "super::venues::Column::Id"
    )]
    Venues,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RenterId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::venues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venues.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
