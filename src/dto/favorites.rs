use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Venue;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddFavoriteRequest {
    pub venue_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteVenueList {
    pub items: Vec<Venue>,
}
