use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError};

/// Platform roles. Handlers never branch on raw strings; the capability
/// checks below are the single place role semantics live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Renter,
    Vendor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Renter => "RENTER",
            Role::Vendor => "VENDOR",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RENTER" => Some(Role::Renter),
            "VENDOR" => Some(Role::Vendor),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-side capability: the venue owner and admins.
    pub fn can_manage_venue(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.user_id == owner_id
    }

    /// Read capability on a booking: its renter, the venue owner, admins.
    pub fn can_view_booking(&self, renter_id: Uuid, venue_owner_id: Uuid) -> bool {
        self.is_admin() || self.user_id == renter_id || self.user_id == venue_owner_id
    }
}

/// Strict role gate for endpoints whose semantics are tied to one role
/// (e.g. the renter-grouped booking lists, the vendor dashboard).
pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_venue_manager(user: &AuthUser, owner_id: Uuid) -> Result<(), AppError> {
    if !user.can_manage_venue(owner_id) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Validation("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Validation("Invalid Authorization header".into()))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Validation("Invalid Authorization scheme".into()));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Validation("Invalid or expired token".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Validation("Invalid user id in token".into()))?;

        let role = Role::parse(&decoded.claims.role)
            .ok_or_else(|| AppError::Validation("Invalid role in token".into()))?;

        Ok(AuthUser { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_manage_any_venue() {
        let admin = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(admin.can_manage_venue(Uuid::new_v4()));
    }

    #[test]
    fn vendor_manages_only_their_own_venue() {
        let vendor_id = Uuid::new_v4();
        let vendor = AuthUser {
            user_id: vendor_id,
            role: Role::Vendor,
        };
        assert!(vendor.can_manage_venue(vendor_id));
        assert!(!vendor.can_manage_venue(Uuid::new_v4()));
    }

    #[test]
    fn booking_visibility_covers_both_parties() {
        let renter_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let renter = AuthUser {
            user_id: renter_id,
            role: Role::Renter,
        };
        let stranger = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Renter,
        };
        assert!(renter.can_view_booking(renter_id, owner_id));
        assert!(!stranger.can_view_booking(renter_id, owner_id));
    }
}
