//! DTOs for decoding identity provider responses.

use serde::{Deserialize, Serialize};

use crate::domain::{AuthorId, AuthorProfile};

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) first_name: Option<String>,
    #[serde(alias = "image_url")]
    pub(super) profile_image_url: String,
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<AuthorProfile, String> {
        let id = AuthorId::new(self.id).map_err(|err| format!("user id: {err}"))?;
        Ok(AuthorProfile {
            id,
            first_name: self.first_name,
            profile_image_url: self.profile_image_url,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct VerifySessionDto<'a> {
    pub(super) token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) user_id: String,
    pub(super) status: String,
}

impl SessionDto {
    pub(super) fn is_active(&self) -> bool {
        self.status == "active"
    }
}
