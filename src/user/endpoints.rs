use log::info;

use crate::{
    database::get::DbGet,
    json::{JsonResult, JsonStatus},
    user::User,
};

/// Endpoint for listing the sheets a user has built
#[get("/users/<user_id>/sheets")]
pub async fn get_user_sheets(user_id: String) -> JsonResult {
    info!("Request to /api/users/{}/sheets", user_id);

    let user = match User::get_first(&user_id).await {
        Ok(user) => user,
        Err(_) => return Err(JsonStatus::error("User not found")),
    };

    let mut sheets = Vec::with_capacity(user.sheets.len());
    for sheet in &user.sheets {
        sheets.push(sheet.resolve().await.map_err(JsonStatus::from_anyhow)?);
    }

    Ok(JsonStatus::data_owned(sheets))
}
