mod bot;
mod chat;
mod config;
mod database;
mod error;
mod json;
mod pokeapi;
mod sheet;
mod user;
mod workflow;

#[cfg(test)]
mod tests;

use crate::{bot::SheetBot, config::Config, json::JsonResult};
use json::JsonStatus;
use log::info;
use rocket::{Build, Rocket, fairing::AdHoc, http::Method};
use rocket_cors::{AllowedMethods, AllowedOrigins, CorsOptions};

#[macro_use]
extern crate rocket;

fn make_cors() -> CorsOptions {
    let allowed_methods: AllowedMethods = [Method::Get, Method::Post]
        .into_iter()
        .map(From::from)
        .collect();

    CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(allowed_methods)
        .allow_credentials(true)
}

/// Builds the server around a configuration
pub fn build_rocket(config: Config) -> Rocket<Build> {
    let cors = make_cors().to_cors().expect("Error creating CORS fairing");

    rocket::build()
        .attach(cors)
        .attach(AdHoc::on_shutdown("Release reference API client", |rocket| {
            Box::pin(async move {
                if let Some(bot) = rocket.state::<SheetBot>() {
                    if !bot.api.release() {
                        info!("Reference API client was never opened");
                    }
                }
            })
        }))
        .manage(SheetBot::new(&config))
        .mount(
            "/api",
            routes![
                index,
                chat::endpoints::list_commands,
                chat::endpoints::start_sheet,
                chat::endpoints::post_message,
                chat::endpoints::drain_messages,
                user::endpoints::get_user_sheets,
            ],
        )
}

#[launch]
fn rocket() -> _ {
    let config = Config::load().expect("Error loading configuration");
    info!("Reference API at {}", config.pokeapi.base_url);
    build_rocket(config)
}

#[get("/")]
pub async fn index() -> JsonResult {
    info!("Request to /api");
    Ok(JsonStatus::ok::<String>(None))
}
