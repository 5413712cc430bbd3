use log::info;
use rocket::{State, serde::json::Json};
use serde::{Deserialize, Serialize};

use crate::{
    bot::SheetBot,
    chat::ConversationKey,
    json::{JsonResult, JsonStatus},
    workflow::SheetRequest,
};

/// Describes a command the gateway should register
#[derive(Serialize, Clone, Debug)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<CommandOption>,
}

#[derive(Serialize, Clone, Debug)]
pub struct CommandOption {
    pub name: &'static str,
    pub kind: &'static str,
    pub required: bool,
    pub description: &'static str,
}

impl CommandDescriptor {
    pub fn sheet() -> Self {
        Self {
            name: "sheet",
            description: "Build a character sheet for a Pokémon",
            options: vec![
                CommandOption {
                    name: "name",
                    kind: "string",
                    required: true,
                    description: "Pokémon name",
                },
                CommandOption {
                    name: "level",
                    kind: "integer",
                    required: true,
                    description: "Character level",
                },
                CommandOption {
                    name: "nature",
                    kind: "string",
                    required: false,
                    description: "Nature, hardy when left out",
                },
            ],
        }
    }
}

/// A `/sheet` invocation forwarded by the gateway
#[derive(Deserialize, Clone, Debug)]
pub struct SheetCommand {
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub channel_id: String,
    pub name: String,
    pub level: i64,
    #[serde(default)]
    pub nature: Option<String>,
}

/// A plain chat message forwarded by the gateway
#[derive(Deserialize, Clone, Debug)]
pub struct IncomingMessage {
    pub user_id: String,
    pub channel_id: String,
    pub content: String,
}

/// Endpoint listing the commands the bot understands
#[get("/commands")]
pub async fn list_commands() -> JsonResult {
    info!("Request to /api/commands");
    Ok(JsonStatus::data_owned(vec![CommandDescriptor::sheet()]))
}

/// Endpoint starting a sheet for the invoking user
#[post("/commands/sheet", data = "<command>")]
pub async fn start_sheet(command: Json<SheetCommand>, bot: &State<SheetBot>) -> JsonResult {
    let command = command.into_inner();
    info!(
        "Request to /api/commands/sheet by {} in {}",
        command.user_id, command.channel_id
    );

    let started = SheetRequest::new(&command.name, command.level, command.nature.as_deref())
        .and_then(|request| {
            let key = ConversationKey {
                user_id: command.user_id.clone(),
                channel_id: command.channel_id.clone(),
            };
            let display_name = command.user_name.clone().unwrap_or_else(|| command.user_id.clone());
            bot.start(key, display_name, request)
        });

    match started {
        Ok(()) => Ok(JsonStatus::ok(Some("Sheet started"))),
        Err(e) => {
            bot.reject(&command.channel_id, e.user_message());
            Err(JsonStatus::from(e))
        }
    }
}

/// Endpoint handing a user's chat message to their running sheet
#[post("/messages", data = "<message>")]
pub async fn post_message(message: Json<IncomingMessage>, bot: &State<SheetBot>) -> JsonResult {
    let message = message.into_inner();
    info!("Request to /api/messages by {} in {}", message.user_id, message.channel_id);

    let key = ConversationKey {
        user_id: message.user_id,
        channel_id: message.channel_id,
    };

    bot.hub
        .deliver(&key, message.content)
        .map(|()| JsonStatus::ok::<String>(None))
        .map_err(JsonStatus::error)
}

/// Endpoint collecting what the bot posted into a channel, oldest first
#[get("/channels/<channel_id>/messages")]
pub async fn drain_messages(channel_id: String, bot: &State<SheetBot>) -> JsonResult {
    info!("Request to /api/channels/{}/messages", channel_id);
    Ok(JsonStatus::data_owned(bot.hub.drain(&channel_id)))
}
