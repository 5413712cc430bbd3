use std::sync::Arc;

use log::{info, warn};

use crate::{
    chat::{ChatHub, ConversationKey, HubConversation, OutboundMessage},
    config::Config,
    database,
    error::SheetResult,
    pokeapi::ApiClient,
    user::save_sheet,
    workflow::{SheetRequest, WorkflowSettings, run_sheet_command},
};

/// Everything a running bot shares between requests
#[derive(Clone)]
pub struct SheetBot {
    pub api: Arc<ApiClient>,
    pub hub: Arc<ChatHub>,
    pub settings: Arc<WorkflowSettings>,
    /// Whether finished sheets are written to the record store
    pub persist: bool,
}

impl SheetBot {
    pub fn new(config: &Config) -> Self {
        if let Some(database) = &config.database {
            database::configure(database.clone());
        }

        Self {
            api: Arc::new(ApiClient::new(&config.pokeapi)),
            hub: Arc::new(ChatHub::new()),
            settings: Arc::new(WorkflowSettings::from_config(&config.workflow)),
            persist: config.database.is_some(),
        }
    }

    /// Opens the conversation for a command and runs it in the background
    ///
    /// Fails without side effects when the user already has a sheet in
    /// progress in the channel.
    pub fn start(&self, key: ConversationKey, display_name: String, request: SheetRequest) -> SheetResult<()> {
        let conversation = self.hub.open(key)?;
        let bot = self.clone();

        tokio::spawn(async move {
            bot.run(conversation, display_name, request).await;
        });

        Ok(())
    }

    /// Reports a failure into a channel
    pub fn reject(&self, channel_id: &str, message: String) {
        self.hub.post(channel_id, OutboundMessage::Text(message));
    }

    async fn run(&self, conversation: HubConversation, display_name: String, request: SheetRequest) {
        let user_id = conversation.key().user_id.clone();
        let finished = run_sheet_command(self.api.as_ref(), &conversation, &self.settings, request).await;

        // the user may start another sheet while this one is stored
        drop(conversation);

        let Some(sheet) = finished else {
            return;
        };

        if !self.persist {
            return;
        }

        match save_sheet(user_id, display_name, &sheet).await {
            Ok(record) => info!("Sheet {} persisted", record.id),
            Err(e) => warn!("Could not persist sheet for {}: {:#}", sheet.creature.name, e),
        }
    }
}
