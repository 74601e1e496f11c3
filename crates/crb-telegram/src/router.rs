use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use crb_core::{
    config::Config, messaging::port::MessagingPort, registration::Registrations,
    service::StatsService, users::UserStore,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<StatsService>,
    pub users: Arc<UserStore>,
    pub registrations: Arc<Registrations>,
    pub messenger: Arc<dyn MessagingPort>,
}

pub async fn run_polling(
    cfg: Arc<Config>,
    stats: Arc<StatsService>,
    users: Arc<UserStore>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "bot started"),
        Err(e) => tracing::warn!(error = %e, "get_me failed; continuing"),
    }
    match stats.clan_tag() {
        Some(tag) => tracing::info!(clan = %tag, "clan commands enabled"),
        None => tracing::warn!("CLAN_TAG is not set; clan commands will reply with a notice"),
    }
    tracing::info!(
        path = %users.path().display(),
        users = users.len().await,
        "user store loaded"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(
        bot.clone(),
        cfg.telegram_message_limit,
    ));

    let state = Arc::new(AppState {
        stats,
        users,
        registrations: Arc::new(Registrations::new()),
        messenger,
    });

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_chat_member().endpoint(handlers::handle_chat_member));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("dispatcher stopped");
    Ok(())
}
