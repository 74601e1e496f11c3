use std::sync::Arc;

use crb_core::{
    config::Config,
    lookup::PlayerLookup,
    ports::{PlayerSource, StatsApi},
    service::StatsService,
    users::UserStore,
};
use crb_royale::{FallbackClient, RoyaleClient};

#[tokio::main]
async fn main() -> Result<(), crb_core::Error> {
    crb_core::logging::init("crb")?;

    let cfg = Arc::new(Config::load()?);

    let royale = Arc::new(RoyaleClient::from_config(&cfg)?);
    let fallback = FallbackClient::from_config(&cfg)?.map(|c| Arc::new(c) as Arc<dyn PlayerSource>);
    match &cfg.fallback_api_base_url {
        Some(url) => tracing::info!(%url, "fallback player source enabled"),
        None => tracing::info!("no fallback player source configured"),
    }

    let players = PlayerLookup::new(royale.clone(), fallback);
    let stats = Arc::new(StatsService::new(
        royale as Arc<dyn StatsApi>,
        players,
        cfg.clan_tag.clone(),
    ));
    let users = Arc::new(UserStore::open(cfg.user_store_path.clone())?);

    crb_telegram::router::run_polling(cfg, stats, users)
        .await
        .map_err(|e| crb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
