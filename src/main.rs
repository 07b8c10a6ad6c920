use color_eyre::eyre::WrapErr;
use database::{DatabaseGenerator, DatabaseLoader};
use env_logger::Env;
use log::info;
use std::env;
use std::time::Instant;
use web::{DEFAULT_PORT, LeagueAppData, LeagueServer};

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let now = Instant::now();

    let mut database = DatabaseLoader::load().wrap_err("failed to load league data")?;

    info!("database loaded: {} ms", now.elapsed().as_millis());

    if let Ok(seed) = env::var("LEAGUE_SEED") {
        database.settings.season.base_seed = seed
            .parse()
            .wrap_err_with(|| format!("LEAGUE_SEED must be an unsigned integer, got '{}'", seed))?;
        info!("base seed overridden: {}", database.settings.season.base_seed);
    }

    let port = match env::var("PORT") {
        Ok(port) => port
            .parse()
            .wrap_err_with(|| format!("PORT must be a port number, got '{}'", port))?,
        Err(_) => DEFAULT_PORT,
    };

    let store = DatabaseGenerator::generate(&database, database.settings.season.base_seed)
        .wrap_err("failed to generate the league")?;

    let data = LeagueAppData::new(store, database.settings);

    LeagueServer::new(data, port).run().await?;

    Ok(())
}
