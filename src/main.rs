use anyhow::Context;
use city_info::adapters::seed::seed_cities;
use city_info::app::{Application, Reply, Request};
use city_info::config::StoreKind;
use city_info::core::{AsyncCityInfoRepository, CityInfoRepository, Mapper};
use city_info::domain::ports::Notifier;
use city_info::utils::{logger, validation::Validate};
use city_info::{build_notifier, AppConfig, CliConfig, InMemoryCityStore};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => AppConfig::default(),
    };

    if config.log_json() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Configuration: {:?}", config);

    config.validate().context("Configuration validation failed")?;

    let notifier = build_notifier(&config.notifier)?;
    let mapper = Mapper::new(config.mapping.clone());
    let request = Request::from(cli.command);

    let reply = match config.store.kind {
        StoreKind::Memory => {
            let store = InMemoryCityStore::new();
            if config.store.seed {
                store.ensure_seed_data(seed_cities())?;
            }
            execute(Arc::new(store), notifier, mapper, &request, cli.blocking)?
        }
        #[cfg(feature = "store-sqlite")]
        StoreKind::Sqlite => {
            let path = config
                .store
                .path
                .as_deref()
                .context("store.path is required for the sqlite store")?;
            let store = city_info::SqliteCityStore::open(path)
                .with_context(|| format!("Failed to open database '{}'", path))?;
            if config.store.seed && store.ensure_seed_data(seed_cities())? {
                tracing::info!("Seeded empty database at {}", path);
            }
            execute(Arc::new(store), notifier, mapper, &request, cli.blocking)?
        }
        #[cfg(not(feature = "store-sqlite"))]
        StoreKind::Sqlite => anyhow::bail!("this build does not include the sqlite store"),
    };

    println!("{}", serde_json::to_string_pretty(&reply)?);
    if !reply.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Blocking mode runs without an async runtime so the blocking notifier
/// client is safe to use.
fn execute<R>(
    store: Arc<R>,
    notifier: Arc<dyn Notifier>,
    mapper: Mapper,
    request: &Request,
    blocking: bool,
) -> anyhow::Result<Reply>
where
    R: CityInfoRepository + AsyncCityInfoRepository + 'static,
{
    let app = Application::new(store, notifier, mapper);
    if blocking {
        return Ok(app.handle(request));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let reply = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, cancelling request");
                interrupt.cancel();
            }
        });
        app.handle_async(request, &cancel).await
    });
    Ok(reply)
}
