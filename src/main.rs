use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod core;
mod error;
mod events;
mod services;
mod utils;

use crate::core::WindowRelay;
use config::Config;
use services::{create_backend_watcher, create_notification_sink};

#[derive(Parser, Debug)]
#[command(name = "winwatch-rust")]
#[command(about = "Нормализация и доставка событий активных окон потребителю истории")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "winwatch.toml")]
    config: String,

    /// Режим сухого запуска (без реальной доставки на шину)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск Winwatch Rust v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - доставка на шину отключена");
    }

    // Инициализация компонентов: приёмник → ядро → наблюдатель
    let sink = create_notification_sink(args.dry_run).await?;
    let relay = Arc::new(WindowRelay::new(sink));
    let backend = create_backend_watcher(config.clone(), relay.clone(), args.dry_run)?;

    info!("Все компоненты инициализированы");

    let backend_handle = tokio::spawn(async move {
        if let Err(e) = backend.run().await {
            error!("Ошибка в BackendWatcher: {}", e);
        }
    });

    info!("Наблюдатель запущен");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");
    info!("Подписок в реестре на момент остановки: {}", relay.registry().len());

    // Прерываем задачу наблюдателя
    backend_handle.abort();

    // Ожидаем завершения задачи (с таймаутом)
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = backend_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Наблюдатель завершил работу корректно"),
        Err(_) => warn!("Таймаут при завершении наблюдателя"),
    }

    info!("Winwatch Rust завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
