use dioxus_logger::tracing;
use tokio::sync::mpsc;

use crate::server::{
    config::Config,
    error::{playback::PlaybackError, AppError},
    service::playback::EngineCommand,
};

/// Connects to the Sqlite database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Answers engine commands while no audio backend is attached to the process.
///
/// Every command is refused so control clicks get a clear reply instead of timing
/// out. An embedding audio engine consumes the command stream itself and never
/// calls this.
pub async fn refuse_engine_commands(mut commands: mpsc::Receiver<EngineCommand>) {
    while let Some(command) = commands.recv().await {
        tracing::debug!(
            "No audio backend attached, refusing {} for guild {}",
            command.action,
            command.guild_id
        );
        let _ = command.respond.send(Err(PlaybackError::Rejected(
            "No audio backend is attached to this bot".to_string(),
        )));
    }
}
