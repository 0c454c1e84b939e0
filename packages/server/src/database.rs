use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
    sea_query::IndexCreateStatement,
};
use tracing::{info, warn};

use crate::entity::{submission, user};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    create_schema(&db).await?;
    ensure_indexes(&db).await;

    Ok(db)
}

/// Create the `user` and `submission` tables if they do not exist yet.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, submission::Entity).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute_raw(backend.build(&stmt)).await?;
    Ok(())
}

/// Ensure the query indexes exist.
///
/// Failures are logged and skipped: a missing index slows queries down but
/// never changes their results.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) {
    let indexes: [(&str, IndexCreateStatement); 6] = [
        (
            "idx_submission_submitted_platform",
            Index::create()
                .table(submission::Entity)
                .col(submission::Column::SubmittedAt)
                .col(submission::Column::Platform)
                .to_owned(),
        ),
        (
            "idx_submission_user_platform",
            Index::create()
                .table(submission::Entity)
                .col(submission::Column::UserId)
                .col(submission::Column::Platform)
                .to_owned(),
        ),
        (
            "idx_submission_user_status",
            Index::create()
                .table(submission::Entity)
                .col(submission::Column::UserId)
                .col(submission::Column::Status)
                .to_owned(),
        ),
        (
            "idx_submission_user_difficulty",
            Index::create()
                .table(submission::Entity)
                .col(submission::Column::UserId)
                .col(submission::Column::Difficulty)
                .to_owned(),
        ),
        (
            "idx_user_platform_solved",
            Index::create()
                .table(user::Entity)
                .col(user::Column::Platform)
                .col(user::Column::SolvedCount)
                .to_owned(),
        ),
        (
            "idx_user_last_updated",
            Index::create()
                .table(user::Entity)
                .col(user::Column::LastUpdated)
                .to_owned(),
        ),
    ];

    let backend = db.get_database_backend();
    for (name, mut stmt) in indexes {
        stmt.if_not_exists().name(name);
        match db.execute_raw(backend.build(&stmt)).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => warn!("Failed to create index {}: {}", name, e),
        }
    }
}
