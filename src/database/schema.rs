use sea_orm::{ConnectionTrait, DbErr, EntityName, Schema, sea_query::Table};

use super::{connector::DB, models::user};

/// Creates the `users` table from the entity definition when it is absent.
pub async fn ensure_schema(db: &DB) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut stmt = schema.create_table_from_entity(user::Entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;

    log::debug!("Schema ensured for table {}", user::Entity.table_name());
    Ok(())
}

pub async fn drop_schema(db: &DB) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    let mut stmt = Table::drop();
    stmt.table(user::Entity.table_ref()).if_exists();
    db.execute(backend.build(&stmt)).await?;

    Ok(())
}
