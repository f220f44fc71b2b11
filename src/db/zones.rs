use sqlx::PgPool;

use crate::models::Zone;

pub struct ZoneRepo;

impl ZoneRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Zone>, sqlx::Error> {
        sqlx::query_as::<_, Zone>(
            "SELECT zone_id, name, location, status FROM zones ORDER BY zone_id"
        )
        .fetch_all(pool)
        .await
    }

    pub async fn get(pool: &PgPool, zone_id: &str) -> Result<Option<Zone>, sqlx::Error> {
        sqlx::query_as::<_, Zone>(
            "SELECT zone_id, name, location, status FROM zones WHERE zone_id = $1"
        )
        .bind(zone_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn upsert(pool: &PgPool, zone: &Zone) -> Result<Zone, sqlx::Error> {
        sqlx::query_as::<_, Zone>(
            r#"INSERT INTO zones (zone_id, name, location, status)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (zone_id)
               DO UPDATE SET name = EXCLUDED.name, location = EXCLUDED.location, status = EXCLUDED.status, updated_at = NOW()
               RETURNING zone_id, name, location, status"#,
        )
        .bind(&zone.zone_id)
        .bind(&zone.name)
        .bind(&zone.location)
        .bind(zone.status)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_all(pool: &PgPool) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM samples").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM baselines").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM zones").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}
