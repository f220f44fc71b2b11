use sqlx::PgPool;

use crate::models::Sample;

pub struct SampleRepo;

impl SampleRepo {
    pub async fn create(pool: &PgPool, sample: &Sample) -> Result<Sample, sqlx::Error> {
        sqlx::query_as::<_, Sample>(
            r#"INSERT INTO samples (id, zone_id, timestamp, latency, temperature, vibration, is_baseline)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, zone_id, timestamp, latency, temperature, vibration, is_baseline"#,
        )
        .bind(sample.id)
        .bind(&sample.zone_id)
        .bind(sample.timestamp)
        .bind(sample.latency)
        .bind(sample.temperature)
        .bind(sample.vibration)
        .bind(sample.is_baseline)
        .fetch_one(pool)
        .await
    }

    pub async fn create_batch(pool: &PgPool, samples: &[Sample]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for s in samples {
            sqlx::query(
                r#"INSERT INTO samples (id, zone_id, timestamp, latency, temperature, vibration, is_baseline)
                   VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
            )
            .bind(s.id)
            .bind(&s.zone_id)
            .bind(s.timestamp)
            .bind(s.latency)
            .bind(s.temperature)
            .bind(s.vibration)
            .bind(s.is_baseline)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Newest `limit` samples of a zone, newest first.
    pub async fn recent(pool: &PgPool, zone_id: &str, limit: i64) -> Result<Vec<Sample>, sqlx::Error> {
        sqlx::query_as::<_, Sample>(
            r#"SELECT id, zone_id, timestamp, latency, temperature, vibration, is_baseline
               FROM samples WHERE zone_id = $1
               ORDER BY timestamp DESC LIMIT $2"#,
        )
        .bind(zone_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Newest `limit` baseline-flagged samples of a zone, newest first.
    pub async fn recent_baseline(pool: &PgPool, zone_id: &str, limit: i64) -> Result<Vec<Sample>, sqlx::Error> {
        sqlx::query_as::<_, Sample>(
            r#"SELECT id, zone_id, timestamp, latency, temperature, vibration, is_baseline
               FROM samples WHERE zone_id = $1 AND is_baseline
               ORDER BY timestamp DESC LIMIT $2"#,
        )
        .bind(zone_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
