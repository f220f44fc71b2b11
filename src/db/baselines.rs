use sqlx::PgPool;

use crate::models::Baseline;

pub struct BaselineRepo;

impl BaselineRepo {
    pub async fn get(pool: &PgPool, zone_id: &str) -> Result<Option<Baseline>, sqlx::Error> {
        sqlx::query_as::<_, Baseline>(
            r#"SELECT zone_id, avg_latency, avg_temperature, avg_vibration, max_latency, max_temperature, max_vibration, sample_count, updated_at
               FROM baselines WHERE zone_id = $1"#,
        )
        .bind(zone_id)
        .fetch_optional(pool)
        .await
    }

    /// One current baseline per zone; recomputation overwrites it.
    pub async fn upsert(pool: &PgPool, baseline: &Baseline) -> Result<Baseline, sqlx::Error> {
        sqlx::query_as::<_, Baseline>(
            r#"INSERT INTO baselines (zone_id, avg_latency, avg_temperature, avg_vibration, max_latency, max_temperature, max_vibration, sample_count, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (zone_id)
               DO UPDATE SET avg_latency = EXCLUDED.avg_latency, avg_temperature = EXCLUDED.avg_temperature,
                             avg_vibration = EXCLUDED.avg_vibration, max_latency = EXCLUDED.max_latency,
                             max_temperature = EXCLUDED.max_temperature, max_vibration = EXCLUDED.max_vibration,
                             sample_count = EXCLUDED.sample_count, updated_at = EXCLUDED.updated_at
               RETURNING zone_id, avg_latency, avg_temperature, avg_vibration, max_latency, max_temperature, max_vibration, sample_count, updated_at"#,
        )
        .bind(&baseline.zone_id)
        .bind(baseline.avg_latency)
        .bind(baseline.avg_temperature)
        .bind(baseline.avg_vibration)
        .bind(baseline.max_latency)
        .bind(baseline.max_temperature)
        .bind(baseline.max_vibration)
        .bind(baseline.sample_count)
        .bind(baseline.updated_at)
        .fetch_one(pool)
        .await
    }
}
