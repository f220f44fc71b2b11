use sqlx::PgPool;
use uuid::Uuid;

use crate::models::RiskAlert;

pub struct RiskAlertRepo;

const COLUMNS: &str = "id, zone_id, timestamp, risk_level, primary_cause, latency_deviation, temperature_deviation, vibration_deviation, acknowledged";

impl RiskAlertRepo {
    pub async fn create(pool: &PgPool, alert: &RiskAlert) -> Result<RiskAlert, sqlx::Error> {
        let sql = format!(
            r#"INSERT INTO risk_alerts ({COLUMNS})
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {COLUMNS}"#
        );
        sqlx::query_as::<_, RiskAlert>(&sql)
            .bind(alert.id)
            .bind(&alert.zone_id)
            .bind(alert.timestamp)
            .bind(alert.risk_level)
            .bind(&alert.primary_cause)
            .bind(alert.latency_deviation)
            .bind(alert.temperature_deviation)
            .bind(alert.vibration_deviation)
            .bind(alert.acknowledged)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool, zone_id: Option<&str>, limit: i64) -> Result<Vec<RiskAlert>, sqlx::Error> {
        match zone_id {
            Some(zone_id) => {
                let sql = format!("SELECT {COLUMNS} FROM risk_alerts WHERE zone_id = $1 ORDER BY timestamp DESC LIMIT $2");
                sqlx::query_as::<_, RiskAlert>(&sql)
                    .bind(zone_id)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let sql = format!("SELECT {COLUMNS} FROM risk_alerts ORDER BY timestamp DESC LIMIT $1");
                sqlx::query_as::<_, RiskAlert>(&sql)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    pub async fn acknowledge(pool: &PgPool, id: Uuid) -> Result<RiskAlert, sqlx::Error> {
        let sql = format!("UPDATE risk_alerts SET acknowledged = TRUE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, RiskAlert>(&sql)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
