use std::time::Duration;

use anyhow::{Context as _, Result};
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    sensor::Reading,
    sink::{Sink, SinkError, TableName},
};

pub async fn new_pool(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .context("failed to connect to database")
}

pub async fn insert_reading(
    pool: &PgPool,
    table: &TableName,
    reading: &Reading,
) -> Result<(), sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO {table} (temperature, smoke_level, smoke_ppm, smoke_status, fire_detected, fire_intensity, fire_level, accel_x, accel_y, accel_z, accel_magnitude, pitch, roll, movement_status, danger_level)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#
    );

    sqlx::query(&query)
        .bind(reading.temperature)
        .bind(reading.smoke_level)
        .bind(reading.smoke_ppm)
        .bind(reading.smoke_status.as_str())
        .bind(reading.fire_detected)
        .bind(reading.fire_intensity)
        .bind(reading.fire_level.as_str())
        .bind(reading.accel_x)
        .bind(reading.accel_y)
        .bind(reading.accel_z)
        .bind(reading.accel_magnitude)
        .bind(reading.pitch)
        .bind(reading.roll)
        .bind(reading.movement_status.as_str())
        .bind(reading.danger_level.as_str())
        .execute(pool)
        .await?;

    Ok(())
}

#[derive(Debug, Clone)]
pub struct PgSink {
    pool: PgPool,
}

impl PgSink {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = new_pool(database_url).await?;
        Ok(Self { pool })
    }
}

impl Sink for PgSink {
    async fn insert(&self, table: &TableName, reading: &Reading) -> Result<(), SinkError> {
        insert_reading(&self.pool, table, reading).await?;
        Ok(())
    }
}
