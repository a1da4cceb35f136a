use anyhow::Result;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::company_schedule::CompanySchedule;

// Single-tenant deployment: one settings row, one cache slot.
const SCHEDULE_KEY: u8 = 1;

pub static SCHEDULE_CACHE: Lazy<Cache<u8, CompanySchedule>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(1)
        .time_to_live(Duration::from_secs(300)) // 5 min TTL
        .build()
});

async fn load(pool: &MySqlPool) -> Result<CompanySchedule, sqlx::Error> {
    let schedule = sqlx::query_as::<_, CompanySchedule>(
        r#"
        SELECT casual_leaves_per_month, casual_apply_before_leaves, leave_approval_by
        FROM company_schedule
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(schedule.unwrap_or_default())
}

/// Schedule settings, served from cache when warm.
pub async fn get(pool: &MySqlPool) -> Result<CompanySchedule, sqlx::Error> {
    if let Some(schedule) = SCHEDULE_CACHE.get(&SCHEDULE_KEY).await {
        return Ok(schedule);
    }

    let schedule = load(pool).await?;
    SCHEDULE_CACHE.insert(SCHEDULE_KEY, schedule.clone()).await;
    Ok(schedule)
}

/// Drop the cached row after an admin updates the settings.
pub async fn invalidate() {
    SCHEDULE_CACHE.invalidate(&SCHEDULE_KEY).await;
}

/// Populate the cache at startup so the first leave submission
/// does not pay the database round trip.
pub async fn warmup_schedule_cache(pool: &MySqlPool) -> Result<()> {
    let schedule = load(pool).await?;
    SCHEDULE_CACHE.insert(SCHEDULE_KEY, schedule.clone()).await;

    log::info!(
        "Schedule cache warmup complete: casual quota {}/month, {} days notice, approval by {}",
        schedule.casual_leaves_per_month,
        schedule.casual_apply_before_leaves,
        schedule.leave_approval_by
    );

    Ok(())
}
