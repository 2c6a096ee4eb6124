//! Feed ranking for the blog listing
//!
//! Scores are computed by PostgreSQL inside `ORDER BY` so that pagination
//! stays a single query. The weights come from [`RankingConfig`] and are bound
//! as parameters. The pure functions below evaluate the same formulas in Rust
//! and are what the ordering tests reason about.
use sqlx::{Postgres, QueryBuilder};

use crate::config::RankingConfig;
use crate::models::SortOrder;

/// Hours elapsed since `b.created_at`, never negative
const AGE_HOURS_SQL: &str =
    "GREATEST(EXTRACT(EPOCH FROM (NOW() - b.created_at))::float8 / 3600.0, 0.0)";

/// Weighted engagement signal shared by trending and smart sort
pub fn engagement(likes: i64, comments: i64, reads: i64, cfg: &RankingConfig) -> f64 {
    likes as f64 * cfg.like_weight
        + comments as f64 * cfg.comment_weight
        + reads as f64 * cfg.read_weight
}

/// `engagement * 2^(-age_h / half_life)`
pub fn trending_score(
    likes: i64,
    comments: i64,
    reads: i64,
    age_hours: f64,
    cfg: &RankingConfig,
) -> f64 {
    let decay = 2f64.powf(-age_hours.max(0.0) / cfg.trending_half_life_hours);
    engagement(likes, comments, reads, cfg) * decay
}

/// Deterministic part of the smart score; the database adds `w_x * random()`
pub fn smart_base_score(
    likes: i64,
    comments: i64,
    reads: i64,
    age_hours: f64,
    cfg: &RankingConfig,
) -> f64 {
    let engagement_term = (1.0 + engagement(likes, comments, reads, cfg)).ln();
    let recency_term = (-age_hours.max(0.0) / cfg.smart_recency_hours).exp();
    cfg.smart_engagement_weight * engagement_term + cfg.smart_recency_weight * recency_term
}

fn push_engagement(qb: &mut QueryBuilder<'_, Postgres>, cfg: &RankingConfig) {
    qb.push("(b.like_count * ")
        .push_bind(cfg.like_weight)
        .push(" + b.comment_count * ")
        .push_bind(cfg.comment_weight)
        .push(" + b.read_count * ")
        .push_bind(cfg.read_weight)
        .push(")");
}

/// Append the ORDER BY expression (without the keyword) for `sort`
pub fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, sort: SortOrder, cfg: &RankingConfig) {
    match sort {
        SortOrder::Latest => {
            qb.push("b.created_at DESC, b.id DESC");
        }
        SortOrder::Oldest => {
            qb.push("b.created_at ASC, b.id ASC");
        }
        SortOrder::Popular => {
            qb.push("b.like_count DESC, b.created_at DESC");
        }
        SortOrder::Trending => {
            qb.push("(");
            push_engagement(qb, cfg);
            qb.push(" * POWER(2.0::float8, -")
                .push(AGE_HOURS_SQL)
                .push(" / ")
                .push_bind(cfg.trending_half_life_hours)
                .push(")) DESC, b.created_at DESC");
        }
        SortOrder::Smart => {
            qb.push("(")
                .push_bind(cfg.smart_engagement_weight)
                .push(" * LN(1.0 + ");
            push_engagement(qb, cfg);
            qb.push(") + ")
                .push_bind(cfg.smart_recency_weight)
                .push(" * EXP(-")
                .push(AGE_HOURS_SQL)
                .push(" / ")
                .push_bind(cfg.smart_recency_hours)
                .push(") + ")
                .push_bind(cfg.smart_random_weight)
                .push(" * RANDOM()) DESC");
        }
    }
}
