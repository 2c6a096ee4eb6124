use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Reader engagement events (like, unlike, comment, read, share, follow, bookmark...).
    pub static ref ENGAGEMENT_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_engagement_events_total",
        "Engagement events segmented by kind",
        &["event"]
    )
    .expect("failed to register blog_engagement_events_total");
}

pub fn record(event: &str) {
    ENGAGEMENT_EVENTS_TOTAL.with_label_values(&[event]).inc();
}
