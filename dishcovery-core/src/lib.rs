pub mod ai;
pub mod expiry;
pub mod rank;

pub use expiry::{
    classify, classify_raw, expiry_label, expiry_label_raw, parse_expiry_date, ExpiryStatus,
    EXPIRING_SOON_WINDOW_DAYS,
};
pub use rank::{next_rank, rank_for_cooks, NextRank, EXPERT_THRESHOLD, ROOKIE_THRESHOLD};
