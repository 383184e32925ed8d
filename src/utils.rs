use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
use tabled::Table;

use crate::types::{Order, TvShow, TvShowTableRow};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Value parser for `--order`; unknown fields are passed on to the backend.
pub fn parse_order(s: &str) -> Result<Order, String> {
    if s.trim().is_empty() {
        return Err("order cannot be empty".to_string());
    }
    s.parse::<Order>().map_err(|e| e.to_string())
}

/// Renders shows in the order given; the backend already sorted them.
pub fn shows_table(shows: &[TvShow]) -> Table {
    let rows: Vec<TvShowTableRow> = shows.iter().map(TvShowTableRow::from).collect();
    Table::new(rows)
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
