#![deny(unused)]
//! Widget services for the Omniboard dashboard.
//!
//! Each service feeds one dashboard panel: headlines, weather, stock quotes,
//! document summaries, sentiment. They share a degradation rule: a missing
//! provider key or a failed provider call produces flagged mock data, never
//! an error surfaced to the panel.

pub mod cache;
pub mod news;
pub mod sentiment;
pub mod stocks;
pub mod summarize;
pub mod weather;

pub use cache::ResponseCache;
pub use news::NewsService;
pub use sentiment::SentimentService;
pub use stocks::StockService;
pub use summarize::SummarizerService;
pub use weather::WeatherService;
