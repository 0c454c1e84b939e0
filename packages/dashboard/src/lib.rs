//! Terminal front end for the leaderboard API: fetches rankings and yearly
//! activity, and renders them as a table and a calendar heatmap.

pub mod client;
pub mod heatmap;
pub mod page;
pub mod render;
pub mod session;
