mod admin;
mod common;
mod leaderboard;
