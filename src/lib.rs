pub mod dataset;
pub mod export;
pub mod report;
pub mod scoring;
pub mod team_colors;
