pub mod commands;
pub mod config;
pub mod db;
pub mod handlers;
pub mod i18n;
pub mod model;
pub mod reporting;
