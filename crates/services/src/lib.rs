//! Side-effecting services behind the handler modules: config files, host
//! information, HTTP checks, weather lookups and directory scans.

pub mod config_store;
pub mod file_scan;
pub mod system_info;
pub mod weather;
pub mod web_check;
