pub mod config;
pub mod installer;
pub mod shortcuts;
pub mod system_info;
pub mod template;
pub mod template_store;
