//! Configuration module for the PDX parser
//! Compile-time limits come from the TOML profile selected at build time;
//! user preferences live in [`runtime`].

// Generated by build.rs from config/<profile>.toml
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::RuntimeConfig;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("PDX_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("PDX_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_recovery_caps_are_positive() {
        assert!(compile_time::syntax::MAX_RECOVERY_ATTEMPTS > 0);
        assert!(compile_time::syntax::MAX_SKIPPED_TOKENS > 0);
    }

    #[test]
    fn test_tab_width_in_range() {
        assert!((1..=16).contains(&compile_time::lexical::TAB_WIDTH));
    }

    #[test]
    fn test_source_info_names_profile() {
        let info = super::build_info::source_info();
        assert!(info.contains(super::build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}
