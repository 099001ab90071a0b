//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use cppdom_config::DomConfig;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_build_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[build]
coalesce_blank_lines = false
max_compound_depth = 16
",
        )?;

        let config: DomConfig = Figment::from(Serialized::defaults(DomConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(!config.build.coalesce_blank_lines);
        assert_eq!(config.build.max_compound_depth, 16);
        Ok(())
    });
}

#[test]
fn partial_section_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[build]
max_compound_depth = 4
",
        )?;

        let config: DomConfig = Figment::from(Serialized::defaults(DomConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.build.coalesce_blank_lines);
        assert_eq!(config.build.max_compound_depth, 4);
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cppdom")?;
        jail.create_file(
            ".cppdom/config.toml",
            r"
[build]
coalesce_blank_lines = false
",
        )?;

        let config = DomConfig::load().expect("config loads");
        assert!(!config.build.coalesce_blank_lines);
        Ok(())
    });
}

#[test]
fn load_rejects_zero_depth() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cppdom")?;
        jail.create_file(
            ".cppdom/config.toml",
            r"
[build]
max_compound_depth = 0
",
        )?;

        let err = DomConfig::load().unwrap_err();
        assert!(err.to_string().contains("build.max_compound_depth"));
        Ok(())
    });
}

#[test]
fn wrongly_typed_value_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cppdom")?;
        jail.create_file(
            ".cppdom/config.toml",
            r#"
[build]
max_compound_depth = "deep"
"#,
        )?;

        let err = DomConfig::load().unwrap_err();
        assert!(matches!(err, cppdom_config::ConfigError::Figment(_)));
        Ok(())
    });
}
