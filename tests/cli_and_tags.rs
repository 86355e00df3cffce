// tests/cli_and_tags.rs

use clap::Parser;

use svcrun::cli::CliArgs;
use svcrun::logging::parse_level_str;
use svcrun::types::{DisplayTag, Mode, TagColor};

#[test]
fn mode_defaults_to_production() {
    let args = CliArgs::try_parse_from(["svcrun"]).unwrap();
    assert_eq!(args.mode, Mode::Production);
}

#[test]
fn dev_mode_is_selected_by_positional_argument() {
    let args = CliArgs::try_parse_from(["svcrun", "dev"]).unwrap();
    assert_eq!(args.mode, Mode::Dev);

    let args = CliArgs::try_parse_from(["svcrun", "production"]).unwrap();
    assert_eq!(args.mode, Mode::Production);
}

#[test]
fn unknown_mode_is_rejected() {
    assert!(CliArgs::try_parse_from(["svcrun", "staging"]).is_err());
    assert!("staging".parse::<Mode>().is_err());
    assert_eq!(" Prod ".parse::<Mode>(), Ok(Mode::Production));
}

#[test]
fn display_tag_wraps_label_in_colour() {
    let tag = DisplayTag::new("membera Backend", TagColor::Cyan);
    assert_eq!(tag.to_string(), "\x1b[36m[membera Backend]\x1b[0m");
}

#[test]
fn palette_wraps_around() {
    assert_eq!(TagColor::for_index(0), TagColor::Cyan);
    assert_eq!(
        TagColor::for_index(TagColor::PALETTE.len()),
        TagColor::for_index(0)
    );
}

#[test]
fn log_levels_parse_case_insensitively() {
    assert_eq!(parse_level_str("DEBUG"), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str("warning"), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("loud"), None);
}

#[test]
fn io_errors_exit_with_the_generic_failure_status() {
    use svcrun::errors::SupervisorError;

    let err = SupervisorError::from(std::io::Error::other("signal handler"));
    assert!(matches!(err, SupervisorError::IoError(_)));
    assert_eq!(err.exit_code(), svcrun::EXIT_FAILURE);
}
