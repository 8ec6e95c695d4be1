use anyhow::Error;
use cardferry_config::ConfigError;
use cardferry_core::CoreError;
use cardferry_sync::error::SyncError;
use std::process::ExitCode;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(sync_err) = cause.downcast_ref::<SyncError>() {
            return ExitCode::from(sync_exit_code(sync_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidGroup
        | ConfigError::InvalidVcfPath
        | ConfigError::InvalidBatchSize(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn sync_exit_code(err: &SyncError) -> u8 {
    match err {
        SyncError::SourceUnavailable(_) => EXIT_SOURCE_UNAVAILABLE,
        SyncError::Unavailable(_) => EXIT_INVALID_INPUT,
        SyncError::Core(_) | SyncError::Parse(_) => EXIT_INVALID_INPUT,
        SyncError::Command(_) | SyncError::Io(_) | SyncError::DestinationWrite(_) => EXIT_FAILURE,
    }
}
