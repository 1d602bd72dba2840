#![forbid(unsafe_code)]

mod autostart;
mod cli;
mod config;
mod constants;
mod i18n;
mod types;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::Path;
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use cli::{toggle_label, AppCommand, Cli, Command, OptionName, ShowArgs};
use config::{
    detect_config_path, AppSettings, AppSnapshot, ConfigPath, ConfigType, OptimusSettings,
    OptimusSnapshot,
};
use types::{Gpu, Language, TokenMap};

fn open_optimus(file: Option<&Path>) -> OptimusSettings {
    match file {
        Some(path) => OptimusSettings::with_path(path),
        None => OptimusSettings::open(),
    }
}

fn language_label(language: Language) -> &'static str {
    match language.token() {
        "" => "system",
        token => token,
    }
}

fn show_optimus(settings: &OptimusSettings, args: &ShowArgs) -> Result<()> {
    if args.json {
        let snapshot: OptimusSnapshot = settings.snapshot();
        let json = serde_json::to_string_pretty(&snapshot)
            .context("Failed to serialize settings")?;
        println!("{json}");
        return Ok(());
    }

    println!("# {} ({})", settings.path().display(), settings.config_type());
    for option in OptionName::value_variants() {
        println!("{} = {}", option.name(), option.get(settings));
    }
    Ok(())
}

fn show_app(settings: &AppSettings, args: &ShowArgs) -> Result<()> {
    let snapshot: AppSnapshot = settings.snapshot();
    if args.json {
        let json = serde_json::to_string_pretty(&snapshot)
            .context("Failed to serialize preferences")?;
        println!("{json}");
        return Ok(());
    }

    println!("# {}", settings.file().display());
    println!("language = {}", language_label(snapshot.language));
    println!(
        "autostart = {} ({})",
        toggle_label(snapshot.autostart),
        settings.autostart_entry().display()
    );
    println!("confirm-switching = {}", toggle_label(snapshot.confirm_switching));
    for gpu in Gpu::ALL {
        println!("icon.{} = {}", gpu.token(), settings.gpu_icon_name(gpu));
    }
    Ok(())
}

fn run_app(command: AppCommand) -> Result<()> {
    let mut settings = AppSettings::load();

    match command {
        AppCommand::Show(args) => show_app(&settings, &args)?,
        AppCommand::Language { language: None } => match settings.language() {
            Language::System => {
                println!("system ({})", language_label(i18n::current_language()));
            }
            language => println!("{}", language_label(language)),
        },
        AppCommand::Language { language: Some(language) } => {
            settings.set_language(language);
            settings.save()?;
        }
        AppCommand::Autostart { state: None } => {
            println!("{}", toggle_label(settings.is_autostart_enabled()));
        }
        AppCommand::Autostart { state: Some(state) } => {
            settings.set_autostart_enabled(state.into());
        }
        AppCommand::ConfirmSwitching { state: None } => {
            println!("{}", toggle_label(settings.is_confirm_switching()));
        }
        AppCommand::ConfirmSwitching { state: Some(state) } => {
            settings.set_confirm_switching(state.into());
            settings.save()?;
        }
        AppCommand::Icon { gpu, name: None } => {
            println!("{}", settings.gpu_icon_name(gpu));
        }
        AppCommand::Icon { gpu, name: Some(name) } => {
            settings
                .set_gpu_icon_name(gpu, &name)
                .with_context(|| format!("Invalid icon name for {}", gpu.token()))?;
            settings.save()?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "info" => TraceLevel::INFO,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::WARN,
    };

    // Logs go to stderr so command output stays pipeable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let Cli { file, command } = Cli::parse();
    let file = file.as_deref();

    AppSettings::load().setup_localization();

    match command {
        Command::Show(args) => show_optimus(&open_optimus(file), &args)?,
        Command::Get { option } => {
            println!("{}", option.get(&open_optimus(file)));
        }
        Command::Set { option, value } => {
            let mut settings = open_optimus(file);
            option
                .set(&mut settings, &value)
                .with_context(|| format!("Invalid value for {}", option.name()))?;
            settings.save()?;
            info!(option = %option.name(), value = %option.get(&settings), "Updated option");
        }
        Command::ConfigPath => {
            let ConfigPath { path, kind } = match file {
                Some(path) => ConfigPath {
                    path: path.to_path_buf(),
                    kind: ConfigType::default(),
                },
                None => detect_config_path(),
            };
            println!("{} ({kind})", path.display());
        }
        Command::App(command) => run_app(command)?,
    }

    Ok(())
}
