// SPDX-License-Identifier: MPL-2.0
use gallery_lens::app::{self, Command, Flags, USAGE};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let flags = match parse_flags(&mut args) {
        Ok(flags) => flags,
        Err(err) => return usage_error(&err.to_string()),
    };
    let positional: Vec<String> = args
        .finish()
        .into_iter()
        .filter_map(|arg| arg.into_string().ok())
        .collect();
    let command = match Command::parse(&positional) {
        Ok(command) => command,
        Err(err) => return usage_error(&err.to_string()),
    };

    match app::run(flags, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn parse_flags(args: &mut pico_args::Arguments) -> Result<Flags, pico_args::Error> {
    Ok(Flags {
        lang: args.opt_value_from_str("--lang")?,
        server: args.opt_value_from_str("--server")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        download_dir: args.opt_value_from_str("--download-dir")?,
    })
}

fn usage_error(message: &str) -> ExitCode {
    eprintln!("error: {message}\n\n{USAGE}");
    ExitCode::from(2)
}
