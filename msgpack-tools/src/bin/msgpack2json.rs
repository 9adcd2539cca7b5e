use std::{env::args_os, process::ExitCode};

use msgpack_tools::app::{
    options::{msgpack2json_command, version_text, Action, MsgPack2JsonOptions, MSGPACK2JSON},
    runtime::run_msgpack2json,
};

fn main() -> ExitCode {
    env_logger::init();

    let result = MsgPack2JsonOptions::from_command_line(args_os()).and_then(|action| match action {
        Action::Convert(options) => run_msgpack2json(&options),
        Action::Help => {
            eprint!("{}", msgpack2json_command().render_help());
            Ok(())
        }
        Action::Version => {
            eprint!("{}", version_text(MSGPACK2JSON));
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            eprintln!("{MSGPACK2JSON}: {why}");
            ExitCode::FAILURE
        }
    }
}
