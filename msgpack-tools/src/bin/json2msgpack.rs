use std::{env::args_os, process::ExitCode};

use msgpack_tools::app::{
    options::{json2msgpack_command, version_text, Action, Json2MsgPackOptions, JSON2MSGPACK},
    runtime::run_json2msgpack,
};

fn main() -> ExitCode {
    env_logger::init();

    let result = Json2MsgPackOptions::from_command_line(args_os()).and_then(|action| match action {
        Action::Convert(options) => run_json2msgpack(&options),
        Action::Help => {
            eprint!("{}", json2msgpack_command().render_help());
            Ok(())
        }
        Action::Version => {
            eprint!("{}", version_text(JSON2MSGPACK));
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            eprintln!("{JSON2MSGPACK}: {why}");
            ExitCode::FAILURE
        }
    }
}
