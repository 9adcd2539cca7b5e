/*!
 Command-line options for both tools.

 Options follow the short, clusterable style of the classic tools, i.e. `msgpack2json -di file.mp`.
*/

use std::{ffi::OsString, num::NonZeroUsize, path::PathBuf};

use clap::{crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};

use msgpack_core::convert::{Base64Mode, ToJsonOptions, ToMsgPackOptions};

use crate::app::error::RuntimeError;

pub const JSON2MSGPACK: &str = "json2msgpack";
pub const MSGPACK2JSON: &str = "msgpack2json";
pub const HOMEPAGE: &str = env!("CARGO_PKG_REPOSITORY");

// Shared options
pub const OPTION_INPUT: &str = "input";
pub const OPTION_OUTPUT: &str = "output";
pub const OPTION_HELP: &str = "help";
pub const OPTION_VERSION: &str = "version";

// json2msgpack options
pub const OPTION_LAX: &str = "lax";
pub const OPTION_FLOAT: &str = "float";
pub const OPTION_BASE64_PREFIX: &str = "base64-prefix";
pub const OPTION_BASE64_MIN_BYTES: &str = "base64-min-bytes";

// msgpack2json options
pub const OPTION_DEBUG: &str = "debug";
pub const OPTION_PRETTY: &str = "pretty";
pub const OPTION_BASE64: &str = "base64";
pub const OPTION_BASE64_BARE: &str = "base64-bare";

/// What the user asked a tool to do
#[derive(Debug, PartialEq, Eq)]
pub enum Action<T> {
    Convert(T),
    Help,
    Version,
}

/// Options for `json2msgpack`
#[derive(Debug, PartialEq, Eq)]
pub struct Json2MsgPackOptions {
    /// File to read, otherwise stdin
    pub input: Option<PathBuf>,
    /// File to write, otherwise stdout
    pub output: Option<PathBuf>,
    pub conversion: ToMsgPackOptions,
}

/// Options for `msgpack2json`
#[derive(Debug, PartialEq, Eq)]
pub struct MsgPack2JsonOptions {
    /// File to read, otherwise stdin
    pub input: Option<PathBuf>,
    /// File to write, otherwise stdout
    pub output: Option<PathBuf>,
    pub conversion: ToJsonOptions,
}

impl Json2MsgPackOptions {
    /// Parse the arguments, including the program name
    pub fn from_command_line<I, T>(args: I) -> Result<Action<Self>, RuntimeError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = parse(json2msgpack_command(), args)?;
        if let Some(action) = meta_action(&matches) {
            return Ok(action);
        }

        let base64_min_bytes = matches
            .get_one::<String>(OPTION_BASE64_MIN_BYTES)
            .map(|arg| parse_min_bytes(arg))
            .transpose()?;

        Ok(Action::Convert(Self {
            input: matches.get_one::<PathBuf>(OPTION_INPUT).cloned(),
            output: matches.get_one::<PathBuf>(OPTION_OUTPUT).cloned(),
            conversion: ToMsgPackOptions {
                lax: matches.get_flag(OPTION_LAX),
                use_float: matches.get_flag(OPTION_FLOAT),
                base64_prefix: matches.get_flag(OPTION_BASE64_PREFIX),
                base64_min_bytes,
            },
        }))
    }
}

impl MsgPack2JsonOptions {
    /// Parse the arguments, including the program name
    pub fn from_command_line<I, T>(args: I) -> Result<Action<Self>, RuntimeError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = parse(msgpack2json_command(), args)?;
        if let Some(action) = meta_action(&matches) {
            return Ok(action);
        }

        // `-b` and `-B` override each other, so at most one is set
        let base64 = if matches.get_flag(OPTION_BASE64) {
            Base64Mode::Prefixed
        } else if matches.get_flag(OPTION_BASE64_BARE) {
            Base64Mode::Bare
        } else {
            Base64Mode::Disabled
        };

        Ok(Action::Convert(Self {
            input: matches.get_one::<PathBuf>(OPTION_INPUT).cloned(),
            output: matches.get_one::<PathBuf>(OPTION_OUTPUT).cloned(),
            conversion: ToJsonOptions {
                debug: matches.get_flag(OPTION_DEBUG),
                pretty: matches.get_flag(OPTION_PRETTY),
                base64,
            },
        }))
    }
}

fn parse<I, T>(command: Command, args: I) -> Result<ArgMatches, RuntimeError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    command
        .try_get_matches_from(args)
        .map_err(|why| RuntimeError::InvalidOptions(why.to_string().trim_end().to_string()))
}

fn meta_action<T>(matches: &ArgMatches) -> Option<Action<T>> {
    if matches.get_flag(OPTION_HELP) {
        Some(Action::Help)
    } else if matches.get_flag(OPTION_VERSION) {
        Some(Action::Version)
    } else {
        None
    }
}

/// `-B` takes a positive byte count
fn parse_min_bytes(arg: &str) -> Result<NonZeroUsize, RuntimeError> {
    let value: i64 = arg
        .parse()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| {
            RuntimeError::InvalidOptions(format!("-B requires a positive integer, not \"{arg}\""))
        })?;
    usize::try_from(value)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| RuntimeError::InvalidOptions(format!("-B argument is out of bounds: {value}")))
}

/// Options every tool accepts
fn common_args(command: Command) -> Command {
    command
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .arg(
            Arg::new(OPTION_INPUT)
                .short('i')
                .value_name("infile")
                .value_parser(value_parser!(PathBuf))
                .help("Input filename (default stdin)")
                .display_order(0),
        )
        .arg(
            Arg::new(OPTION_OUTPUT)
                .short('o')
                .value_name("outfile")
                .value_parser(value_parser!(PathBuf))
                .help("Output filename (default stdout)")
                .display_order(1),
        )
        .arg(
            Arg::new(OPTION_HELP)
                .short('h')
                .short_alias('?')
                .action(ArgAction::SetTrue)
                .help("Print this help")
                .display_order(100),
        )
        .arg(
            Arg::new(OPTION_VERSION)
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Print version information")
                .display_order(101),
        )
}

/// Build the command-line interface for `json2msgpack`
pub fn json2msgpack_command() -> Command {
    common_args(
        Command::new(JSON2MSGPACK)
            .version(crate_version!())
            .about("Convert JSON to MessagePack")
            .override_usage(format!(
                "{JSON2MSGPACK} [-i <infile>] [-o <outfile>] [-lfb] [-B <min>]"
            )),
    )
    .arg(
        Arg::new(OPTION_LAX)
            .short('l')
            .action(ArgAction::SetTrue)
            .help("Lax mode, allows comments and trailing commas"),
    )
    .arg(
        Arg::new(OPTION_FLOAT)
            .short('f')
            .action(ArgAction::SetTrue)
            .help("Write floats instead of doubles"),
    )
    .arg(
        Arg::new(OPTION_BASE64_PREFIX)
            .short('b')
            .action(ArgAction::SetTrue)
            .help("Convert base64 strings with \"base64:\" prefix to bin, and \"ext:\" strings to ext"),
    )
    .arg(
        Arg::new(OPTION_BASE64_MIN_BYTES)
            .short('B')
            .value_name("min")
            .allow_hyphen_values(true)
            .help("Try to convert any base64 string of at least <min> bytes to bin"),
    )
}

/// Build the command-line interface for `msgpack2json`
pub fn msgpack2json_command() -> Command {
    common_args(
        Command::new(MSGPACK2JSON)
            .version(crate_version!())
            .about("Convert MessagePack to JSON")
            .override_usage(format!(
                "{MSGPACK2JSON} [-dpbB] [-i <infile>] [-o <outfile>]"
            ))
            .after_help("For viewing MessagePack, you probably want -d or -di <filename>."),
    )
    .arg(
        Arg::new(OPTION_DEBUG)
            .short('d')
            .action(ArgAction::SetTrue)
            .help("Debug viewing mode, output pseudo-JSON instead of aborting with error"),
    )
    .arg(
        Arg::new(OPTION_PRETTY)
            .short('p')
            .action(ArgAction::SetTrue)
            .help("Output pretty-printed JSON"),
    )
    .arg(
        Arg::new(OPTION_BASE64)
            .short('b')
            .action(ArgAction::SetTrue)
            .overrides_with(OPTION_BASE64_BARE)
            .help("Convert bin to base64 string with \"base64:\" prefix, and ext to \"ext:\" strings"),
    )
    .arg(
        Arg::new(OPTION_BASE64_BARE)
            .short('B')
            .action(ArgAction::SetTrue)
            .overrides_with(OPTION_BASE64)
            .help("Convert bin to base64 string with no prefix"),
    )
}

/// The text printed by `-v`
pub fn version_text(command: &str) -> String {
    format!(
        "{command} version {} -- {HOMEPAGE}\n",
        crate_version!()
    )
}
