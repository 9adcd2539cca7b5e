/*!
 Runs a conversion once the options are known, connecting files or the standard streams to the converters.
*/

use std::{
    fs::File,
    io::{stdin, stdout, BufWriter, Read, Write},
    path::Path,
};

use log::debug;

use msgpack_core::{
    convert::{json_writer::JsonGenerator, to_json::msgpack_to_json, to_msgpack::json_to_msgpack},
    error::conversion::ConversionError,
    msgpack::{reader::MsgPackReader, writer::MsgPackWriter},
};

use crate::app::{
    error::RuntimeError,
    options::{Json2MsgPackOptions, MsgPack2JsonOptions},
};

/// Open the input file, or stdin if there is none
fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>, RuntimeError> {
    match path {
        Some(path) => {
            debug!("Reading from {}", path.display());
            let file = File::open(path).map_err(|why| RuntimeError::OpenError(why, path.to_path_buf()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(stdin().lock())),
    }
}

/// Create the output file, or use stdout if there is none
fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>, RuntimeError> {
    let sink: Box<dyn Write> = match path {
        Some(path) => {
            debug!("Writing to {}", path.display());
            let file =
                File::create(path).map_err(|why| RuntimeError::CreateError(why, path.to_path_buf()))?;
            Box::new(file)
        }
        None => Box::new(stdout().lock()),
    };
    Ok(BufWriter::new(sink))
}

/// Convert a JSON document to MessagePack
///
/// The whole input is converted in memory before the output is opened, so a failed
/// conversion never leaves a partial output file behind.
pub fn run_json2msgpack(options: &Json2MsgPackOptions) -> Result<(), RuntimeError> {
    let mut input = vec![];
    let path = options.input.as_deref();
    open_input(path)?
        .read_to_end(&mut input)
        .map_err(|why| match path {
            Some(path) => RuntimeError::OpenError(why, path.to_path_buf()),
            None => RuntimeError::DiskError(why),
        })?;

    let mut writer = MsgPackWriter::new(Vec::with_capacity(input.len()));
    json_to_msgpack(&input, &mut writer, &options.conversion)?;
    let bytes = writer.finish().map_err(ConversionError::from)?;
    debug!("Wrote {} bytes of MessagePack", bytes.len());

    let mut output = open_output(options.output.as_deref())?;
    output.write_all(&bytes).map_err(RuntimeError::DiskError)?;
    output.flush().map_err(RuntimeError::DiskError)
}

/// Convert a MessagePack value to JSON, streaming from input to output
pub fn run_msgpack2json(options: &MsgPack2JsonOptions) -> Result<(), RuntimeError> {
    let mut reader = MsgPackReader::new(open_input(options.input.as_deref())?);
    let output = open_output(options.output.as_deref())?;

    let mut generator = JsonGenerator::new(output, options.conversion.is_pretty())
        .allow_non_string_keys(options.conversion.debug);
    msgpack_to_json(&mut reader, &mut generator, &options.conversion)?;
    generator.finish().map_err(ConversionError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use msgpack_core::convert::{ToJsonOptions, ToMsgPackOptions};
    use tempfile::tempdir;

    use crate::app::{
        error::RuntimeError,
        options::{Json2MsgPackOptions, MsgPack2JsonOptions},
        runtime::{run_json2msgpack, run_msgpack2json},
    };

    #[test]
    fn can_round_trip_through_files() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("in.json");
        let packed = dir.path().join("out.mp");
        let back = dir.path().join("back.json");
        fs::write(&json, r#"{"Hello": "world!", "n": [1, -2, 0.5]}"#).unwrap();

        run_json2msgpack(&Json2MsgPackOptions {
            input: Some(json),
            output: Some(packed.clone()),
            conversion: ToMsgPackOptions::default(),
        })
        .unwrap();
        run_msgpack2json(&MsgPack2JsonOptions {
            input: Some(packed),
            output: Some(back.clone()),
            conversion: ToJsonOptions::default(),
        })
        .unwrap();

        assert_eq!(
            fs::read_to_string(back).unwrap(),
            r#"{"Hello":"world!","n":[1,-2,0.5]}"#
        );
    }

    #[test]
    fn failed_conversion_leaves_no_output() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("bad.json");
        let packed = dir.path().join("out.mp");
        fs::write(&json, "[1, 2,]").unwrap();

        let result = run_json2msgpack(&Json2MsgPackOptions {
            input: Some(json),
            output: Some(packed.clone()),
            conversion: ToMsgPackOptions::default(),
        });

        assert!(matches!(result, Err(RuntimeError::ConversionError(_))));
        assert!(!packed.exists());
    }

    #[test]
    fn cant_open_missing_input() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.mp");

        let result = run_msgpack2json(&MsgPack2JsonOptions {
            input: Some(missing.clone()),
            output: Some(dir.path().join("out.json")),
            conversion: ToJsonOptions::default(),
        });

        match result {
            Err(RuntimeError::OpenError(_, path)) => assert_eq!(path, missing),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn cant_create_output_in_missing_directory() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("in.json");
        fs::write(&json, "[]").unwrap();

        let result = run_json2msgpack(&Json2MsgPackOptions {
            input: Some(json),
            output: Some(dir.path().join("nowhere").join("out.mp")),
            conversion: ToMsgPackOptions::default(),
        });

        assert!(matches!(result, Err(RuntimeError::CreateError(_, _))));
    }
}
