use std::process::ExitCode;

use clap::{arg, crate_version, Command};

use propfile::{binary, tools, xml};

const RCH: &str = "unreachable was reached";

fn main() -> ExitCode {
    env_logger::init();

    let cmd = Command::new("xmldump")
        .about("decode a binary prop stream and print it as XML")
        .version(crate_version!())
        .arg(arg!(<INPUT> "binary prop file to read"))
        .arg(arg!([OUTPUT] "output path (default: standard output)"));

    let matches = cmd.get_matches();
    let infile = matches.get_one::<String>("INPUT").expect(RCH);
    let outfile = matches.get_one::<String>("OUTPUT");

    match run(infile, outfile) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(infile: &str, outfile: Option<&String>) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = tools::fs::read_file(std::path::Path::new(infile))?;
    let root = binary::decode(&bytes)?;
    let rendered = xml::write(&root)?;

    match outfile {
        Some(path) => tools::fs::write_file(std::path::Path::new(path), rendered.as_bytes())?,
        None => print!("{rendered}"),
    }

    Ok(())
}
