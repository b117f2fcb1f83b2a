use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{arg, crate_version, Command};

use propfile::prop::PropNode;
use propfile::{ifs, tools, xml};

const RCH: &str = "unreachable was reached";

fn main() -> ExitCode {
    env_logger::init();

    let cmd = Command::new("ifsdump")
        .about("expand every file in an IFS archive into a directory")
        .version(crate_version!())
        .arg(arg!(<INPUT> "archive to read"))
        .arg(arg!(<OUTDIR> "directory to write files into"))
        .arg(arg!(--toc "also write the table of contents as outdir/toc.xml"));

    let matches = cmd.get_matches();

    let infile = matches.get_one::<String>("INPUT").expect(RCH);
    let outdir = matches.get_one::<String>("OUTDIR").expect(RCH);
    let write_toc = matches.get_flag("toc");

    match run(infile, outdir, write_toc) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(infile: &str, outdir: &str, write_toc: bool) -> Result<(), Box<dyn std::error::Error>> {
    let outdir = PathBuf::from(outdir);
    tools::fs::mkdir(&outdir)?;

    let file = File::open(infile)?;
    let archive = ifs::IfsArchive::open(file)?;

    if write_toc {
        let rendered = xml::write(archive.root())?;
        tools::fs::write_file(&outdir.join("toc.xml"), rendered.as_bytes())?;
    }

    dump_dir(&archive, archive.root(), &outdir)?;
    Ok(())
}

fn dump_dir<R: std::io::Read + std::io::Seek>(
    archive: &ifs::IfsArchive<R>,
    node: &PropNode,
    outdir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    for child in ifs::children(node) {
        let name = ifs::escape_name(child.name());
        let path = outdir.join(&name);

        if ifs::is_dir(child) {
            tools::fs::mkdir(&path)?;
            dump_dir(archive, child, &path)?;
        } else if ifs::is_file(child) {
            let len = archive.read_file(child, None)?;
            let mut buf = vec![0u8; len];
            archive.read_file(child, Some(&mut buf))?;
            tools::fs::write_file(&path, &buf)?;
        } else {
            log::warn!("skipping dirent '{name}' of unexpected type");
        }
    }
    Ok(())
}
