use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{arg, crate_version, Command};

use propfile::{binary, picture, tex, tools};

const RCH: &str = "unreachable was reached";

fn main() -> ExitCode {
    env_logger::init();

    let cmd = Command::new("texdump")
        .about("decode a texturelist and write each image as a PNG")
        .version(crate_version!())
        .arg(arg!(<INDIR> "directory containing tex/texturelist.xml and its blobs"))
        .arg(arg!(<OUTDIR> "directory to write PNG files into"));

    let matches = cmd.get_matches();
    let indir = matches.get_one::<String>("INDIR").expect(RCH);
    let outdir = matches.get_one::<String>("OUTDIR").expect(RCH);

    match run(indir, outdir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(indir: &str, outdir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let indir = PathBuf::from(indir);
    let outdir = PathBuf::from(outdir);
    tools::fs::mkdir(&outdir)?;

    // Despite the .xml extension, this is the binary prop stream.
    let list_path = indir.join("tex").join("texturelist.xml");
    let bytes = tools::fs::read_file(&list_path)?;
    let root = binary::decode(&bytes)?;
    let list = tex::parse(&root)?;

    for texture in &list.textures {
        for image in &texture.images {
            if let Err(e) = dump_image(&indir, &outdir, image) {
                log::warn!("skipping image '{}': {e}", image.name);
            }
        }
    }

    Ok(())
}

fn dump_image(indir: &Path, outdir: &Path, image: &tex::Image) -> Result<(), Box<dyn std::error::Error>> {
    let blob_path = indir.join("tex").join(&image.name_md5);
    let frame = tools::fs::read_file(&blob_path)?;
    let (width, height, pixels) = tex::read_pixels(image, &frame)?;

    let out_path = outdir.join(format!("{}.png", image.name));
    picture::write_png(&out_path, width as u32, height as u32, &pixels)?;

    Ok(())
}
