use std::{
    fs::{self, File},
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;

/// Read a file fully, decompressing it on the fly if it has a `.gz` extension
pub fn read_maybe_gz(path: &Path) -> io::Result<Vec<u8>> {
    let f = BufReader::new(File::open(path)?);

    let mut reader: Box<dyn Read> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(GzDecoder::new(f))
    } else {
        Box::new(f)
    };

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    Ok(bytes)
}

/// Find `name` in `dir`, either as-is or with a `.gz` suffix
pub fn find_maybe_gz(dir: &Path, name: &str) -> Option<PathBuf> {
    [dir.join(name), dir.join(format!("{}.gz", name))]
        .into_iter()
        .find(|path| path.exists())
}

/// Download the file at `url` to `dest`, creating parent directories as needed
pub fn download_file(url: &str, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    log::info!("Downloading {} to {}", url, dest.display());

    let response = ureq::get(url)
        .call()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("request failed: {}", e)))?;

    let mut bytes = Vec::new();
    response.into_reader().read_to_end(&mut bytes)?;

    // An interrupted download must never leave a file under the final name
    let partial = dest.with_extension("part");
    fs::write(&partial, &bytes)?;
    fs::rename(&partial, dest)?;

    log::info!("Downloaded {} bytes", bytes.len());

    Ok(())
}
