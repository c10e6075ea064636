//! Resource writers
//!
//! Re-exports the layouts from x-common and adds the whole-file writers used by
//! each converter.

pub use x_common::formats::*;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a serialized resource to `output`
pub fn write_resource(output: &Path, bytes: &[u8]) -> Result<()> {
    write_output(output, |w| {
        w.write_all(bytes)?;
        Ok(())
    })
}

/// Create `output` with the contents produced by `write`.
///
/// Data goes to a sibling temporary file that is renamed into place only after
/// every byte was written, so a failed conversion never leaves a truncated
/// resource behind.
pub fn write_output<F>(output: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut tmp_name = output
        .file_name()
        .with_context(|| format!("Output path has no file name: {:?}", output))?
        .to_os_string();
    tmp_name.push(".tmp");
    let tmp = output.with_file_name(tmp_name);

    let result = (|| -> Result<()> {
        let file =
            File::create(&tmp).with_context(|| format!("Failed to create output: {:?}", tmp))?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("Failed to flush output: {:?}", tmp))?;
        std::fs::rename(&tmp, output)
            .with_context(|| format!("Failed to move output into place: {:?}", output))?;
        Ok(())
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}
