//! Asset bundle packer and reader (.xbnl)
//!
//! Bundles hold already-converted resources keyed by the FNV-1a hash of their
//! logical name, so the runtime never stores path strings.

use anyhow::{Context, Result, bail};
use hashbrown::HashMap;
use std::path::{Path, PathBuf};
use x_common::{BUNDLE_ALIGNMENT, BundleEntry, XBundleHeader, hash_name};

use crate::formats::write_resource;

/// One file to pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    /// Name the runtime looks the file up by
    pub name: String,
    pub data: Vec<u8>,
}

impl BundleFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

fn align_up(value: usize) -> usize {
    value.div_ceil(BUNDLE_ALIGNMENT) * BUNDLE_ALIGNMENT
}

/// Pack files into a bundle, preserving their order
pub fn pack_bundle(files: &[BundleFile]) -> Result<Vec<u8>> {
    let mut seen: HashMap<u32, &str> = HashMap::new();
    for file in files {
        let hash = hash_name(&file.name);
        if let Some(previous) = seen.insert(hash, &file.name) {
            bail!(
                "Bundle names '{}' and '{}' share hash 0x{:08X}",
                previous,
                file.name,
                hash
            );
        }
    }

    let header = XBundleHeader::new(
        u32::try_from(files.len()).context("Too many files for one bundle")?,
    );
    let mut offset = header.data_offset();
    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        entries.push(BundleEntry {
            name_hash: hash_name(&file.name),
            length: u32::try_from(file.data.len())
                .with_context(|| format!("Bundle file '{}' is larger than 4 GiB", file.name))?,
            offset: offset as u64,
        });
        offset = align_up(offset + file.data.len());
    }

    let mut out = Vec::with_capacity(offset);
    out.extend_from_slice(&header.to_bytes());
    for entry in &entries {
        out.extend_from_slice(&entry.to_bytes());
    }
    for file in files {
        out.extend_from_slice(&file.data);
        out.resize(align_up(out.len()), 0);
    }

    Ok(out)
}

/// A decoded bundle
#[derive(Debug, Clone)]
pub struct Bundle {
    files: HashMap<u32, Vec<u8>>,
    entries: Vec<BundleEntry>,
}

impl Bundle {
    /// Contents of the file packed under `name`
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(&hash_name(name)).map(Vec::as_slice)
    }

    /// File table entries in packing order
    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode a bundle, checking every entry lies within `bytes`
pub fn read_bundle(bytes: &[u8]) -> Result<Bundle> {
    let header = XBundleHeader::from_bytes(bytes).context("Bundle is shorter than its header")?;
    if !header.is_valid() {
        bail!("Invalid bundle magic 0x{:08X}", header.magic);
    }

    let table = bytes
        .get(XBundleHeader::SIZE..header.data_offset())
        .context("Bundle file table is truncated")?;

    let mut files = HashMap::new();
    let mut entries = Vec::with_capacity(header.file_count as usize);
    for chunk in table.chunks_exact(BundleEntry::SIZE) {
        let entry = BundleEntry::from_bytes(chunk).context("Bundle entry is truncated")?;
        let start = usize::try_from(entry.offset).context("Bundle offset out of range")?;
        let data = start
            .checked_add(entry.length as usize)
            .and_then(|end| bytes.get(start..end))
            .with_context(|| {
                format!(
                    "Bundle entry 0x{:08X} ({} bytes at {}) runs past the end of the bundle",
                    entry.name_hash, entry.length, entry.offset
                )
            })?;
        files.insert(entry.name_hash, data.to_vec());
        entries.push(entry);
    }

    Ok(Bundle { files, entries })
}

/// Logical name of `path`: relative to `root` when given, `/`-separated
pub fn logical_name(path: &Path, root: Option<&Path>) -> Result<String> {
    let relative = match root {
        Some(root) => path
            .strip_prefix(root)
            .with_context(|| format!("{:?} is not under bundle root {:?}", path, root))?,
        None => path,
    };
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// Pack the given files into a bundle at `output`
pub fn make_bundle(output: &Path, inputs: &[PathBuf], root: Option<&Path>) -> Result<()> {
    let mut files = Vec::with_capacity(inputs.len());
    for path in inputs {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read bundle input: {:?}", path))?;
        let name = logical_name(path, root)?;
        tracing::debug!(
            "Bundling {} ({} bytes, hash 0x{:08X})",
            name,
            data.len(),
            hash_name(&name)
        );
        files.push(BundleFile::new(name, data));
    }

    write_bundle(output, &files)
}

/// Pack `files` and write the bundle to `output`
pub fn write_bundle(output: &Path, files: &[BundleFile]) -> Result<()> {
    let bytes = pack_bundle(files)?;
    write_resource(output, &bytes)?;

    tracing::info!("Packed bundle: {} files, {} bytes", files.len(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<BundleFile> {
        vec![
            BundleFile::new("assets/hi1.txt", b"hello".to_vec()),
            BundleFile::new("assets/hi2.txt", b"worlds!!".to_vec()),
        ]
    }

    #[test]
    fn test_layout_and_alignment() {
        let bytes = pack_bundle(&sample()).unwrap();
        assert_eq!(&bytes[0..4], b"XBNL");
        assert_eq!(&bytes[4..8], &2u32.to_le_bytes());

        let first = BundleEntry::from_bytes(&bytes[8..]).unwrap();
        let second = BundleEntry::from_bytes(&bytes[24..]).unwrap();
        assert_eq!(first.name_hash, hash_name("assets/hi1.txt"));
        assert_eq!(first.offset, 40);
        assert_eq!(first.length, 5);
        // 5 bytes padded to 8
        assert_eq!(second.offset, 48);
        assert_eq!(second.length, 8);
        assert_eq!(bytes.len(), 56);
        assert_eq!(&bytes[45..48], &[0, 0, 0]);
    }

    #[test]
    fn test_read_back() {
        let bytes = pack_bundle(&sample()).unwrap();
        let bundle = read_bundle(&bytes).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.get("assets/hi1.txt"), Some(&b"hello"[..]));
        assert_eq!(bundle.get("assets/hi2.txt"), Some(&b"worlds!!"[..]));
        assert_eq!(bundle.get("assets/hi3.txt"), None);
    }

    #[test]
    fn test_empty_bundle() {
        let bytes = pack_bundle(&[]).unwrap();
        assert_eq!(bytes.len(), 8);
        assert!(read_bundle(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let files = vec![
            BundleFile::new("a.xtex", vec![1]),
            BundleFile::new("a.xtex", vec![2]),
        ];
        assert!(pack_bundle(&files).is_err());
    }

    #[test]
    fn test_corrupt_bundles_rejected() {
        let mut bytes = pack_bundle(&sample()).unwrap();
        assert!(read_bundle(&bytes[..20]).is_err());

        bytes[0] = b'Y';
        assert!(read_bundle(&bytes).is_err());

        let mut bytes = pack_bundle(&sample()).unwrap();
        bytes.truncate(50);
        assert!(read_bundle(&bytes).is_err());
    }

    #[test]
    fn test_logical_names() {
        let root = Path::new("/build/out");
        assert_eq!(
            logical_name(Path::new("/build/out/models/crate.xmdl"), Some(root)).unwrap(),
            "models/crate.xmdl"
        );
        assert_eq!(logical_name(Path::new("assets/hi1.txt"), None).unwrap(), "assets/hi1.txt");
        assert!(logical_name(Path::new("/elsewhere/a.bin"), Some(root)).is_err());
    }
}
