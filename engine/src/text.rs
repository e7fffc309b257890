use std::{fs, io, path::Path};

use encoding_rs::Encoding;

/// Read a text file, honouring a UTF-8/UTF-16 byte order mark if present.
///
/// Actor exports saved by some editors carry a BOM that `serde_json`
/// refuses to parse.
pub(crate) fn read_text_auto(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    decode_text(bytes)
}

pub(crate) fn decode_text(bytes: Vec<u8>) -> io::Result<String> {
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
