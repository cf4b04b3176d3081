use sha1::{Digest, Sha1};
use sift_core::{FilterContext, FilterError, FilterUnit, Subfilter};

const HEXDUMP_WIDTH: usize = 16;

/// SHA-1 of the UTF-8 content as 40-char lowercase hex.
pub fn sha1_hex(content: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Rows of 16 bytes: hex bytes, two spaces, then printable ASCII with `.`
/// standing in for everything else.
pub fn hexdump(content: &str) -> String {
    content
        .as_bytes()
        .chunks(HEXDUMP_WIDTH)
        .map(|block| {
            let hex = block
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" ");
            let ascii: String = block
                .iter()
                .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
                .collect();
            format!("{hex}  {ascii}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct Sha1Sum;

impl FilterUnit for Sha1Sum {
    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        subfilter.reject("sha1sum")?;
        Ok(sha1_hex(data))
    }
}

pub struct Hexdump;

impl FilterUnit for Hexdump {
    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        subfilter.reject("hexdump")?;
        Ok(hexdump(data))
    }
}

pub fn sha1sum<'a>(_ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Sha1Sum)
}

pub fn hex_dump<'a>(_ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Hexdump)
}
