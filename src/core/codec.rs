use rosc::OscType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed message: {0}")]
    Malformed(&'static str),
    #[error("message address must be a non-empty /path")]
    BadAddress,
    #[error("value type not representable on the wire")]
    UnsupportedArg,
}

/// Null-terminates `input` and zero-pads it out to the next 4-byte boundary.
/// The exact arithmetic is load-bearing for wire compatibility.
pub fn pad_compliant(input: &[u8]) -> Vec<u8> {
    let nul_len = input.len() + 1;
    let n = nul_len + 3;
    let m = n % 4;
    let target = n - m;
    let extra = target - nul_len;

    let mut out = vec![0u8; nul_len + extra];
    out[..input.len()].copy_from_slice(input);
    out
}

/// A single flat address+values datagram. Only `String`, `Int` and `Float`
/// values exist in this wire vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub addr: String,
    pub args: Vec<OscType>,
}

impl Message {
    pub fn new(addr: impl Into<String>, args: Vec<OscType>) -> Self {
        Self {
            addr: addr.into(),
            args,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        if self.addr.is_empty() || !self.addr.starts_with('/') {
            return Err(CodecError::BadAddress);
        }

        let mut tags = String::with_capacity(self.args.len() + 1);
        let mut values = Vec::new();
        tags.push(',');
        for arg in &self.args {
            match arg {
                OscType::String(s) => {
                    tags.push('s');
                    values.extend(pad_compliant(s.as_bytes()));
                }
                OscType::Int(i) => {
                    tags.push('i');
                    values.extend(i.to_be_bytes());
                }
                OscType::Float(f) => {
                    tags.push('f');
                    values.extend(f.to_be_bytes());
                }
                _ => return Err(CodecError::UnsupportedArg),
            }
        }

        let mut out = pad_compliant(self.addr.as_bytes());
        out.extend(pad_compliant(tags.as_bytes()));
        out.extend(values);
        Ok(out)
    }

    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        let mut cur = 0usize;

        let addr = read_padded_str(buf, &mut cur)?.to_owned();
        if addr.is_empty() || !addr.starts_with('/') {
            return Err(CodecError::Malformed("address is not a /path"));
        }

        // No type tag string (or nothing but padding left): zero-value message.
        if cur >= buf.len() || buf[cur] == 0 {
            return Ok(Self::new(addr, Vec::new()));
        }
        if buf[cur] != b',' {
            return Err(CodecError::Malformed("expected type tag string"));
        }
        let tags = read_padded_str(buf, &mut cur)?.to_owned();

        let mut args = Vec::with_capacity(tags.len() - 1);
        for tag in tags.chars().skip(1) {
            match tag {
                's' => {
                    let s = read_padded_str(buf, &mut cur)?;
                    args.push(OscType::String(s.to_owned()));
                }
                'i' => args.push(OscType::Int(i32::from_be_bytes(read_word(buf, &mut cur)?))),
                'f' => args.push(OscType::Float(f32::from_be_bytes(read_word(buf, &mut cur)?))),
                _ => return Err(CodecError::Malformed("unknown type tag")),
            }
        }

        // Anything left past the declared values is padding; ignore it.
        Ok(Self::new(addr, args))
    }
}

fn read_padded_str<'a>(buf: &'a [u8], cur: &mut usize) -> Result<&'a str, CodecError> {
    let rel = buf
        .get(*cur..)
        .unwrap_or(&[])
        .iter()
        .position(|&b| b == 0)
        .ok_or(CodecError::Malformed("string missing null terminator"))?;
    let s = std::str::from_utf8(&buf[*cur..*cur + rel])
        .map_err(|_| CodecError::Malformed("string is not valid utf-8"))?;

    // consume terminator + alignment padding
    let consumed = rel + 1;
    *cur = (*cur + consumed + 3) / 4 * 4;
    Ok(s)
}

fn read_word(buf: &[u8], cur: &mut usize) -> Result<[u8; 4], CodecError> {
    let end = *cur + 4;
    if end > buf.len() {
        return Err(CodecError::Malformed(
            "value count disagrees with buffer length",
        ));
    }
    let word: [u8; 4] = buf[*cur..end].try_into().unwrap();
    *cur = end;
    Ok(word)
}
