//! Text codec registry.
//!
//! SMPP payload text travels as octets whose interpretation is named by the
//! data_coding byte (Section 5.2.19). This module resolves an encoding name
//! to an encode/decode pair: caller-supplied overrides are consulted first,
//! then the built-in table (`gsm0338`, `ascii`, `latin_1`, `ucs2`). The
//! remaining names of the protocol table have a data_coding value but no
//! built-in codec and must be provided as overrides.

use crate::codec::CodecError;
use std::collections::HashMap;
use std::sync::Arc;

/// What to do with characters the target encoding cannot represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErrorHandling {
    /// Fail with [`CodecError::EncodingFailure`].
    #[default]
    Strict,
    /// Substitute `?`.
    Replace,
    /// Drop the character.
    Ignore,
}

/// An encode/decode pair for one named encoding.
///
/// Implementations must be pure; the registry may hand the same codec to
/// any number of threads.
pub trait TextCodec: Send + Sync {
    /// Name the codec is registered under.
    fn name(&self) -> &str;

    /// Encodes `text`, applying `errors` to unmappable characters.
    fn encode(&self, text: &str, errors: ErrorHandling) -> Result<Vec<u8>, CodecError>;

    /// Decodes octets back to text. Decoding is always strict: bytes that
    /// are not valid in the encoding fail rather than guess.
    fn decode(&self, data: &[u8]) -> Result<String, CodecError>;
}

/// Resolves encoding names for one encode or decode call.
///
/// Holds the session default encoding plus caller overrides. Cloning is
/// cheap (codecs are shared via `Arc`), and the registry is immutable once
/// built, so a single instance can serve concurrent calls.
#[derive(Clone)]
pub struct CodecRegistry {
    default_encoding: String,
    custom: HashMap<String, Arc<dyn TextCodec>>,
}

impl CodecRegistry {
    pub fn new(default_encoding: impl Into<String>) -> Self {
        Self {
            default_encoding: default_encoding.into(),
            custom: HashMap::new(),
        }
    }

    /// Registers `codec` under `codec.name()`. Overrides win over built-ins
    /// with the same name.
    pub fn with_codec(mut self, codec: Arc<dyn TextCodec>) -> Self {
        self.custom.insert(codec.name().to_string(), codec);
        self
    }

    /// Encoding used when a message carries no explicit one.
    pub fn default_encoding(&self) -> &str {
        &self.default_encoding
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn TextCodec>, CodecError> {
        if let Some(codec) = self.custom.get(name) {
            return Ok(Arc::clone(codec));
        }
        builtin(name).ok_or_else(|| CodecError::UnknownEncoding(name.to_string()))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new("gsm0338")
    }
}

fn builtin(name: &str) -> Option<Arc<dyn TextCodec>> {
    match name {
        "gsm0338" => Some(Arc::new(Gsm0338)),
        "ascii" => Some(Arc::new(Ascii)),
        "latin_1" => Some(Arc::new(Latin1)),
        "ucs2" => Some(Arc::new(Ucs2)),
        _ => None,
    }
}

fn encoding_failure(encoding: &str, reason: String) -> CodecError {
    CodecError::EncodingFailure {
        encoding: encoding.to_string(),
        reason,
    }
}

fn unmappable(
    encoding: &str,
    character: char,
    errors: ErrorHandling,
    output_replacement: impl FnOnce(),
) -> Result<(), CodecError> {
    match errors {
        ErrorHandling::Strict => Err(encoding_failure(
            encoding,
            format!("character {character:?} has no mapping"),
        )),
        ErrorHandling::Replace => {
            output_replacement();
            Ok(())
        }
        ErrorHandling::Ignore => Ok(()),
    }
}

/// GSM 03.38 default alphabet.
///
/// SMPP carries the default alphabet unpacked, one octet per character
/// (no septet packing), with 0x1B escaping into the extension table.
struct Gsm0338;

#[rustfmt::skip]
const GSM_BASIC: [char; 128] = [
    '@',  '£',  '$',  '¥',  'è',  'é',  'ù',  'ì',  'ò',  'Ç',  '\n', 'Ø',  'ø',  '\r', 'Å',  'å',
    'Δ',  '_',  'Φ',  'Γ',  'Λ',  'Ω',  'Π',  'Ψ',  'Σ',  'Θ',  'Ξ',  '\u{1b}', 'Æ', 'æ', 'ß', 'É',
    ' ',  '!',  '"',  '#',  '¤',  '%',  '&',  '\'', '(',  ')',  '*',  '+',  ',',  '-',  '.',  '/',
    '0',  '1',  '2',  '3',  '4',  '5',  '6',  '7',  '8',  '9',  ':',  ';',  '<',  '=',  '>',  '?',
    '¡',  'A',  'B',  'C',  'D',  'E',  'F',  'G',  'H',  'I',  'J',  'K',  'L',  'M',  'N',  'O',
    'P',  'Q',  'R',  'S',  'T',  'U',  'V',  'W',  'X',  'Y',  'Z',  'Ä',  'Ö',  'Ñ',  'Ü',  '§',
    '¿',  'a',  'b',  'c',  'd',  'e',  'f',  'g',  'h',  'i',  'j',  'k',  'l',  'm',  'n',  'o',
    'p',  'q',  'r',  's',  't',  'u',  'v',  'w',  'x',  'y',  'z',  'ä',  'ö',  'ñ',  'ü',  'à',
];

const GSM_ESCAPE: u8 = 0x1B;

fn gsm_extension_char(byte: u8) -> Option<char> {
    match byte {
        0x0A => Some('\u{0c}'),
        0x14 => Some('^'),
        0x28 => Some('{'),
        0x29 => Some('}'),
        0x2F => Some('\\'),
        0x3C => Some('['),
        0x3D => Some('~'),
        0x3E => Some(']'),
        0x40 => Some('|'),
        0x65 => Some('€'),
        _ => None,
    }
}

fn gsm_extension_byte(character: char) -> Option<u8> {
    match character {
        '\u{0c}' => Some(0x0A),
        '^' => Some(0x14),
        '{' => Some(0x28),
        '}' => Some(0x29),
        '\\' => Some(0x2F),
        '[' => Some(0x3C),
        '~' => Some(0x3D),
        ']' => Some(0x3E),
        '|' => Some(0x40),
        '€' => Some(0x65),
        _ => None,
    }
}

fn gsm_basic_byte(character: char) -> Option<u8> {
    if character == '\u{1b}' {
        return None;
    }
    GSM_BASIC
        .iter()
        .position(|&candidate| candidate == character)
        .map(|index| index as u8)
}

impl TextCodec for Gsm0338 {
    fn name(&self) -> &str {
        "gsm0338"
    }

    fn encode(&self, text: &str, errors: ErrorHandling) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(text.len());
        for character in text.chars() {
            if let Some(byte) = gsm_basic_byte(character) {
                out.push(byte);
            } else if let Some(byte) = gsm_extension_byte(character) {
                out.push(GSM_ESCAPE);
                out.push(byte);
            } else {
                unmappable(self.name(), character, errors, || out.push(b'?'))?;
            }
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<String, CodecError> {
        let mut out = String::with_capacity(data.len());
        let mut bytes = data.iter().enumerate();
        while let Some((index, &byte)) = bytes.next() {
            if byte == GSM_ESCAPE {
                match bytes.next() {
                    Some((_, &escaped)) => match gsm_extension_char(escaped) {
                        Some(character) => out.push(character),
                        None => {
                            return Err(encoding_failure(
                                self.name(),
                                format!("invalid escape {escaped:#04x} at offset {index}"),
                            ));
                        }
                    },
                    None => {
                        return Err(encoding_failure(
                            self.name(),
                            format!("dangling escape at offset {index}"),
                        ));
                    }
                }
            } else if byte < 0x80 {
                out.push(GSM_BASIC[usize::from(byte)]);
            } else {
                return Err(encoding_failure(
                    self.name(),
                    format!("byte {byte:#04x} at offset {index} is outside the alphabet"),
                ));
            }
        }
        Ok(out)
    }
}

/// IA5/ASCII (data_coding 0x01).
struct Ascii;

impl TextCodec for Ascii {
    fn name(&self) -> &str {
        "ascii"
    }

    fn encode(&self, text: &str, errors: ErrorHandling) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(text.len());
        for character in text.chars() {
            if character.is_ascii() {
                out.push(character as u8);
            } else {
                unmappable(self.name(), character, errors, || out.push(b'?'))?;
            }
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<String, CodecError> {
        if let Some(index) = data.iter().position(|byte| !byte.is_ascii()) {
            return Err(encoding_failure(
                self.name(),
                format!("byte {:#04x} at offset {index} is not ASCII", data[index]),
            ));
        }
        Ok(data.iter().map(|&byte| byte as char).collect())
    }
}

/// ISO-8859-1 (data_coding 0x03). The 256 byte values map one-to-one onto
/// the first 256 code points, so decoding cannot fail.
struct Latin1;

impl TextCodec for Latin1 {
    fn name(&self) -> &str {
        "latin_1"
    }

    fn encode(&self, text: &str, errors: ErrorHandling) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(text.len());
        for character in text.chars() {
            if (character as u32) <= 0xFF {
                out.push(character as u8);
            } else {
                unmappable(self.name(), character, errors, || out.push(b'?'))?;
            }
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<String, CodecError> {
        Ok(data.iter().map(|&byte| char::from(byte)).collect())
    }
}

/// UCS-2 (data_coding 0x08), carried as UTF-16BE. Characters beyond the
/// BMP become surrogate pairs, so encoding never fails.
struct Ucs2;

impl TextCodec for Ucs2 {
    fn name(&self) -> &str {
        "ucs2"
    }

    fn encode(&self, text: &str, _errors: ErrorHandling) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(text.len() * 2);
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_be_bytes());
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<String, CodecError> {
        if data.len() % 2 != 0 {
            return Err(encoding_failure(
                self.name(),
                format!("odd number of octets ({})", data.len()),
            ));
        }
        let units: Vec<u16> = data
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units)
            .map_err(|_| encoding_failure(self.name(), "unpaired surrogate".to_string()))
    }
}
