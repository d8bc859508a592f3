//! encoding/base64.rs
//! Streaming base64 layers.

use std::io::Write;

use ::base64::engine::general_purpose::{GeneralPurpose, STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use ::base64::read::DecoderReader;
use ::base64::write::EncoderWriter;
use serde::{Deserialize, Serialize};

use crate::chain::{ReadTransform, WriteTransform};
use crate::stream::{Finish, FinishWriter, ReadStream, WriteStream};
use crate::types::Result;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Base64Alphabet {
    #[default]
    Standard,
    StandardNoPad,
    UrlSafe,
    UrlSafeNoPad,
}

impl Base64Alphabet {
    fn engine(self) -> &'static GeneralPurpose {
        match self {
            Base64Alphabet::Standard => &STANDARD,
            Base64Alphabet::StandardNoPad => &STANDARD_NO_PAD,
            Base64Alphabet::UrlSafe => &URL_SAFE,
            Base64Alphabet::UrlSafeNoPad => &URL_SAFE_NO_PAD,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base64Config {
    #[serde(default)]
    pub alphabet: Base64Alphabet,
}

impl Base64Config {
    pub fn new(alphabet: Base64Alphabet) -> Self {
        Self { alphabet }
    }

    /// Closable encoder layer; the final partial group (and padding) is
    /// written on close.
    pub fn encode(&self) -> impl WriteTransform {
        let engine = self.alphabet.engine();
        move |sink: WriteStream| -> Result<WriteStream> {
            Ok(WriteStream::closable(FinishWriter::new(EncoderWriter::new(sink, engine))))
        }
    }

    pub fn decode(&self) -> impl ReadTransform {
        let engine = self.alphabet.engine();
        move |source: ReadStream| -> Result<ReadStream> { Ok(ReadStream::new(DecoderReader::new(source, engine))) }
    }
}

impl<W: Write> Finish for EncoderWriter<'static, GeneralPurpose, W> {
    fn finish_stream(mut self) -> Result<()> {
        let mut inner = self.finish()?;
        inner.flush()?;
        Ok(())
    }
}
