/*
 * Responsibility
 * - 記事の公開 ID (`_id`) ↔ ストア内部の連番キーの変換
 * - ストアの採番方式をクライアントから隠す (ID は opaque な文字列として扱わせる)
 */
use sqids::{Error as SqidsError, Sqids};
use std::{error::Error, fmt};

pub type Result<T> = std::result::Result<T, IdCodecError>;

#[derive(Debug)]
pub enum IdCodecError {
    InvalidMinLength { value: usize },
    Sqids(SqidsError),
    NegativeKey { value: i64 },
    Malformed,
}

impl fmt::Display for IdCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdCodecError::InvalidMinLength { value } => {
                write!(
                    f,
                    "SQIDS_MIN_LENGTH must be between 0 and 255, got {}",
                    value
                )
            }
            IdCodecError::Sqids(e) => write!(f, "sqids error: {}", e),
            IdCodecError::NegativeKey { value } => {
                write!(f, "store key must be non-negative, got {}", value)
            }
            IdCodecError::Malformed => write!(f, "malformed public post id"),
        }
    }
}

impl Error for IdCodecError {}

impl From<SqidsError> for IdCodecError {
    fn from(e: SqidsError) -> Self {
        IdCodecError::Sqids(e)
    }
}

#[derive(Clone, Debug)]
pub struct IdCodec {
    sqids: Sqids,
}

impl IdCodec {
    pub fn new(min_length: usize, alphabet: &str) -> Result<Self> {
        let min_length: u8 = min_length
            .try_into()
            .map_err(|_| IdCodecError::InvalidMinLength { value: min_length })?;

        let sqids = Sqids::builder()
            .min_length(min_length)
            .alphabet(alphabet.chars().collect())
            .build()?;

        Ok(Self { sqids })
    }

    pub fn encode(&self, key: i64) -> Result<String> {
        let key = u64::try_from(key).map_err(|_| IdCodecError::NegativeKey { value: key })?;
        Ok(self.sqids.encode(&[key])?)
    }

    /// Decodes a public id back into a store key.
    ///
    /// Only canonical encodings are accepted: sqids decodes several spellings
    /// to the same number, and a post must have exactly one public id.
    pub fn decode(&self, public_id: &str) -> Result<i64> {
        let nums = self.sqids.decode(public_id);
        let [n] = nums.as_slice() else {
            return Err(IdCodecError::Malformed);
        };
        let key = i64::try_from(*n).map_err(|_| IdCodecError::Malformed)?;

        if self.encode(key)? != public_id {
            return Err(IdCodecError::Malformed);
        }
        Ok(key)
    }
}
