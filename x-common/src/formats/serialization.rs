//! Binary serialization trait for fixed-size records.
//!
//! Every header and array element implements `BinarySerializable`, which gives
//! generic code (array writers, test helpers) a single interface while each
//! record keeps its own `to_bytes()` returning a fixed-size array.

/// Trait for fixed-size binary records.
///
/// The trait uses `Vec<u8>` for the return type because associated const
/// generics in return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
///
/// # Example
///
/// ```
/// use x_common::formats::{BinarySerializable, XModelHeader};
///
/// let header = XModelHeader::new(8, 6, 0);
///
/// let bytes = header.serialize();
/// let parsed = XModelHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed.face_count, 6);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized record in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short.
    fn deserialize(bytes: &[u8]) -> Option<Self>;

    /// Decode `count` consecutive records starting at the beginning of `bytes`.
    fn deserialize_array(bytes: &[u8], count: usize) -> Option<Vec<Self>> {
        let needed = count.checked_mul(Self::SIZE)?;
        if bytes.len() < needed {
            return None;
        }
        bytes[..needed]
            .chunks_exact(Self::SIZE)
            .map(Self::deserialize)
            .collect()
    }
}

/// Append a slice of records to `out` in order.
pub fn write_array<T: BinarySerializable>(out: &mut Vec<u8>, records: &[T]) {
    out.reserve(records.len() * T::SIZE);
    for record in records {
        out.extend_from_slice(&record.serialize());
    }
}

macro_rules! impl_binary_serializable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BinarySerializable for $ty {
                const SIZE: usize = <$ty>::SIZE;

                fn serialize(&self) -> Vec<u8> {
                    self.to_bytes().to_vec()
                }

                fn deserialize(bytes: &[u8]) -> Option<Self> {
                    Self::from_bytes(bytes)
                }
            }
        )*
    };
}

impl_binary_serializable!(
    super::XTexHeader,
    super::TextureInfo,
    super::XModelHeader,
    super::FixedVertex,
    super::Face,
    super::XFontHeader,
    super::Rect8,
    super::XBundleHeader,
    super::BundleEntry,
);
