//! Serde glue for types that travel as hex strings in JSON documents.

/// Implements `Serialize` via `Display` and `Deserialize` via `FromStr`.
macro_rules! impl_string_serde {
    ($ty:ty, $expecting:literal) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct StrVisitor;

                impl<'de> serde::de::Visitor<'de> for StrVisitor {
                    type Value = $ty;

                    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                        write!(f, $expecting)
                    }

                    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                        v.parse().map_err(E::custom)
                    }
                }

                deserializer.deserialize_str(StrVisitor)
            }
        }
    };
}

pub(crate) use impl_string_serde;

/// Decode a hex string into exactly `N` bytes.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], crate::TypesError> {
    let bytes = hex::decode(s).map_err(|e| crate::TypesError::InvalidHex(e.to_string()))?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| crate::TypesError::InvalidLength { expected: N, actual })
}
