//! Multi-signature wallet public key aggregation.

use crate::{hash::sha256, CryptoError};
use dpos_types::PublicKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, SecretKey};

/// Public key that owns a multi-signature wallet.
///
/// The key is the point sum of `G * SHA256(hex(min))` and every participant key,
/// so the same participant set with a different threshold yields a different wallet.
pub fn multi_signature_public_key(min: u8, participants: &[PublicKey]) -> Result<PublicKey, CryptoError> {
    let min_secret = SecretKey::from_slice(&sha256(format!("{min:02x}").as_bytes()))
        .map_err(|_| CryptoError::InvalidPrivateKey)?;
    let mut sum = min_secret.public_key().to_projective();

    for participant in participants {
        let point = k256::PublicKey::from_sec1_bytes(participant.as_bytes())
            .map_err(|_| CryptoError::InvalidPublicKey(participant.to_string()))?;
        sum += point.to_projective();
    }

    if sum == ProjectivePoint::IDENTITY {
        return Err(CryptoError::DegenerateMultiSignature);
    }
    let aggregate = k256::PublicKey::from_affine(sum.to_affine())
        .map_err(|_| CryptoError::DegenerateMultiSignature)?;
    PublicKey::from_slice(aggregate.to_encoded_point(true).as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
}
