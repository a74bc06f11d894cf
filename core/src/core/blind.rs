// Copyright 2021 The Mumble Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Encapsulate a 32 byte blinding scalar. Unlike a raw secret key the
//! all-zero value is representable, as headers carry a zero total kernel
//! offset until kernels contribute one.

use std::cmp::min;

use crate::ser::{self, Readable, Reader, Writeable, Writer};
use util::secp::constants::SECRET_KEY_SIZE;
use util::secp::key::SecretKey;
use util::secp::{self, Secp256k1};
use util::{from_hex, to_hex};
use zeroize::Zeroize;

/// A blinding factor for a Pedersen commitment, or a sum of such factors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct BlindingFactor([u8; SECRET_KEY_SIZE]);

impl BlindingFactor {
	/// The zero blinding factor. Not a valid secret key, only usable as the
	/// additive identity of offsets.
	pub fn zero() -> BlindingFactor {
		BlindingFactor([0; SECRET_KEY_SIZE])
	}

	/// Whether this is the zero offset.
	pub fn is_zero(&self) -> bool {
		self.0.iter().all(|b| *b == 0)
	}

	/// Builds a blinding factor from the first 32 bytes of the provided
	/// slice, padding with zeroes as necessary.
	pub fn from_slice(data: &[u8]) -> BlindingFactor {
		let mut blind = [0; SECRET_KEY_SIZE];
		let copy_size = min(SECRET_KEY_SIZE, data.len());
		blind[..copy_size].copy_from_slice(&data[..copy_size]);
		BlindingFactor(blind)
	}

	/// Wraps an existing secret key.
	pub fn from_secret_key(skey: SecretKey) -> BlindingFactor {
		BlindingFactor::from_slice(&skey[..])
	}

	/// Raw bytes of this blinding factor.
	pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
		&self.0
	}

	/// The secret key this blinding factor wraps. The zero offset is not a
	/// valid key and errors out.
	pub fn secret_key(&self, secp: &Secp256k1) -> Result<SecretKey, secp::Error> {
		if self.is_zero() {
			Err(secp::Error::InvalidSecretKey)
		} else {
			SecretKey::from_slice(secp, &self.0)
		}
	}

	/// Hex representation.
	pub fn to_hex(&self) -> String {
		to_hex(self.0.to_vec())
	}

	/// Builds a blinding factor from its hex representation.
	pub fn from_hex(hex: &str) -> Result<BlindingFactor, ser::Error> {
		let bytes =
			from_hex(hex.to_string()).map_err(|e| ser::Error::HexError(format!("{}", e)))?;
		Ok(BlindingFactor::from_slice(&bytes))
	}
}

impl AsRef<[u8]> for BlindingFactor {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl Writeable for BlindingFactor {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_fixed_bytes(self)
	}
}

impl Readable for BlindingFactor {
	fn read<R: Reader>(reader: &mut R) -> Result<BlindingFactor, ser::Error> {
		let bytes = reader.read_fixed_bytes(SECRET_KEY_SIZE)?;
		Ok(BlindingFactor::from_slice(&bytes))
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use util::static_secp_instance;

	#[test]
	fn zero_is_not_a_secret_key() {
		let secp = static_secp_instance();
		let secp = secp.lock();
		let zero = BlindingFactor::zero();
		assert!(zero.is_zero());
		assert!(zero.secret_key(&secp).is_err());
	}

	#[test]
	fn round_trip_secret_key() {
		let secp = static_secp_instance();
		let secp = secp.lock();
		let skey = SecretKey::from_slice(&secp, &[1; 32]).unwrap();
		let blind = BlindingFactor::from_secret_key(skey.clone());
		assert!(!blind.is_zero());
		assert_eq!(blind.secret_key(&secp).unwrap(), skey);
	}
}
