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

//! Transaction kernels, outputs and rangeproofs: the leaf kinds making up a
//! block's state, with their validation rules, wire formats and lifecycle in
//! the chain accumulators.

use std::convert::{TryFrom, TryInto};

use crate::blake2::blake2b::blake2b;
use crate::consensus;
use crate::core::committed::{self, add_commit, sub_commit};
use crate::core::sum_mmr::{AddReason, SubReason, Summable};
use crate::genesis;
use crate::global;
use crate::ser::{self, ProtocolVersion, Readable, Reader, Writeable, Writer};
use byteorder::{BigEndian, ByteOrder};
use util::secp::constants::{
	AGG_SIGNATURE_SIZE, MAX_PROOF_SIZE, PEDERSEN_COMMITMENT_SIZE, SECRET_KEY_SIZE,
};
use util::secp::key::PublicKey;
use util::secp::pedersen::{Commitment, RangeProof};
use util::secp::{self, aggsig, Message, Signature};
use util::static_secp_instance;

/// Errors thrown by Transaction validation
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
	/// Unknown or out-of-range feature tag
	#[error("unknown features: {0}")]
	InvalidFeatures(u8),
	/// Feature fields that cannot go together
	#[error("invalid combination of feature fields")]
	InvalidFieldCombination,
	/// Commitment that doesn't parse to a curve point
	#[error("invalid commitment")]
	InvalidCommitment,
	/// The public key derived from a commitment is degenerate
	#[error("invalid public key")]
	InvalidPublicKey,
	/// Structurally broken signature, or one that doesn't verify
	#[error("invalid signature")]
	InvalidSignature,
	/// A rangeproof that fails bulletproof verification
	#[error("invalid rangeproof")]
	InvalidRangeproof,
	/// Constructed as genesis but differs from the genesis constant
	#[error("{0} does not match the genesis block")]
	GenesisMismatch(&'static str),
	/// A length field disagreeing with the data it describes
	#[error("invalid length")]
	InvalidLength,
	/// Underlying serialization error
	#[error("serialization error: {0}")]
	Ser(#[from] ser::Error),
	/// Underlying curve library error
	#[error("secp error: {0}")]
	Secp(#[from] secp::Error),
}

/// Relative lock height of a NoRecentDuplicate kernel, bounded to one week
/// of blocks. The zero value is not expressible.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NRDRelativeHeight(u16);

impl NRDRelativeHeight {
	/// Maximum valid relative height.
	pub const MAX: u64 = consensus::WEEK_HEIGHT;
}

impl TryFrom<u64> for NRDRelativeHeight {
	type Error = Error;

	fn try_from(height: u64) -> Result<Self, Self::Error> {
		if height == 0 || height > NRDRelativeHeight::MAX {
			Err(Error::InvalidFieldCombination)
		} else {
			Ok(NRDRelativeHeight(height as u16))
		}
	}
}

impl From<NRDRelativeHeight> for u64 {
	fn from(height: NRDRelativeHeight) -> Self {
		u64::from(height.0)
	}
}

/// Various tx kernel variants, together with the fields that only exist for
/// the variant. Representable combinations are valid by construction;
/// everything else is rejected while parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelFeatures {
	/// Plain kernel (the default for spends)
	Plain {
		/// The fee this kernel contributes
		fee: u64,
	},
	/// A coinbase kernel. Carries no fee by definition.
	Coinbase,
	/// A kernel invalid before an absolute lock height.
	HeightLocked {
		/// The fee this kernel contributes
		fee: u64,
		/// Height before which the kernel may not be included
		lock_height: u64,
	},
	/// A kernel whose excess may not reappear within a relative number of
	/// blocks. Test network only.
	NoRecentDuplicate {
		/// The fee this kernel contributes
		fee: u64,
		/// Minimum gap to the previous kernel with the same excess
		relative_height: NRDRelativeHeight,
	},
}

impl KernelFeatures {
	const PLAIN_U8: u8 = 0;
	const COINBASE_U8: u8 = 1;
	const HEIGHT_LOCKED_U8: u8 = 2;
	const NO_RECENT_DUPLICATE_U8: u8 = 3;

	/// The feature tag on the wire.
	pub fn as_u8(&self) -> u8 {
		match self {
			KernelFeatures::Plain { .. } => KernelFeatures::PLAIN_U8,
			KernelFeatures::Coinbase => KernelFeatures::COINBASE_U8,
			KernelFeatures::HeightLocked { .. } => KernelFeatures::HEIGHT_LOCKED_U8,
			KernelFeatures::NoRecentDuplicate { .. } => KernelFeatures::NO_RECENT_DUPLICATE_U8,
		}
	}

	/// The fee carried by these features.
	pub fn fee(&self) -> u64 {
		match self {
			KernelFeatures::Plain { fee } => *fee,
			KernelFeatures::Coinbase => 0,
			KernelFeatures::HeightLocked { fee, .. } => *fee,
			KernelFeatures::NoRecentDuplicate { fee, .. } => *fee,
		}
	}

	/// The message the kernel signature commits to: the feature tag followed
	/// by the fields that bind the kernel, hashed with BLAKE2b-256. This is
	/// the compact (v2) field layout.
	pub fn kernel_sig_msg(&self) -> Result<Message, Error> {
		let bytes = ser::ser_vec(ProtocolVersion(2), self)?;
		let hash = blake2b(32, &[], &bytes);
		let msg = Message::from_slice(hash.as_bytes())?;
		Ok(msg)
	}

	/// Legacy wire layout: every variant carries the fee and a single
	/// 8 byte height slot.
	fn write_v1<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_u8(self.as_u8())?;
		match self {
			KernelFeatures::Plain { fee } => {
				writer.write_u64(*fee)?;
				writer.write_u64(0)?;
			}
			KernelFeatures::Coinbase => {
				writer.write_u64(0)?;
				writer.write_u64(0)?;
			}
			KernelFeatures::HeightLocked { fee, lock_height } => {
				writer.write_u64(*fee)?;
				writer.write_u64(*lock_height)?;
			}
			KernelFeatures::NoRecentDuplicate {
				fee,
				relative_height,
			} => {
				writer.write_u64(*fee)?;
				writer.write_u64(u64::from(*relative_height))?;
			}
		}
		Ok(())
	}

	/// Compact wire layout: only the fields the variant actually has.
	fn write_v2<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_u8(self.as_u8())?;
		match self {
			KernelFeatures::Plain { fee } => writer.write_u64(*fee)?,
			KernelFeatures::Coinbase => {}
			KernelFeatures::HeightLocked { fee, lock_height } => {
				writer.write_u64(*fee)?;
				writer.write_u64(*lock_height)?;
			}
			KernelFeatures::NoRecentDuplicate {
				fee,
				relative_height,
			} => {
				writer.write_u64(*fee)?;
				writer.write_u16(relative_height.0)?;
			}
		}
		Ok(())
	}

	fn read_v1<R: Reader>(reader: &mut R) -> Result<KernelFeatures, Error> {
		let feature_byte = reader.read_u8()?;
		let fee = reader.read_u64()?;
		let features = match feature_byte {
			KernelFeatures::PLAIN_U8 => {
				let lock_height = reader.read_u64()?;
				if lock_height != 0 {
					return Err(Error::InvalidFieldCombination);
				}
				KernelFeatures::Plain { fee }
			}
			KernelFeatures::COINBASE_U8 => {
				let lock_height = reader.read_u64()?;
				if fee != 0 || lock_height != 0 {
					return Err(Error::InvalidFieldCombination);
				}
				KernelFeatures::Coinbase
			}
			KernelFeatures::HEIGHT_LOCKED_U8 => {
				let lock_height = reader.read_u64()?;
				KernelFeatures::HeightLocked { fee, lock_height }
			}
			KernelFeatures::NO_RECENT_DUPLICATE_U8 => {
				let relative_height = reader.read_u64()?.try_into()?;
				KernelFeatures::NoRecentDuplicate {
					fee,
					relative_height,
				}
			}
			f => return Err(Error::InvalidFeatures(f)),
		};
		Ok(features)
	}

	fn read_v2<R: Reader>(reader: &mut R) -> Result<KernelFeatures, Error> {
		let feature_byte = reader.read_u8()?;
		let features = match feature_byte {
			KernelFeatures::PLAIN_U8 => {
				let fee = reader.read_u64()?;
				KernelFeatures::Plain { fee }
			}
			KernelFeatures::COINBASE_U8 => KernelFeatures::Coinbase,
			KernelFeatures::HEIGHT_LOCKED_U8 => {
				let fee = reader.read_u64()?;
				let lock_height = reader.read_u64()?;
				KernelFeatures::HeightLocked { fee, lock_height }
			}
			KernelFeatures::NO_RECENT_DUPLICATE_U8 => {
				let fee = reader.read_u64()?;
				let relative_height = u64::from(reader.read_u16()?).try_into()?;
				KernelFeatures::NoRecentDuplicate {
					fee,
					relative_height,
				}
			}
			f => return Err(Error::InvalidFeatures(f)),
		};
		Ok(features)
	}

	/// Read the features in the layout of the reader's protocol version.
	pub fn read<R: Reader>(reader: &mut R) -> Result<KernelFeatures, Error> {
		match reader.protocol_version().value() {
			0..=1 => KernelFeatures::read_v1(reader),
			2..=3 => KernelFeatures::read_v2(reader),
			_ => Err(Error::Ser(ser::Error::UnsupportedProtocolVersion(
				reader.protocol_version(),
			))),
		}
	}
}

impl Writeable for KernelFeatures {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		match writer.protocol_version().value() {
			0..=1 => self.write_v1(writer),
			2..=3 => self.write_v2(writer),
			_ => Err(ser::Error::UnsupportedProtocolVersion(
				writer.protocol_version(),
			)),
		}
	}
}

/// Reserved top byte of the fee field, masked off when the fee amount itself
/// is wanted.
pub const FEE_MASK: u64 = 0x00ff_ffff_ffff_ffff;

/// A proof that a transaction sums to zero. Includes both the transaction's
/// Pedersen commitment and the signature, that guarantees that the
/// commitments amount to zero.
/// The signature signs the fee and other binding fields, which are retained
/// for signature validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxKernel {
	features: KernelFeatures,
	excess: Commitment,
	excess_sig: Signature,
}

/// Commitments must carry one of the two canonical prefixes and parse to an
/// actual curve point. A degenerate all-zero x coordinate maps to the zero
/// public key.
fn validate_commitment(commit: &Commitment) -> Result<(), Error> {
	let bytes = commit.as_ref();
	if bytes.len() != PEDERSEN_COMMITMENT_SIZE || (bytes[0] != 8 && bytes[0] != 9) {
		return Err(Error::InvalidCommitment);
	}
	if bytes[1..].iter().all(|b| *b == 0) {
		return Err(Error::InvalidPublicKey);
	}
	let secp = static_secp_instance();
	let secp = secp.lock();
	commit.to_pubkey(&secp).map_err(|_| Error::InvalidCommitment)?;
	Ok(())
}

impl TxKernel {
	/// Build and fully validate a kernel. The genesis flag trades signature
	/// verification for bytewise equality with the genesis kernel constant.
	pub fn new(
		features: KernelFeatures,
		excess: Commitment,
		excess_sig: Signature,
		is_genesis: bool,
	) -> Result<TxKernel, Error> {
		if let KernelFeatures::NoRecentDuplicate { .. } = features {
			if !global::is_nrd_enabled() {
				return Err(Error::InvalidFeatures(features.as_u8()));
			}
		}
		validate_commitment(&excess)?;
		if excess_sig.as_ref()[..SECRET_KEY_SIZE].iter().all(|b| *b == 0) {
			return Err(Error::InvalidSignature);
		}

		let kernel = TxKernel {
			features,
			excess,
			excess_sig,
		};
		if is_genesis {
			if kernel != *genesis::genesis_kernel() {
				return Err(Error::GenesisMismatch("kernel"));
			}
		} else {
			kernel.verify()?;
		}
		Ok(kernel)
	}

	/// Raw constructor, only for the hardcoded genesis constant.
	pub(crate) fn from_parts(
		features: KernelFeatures,
		excess: Commitment,
		excess_sig: Signature,
	) -> TxKernel {
		TxKernel {
			features,
			excess,
			excess_sig,
		}
	}

	/// Kernel features.
	pub fn features(&self) -> KernelFeatures {
		self.features
	}

	/// The kernel excess commitment.
	pub fn excess(&self) -> Commitment {
		self.excess
	}

	/// The signature over the kernel's binding message.
	pub fn excess_sig(&self) -> Signature {
		self.excess_sig.clone()
	}

	/// The raw fee field.
	pub fn fee(&self) -> u64 {
		self.features.fee()
	}

	/// The fee with the reserved top byte masked off.
	pub fn unmasked_fee(&self) -> u64 {
		self.fee() & FEE_MASK
	}

	/// Absolute lock height, zero for unlocked kernel kinds.
	pub fn lock_height(&self) -> u64 {
		match self.features {
			KernelFeatures::HeightLocked { lock_height, .. } => lock_height,
			_ => 0,
		}
	}

	/// Relative NRD height, zero for other kernel kinds.
	pub fn relative_height(&self) -> u64 {
		match self.features {
			KernelFeatures::NoRecentDuplicate {
				relative_height, ..
			} => relative_height.into(),
			_ => 0,
		}
	}

	/// Whether this is a coinbase kernel.
	pub fn is_coinbase(&self) -> bool {
		match self.features {
			KernelFeatures::Coinbase => true,
			_ => false,
		}
	}

	/// The msg signed as part of the tx kernel.
	pub fn msg_to_sign(&self) -> Result<Message, Error> {
		self.features.kernel_sig_msg()
	}

	/// Verify the kernel signature against the excess, treated as the public
	/// key of the single signer.
	pub fn verify(&self) -> Result<(), Error> {
		let msg = self.msg_to_sign()?;
		let secp = static_secp_instance();
		let secp = secp.lock();
		let pubkey: PublicKey = self
			.excess
			.to_pubkey(&secp)
			.map_err(|_| Error::InvalidCommitment)?;
		if !aggsig::verify_single(
			&secp,
			&self.excess_sig,
			&msg,
			None,
			&pubkey,
			Some(&pubkey),
			None,
			false,
		) {
			return Err(Error::InvalidSignature);
		}
		Ok(())
	}
}

impl Writeable for TxKernel {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		self.features.write(writer)?;
		self.excess.write(writer)?;
		self.excess_sig.write(writer)?;
		Ok(())
	}
}

impl Readable for TxKernel {
	fn read<R: Reader>(reader: &mut R) -> Result<TxKernel, ser::Error> {
		TxKernel::read_leaf(reader, false).map_err(|e| match e {
			Error::Ser(e) => e,
			_ => ser::Error::CorruptedData,
		})
	}
}

impl Summable for TxKernel {
	type Sum = Commitment;

	const MAX_SERIALIZED_LEN: usize =
		1 + 8 + 8 + PEDERSEN_COMMITMENT_SIZE + AGG_SIGNATURE_SIZE;

	// excesses may legitimately repeat across kernels
	const ALLOW_DUPLICATE_LOOKUP_VALUES: bool = true;

	fn lookup_value(&self) -> Option<Vec<u8>> {
		Some(self.excess.as_ref().to_vec())
	}

	fn add_to_sum(
		&self,
		sum: &mut Commitment,
		_reason: AddReason,
	) -> Result<(), committed::Error> {
		*sum = add_commit(sum, &self.excess)?;
		Ok(())
	}

	fn subtract_from_sum(
		&self,
		sum: &mut Commitment,
		reason: SubReason,
	) -> Result<(), committed::Error> {
		match reason {
			SubReason::Rewind | SubReason::Discard => {
				*sum = sub_commit(sum, &self.excess)?;
			}
			// kernels are never pruned
			SubReason::Prune => {}
		}
		Ok(())
	}

	fn read_leaf<R: Reader>(reader: &mut R, is_genesis: bool) -> Result<TxKernel, Error> {
		let features = KernelFeatures::read(reader)?;
		let excess = Commitment::read(reader)?;
		let excess_sig = Signature::read(reader)?;
		TxKernel::new(features, excess, excess_sig, is_genesis)
	}

	fn serialized_protocol_version(bytes: &[u8], version: ProtocolVersion) -> ProtocolVersion {
		// Peers advertising a recent version sometimes still hand out the
		// legacy layout. A kernel in that shape starts like the genesis
		// kernel: same feature tag, followed by its (consensus-known) fee.
		let genesis = genesis::genesis_kernel();
		if bytes.is_empty() || bytes[0] != genesis.features().as_u8() {
			return version;
		}
		if bytes.len() < 1 + 8 {
			return version;
		}
		if BigEndian::read_u64(&bytes[1..9]) == genesis.fee() {
			ProtocolVersion(0)
		} else {
			ProtocolVersion(2)
		}
	}

	fn save<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		// fixed persisted layout, independent of peer protocol versions
		writer.write_u8(self.features.as_u8())?;
		writer.write_u64(self.fee())?;
		writer.write_u64(self.lock_height())?;
		writer.write_u64(self.relative_height())?;
		self.excess.write(writer)?;
		self.excess_sig.write(writer)?;
		Ok(())
	}

	fn restore<R: Reader>(reader: &mut R) -> Result<TxKernel, Error> {
		let feature_byte = reader.read_u8()?;
		let fee = reader.read_u64()?;
		let lock_height = reader.read_u64()?;
		let relative_height = reader.read_u64()?;

		let features = match feature_byte {
			KernelFeatures::PLAIN_U8 => {
				if lock_height != 0 || relative_height != 0 {
					return Err(Error::InvalidFieldCombination);
				}
				KernelFeatures::Plain { fee }
			}
			KernelFeatures::COINBASE_U8 => {
				if fee != 0 || lock_height != 0 || relative_height != 0 {
					return Err(Error::InvalidFieldCombination);
				}
				KernelFeatures::Coinbase
			}
			KernelFeatures::HEIGHT_LOCKED_U8 => {
				if relative_height != 0 {
					return Err(Error::InvalidFieldCombination);
				}
				KernelFeatures::HeightLocked { fee, lock_height }
			}
			KernelFeatures::NO_RECENT_DUPLICATE_U8 => {
				if lock_height != 0 {
					return Err(Error::InvalidFieldCombination);
				}
				KernelFeatures::NoRecentDuplicate {
					fee,
					relative_height: relative_height.try_into()?,
				}
			}
			f => return Err(Error::InvalidFeatures(f)),
		};

		let excess = Commitment::read(reader)?;
		validate_commitment(&excess)?;
		let excess_sig = Signature::read(reader)?;

		// signature verification already happened before this kernel was
		// saved, restoring trusts it
		Ok(TxKernel {
			features,
			excess,
			excess_sig,
		})
	}
}

/// Options for block validation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OutputFeatures {
	/// No flags
	Plain = 0,
	/// Output is a coinbase output, must not be spent until maturity
	Coinbase = 1,
}

impl OutputFeatures {
	/// The feature tag on the wire.
	pub fn as_u8(&self) -> u8 {
		*self as u8
	}
}

impl Writeable for OutputFeatures {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_u8(self.as_u8())
	}
}

/// Output for a transaction, defining the new ownership of coins that are
/// being transferred. The commitment is a blinded value for the output while
/// the range proof, tracked separately, guarantees the commitment includes a
/// positive value without overflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Output {
	features: OutputFeatures,
	commit: Commitment,
}

impl Output {
	/// Build and validate an output. The genesis flag enforces bytewise
	/// equality with the genesis output constant.
	pub fn new(
		features: OutputFeatures,
		commit: Commitment,
		is_genesis: bool,
	) -> Result<Output, Error> {
		validate_commitment(&commit)?;
		let output = Output { features, commit };
		if is_genesis && output != *genesis::genesis_output() {
			return Err(Error::GenesisMismatch("output"));
		}
		Ok(output)
	}

	/// Raw constructor, only for the hardcoded genesis constant.
	pub(crate) fn from_parts(features: OutputFeatures, commit: Commitment) -> Output {
		Output { features, commit }
	}

	/// Output features.
	pub fn features(&self) -> OutputFeatures {
		self.features
	}

	/// The output commitment.
	pub fn commitment(&self) -> Commitment {
		self.commit
	}

	/// Whether this is a coinbase output.
	pub fn is_coinbase(&self) -> bool {
		self.features == OutputFeatures::Coinbase
	}

	/// Check that the provided rangeproof actually proves this output's
	/// committed value to be in range.
	pub fn verify_proof(&self, proof: &Rangeproof) -> Result<(), Error> {
		let secp = static_secp_instance();
		let secp = secp.lock();
		secp.verify_bullet_proof(self.commit, proof.inner(), None)
			.map(|_| ())
			.map_err(|_| Error::InvalidRangeproof)
	}
}

impl Writeable for Output {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		self.features.write(writer)?;
		self.commit.write(writer)?;
		Ok(())
	}
}

impl Readable for Output {
	fn read<R: Reader>(reader: &mut R) -> Result<Output, ser::Error> {
		Output::read_leaf(reader, false).map_err(|e| match e {
			Error::Ser(e) => e,
			_ => ser::Error::CorruptedData,
		})
	}
}

impl Summable for Output {
	type Sum = Commitment;

	const MAX_SERIALIZED_LEN: usize = 1 + PEDERSEN_COMMITMENT_SIZE;

	// a duplicate unspent commitment would break the UTXO set
	const ALLOW_DUPLICATE_LOOKUP_VALUES: bool = false;

	fn lookup_value(&self) -> Option<Vec<u8>> {
		Some(self.commit.as_ref().to_vec())
	}

	fn add_to_sum(
		&self,
		sum: &mut Commitment,
		_reason: AddReason,
	) -> Result<(), committed::Error> {
		*sum = add_commit(sum, &self.commit)?;
		Ok(())
	}

	fn subtract_from_sum(
		&self,
		sum: &mut Commitment,
		reason: SubReason,
	) -> Result<(), committed::Error> {
		match reason {
			SubReason::Prune | SubReason::Rewind => {
				*sum = sub_commit(sum, &self.commit)?;
			}
			// outputs only ever leave the set through prune or rewind, which
			// keep the sum in step; a discard would double-subtract
			SubReason::Discard => {}
		}
		Ok(())
	}

	fn read_leaf<R: Reader>(reader: &mut R, is_genesis: bool) -> Result<Output, Error> {
		let feature_byte = reader.read_u8()?;
		let features = match feature_byte {
			0 => OutputFeatures::Plain,
			1 => OutputFeatures::Coinbase,
			f => return Err(Error::InvalidFeatures(f)),
		};
		let commit = Commitment::read(reader)?;
		Output::new(features, commit, is_genesis)
	}

	fn save<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		self.write(writer)
	}

	fn restore<R: Reader>(reader: &mut R) -> Result<Output, Error> {
		let feature_byte = reader.read_u8()?;
		let features = match feature_byte {
			0 => OutputFeatures::Plain,
			1 => OutputFeatures::Coinbase,
			f => return Err(Error::InvalidFeatures(f)),
		};
		let commit = Commitment::read(reader)?;
		validate_commitment(&commit)?;
		Ok(Output { features, commit })
	}
}

/// A bulletproof for an output, kept in its own accumulator alongside the
/// output set. Fixed size, with a redundant length field on the wire.
#[derive(Clone)]
pub struct Rangeproof {
	proof: RangeProof,
}

impl std::fmt::Debug for Rangeproof {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Rangeproof({} bytes)", self.proof.plen)
	}
}

impl PartialEq for Rangeproof {
	fn eq(&self, other: &Rangeproof) -> bool {
		self.proof.plen == other.proof.plen
			&& self.proof.proof[..self.proof.plen] == other.proof.proof[..other.proof.plen]
	}
}

impl Eq for Rangeproof {}

impl Rangeproof {
	/// Fixed byte size of a bulletproof.
	pub const LEN: usize = consensus::BULLETPROOF_LEN;

	/// Build a rangeproof, validating the proof length. The genesis flag
	/// enforces bytewise equality with the genesis rangeproof constant.
	pub fn new(proof: RangeProof, is_genesis: bool) -> Result<Rangeproof, Error> {
		if proof.plen != Rangeproof::LEN {
			return Err(Error::InvalidLength);
		}
		let rangeproof = Rangeproof { proof };
		if is_genesis && rangeproof != *genesis::genesis_rangeproof() {
			return Err(Error::GenesisMismatch("rangeproof"));
		}
		Ok(rangeproof)
	}

	/// Build a rangeproof from a declared length and raw proof bytes.
	pub fn from_bytes(length: u64, bytes: &[u8], is_genesis: bool) -> Result<Rangeproof, Error> {
		if length as usize != Rangeproof::LEN || bytes.len() != Rangeproof::LEN {
			return Err(Error::InvalidLength);
		}
		let mut proof = [0; MAX_PROOF_SIZE];
		proof[..Rangeproof::LEN].copy_from_slice(bytes);
		Rangeproof::new(
			RangeProof {
				proof,
				plen: Rangeproof::LEN,
			},
			is_genesis,
		)
	}

	/// The underlying proof.
	pub fn inner(&self) -> RangeProof {
		self.proof
	}

	/// Declared length of the proof, always `Rangeproof::LEN`.
	pub fn len(&self) -> u64 {
		self.proof.plen as u64
	}

	/// The raw proof bytes.
	pub fn bytes(&self) -> &[u8] {
		&self.proof.proof[..self.proof.plen]
	}
}

impl Writeable for Rangeproof {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_u64(self.len())?;
		writer.write_fixed_bytes(self.bytes())
	}
}

impl Readable for Rangeproof {
	fn read<R: Reader>(reader: &mut R) -> Result<Rangeproof, ser::Error> {
		Rangeproof::read_leaf(reader, false).map_err(|e| match e {
			Error::Ser(e) => e,
			_ => ser::Error::CorruptedData,
		})
	}
}

impl Summable for Rangeproof {
	type Sum = ();

	const MAX_SERIALIZED_LEN: usize = 8 + consensus::BULLETPROOF_LEN;

	const ALLOW_DUPLICATE_LOOKUP_VALUES: bool = false;

	fn read_leaf<R: Reader>(reader: &mut R, is_genesis: bool) -> Result<Rangeproof, Error> {
		let length = reader.read_u64()?;
		if length as usize != Rangeproof::LEN {
			return Err(Error::InvalidLength);
		}
		let bytes = reader.read_fixed_bytes(Rangeproof::LEN)?;
		Rangeproof::from_bytes(length, &bytes, is_genesis)
	}

	fn save<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		self.write(writer)
	}

	fn restore<R: Reader>(reader: &mut R) -> Result<Rangeproof, Error> {
		Rangeproof::read_leaf(reader, false)
	}
}
