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

//! Block headers: the leaf kind of the header chain accumulator and the
//! anchor the kernel/output accumulators are verified against.

use chrono::prelude::{DateTime, TimeZone, Utc};
use chrono::Duration;

use crate::consensus;
use crate::core::blind::BlindingFactor;
use crate::core::hash::{DefaultHashable, Hash, ZERO_HASH};
use crate::core::sum_mmr::Summable;
use crate::core::transaction;
use crate::pow::{Difficulty, ProofOfWork};
use crate::ser::{self, Readable, Reader, Writeable, Writer};

/// Some type safety around header versioning.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HeaderVersion(pub u16);

impl Default for HeaderVersion {
	fn default() -> HeaderVersion {
		HeaderVersion(1)
	}
}

impl From<HeaderVersion> for u16 {
	fn from(v: HeaderVersion) -> u16 {
		v.0
	}
}

impl Writeable for HeaderVersion {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_u16(self.0)
	}
}

impl Readable for HeaderVersion {
	fn read<R: Reader>(reader: &mut R) -> Result<HeaderVersion, ser::Error> {
		let version = reader.read_u16()?;
		Ok(HeaderVersion(version))
	}
}

/// Block header, fairly standard compared to other blockchains.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockHeader {
	/// Version of the block
	pub version: HeaderVersion,
	/// Height of this block since the genesis block (height 0)
	pub height: u64,
	/// Timestamp at which the block was built.
	pub timestamp: DateTime<Utc>,
	/// Hash of the block previous to this in the chain.
	pub prev_hash: Hash,
	/// Merkle root of the header MMR for the previous block.
	pub prev_root: Hash,
	/// Merklish root of all the commitments in the TxHashSet
	pub output_root: Hash,
	/// Merklish root of all range proofs in the TxHashSet
	pub range_proof_root: Hash,
	/// Merklish root of all transaction kernels in the TxHashSet
	pub kernel_root: Hash,
	/// Total accumulated sum of kernel offsets since genesis block.
	/// We can derive the kernel offset sum for *this* block from
	/// the total kernel offset of the previous block header.
	pub total_kernel_offset: BlindingFactor,
	/// Total size of the output MMR after applying this block
	pub output_mmr_size: u64,
	/// Total size of the kernel MMR after applying this block
	pub kernel_mmr_size: u64,
	/// Proof of work and related
	pub pow: ProofOfWork,
}

impl Default for BlockHeader {
	fn default() -> BlockHeader {
		BlockHeader {
			version: HeaderVersion::default(),
			height: 0,
			timestamp: Utc.timestamp_opt(0, 0).unwrap(),
			prev_hash: ZERO_HASH,
			prev_root: ZERO_HASH,
			output_root: ZERO_HASH,
			range_proof_root: ZERO_HASH,
			kernel_root: ZERO_HASH,
			total_kernel_offset: BlindingFactor::zero(),
			output_mmr_size: 0,
			kernel_mmr_size: 0,
			pow: ProofOfWork::default(),
		}
	}
}

impl DefaultHashable for BlockHeader {}

impl Writeable for BlockHeader {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		self.version.write(writer)?;
		writer.write_u64(self.height)?;
		writer.write_i64(self.timestamp.timestamp())?;
		self.prev_hash.write(writer)?;
		self.prev_root.write(writer)?;
		self.output_root.write(writer)?;
		self.range_proof_root.write(writer)?;
		self.kernel_root.write(writer)?;
		self.total_kernel_offset.write(writer)?;
		writer.write_u64(self.output_mmr_size)?;
		writer.write_u64(self.kernel_mmr_size)?;
		self.pow.write(writer)?;
		Ok(())
	}
}

impl Readable for BlockHeader {
	fn read<R: Reader>(reader: &mut R) -> Result<BlockHeader, ser::Error> {
		let version = HeaderVersion::read(reader)?;
		let height = reader.read_u64()?;
		let timestamp = reader.read_i64()?;
		let prev_hash = Hash::read(reader)?;
		let prev_root = Hash::read(reader)?;
		let output_root = Hash::read(reader)?;
		let range_proof_root = Hash::read(reader)?;
		let kernel_root = Hash::read(reader)?;
		let total_kernel_offset = BlindingFactor::read(reader)?;
		let output_mmr_size = reader.read_u64()?;
		let kernel_mmr_size = reader.read_u64()?;
		let pow = ProofOfWork::read(reader)?;

		let ts = match Utc.timestamp_opt(timestamp, 0).single() {
			Some(ts) => ts,
			None => return Err(ser::Error::CorruptedData),
		};

		Ok(BlockHeader {
			version,
			height,
			timestamp: ts,
			prev_hash,
			prev_root,
			output_root,
			range_proof_root,
			kernel_root,
			total_kernel_offset,
			output_mmr_size,
			kernel_mmr_size,
			pow,
		})
	}
}

impl BlockHeader {
	/// Total difficulty accumulated by the proof of work on this header
	pub fn total_difficulty(&self) -> Difficulty {
		self.pow.total_difficulty
	}

	/// Maximum difficulty this header's cycle size can claim, scaled by the
	/// secondary factor for C29 cycles.
	pub fn max_difficulty(&self) -> u64 {
		consensus::max_difficulty(self.pow.edge_bits(), self.pow.secondary_scaling)
	}

	/// Whether the header timestamp sits within the tolerated window ahead
	/// of the provided local clock.
	pub fn is_timestamp_valid(&self, now: DateTime<Utc>) -> bool {
		let bound = (consensus::FUTURE_BLOCKS_THRESHOLD * consensus::BLOCK_TIME_SEC) as i64;
		self.timestamp <= now + Duration::seconds(bound)
	}
}

impl Summable for BlockHeader {
	type Sum = ();

	const MAX_SERIALIZED_LEN: usize =
		2 + 8 + 8 + 5 * 32 + 32 + 8 + 8 + 8 + 4 + 8 + 1 + (42 * 64 + 7) / 8;

	const ALLOW_DUPLICATE_LOOKUP_VALUES: bool = false;

	fn read_leaf<R: Reader>(
		reader: &mut R,
		_is_genesis: bool,
	) -> Result<BlockHeader, transaction::Error> {
		Ok(BlockHeader::read(reader)?)
	}

	fn save<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		self.write(writer)
	}

	fn restore<R: Reader>(reader: &mut R) -> Result<BlockHeader, transaction::Error> {
		Ok(BlockHeader::read(reader)?)
	}
}
