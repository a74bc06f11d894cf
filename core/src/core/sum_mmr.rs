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

//! Append-only accumulator over one kind of chain leaf. Tracks an
//! insertion-ordered leaf sequence, a running sum specific to the leaf kind
//! and, where the leaf kind requires uniqueness, a lookup index over leaf
//! keys. Merkle root bagging is handled by the block ingest layer, not here.

use std::collections::HashMap;
use std::fmt::Debug;
use std::io::Cursor;

use crate::core::committed;
use crate::core::transaction;
use crate::ser::{self, BinReader, ProtocolVersion, Reader, Writeable, Writer};

/// Why a leaf is being folded into the running sum. `Restore` is
/// algebraically identical to `Append`; the distinct label lets a leaf kind
/// recognize a cold start and defer expensive checks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddReason {
	/// Freshly appended leaf
	Append,
	/// Leaf replayed while restoring persisted state
	Restore,
}

/// Why a leaf is being removed from the running sum.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubReason {
	/// Leaf spent in place, slot retained
	Prune,
	/// Tail truncation back to an earlier size
	Rewind,
	/// The whole structure is being emptied
	Discard,
}

/// Accumulator state carried alongside the leaves. The commitment sums use
/// their canonical serialized form, so equality here is equality of the
/// persisted bytes.
pub trait LeafSum: Clone + Debug + Sized {
	/// The additive identity.
	fn zero() -> Self;
	/// Persist the accumulator.
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error>;
	/// Read the accumulator back.
	fn read<R: Reader>(reader: &mut R) -> Result<Self, ser::Error>;
	/// Serialized-bytes equality.
	fn matches(&self, other: &Self) -> bool;
}

impl LeafSum for () {
	fn zero() -> Self {}

	fn write<W: Writer>(&self, _writer: &mut W) -> Result<(), ser::Error> {
		Ok(())
	}

	fn read<R: Reader>(_reader: &mut R) -> Result<Self, ser::Error> {
		Ok(())
	}

	fn matches(&self, _other: &Self) -> bool {
		true
	}
}

/// Errors from updating an MMR.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
	/// A leaf with the same lookup value is already live
	#[error("duplicate leaf")]
	DuplicateLeaf,
	/// No live leaf at the given position
	#[error("no leaf at position {0}")]
	LeafNotFound(u64),
	/// Replayed accumulator doesn't match the persisted one
	#[error("restored sum does not match the saved sum")]
	SumMismatch,
	/// Updating the running sum failed
	#[error("sum error: {0}")]
	Sum(#[from] committed::Error),
	/// A persisted leaf failed to restore
	#[error("leaf error: {0}")]
	Leaf(#[from] transaction::Error),
	/// Lower level serialization error
	#[error("serialization error: {0}")]
	Ser(#[from] ser::Error),
}

/// A leaf that can live in a sum MMR: wire and persisted byte forms, an
/// optional lookup key and its contribution to the running sum.
pub trait Summable: Writeable + Clone + Sized {
	/// The accumulator type the MMR maintains for this leaf kind.
	type Sum: LeafSum;

	/// Upper bound on the wire-serialized size of one leaf, all protocol
	/// versions included.
	const MAX_SERIALIZED_LEN: usize;

	/// Whether two live leaves may share the same lookup value.
	const ALLOW_DUPLICATE_LOOKUP_VALUES: bool;

	/// Key this leaf is indexed under, if any.
	fn lookup_value(&self) -> Option<Vec<u8>> {
		None
	}

	/// Fold this leaf into the running sum.
	fn add_to_sum(
		&self,
		_sum: &mut Self::Sum,
		_reason: AddReason,
	) -> Result<(), committed::Error> {
		Ok(())
	}

	/// Remove this leaf from the running sum.
	fn subtract_from_sum(
		&self,
		_sum: &mut Self::Sum,
		_reason: SubReason,
	) -> Result<(), committed::Error> {
		Ok(())
	}

	/// Read a leaf in its wire form. The protocol version is carried by the
	/// reader; the genesis flag relaxes and redirects validation for the
	/// hardcoded genesis leaves.
	fn read_leaf<R: Reader>(reader: &mut R, is_genesis: bool)
		-> Result<Self, transaction::Error>;

	/// Inspect a serialized leaf and decide which protocol version it is
	/// actually in, given the advertised one. Used to recognize peers
	/// claiming a recent version while sending the legacy layout.
	fn serialized_protocol_version(_bytes: &[u8], version: ProtocolVersion) -> ProtocolVersion {
		version
	}

	/// Write the leaf in its persisted form (not necessarily the wire form).
	fn save<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error>;

	/// Read a leaf back from its persisted form. Trusts prior validation:
	/// signature checks are deferred, structural checks still apply.
	fn restore<R: Reader>(reader: &mut R) -> Result<Self, transaction::Error>;

	/// Serialize the leaf in its wire form at the given protocol version.
	fn serialize(&self, version: ProtocolVersion) -> Result<Vec<u8>, ser::Error> {
		ser::ser_vec(version, self)
	}

	/// Parse one leaf from the front of the given bytes, returning it along
	/// with the number of bytes consumed.
	fn unserialize(
		bytes: &[u8],
		version: ProtocolVersion,
		is_genesis: bool,
	) -> Result<(Self, usize), transaction::Error> {
		let mut cursor = Cursor::new(bytes);
		let mut reader = BinReader::new(&mut cursor, version);
		let leaf = Self::read_leaf(&mut reader, is_genesis)?;
		Ok((leaf, cursor.position() as usize))
	}
}

/// Insertion-ordered sequence of leaves with a running sum and optional
/// uniqueness index. Pruned slots are retained so positions are stable;
/// rewinding truncates the tail.
#[derive(Clone, Debug)]
pub struct SumMMR<T: Summable> {
	leaves: Vec<Option<T>>,
	sum: T::Sum,
	index: HashMap<Vec<u8>, u64>,
}

impl<T: Summable> Default for SumMMR<T> {
	fn default() -> SumMMR<T> {
		SumMMR::new()
	}
}

impl<T: Summable> SumMMR<T> {
	/// Create a new empty MMR.
	pub fn new() -> SumMMR<T> {
		SumMMR {
			leaves: vec![],
			sum: T::Sum::zero(),
			index: HashMap::new(),
		}
	}

	/// Number of leaf slots, pruned ones included.
	pub fn size(&self) -> u64 {
		self.leaves.len() as u64
	}

	/// The running sum over all live leaves.
	pub fn sum(&self) -> &T::Sum {
		&self.sum
	}

	/// The live leaf at the given position, if any.
	pub fn get(&self, position: u64) -> Option<&T> {
		self.leaves.get(position as usize).and_then(|l| l.as_ref())
	}

	/// Position of the live leaf carrying the given lookup value. Only
	/// populated for leaf kinds that forbid duplicates.
	pub fn lookup(&self, value: &[u8]) -> Option<u64> {
		self.index.get(value).cloned()
	}

	/// Iterator over live leaves in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.leaves.iter().filter_map(|l| l.as_ref())
	}

	/// Append a leaf, updating sum and index. Rejects a duplicate lookup
	/// value before touching any state.
	pub fn push(&mut self, leaf: T) -> Result<u64, Error> {
		let lookup = leaf.lookup_value();
		if !T::ALLOW_DUPLICATE_LOOKUP_VALUES {
			if let Some(ref key) = lookup {
				if self.index.contains_key(key) {
					return Err(Error::DuplicateLeaf);
				}
			}
		}

		let mut sum = self.sum.clone();
		leaf.add_to_sum(&mut sum, AddReason::Append)?;

		let position = self.leaves.len() as u64;
		if !T::ALLOW_DUPLICATE_LOOKUP_VALUES {
			if let Some(key) = lookup {
				self.index.insert(key, position);
			}
		}
		self.leaves.push(Some(leaf));
		self.sum = sum;
		Ok(position)
	}

	/// Remove the leaf at the given position from the sum and index. The
	/// slot itself is retained so later positions keep their meaning.
	pub fn prune(&mut self, position: u64) -> Result<(), Error> {
		let leaf = match self.get(position) {
			Some(leaf) => leaf.clone(),
			None => return Err(Error::LeafNotFound(position)),
		};

		let mut sum = self.sum.clone();
		leaf.subtract_from_sum(&mut sum, SubReason::Prune)?;

		if !T::ALLOW_DUPLICATE_LOOKUP_VALUES {
			if let Some(key) = leaf.lookup_value() {
				self.index.remove(&key);
			}
		}
		self.leaves[position as usize] = None;
		self.sum = sum;
		Ok(())
	}

	/// Truncate the tail back to the given size, backing each removed leaf
	/// out of the sum in reverse insertion order.
	pub fn rewind(&mut self, size: u64) -> Result<(), Error> {
		while self.size() > size {
			let last = self.leaves.len() - 1;
			if let Some(leaf) = self.leaves[last].clone() {
				let mut sum = self.sum.clone();
				leaf.subtract_from_sum(&mut sum, SubReason::Rewind)?;
				if !T::ALLOW_DUPLICATE_LOOKUP_VALUES {
					if let Some(key) = leaf.lookup_value() {
						self.index.remove(&key);
					}
				}
				self.sum = sum;
			}
			self.leaves.truncate(last);
		}
		Ok(())
	}

	/// Empty the structure. Every live leaf gets backed out of the sum, and
	/// emptying then collapses the accumulator to the identity regardless of
	/// whether the leaf kind subtracts anything on discard.
	pub fn discard(&mut self) -> Result<(), Error> {
		let mut sum = self.sum.clone();
		for leaf in self.leaves.iter().filter_map(|l| l.as_ref()) {
			leaf.subtract_from_sum(&mut sum, SubReason::Discard)?;
		}
		self.sum = T::Sum::zero();
		self.leaves.clear();
		self.index.clear();
		Ok(())
	}

	/// Persist the MMR: slot count, accumulator, then each slot with a
	/// presence byte.
	pub fn save<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_u64(self.size())?;
		self.sum.write(writer)?;
		for slot in &self.leaves {
			match slot {
				Some(leaf) => {
					writer.write_u8(1)?;
					leaf.save(writer)?;
				}
				None => writer.write_u8(0)?,
			}
		}
		Ok(())
	}

	/// Restore a persisted MMR. The sum is rebuilt from scratch by replaying
	/// every live leaf and cross-checked against the saved accumulator;
	/// a mismatch means the persisted state is corrupt.
	pub fn restore<R: Reader>(reader: &mut R) -> Result<SumMMR<T>, Error> {
		let count = reader.read_u64()?;
		let saved_sum = T::Sum::read(reader)?;

		let mut mmr: SumMMR<T> = SumMMR::new();
		for position in 0..count {
			match reader.read_u8()? {
				0 => mmr.leaves.push(None),
				1 => {
					let leaf = T::restore(reader)?;
					let mut sum = mmr.sum.clone();
					leaf.add_to_sum(&mut sum, AddReason::Restore)?;
					if !T::ALLOW_DUPLICATE_LOOKUP_VALUES {
						if let Some(key) = leaf.lookup_value() {
							mmr.index.insert(key, position);
						}
					}
					mmr.leaves.push(Some(leaf));
					mmr.sum = sum;
				}
				_ => return Err(Error::Ser(ser::Error::CorruptedData)),
			}
		}

		if !mmr.sum.matches(&saved_sum) {
			error!("restored MMR sum does not match the saved one, state is corrupt");
			return Err(Error::SumMismatch);
		}
		Ok(mmr)
	}
}
