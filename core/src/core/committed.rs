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

//! Running commitment sums and the consistency check of a header against
//! the kernel and output accumulators.
//!
//! The all-zero commitment stands in for the accumulator identity. The
//! underlying library has no representation for the identity point, so the
//! sentinel is special-cased here, in exactly one place, before any
//! `commit_sum` call.

use crate::consensus;
use crate::core::block::BlockHeader;
use crate::core::sum_mmr::{LeafSum, SumMMR};
use crate::core::transaction::{Output, TxKernel};
use crate::ser::{self, Reader, Writer};
use util::secp::constants::PEDERSEN_COMMITMENT_SIZE;
use util::secp::pedersen::Commitment;
use util::{commit_to_zero_value, secp, static_secp_instance};

/// Errors from summing commitments.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
	/// The underlying commitment sum failed.
	#[error("commitment sum failure: {0}")]
	SumComputationFailure(#[from] secp::Error),
}

/// The all-zero commitment used as the additive identity of running sums.
pub fn zero_commit() -> Commitment {
	commit_to_zero_value()
}

/// Whether this commitment is the identity sentinel.
pub fn is_zero_commit(commit: &Commitment) -> bool {
	commit.as_ref().iter().all(|b| *b == 0)
}

/// sum + commit under the curve group law, treating the all-zero sentinel as
/// the identity so it never reaches the library.
pub fn add_commit(sum: &Commitment, commit: &Commitment) -> Result<Commitment, Error> {
	if is_zero_commit(sum) {
		return Ok(*commit);
	}
	let secp = static_secp_instance();
	let secp = secp.lock();
	Ok(secp.commit_sum(vec![*sum, *commit], vec![])?)
}

/// sum - commit under the curve group law. A sum equal to the subtracted
/// commitment collapses back to the identity sentinel.
pub fn sub_commit(sum: &Commitment, commit: &Commitment) -> Result<Commitment, Error> {
	if is_zero_commit(sum) {
		let secp = static_secp_instance();
		let secp = secp.lock();
		return Ok(secp.commit_sum(vec![], vec![*commit])?);
	}
	if sum == commit {
		return Ok(zero_commit());
	}
	let secp = static_secp_instance();
	let secp = secp.lock();
	Ok(secp.commit_sum(vec![*sum], vec![*commit])?)
}

impl LeafSum for Commitment {
	fn zero() -> Commitment {
		zero_commit()
	}

	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_fixed_bytes(self)
	}

	fn read<R: Reader>(reader: &mut R) -> Result<Commitment, ser::Error> {
		let bytes = reader.read_fixed_bytes(PEDERSEN_COMMITMENT_SIZE)?;
		Ok(Commitment::from_vec(bytes))
	}

	// the in-memory form is already the canonical serialization
	fn matches(&self, other: &Commitment) -> bool {
		self == other
	}
}

/// Verify that a block state is consistent with its header: the sum of
/// unspent output commitments minus the total issued coinbase must equal the
/// sum of kernel excesses plus the header's total kernel offset. Never
/// errors; any failure in the underlying arithmetic fails the check.
pub fn verify_kernel_sums(
	header: &BlockHeader,
	kernels: &SumMMR<TxKernel>,
	outputs: &SumMMR<Output>,
) -> bool {
	// Kernel side: excess sum plus the offset committed as a zero-value
	// commitment. A zero offset is the identity and must not reach the
	// library's commit, which rejects the zero blinding factor.
	let kernel_sum = if header.total_kernel_offset.is_zero() {
		*kernels.sum()
	} else {
		let offset_commit = {
			let secp = static_secp_instance();
			let secp = secp.lock();
			let key = match header.total_kernel_offset.secret_key(&secp) {
				Ok(key) => key,
				Err(_) => return false,
			};
			match secp.commit(0, key) {
				Ok(commit) => commit,
				Err(_) => return false,
			}
		};
		match add_commit(kernels.sum(), &offset_commit) {
			Ok(sum) => sum,
			Err(_) => return false,
		}
	};

	// UTXO side: output sum minus everything issued through coinbase up to
	// this height. No reward yet means nothing to subtract, and a zero-value
	// zero-blinding commitment is not computable anyway.
	let rewards = consensus::total_coinbase_rewards(header.height);
	let utxo_sum = if rewards == 0 {
		*outputs.sum()
	} else {
		let rewards_commit = {
			let secp = static_secp_instance();
			let secp = secp.lock();
			match secp.commit_value(rewards) {
				Ok(commit) => commit,
				Err(_) => return false,
			}
		};
		match sub_commit(outputs.sum(), &rewards_commit) {
			Ok(sum) => sum,
			Err(_) => return false,
		}
	};

	// both sides are canonical 33 byte forms, compare them directly
	if utxo_sum != kernel_sum {
		debug!(
			"kernel sum mismatch at height {}: utxo {:?} vs kernel {:?}",
			header.height, utxo_sum, kernel_sum
		);
		return false;
	}
	true
}
