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

//! All the rules required for a cryptocurrency to have reach consensus across
//! the whole network are complex and hard to completely isolate. Some can be
//! simple parameters (like block reward), others complex algorithms (like
//! Merkle sum trees or reorg rules). However, as long as they're simple
//! enough, consensus-relevant constants and short functions should be kept
//! here.

use std::cmp::min;

use crate::core::block::HeaderVersion;
use crate::core::hash::Hash;

/// A coin is divisible to 10^9, the smallest unit being the nanocoin.
pub const COIN_BASE: u64 = 1_000_000_000;

/// Block interval, in seconds
pub const BLOCK_TIME_SEC: u64 = 60;

/// Nominal height for standard time intervals, hour is 60 blocks
pub const HOUR_HEIGHT: u64 = 3600 / BLOCK_TIME_SEC;

/// A minute of blocks
pub const MINUTE_HEIGHT: u64 = 60 / BLOCK_TIME_SEC;

/// A day is 1440 blocks
pub const DAY_HEIGHT: u64 = 24 * HOUR_HEIGHT;

/// A week is 10_080 blocks
pub const WEEK_HEIGHT: u64 = 7 * DAY_HEIGHT;

/// A year is 525_600 blocks
pub const YEAR_HEIGHT: u64 = 365 * DAY_HEIGHT;

/// Number of blocks before a coinbase matures and can be spent
pub const COINBASE_MATURITY: u64 = DAY_HEIGHT;

/// Default number of blocks in the past when cross-block cut-through will
/// start happening
pub const CUT_THROUGH_HORIZON: u64 = WEEK_HEIGHT;

/// Threshold on the number of blocks behind the chain head past which a node
/// prefers a full state sync over regular block catch-up; derived from the
/// cut-through horizon
pub const STATE_SYNC_HEIGHT_THRESHOLD: u64 = CUT_THROUGH_HORIZON / 2;

/// Weight of an input when counted against the max block weight capacity
pub const BLOCK_INPUT_WEIGHT: u64 = 1;

/// Weight of an output when counted against the max block weight capacity
pub const BLOCK_OUTPUT_WEIGHT: u64 = 4;

/// Weight of a kernel when counted against the max block weight capacity
pub const BLOCK_KERNEL_WEIGHT: u64 = 1;

/// Total maximum block weight.
pub const MAX_BLOCK_WEIGHT: u64 = 40_000;

/// Fixed serialized length of a bulletproof
pub const BULLETPROOF_LEN: usize = 675;

/// Serialized length of an output together with its rangeproof
pub const BLOCK_OUTPUT_LEN: usize = 1 + 33 + 8 + BULLETPROOF_LEN;

/// Serialized length of a kernel
pub const BLOCK_KERNEL_LEN: usize = 1 + 8 + 8 + 33 + 64;

/// Total maximum serialized block length, for DoS protection (caller
/// enforced). Bounded by the weight capacity plus generous header room.
pub const MAX_BLOCK_LEN: u64 = (MAX_BLOCK_WEIGHT / BLOCK_OUTPUT_WEIGHT)
	* (BLOCK_OUTPUT_LEN as u64)
	+ (MAX_BLOCK_WEIGHT / BLOCK_KERNEL_WEIGHT) * (BLOCK_KERNEL_LEN as u64)
	+ 1_024;

/// Cuckoo-cycle proof size (cycle length)
pub const PROOFSIZE: usize = 42;

/// Secondary proof-of-work edge size, meant to be ASIC resistant
pub const C29_EDGE_BITS: u8 = 29;

/// Primary proof-of-work edge size after the hard fork
pub const C31_EDGE_BITS: u8 = 31;

/// Maximum allowed edge size
pub const MAX_EDGE_BITS: u8 = C31_EDGE_BITS;

/// Base edge size used to scale the graph weight of larger cycles once the
/// hard fork restricts the primary algorithm
pub const BASE_EDGE_BITS: u8 = 24;

/// Height at which only C31 and larger cycles remain valid for the primary
/// proof of work
#[cfg(not(feature = "floonet"))]
pub const C31_HARD_FORK_HEIGHT: u64 = 202_500;

/// Height at which only C31 and larger cycles remain valid for the primary
/// proof of work
#[cfg(feature = "floonet")]
pub const C31_HARD_FORK_HEIGHT: u64 = 95_000;

/// Fork every 6 months.
pub const HARD_FORK_INTERVAL: u64 = YEAR_HEIGHT / 2;

/// Highest header version this build knows about.
pub const MAX_HEADER_VERSION: u16 = 3;

/// Share of the C29 proof of work at launch, in percent
pub const STARTING_C29_POW_RATIO: u64 = 45;

/// Number of blocks over which the C29 share linearly decays to zero
pub const C29_POW_DURATION: u64 = YEAR_HEIGHT;

/// Minimum difficulty, enforced in the evolution of the difficulty.
pub const MIN_DIFFICULTY: u64 = 1;

/// Number of blocks used to calculate difficulty adjustments
pub const DIFFICULTY_ADJUST_WINDOW: u64 = HOUR_HEIGHT;

/// Dampening factor on the deviation of the window duration
pub const WINDOW_DURATION_DAMP_FACTOR: u64 = 3;

/// Clamp factor bounding the deviation of the window duration
pub const WINDOW_DURATION_CLAMP_FACTOR: u64 = 2;

/// Dampening factor on the count of C29 headers in the window
pub const C29_HEADERS_DAMP_FACTOR: u64 = 13;

/// Clamp factor bounding the count of C29 headers in the window
pub const C29_HEADERS_CLAMP_FACTOR: u64 = 2;

/// Minimum scaling factor for the secondary proof of work
pub const MIN_SECONDARY_SCALING: u32 = 1;

/// Number of blocks a header timestamp may run ahead of the local clock
pub const FUTURE_BLOCKS_THRESHOLD: u64 = 12;

/// Compute the header version expected at the given height. Versions step at
/// each hard fork boundary, clamped to the highest version this build
/// understands.
pub fn header_version(height: u64) -> HeaderVersion {
	HeaderVersion(min(
		1 + height / HARD_FORK_INTERVAL,
		u64::from(MAX_HEADER_VERSION),
	) as u16)
}

/// Check whether the given header version is expected at the given height.
pub fn valid_header_version(height: u64, version: HeaderVersion) -> bool {
	version == header_version(height)
}

/// Calculate block weight from the numbers of inputs, outputs and kernels.
/// The network cap is `MAX_BLOCK_WEIGHT`, enforced by callers.
pub fn block_weight(num_inputs: u64, num_outputs: u64, num_kernels: u64) -> u64 {
	num_inputs
		.saturating_mul(BLOCK_INPUT_WEIGHT)
		.saturating_add(num_outputs.saturating_mul(BLOCK_OUTPUT_WEIGHT))
		.saturating_add(num_kernels.saturating_mul(BLOCK_KERNEL_WEIGHT))
}

/// Compute weight of a graph as number of siphash bits defining the graph.
/// Before the hard fork any advertised edge size weighs in at its full
/// 2^(bits+1) size; afterwards only C31 and up count, rebased on
/// `BASE_EDGE_BITS`.
pub fn graph_weight(height: u64, edge_bits: u8) -> u64 {
	// cycle sizes of 64 bits and up don't exist on any network
	if edge_bits >= 64 {
		return 0;
	}
	let weight = if height < C31_HARD_FORK_HEIGHT {
		(2u128 << edge_bits) * u128::from(edge_bits)
	} else if edge_bits >= C31_EDGE_BITS {
		(2u128 << (edge_bits - BASE_EDGE_BITS)) * u128::from(edge_bits)
	} else {
		0
	};
	min(weight, u128::from(u64::max_value())) as u64
}

/// Ratio the secondary proof of work should take over the primary, as a
/// function of block height (time). Starts at 45% at launch and declines
/// linearly to zero.
pub fn secondary_pow_ratio(height: u64) -> u64 {
	if height >= C29_POW_DURATION {
		return 0;
	}
	STARTING_C29_POW_RATIO.saturating_sub(
		(u128::from(height) * u128::from(STARTING_C29_POW_RATIO) / u128::from(C29_POW_DURATION))
			as u64,
	)
}

/// Maximum difficulty achievable with the given cycle size, scaled by the
/// header's secondary scaling factor when the cycle is the memory-hard C29
/// variant.
pub fn max_difficulty(edge_bits: u8, secondary_scaling: u32) -> u64 {
	if edge_bits >= 64 {
		return 0;
	}
	let scale = if edge_bits == C29_EDGE_BITS {
		u128::from(secondary_scaling)
	} else {
		1
	};
	let diff = (scale << 64) / (2u128 << edge_bits);
	min(diff, u128::from(u64::max_value())) as u64
}

/// The coinbase reward epochs: first block of the epoch, number of blocks in
/// the epoch and per-block reward. The initial high-reward epoch gives way to
/// halvings every four years. No reward at all once the table runs out.
const REWARD_EPOCHS: [(u64, u64, u64); 11] = [
	(1, 212_579, 2_380_952_380),
	(212_580, 1_889_820, 600_000_000),
	(2_102_400, 2_102_400, 300_000_000),
	(4_204_800, 2_102_400, 150_000_000),
	(6_307_200, 2_102_400, 75_000_000),
	(8_409_600, 2_102_400, 37_500_000),
	(10_512_000, 2_102_400, 18_750_000),
	(12_614_400, 2_102_400, 9_375_000),
	(14_716_800, 2_102_400, 4_687_500),
	(16_819_200, 2_102_400, 2_343_750),
	(18_921_600, 2_102_400, 1_171_875),
];

/// The block subsidy amount at the given height.
pub fn coinbase_reward(height: u64) -> u64 {
	REWARD_EPOCHS
		.iter()
		.find(|&&(offset, duration, _)| height >= offset && height - offset < duration)
		.map(|&(_, _, reward)| reward)
		.unwrap_or(0)
}

/// Sum of all coinbase rewards issued up to and including the given height.
pub fn total_coinbase_rewards(height: u64) -> u64 {
	let mut total: u128 = 0;
	for &(offset, duration, reward) in REWARD_EPOCHS.iter() {
		if height < offset {
			break;
		}
		let blocks = min(height - offset + 1, duration);
		total += u128::from(blocks) * u128::from(reward);
	}
	min(total, u128::from(u64::max_value())) as u64
}

/// Blocks rejected by hash regardless of their validity otherwise.
#[cfg(not(feature = "floonet"))]
const BANNED_BLOCK_HASHES: [&str; 2] = [
	"fd294e8e9721a495220b5cea2a224a2492b444fe1d4f8d1344f26cb0290765a5",
	"70feb5433679534f13cdc6797c5fe2184b23b84c39e6fdb9b1599297f9ff6bf4",
];

/// Blocks rejected by hash regardless of their validity otherwise.
#[cfg(feature = "floonet")]
const BANNED_BLOCK_HASHES: [&str; 0] = [];

/// Whether the given block hash is on the banned list.
pub fn is_block_hash_banned(hash: &Hash) -> bool {
	BANNED_BLOCK_HASHES.iter().any(|h| *h == hash.to_hex())
}
