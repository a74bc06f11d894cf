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

//! Lifecycle tests of the sum-accumulating MMR over kernels, outputs,
//! rangeproofs and headers.

pub mod common;

use mumble_core as core;

use self::core::core::committed::{is_zero_commit, zero_commit};
use self::core::core::sum_mmr::{Error, SumMMR};
use self::core::core::transaction::{KernelFeatures, Output, OutputFeatures, Rangeproof, TxKernel};
use self::core::core::BlockHeader;
use self::core::pow::Proof;
use self::core::ser::{BinReader, BinWriter, ProtocolVersion};
use common::{build_kernel, build_output, build_rangeproof};

fn save_to_vec<T: core::core::Summable>(mmr: &SumMMR<T>) -> Vec<u8> {
	let mut vec = vec![];
	{
		let mut writer = BinWriter::default(&mut vec);
		mmr.save(&mut writer).unwrap();
	}
	vec
}

fn restore_from_vec<T: core::core::Summable>(bytes: &[u8]) -> Result<SumMMR<T>, Error> {
	let mut slice = bytes;
	let mut reader = BinReader::new(&mut slice, ProtocolVersion::local());
	SumMMR::restore(&mut reader)
}

#[test]
fn empty_mmr_has_zero_sum() {
	let mmr: SumMMR<Output> = SumMMR::new();
	assert_eq!(mmr.size(), 0);
	assert!(is_zero_commit(mmr.sum()));
}

#[test]
fn output_sum_is_order_independent() {
	let outputs: Vec<Output> = (0..5)
		.map(|i| build_output(OutputFeatures::Plain, 100 + i, 30 + i as u8))
		.collect();

	let mut forward = SumMMR::new();
	for output in outputs.iter() {
		forward.push(*output).unwrap();
	}

	let mut backward = SumMMR::new();
	for output in outputs.iter().rev() {
		backward.push(*output).unwrap();
	}

	assert_ne!(*forward.sum(), zero_commit());
	// the sums serialize identically whatever the insertion order
	assert_eq!(forward.sum(), backward.sum());
}

#[test]
fn push_then_rewind_restores_sum() {
	let mut mmr = SumMMR::new();
	for i in 0..3 {
		mmr.push(build_output(OutputFeatures::Plain, 10 + i, 40 + i as u8))
			.unwrap();
	}
	let checkpoint_size = mmr.size();
	let checkpoint_sum = *mmr.sum();

	for i in 0..4 {
		mmr.push(build_output(OutputFeatures::Plain, 50 + i, 50 + i as u8))
			.unwrap();
	}
	assert_ne!(*mmr.sum(), checkpoint_sum);

	mmr.rewind(checkpoint_size).unwrap();
	assert_eq!(mmr.size(), checkpoint_size);
	assert_eq!(*mmr.sum(), checkpoint_sum);

	// rewinding everything collapses back to the identity
	mmr.rewind(0).unwrap();
	assert_eq!(mmr.size(), 0);
	assert!(is_zero_commit(mmr.sum()));
}

#[test]
fn push_then_discard_zeroes_the_sum() {
	let mut mmr = SumMMR::new();
	for i in 0..6 {
		mmr.push(build_output(OutputFeatures::Plain, 1000 + i, 60 + i as u8))
			.unwrap();
	}
	assert!(!is_zero_commit(mmr.sum()));

	mmr.discard().unwrap();
	assert_eq!(mmr.size(), 0);
	// the sum serializes to the all-zero pattern
	assert_eq!(*mmr.sum(), zero_commit());
}

#[test]
fn duplicate_output_rejected_and_state_unchanged() {
	let mut mmr = SumMMR::new();
	let output = build_output(OutputFeatures::Plain, 42, 70);
	mmr.push(output).unwrap();

	let size = mmr.size();
	let sum = *mmr.sum();

	assert_eq!(mmr.push(output).unwrap_err(), Error::DuplicateLeaf);
	assert_eq!(mmr.size(), size);
	assert_eq!(*mmr.sum(), sum);

	// pruning the first instance frees the commitment for reuse
	mmr.prune(0).unwrap();
	mmr.push(output).unwrap();
	assert_eq!(mmr.size(), 2);
	assert_eq!(*mmr.sum(), sum);
}

#[test]
fn duplicate_kernel_excesses_allowed() {
	let kernel = build_kernel(KernelFeatures::Plain { fee: 2 }, 71);
	let mut mmr = SumMMR::new();
	mmr.push(kernel.clone()).unwrap();
	mmr.push(kernel.clone()).unwrap();
	assert_eq!(mmr.size(), 2);

	// backing one out leaves exactly one contribution
	mmr.rewind(1).unwrap();
	assert_eq!(*mmr.sum(), kernel.excess());

	// and backing out the identical excess hits the x - x = 0 shortcut
	mmr.rewind(0).unwrap();
	assert!(is_zero_commit(mmr.sum()));
}

#[test]
fn kernels_are_not_pruned_from_the_sum() {
	let kernel = build_kernel(KernelFeatures::Plain { fee: 2 }, 72);
	let mut mmr = SumMMR::new();
	mmr.push(kernel.clone()).unwrap();

	// pruning a kernel slot does not touch the excess sum
	mmr.prune(0).unwrap();
	assert!(mmr.get(0).is_none());
	assert_eq!(*mmr.sum(), kernel.excess());
}

#[test]
fn prune_updates_output_sum_and_index() {
	let first = build_output(OutputFeatures::Plain, 5, 73);
	let second = build_output(OutputFeatures::Plain, 6, 74);

	let mut mmr = SumMMR::new();
	mmr.push(first).unwrap();
	mmr.push(second).unwrap();

	mmr.prune(0).unwrap();
	// slot is retained, later positions keep their meaning
	assert_eq!(mmr.size(), 2);
	assert!(mmr.get(0).is_none());
	assert_eq!(mmr.get(1), Some(&second));
	assert_eq!(*mmr.sum(), second.commitment());
	assert!(mmr.lookup(first.commitment().as_ref()).is_none());
	assert_eq!(mmr.lookup(second.commitment().as_ref()), Some(1));

	// pruning twice or out of range fails cleanly
	assert_eq!(mmr.prune(0).unwrap_err(), Error::LeafNotFound(0));
	assert_eq!(mmr.prune(9).unwrap_err(), Error::LeafNotFound(9));
}

#[test]
fn output_mmr_save_restore_round_trip() {
	let mut mmr = SumMMR::new();
	for i in 0..5 {
		mmr.push(build_output(OutputFeatures::Plain, 500 + i, 80 + i as u8))
			.unwrap();
	}
	mmr.prune(2).unwrap();

	let bytes = save_to_vec(&mmr);
	let restored: SumMMR<Output> = restore_from_vec(&bytes).unwrap();

	assert_eq!(restored.size(), mmr.size());
	assert_eq!(restored.sum(), mmr.sum());
	assert!(restored.get(2).is_none());
	for i in &[0u64, 1, 3, 4] {
		assert_eq!(restored.get(*i), mmr.get(*i));
	}
	// the lookup index is rebuilt for live leaves only
	assert_eq!(
		restored.lookup(mmr.get(0).unwrap().commitment().as_ref()),
		Some(0)
	);
}

#[test]
fn kernel_mmr_save_restore_round_trip() {
	let mut mmr = SumMMR::new();
	mmr.push(build_kernel(KernelFeatures::Plain { fee: 2 }, 85)).unwrap();
	mmr.push(build_kernel(KernelFeatures::Coinbase, 86)).unwrap();
	mmr.push(build_kernel(
		KernelFeatures::HeightLocked {
			fee: 1,
			lock_height: 777,
		},
		87,
	))
	.unwrap();

	let bytes = save_to_vec(&mmr);
	let restored: SumMMR<TxKernel> = restore_from_vec(&bytes).unwrap();

	assert_eq!(restored.size(), 3);
	assert_eq!(restored.sum(), mmr.sum());
	for i in 0..3 {
		assert_eq!(restored.get(i), mmr.get(i));
	}
}

#[test]
fn corrupt_saved_sum_detected() {
	let mut mmr = SumMMR::new();
	for i in 0..3 {
		mmr.push(build_output(OutputFeatures::Plain, 10 + i, 90 + i as u8))
			.unwrap();
	}

	let mut bytes = save_to_vec(&mmr);
	// saved sum lives right after the 8 byte count
	bytes[10] ^= 1;
	assert_eq!(
		restore_from_vec::<Output>(&bytes).unwrap_err(),
		Error::SumMismatch
	);
}

#[test]
fn rangeproof_mmr_round_trip() {
	let mut mmr = SumMMR::new();
	for i in 0..3 {
		mmr.push(build_rangeproof(i)).unwrap();
	}

	let bytes = save_to_vec(&mmr);
	let restored: SumMMR<Rangeproof> = restore_from_vec(&bytes).unwrap();
	assert_eq!(restored.size(), 3);
	for i in 0..3 {
		assert_eq!(restored.get(i), mmr.get(i));
	}
}

#[test]
fn header_mmr_round_trip() {
	let mut mmr = SumMMR::new();
	for height in 0..4u64 {
		let mut header = BlockHeader::default();
		header.height = height;
		header.pow.proof = Proof::random();
		mmr.push(header).unwrap();
	}

	let bytes = save_to_vec(&mmr);
	let restored: SumMMR<BlockHeader> = restore_from_vec(&bytes).unwrap();
	assert_eq!(restored.size(), 4);
	for i in 0..4 {
		assert_eq!(restored.get(i), mmr.get(i));
	}

	// rewind drops the tail headers
	let mut mmr = restored;
	mmr.rewind(2).unwrap();
	assert_eq!(mmr.size(), 2);
	assert_eq!(mmr.get(1).unwrap().height, 1);
}
