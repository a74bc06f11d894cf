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

//! Kernel, output and rangeproof validation and wire format tests.

pub mod common;

use mumble_core as core;
use mumble_util as util;

use self::core::core::sum_mmr::Summable;
use self::core::core::transaction::{
	Error, KernelFeatures, Output, OutputFeatures, Rangeproof, TxKernel,
};
use self::core::genesis;
use self::core::ser::{self, ProtocolVersion};
use common::{build_kernel, build_output, sign_features};
use std::convert::TryInto;
use util::secp::pedersen::Commitment;
use util::secp::Signature;

#[test]
fn plain_kernel_wire_round_trip_all_versions() {
	let kernel = build_kernel(KernelFeatures::Plain { fee: 2 }, 10);

	for v in 0..=3u32 {
		let version = ProtocolVersion(v);
		let bytes = kernel.serialize(version).unwrap();
		let expected_len = if v < 2 {
			1 + 8 + 8 + 33 + 64
		} else {
			1 + 8 + 33 + 64
		};
		assert_eq!(bytes.len(), expected_len, "version {}", v);

		let (parsed, consumed) = TxKernel::unserialize(&bytes, version, false).unwrap();
		assert_eq!(parsed, kernel);
		assert_eq!(consumed, bytes.len());
	}
}

#[test]
fn coinbase_kernel_wire_round_trip_all_versions() {
	let kernel = build_kernel(KernelFeatures::Coinbase, 11);

	for v in 0..=3u32 {
		let version = ProtocolVersion(v);
		let bytes = kernel.serialize(version).unwrap();
		let expected_len = if v < 2 { 1 + 8 + 8 + 33 + 64 } else { 1 + 33 + 64 };
		assert_eq!(bytes.len(), expected_len, "version {}", v);

		let (parsed, consumed) = TxKernel::unserialize(&bytes, version, false).unwrap();
		assert_eq!(parsed, kernel);
		assert_eq!(consumed, bytes.len());
	}
}

#[test]
fn height_locked_kernel_wire_round_trip() {
	let kernel = build_kernel(
		KernelFeatures::HeightLocked {
			fee: 5,
			lock_height: 100_000,
		},
		12,
	);
	assert_eq!(kernel.lock_height(), 100_000);

	for v in &[0u32, 2] {
		let version = ProtocolVersion(*v);
		let bytes = kernel.serialize(version).unwrap();
		let (parsed, _) = TxKernel::unserialize(&bytes, version, false).unwrap();
		assert_eq!(parsed, kernel);
	}
}

#[test]
fn unknown_protocol_versions_fail_fast() {
	let kernel = build_kernel(KernelFeatures::Plain { fee: 2 }, 10);
	let bytes = kernel.serialize(ProtocolVersion(2)).unwrap();

	assert_eq!(
		kernel.serialize(ProtocolVersion(4)).unwrap_err(),
		ser::Error::UnsupportedProtocolVersion(ProtocolVersion(4))
	);
	assert!(TxKernel::unserialize(&bytes, ProtocolVersion(4), false).is_err());
}

#[test]
fn legacy_layout_detection() {
	// a coinbase kernel in the legacy layout starts with the genesis kernel's
	// feature tag and (zero) fee, whatever version the peer claims
	let coinbase = build_kernel(KernelFeatures::Coinbase, 13);
	let legacy_bytes = coinbase.serialize(ProtocolVersion(0)).unwrap();
	assert_eq!(
		TxKernel::serialized_protocol_version(&legacy_bytes, ProtocolVersion(3)),
		ProtocolVersion(0)
	);

	// the same kernel in the compact layout has its excess where the fee
	// would be, which can't match the genesis fee
	let compact_bytes = coinbase.serialize(ProtocolVersion(2)).unwrap();
	assert_eq!(
		TxKernel::serialized_protocol_version(&compact_bytes, ProtocolVersion(3)),
		ProtocolVersion(2)
	);

	// non-coinbase kernels don't look like the genesis kernel at all
	let plain = build_kernel(KernelFeatures::Plain { fee: 2 }, 10);
	let plain_bytes = plain.serialize(ProtocolVersion(2)).unwrap();
	assert_eq!(
		TxKernel::serialized_protocol_version(&plain_bytes, ProtocolVersion(3)),
		ProtocolVersion(3)
	);
}

#[test]
fn plain_kernel_with_lock_height_rejected() {
	let kernel = build_kernel(KernelFeatures::Plain { fee: 2 }, 10);
	let mut bytes = kernel.serialize(ProtocolVersion(0)).unwrap();
	// corrupt the legacy lock height slot
	bytes[16] = 0x2a;
	assert_eq!(
		TxKernel::unserialize(&bytes, ProtocolVersion(0), false).unwrap_err(),
		Error::InvalidFieldCombination
	);
}

#[test]
fn coinbase_kernel_with_fee_rejected() {
	let kernel = build_kernel(KernelFeatures::Coinbase, 11);
	let mut bytes = kernel.serialize(ProtocolVersion(0)).unwrap();
	// corrupt the legacy fee slot
	bytes[8] = 1;
	assert_eq!(
		TxKernel::unserialize(&bytes, ProtocolVersion(0), false).unwrap_err(),
		Error::InvalidFieldCombination
	);
}

#[test]
fn unknown_kernel_features_rejected() {
	let kernel = build_kernel(KernelFeatures::Plain { fee: 2 }, 10);
	for v in &[0u32, 2] {
		let mut bytes = kernel.serialize(ProtocolVersion(*v)).unwrap();
		bytes[0] = 4;
		assert_eq!(
			TxKernel::unserialize(&bytes, ProtocolVersion(*v), false).unwrap_err(),
			Error::InvalidFeatures(4)
		);
	}
}

#[test]
fn kernel_signature_bit_flip_rejected() {
	let kernel = build_kernel(KernelFeatures::Plain { fee: 2 }, 10);
	let bytes = kernel.serialize(ProtocolVersion(2)).unwrap();

	// flip one bit in the signature
	let mut tampered = bytes.clone();
	let sig_offset = bytes.len() - 64;
	tampered[sig_offset] ^= 1;
	assert_eq!(
		TxKernel::unserialize(&tampered, ProtocolVersion(2), false).unwrap_err(),
		Error::InvalidSignature
	);

	// flipping the signed fee invalidates the signature too
	let mut tampered = bytes;
	tampered[8] ^= 1;
	assert_eq!(
		TxKernel::unserialize(&tampered, ProtocolVersion(2), false).unwrap_err(),
		Error::InvalidSignature
	);
}

#[test]
fn kernel_excess_bit_flip_rejected() {
	let kernel = build_kernel(KernelFeatures::Plain { fee: 2 }, 10);
	let bytes = kernel.serialize(ProtocolVersion(2)).unwrap();

	// flip bits across the excess commitment; depending on whether the
	// mangled x coordinate still lands on the curve this surfaces as a bad
	// commitment or a bad signature, never an accept
	for bit in &[0usize, 1, 8, 64, 128, 250] {
		let mut tampered = bytes.clone();
		tampered[9 + bit / 8] ^= 1 << (bit % 8);
		let result = TxKernel::unserialize(&tampered, ProtocolVersion(2), false);
		match result.unwrap_err() {
			Error::InvalidCommitment | Error::InvalidSignature | Error::InvalidPublicKey => {}
			e => panic!("unexpected error kind: {:?}", e),
		}
	}
}

#[test]
fn kernel_zero_signature_rejected() {
	let (excess, _) = sign_features(&KernelFeatures::Plain { fee: 2 }, 10);
	let zero_sig = Signature::from_raw_data(&[0; 64]).unwrap();
	assert_eq!(
		TxKernel::new(KernelFeatures::Plain { fee: 2 }, excess, zero_sig, false).unwrap_err(),
		Error::InvalidSignature
	);
}

#[test]
fn kernel_wrong_message_rejected() {
	// sign as plain, present as height locked
	let (excess, sig) = sign_features(&KernelFeatures::Plain { fee: 2 }, 10);
	assert_eq!(
		TxKernel::new(
			KernelFeatures::HeightLocked {
				fee: 2,
				lock_height: 1,
			},
			excess,
			sig,
			false,
		)
		.unwrap_err(),
		Error::InvalidSignature
	);
}

#[test]
fn kernel_fee_masking() {
	let fee = 0xaa00_0000_0000_0007u64;
	let kernel = build_kernel(KernelFeatures::Plain { fee }, 14);
	assert_eq!(kernel.fee(), fee);
	assert_eq!(kernel.unmasked_fee(), 7);
}

#[cfg(not(feature = "floonet"))]
#[test]
fn nrd_kernels_disabled_on_mainnet() {
	let features = KernelFeatures::NoRecentDuplicate {
		fee: 2,
		relative_height: 144.try_into().unwrap(),
	};
	let (excess, sig) = sign_features(&features, 15);
	assert_eq!(
		TxKernel::new(features, excess, sig, false).unwrap_err(),
		Error::InvalidFeatures(3)
	);
}

#[cfg(feature = "floonet")]
#[test]
fn nrd_kernels_enabled_on_floonet() {
	let features = KernelFeatures::NoRecentDuplicate {
		fee: 2,
		relative_height: 144.try_into().unwrap(),
	};
	let kernel = build_kernel(features, 15);
	assert_eq!(kernel.relative_height(), 144);

	// compact layout stores the relative height in two bytes
	let bytes = kernel.serialize(ProtocolVersion(2)).unwrap();
	assert_eq!(bytes.len(), 1 + 8 + 2 + 33 + 64);
	let (parsed, _) = TxKernel::unserialize(&bytes, ProtocolVersion(2), false).unwrap();
	assert_eq!(parsed, kernel);

	// and the legacy layout in eight
	let bytes = kernel.serialize(ProtocolVersion(1)).unwrap();
	assert_eq!(bytes.len(), 1 + 8 + 8 + 33 + 64);
	let (parsed, _) = TxKernel::unserialize(&bytes, ProtocolVersion(1), false).unwrap();
	assert_eq!(parsed, kernel);
}

#[test]
fn nrd_relative_height_bounds() {
	use self::core::core::transaction::NRDRelativeHeight;

	assert!(TryInto::<NRDRelativeHeight>::try_into(0u64).is_err());
	assert!(TryInto::<NRDRelativeHeight>::try_into(10_081u64).is_err());
	assert!(TryInto::<NRDRelativeHeight>::try_into(10_080u64).is_ok());
	assert!(TryInto::<NRDRelativeHeight>::try_into(1u64).is_ok());
}

#[test]
fn genesis_kernel_round_trip() {
	let genesis = genesis::genesis_kernel();
	let bytes = genesis.serialize(ProtocolVersion(0)).unwrap();

	// as genesis the kernel is accepted on byte equality
	let (parsed, _) = TxKernel::unserialize(&bytes, ProtocolVersion(0), true).unwrap();
	assert_eq!(&parsed, genesis);

	// without the genesis flag its signature goes through normal
	// verification, which it deterministically fails
	assert_eq!(
		TxKernel::unserialize(&bytes, ProtocolVersion(0), false).unwrap_err(),
		Error::InvalidSignature
	);
}

#[test]
fn non_genesis_kernel_with_genesis_flag_rejected() {
	let kernel = build_kernel(KernelFeatures::Coinbase, 16);
	let bytes = kernel.serialize(ProtocolVersion(0)).unwrap();
	assert_eq!(
		TxKernel::unserialize(&bytes, ProtocolVersion(0), true).unwrap_err(),
		Error::GenesisMismatch("kernel")
	);
}

#[test]
fn output_wire_round_trip() {
	let output = build_output(OutputFeatures::Plain, 42, 20);
	for v in 0..=3u32 {
		let version = ProtocolVersion(v);
		let bytes = output.serialize(version).unwrap();
		// identical layout across all protocol versions
		assert_eq!(bytes.len(), 1 + 33);
		let (parsed, consumed) = Output::unserialize(&bytes, version, false).unwrap();
		assert_eq!(parsed, output);
		assert_eq!(consumed, bytes.len());
	}
}

#[test]
fn output_unknown_features_rejected() {
	let output = build_output(OutputFeatures::Coinbase, 42, 21);
	let mut bytes = output.serialize(ProtocolVersion(2)).unwrap();
	bytes[0] = 2;
	assert_eq!(
		Output::unserialize(&bytes, ProtocolVersion(2), false).unwrap_err(),
		Error::InvalidFeatures(2)
	);
}

#[test]
fn output_invalid_commitment_rejected() {
	// a commitment without one of the two canonical prefixes cannot parse
	let bogus = Commitment::from_vec(vec![2; 33]);
	assert_eq!(
		Output::new(OutputFeatures::Plain, bogus, false).unwrap_err(),
		Error::InvalidCommitment
	);

	// an all-zero x coordinate degenerates to the zero public key
	let mut zero_x = vec![0; 33];
	zero_x[0] = 8;
	assert_eq!(
		Output::new(OutputFeatures::Plain, Commitment::from_vec(zero_x), false).unwrap_err(),
		Error::InvalidPublicKey
	);
}

#[test]
fn genesis_output_round_trip() {
	let genesis = genesis::genesis_output();
	let bytes = genesis.serialize(ProtocolVersion(2)).unwrap();

	let (parsed, _) = Output::unserialize(&bytes, ProtocolVersion(2), true).unwrap();
	assert_eq!(&parsed, genesis);

	// any other output fails the genesis equality check
	let other = build_output(OutputFeatures::Coinbase, 1, 22);
	let bytes = other.serialize(ProtocolVersion(2)).unwrap();
	assert_eq!(
		Output::unserialize(&bytes, ProtocolVersion(2), true).unwrap_err(),
		Error::GenesisMismatch("output")
	);
}

#[test]
fn rangeproof_wire_round_trip() {
	let proof = common::build_rangeproof(3);
	let bytes = proof.serialize(ProtocolVersion(2)).unwrap();
	assert_eq!(bytes.len(), 8 + 675);

	let (parsed, consumed) = Rangeproof::unserialize(&bytes, ProtocolVersion(2), false).unwrap();
	assert_eq!(parsed, proof);
	assert_eq!(consumed, bytes.len());
}

#[test]
fn rangeproof_wrong_length_rejected() {
	let bytes = vec![3; 674];
	assert_eq!(
		Rangeproof::from_bytes(674, &bytes, false).unwrap_err(),
		Error::InvalidLength
	);

	// a wire blob declaring a wrong length is rejected before reading it
	let proof = common::build_rangeproof(3);
	let mut wire = proof.serialize(ProtocolVersion(2)).unwrap();
	wire[7] = 0xa2; // 675 -> 674
	assert_eq!(
		Rangeproof::unserialize(&wire, ProtocolVersion(2), false).unwrap_err(),
		Error::InvalidLength
	);
}
