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

//! Common test helpers: building kernels and outputs out of real
//! commitments and signatures.

#![allow(dead_code)]

use mumble_core as core;
use mumble_util as util;

use self::core::core::transaction::{
	KernelFeatures, Output, OutputFeatures, Rangeproof, TxKernel,
};
use util::secp::aggsig;
use util::secp::key::SecretKey;
use util::secp::pedersen::Commitment;
use util::secp::Signature;
use util::static_secp_instance;

/// Deterministic secret key from a single byte seed.
pub fn secret_key(seed: u8) -> SecretKey {
	let secp = static_secp_instance();
	let secp = secp.lock();
	SecretKey::from_slice(&secp, &[seed; 32]).unwrap()
}

/// Commitment to the given value under a deterministic blinding factor.
pub fn commit(value: u64, seed: u8) -> Commitment {
	let secp = static_secp_instance();
	let secp = secp.lock();
	let skey = SecretKey::from_slice(&secp, &[seed; 32]).unwrap();
	secp.commit(value, skey).unwrap()
}

/// A correctly signed kernel with the given features, blinded by the
/// deterministic key for `seed`.
pub fn build_kernel(features: KernelFeatures, seed: u8) -> TxKernel {
	let (excess, sig) = {
		let secp = static_secp_instance();
		let secp = secp.lock();
		let skey = SecretKey::from_slice(&secp, &[seed; 32]).unwrap();
		let excess = secp.commit(0, skey.clone()).unwrap();
		let pubkey = excess.to_pubkey(&secp).unwrap();
		let msg = features.kernel_sig_msg().unwrap();
		let sig = aggsig::sign_single(
			&secp,
			&msg,
			&skey,
			None,
			None,
			None,
			Some(&pubkey),
			None,
		)
		.unwrap();
		(excess, sig)
	};
	TxKernel::new(features, excess, sig, false).unwrap()
}

/// Signature for the given features under the key for `seed`, without
/// building the kernel.
pub fn sign_features(features: &KernelFeatures, seed: u8) -> (Commitment, Signature) {
	let secp = static_secp_instance();
	let secp = secp.lock();
	let skey = SecretKey::from_slice(&secp, &[seed; 32]).unwrap();
	let excess = secp.commit(0, skey.clone()).unwrap();
	let pubkey = excess.to_pubkey(&secp).unwrap();
	let msg = features.kernel_sig_msg().unwrap();
	let sig = aggsig::sign_single(
		&secp,
		&msg,
		&skey,
		None,
		None,
		None,
		Some(&pubkey),
		None,
	)
	.unwrap();
	(excess, sig)
}

/// A valid output committing to `value` under the key for `seed`.
pub fn build_output(features: OutputFeatures, value: u64, seed: u8) -> Output {
	let commitment = commit(value, seed);
	Output::new(features, commitment, false).unwrap()
}

/// A structurally valid rangeproof filled with the seed byte. Length checks
/// only; bulletproof verification needs a proof built by a prover.
pub fn build_rangeproof(seed: u8) -> Rangeproof {
	let bytes = vec![seed; Rangeproof::LEN];
	Rangeproof::from_bytes(Rangeproof::LEN as u64, &bytes, false).unwrap()
}
