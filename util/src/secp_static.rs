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

//! Globally accessible static instance of secp256k1, to avoid
//! initialisation overhead

use crate::secp;
use std::sync::Arc;

use crate::Mutex;

lazy_static! {
	/// Static reference to secp instance
	pub static ref SECP256K1: Arc<Mutex<secp::Secp256k1>> = Arc::new(Mutex::new(
		secp::Secp256k1::with_caps(secp::ContextFlag::Commit)
	));
}

/// Returns the static instance to be used across the crates
pub fn static_secp_instance() -> Arc<Mutex<secp::Secp256k1>> {
	SECP256K1.clone()
}

/// Convenient way to generate a commitment to zero.
/// The all-zero byte pattern doubles as the accumulator identity, so it must
/// only ever be built here.
pub fn commit_to_zero_value() -> secp::pedersen::Commitment {
	secp::pedersen::Commitment::from_vec(vec![0])
}
