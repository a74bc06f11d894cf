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

//! Values that should be shared across all modules, without necessarily
//! having to pass them all over the place. The network this build validates
//! is fixed at compile time through the `floonet` cargo feature, so these
//! are queries, not mutable state.

use std::fmt;

/// Types of chain a node can operate on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ChainTypes {
	/// Testing network
	Floonet,
	/// Main production network
	Mainnet,
}

impl fmt::Display for ChainTypes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ChainTypes::Floonet => write!(f, "floonet"),
			ChainTypes::Mainnet => write!(f, "mainnet"),
		}
	}
}

/// The network this build was compiled for.
pub fn chain_type() -> ChainTypes {
	if cfg!(feature = "floonet") {
		ChainTypes::Floonet
	} else {
		ChainTypes::Mainnet
	}
}

/// Are we on the test network?
pub fn is_floonet() -> bool {
	chain_type() == ChainTypes::Floonet
}

/// NoRecentDuplicate kernels are only live on the test network.
pub fn is_nrd_enabled() -> bool {
	is_floonet()
}
