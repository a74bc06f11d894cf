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

//! Core types

pub mod blind;
pub mod block;
pub mod committed;
pub mod hash;
pub mod sum_mmr;
pub mod transaction;

pub use self::blind::BlindingFactor;
pub use self::block::*;
pub use self::committed::verify_kernel_sums;
pub use self::sum_mmr::{AddReason, SubReason, SumMMR, Summable};
pub use self::transaction::*;
