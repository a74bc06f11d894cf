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

//! Definition of the genesis block state for the network this build
//! validates. The genesis kernel signature predates the signing rules and
//! is exempt from aggsig verification; constructors given the genesis flag
//! instead require bytewise equality with these constants.

use chrono::prelude::{TimeZone, Utc};

use crate::core::blind::BlindingFactor;
use crate::core::block::{BlockHeader, HeaderVersion};
use crate::core::hash::{Hash, ZERO_HASH};
use crate::core::transaction::{KernelFeatures, Output, OutputFeatures, Rangeproof, TxKernel};
use crate::pow::{Difficulty, Proof, ProofOfWork};
use util::from_hex;
use util::secp::constants::AGG_SIGNATURE_SIZE;
use util::secp::pedersen::Commitment;
use util::secp::Signature;

#[cfg(not(feature = "floonet"))]
mod net {
	/// Genesis kernel excess
	pub const KERNEL_EXCESS: &str =
		"0879be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
	/// Genesis kernel signature
	pub const KERNEL_SIG: &str =
		"ec5f837079f2d490a73f7550fbd4e8406415f3e35f4920553af47d9179c79dac\
		 9d8261d21531659258076562b108e9dd7f929791b23a004fa18f9795f95f3bf7";
	/// Genesis output commitment
	pub const OUTPUT_COMMIT: &str =
		"08c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";
	/// Genesis header previous header root
	pub const PREV_ROOT: &str =
		"dd10f74f74e15f5fef5de5e9af40e2334b55c8bbdbd4b022e5a86b586356cd91";
	/// Genesis header output root
	pub const OUTPUT_ROOT: &str =
		"6dd0fd14a2836e0e45a8ddf65ced89e759297aace91766c139228a1563dc842e";
	/// Genesis header rangeproof root
	pub const RANGE_PROOF_ROOT: &str =
		"9e4338d05017d1c2465d34ae7bcec6c7266fa0d18e09a939f698c3019dac7bdc";
	/// Genesis header kernel root
	pub const KERNEL_ROOT: &str =
		"7541c619046712226c45624a804fa88cd5639fe3f83da35201d0a727580e274f";
	/// Genesis timestamp, seconds since epoch
	pub const TIMESTAMP: (i32, u32, u32, u32, u32, u32) = (2019, 11, 11, 16, 51, 45);
	/// Genesis header nonce
	pub const NONCE: u64 = 41;
	/// Genesis Cuckoo-cycle solution
	pub const PROOF_NONCES: [u64; 42] = [
		33_750_218, 46_767_589, 53_413_293, 56_149_256, 67_253_690, 76_723_401, 114_213_827,
		116_790_619, 126_363_839, 165_985_915, 168_416_250, 172_439_049, 197_068_869,
		199_811_882, 218_402_102, 228_327_857, 257_280_392, 260_119_318, 263_200_772,
		267_742_787, 290_797_882, 305_480_942, 312_023_548, 313_654_256, 316_427_025,
		340_534_997, 344_109_097, 347_441_376, 363_344_991, 399_089_527, 400_979_833,
		422_944_179, 430_011_702, 436_816_000, 444_371_722, 450_014_381, 469_258_096,
		474_387_974, 492_506_452, 500_922_557, 519_766_347, 533_767_819,
	];
	/// Genesis rangeproof
	pub const RANGEPROOF: &str =
		"dcd9f8a9f0a4a040ad88e9d15ecdc5415d6bcdbaaffabc476eae144bc7ce2dd1aa84b4885f53ea34e1b8902bee593044\
		 8d2e21edce2c86bc845b4670305148fbddad89886ea275dd6dbc5c99e7b7b31edbfb01d14d086c81835171ce1f2ece5a\
		 d3d344b89e3e8985086c2ce3bff57bee41febedff3b3df3c5363d16c82c11eb72c8a319f515f781b50b2b175b3e160fb\
		 15563863cc0d990babeb458341fc6bb3aeca1f3e646e1b48275ff158b3419092a23c984f9461d4597f145bf7dba897f4\
		 1ec1409bea59ffb35ad6b64e4437a368d8a45fc572617725539ddfc6a146808a086bc6b390ae35c92f8e1ba8d3bfb786\
		 cd4bfadc85b5959473e379f94eee4cf88d4d381fc875e19986f99b10979513cf2ba0578981897bf8c0abd5d9e0099c8d\
		 aba0a6cca13bb0a3ac8b8cdbb9d73e3279f7356368ac087e16d71af9b8941352ce852021e24b22f171162d8464fe1360\
		 34fbfa4d3d554dd678807c7d0008e00a03ec338b34225e0ff865159c6635b4a9ea254cb79bc588fd9c13a063db11d4b6\
		 ad4c3e75c7091befdeb743b484bb294539c02232bdd405d372ddc02f576c05747ac7b445b40e0694a7bde6f7351d9c4b\
		 6e6b5028608d45e0341f88e5b72b038936b9ff4a232498a5e8503a5e85cfdbd066b7fa27e0942b96032e36ff3bdf43e5\
		 b74f4989a35f85ddadf2b7c96c1ef36a423759349844f2ed8be21adc3d8af04e7fdefafd8ebfae38492acbd55d1ea7ce\
		 839c1bf01c1eb7037d86424994f4579c570384dca0c9e4e319b7a617e0c5cb8c4c75efef5b48c0e00487e666f5972178\
		 11a59f0737583e8fd0c20ae04a4d84073886949367daad4e120d168cfb13819720dcf1e44970fc939f394023d8428824\
		 dc3a8f1ff42f3aafb7267003bccb94ef22467e1d5d688b49e9fdb6ece4a0d46d4b5a953ad29b90d694bfe1b91653a112\
		 b84a52";
}

#[cfg(feature = "floonet")]
mod net {
	/// Genesis kernel excess
	pub const KERNEL_EXCESS: &str =
		"0979be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
	/// Genesis kernel signature
	pub const KERNEL_SIG: &str =
		"5a857efd85db3767876dc60facfd30e86ad14400242aa9aa543840ae0d059b71\
		 2549b5bd5f2edf501194cd8b4ba0f852a4f021418220ee9da5ca63aa837e9803";
	/// Genesis output commitment
	pub const OUTPUT_COMMIT: &str =
		"09c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";
	/// Genesis header previous header root
	pub const PREV_ROOT: &str =
		"9800a680951b74013bd989dbd0f13afbc5b2947f1964eb746f1051f840431c4f";
	/// Genesis header output root
	pub const OUTPUT_ROOT: &str =
		"365aff47317bf959959908050a3ffbce2ded36164d49275d7b544b55fddda7ed";
	/// Genesis header rangeproof root
	pub const RANGE_PROOF_ROOT: &str =
		"47b4f8441187ce464b62395e10da941a73abc5adf301d6f9bc52838944b564f9";
	/// Genesis header kernel root
	pub const KERNEL_ROOT: &str =
		"a9ffe840bdcea17b10833c180df6336242cafa8d5499fb912072cc7c2d711d9f";
	/// Genesis timestamp, seconds since epoch
	pub const TIMESTAMP: (i32, u32, u32, u32, u32, u32) = (2019, 10, 1, 12, 0, 0);
	/// Genesis header nonce
	pub const NONCE: u64 = 23;
	/// Genesis Cuckoo-cycle solution
	pub const PROOF_NONCES: [u64; 42] = [
		2_961_302, 23_741_060, 39_791_629, 78_469_110, 92_203_439, 111_146_237, 135_553_861,
		146_905_653, 180_166_598, 188_244_894, 194_131_070, 199_521_146, 202_723_369,
		224_064_924, 244_099_056, 258_547_091, 260_804_343, 272_867_788, 275_413_073,
		304_674_444, 304_855_943, 318_522_025, 318_614_346, 327_587_738, 328_040_646,
		336_228_824, 339_315_249, 362_819_943, 364_115_840, 384_256_217, 389_716_095,
		389_788_029, 407_393_499, 420_471_266, 442_504_279, 460_349_792, 465_111_916,
		465_914_442, 470_380_965, 491_365_096, 495_445_132, 527_896_857,
	];
	/// Genesis rangeproof
	pub const RANGEPROOF: &str =
		"c38e995bb3b8a47a970172b2ca29e694657339d48f607a62cb65b0d3ae2a85bc4ee5b557a7cdaf24ab406d2ee55a4609\
		 f096618e39944ee203dc7dcec4719bc1b24504ed29cb03a4e4263fdaf71d1f0328577e4b7d1da96d0c51b4cab4754100\
		 8ab8e314ad22943998b3e02bfc68a6f44facd620dc70665dadf12136bf2fc355d2634bc063b29e3685070cff40807bfc\
		 32712abdcdfa13367d2ad62d62e88615ba5bebb2012ee407b5af56338d98be52816b377aef6cd04c9a99af8fb4e26a79\
		 bb55cdde96394fb3f148f12096a35ae80444394ea043655d383158b1021afb0934f645778eadf76a7e0c4c130835dad2\
		 7ddd49dad077562d0810157693f77a82d4e2ab12340816f38bc4c616a7a896d551a616e027abc05c1e19cf3b0cb3ffc2\
		 8285e5bbc3a867c42570c3732cee95392f4b4dbe61a2c9adf4105b981865cb1d09412091e1b23e5d5d4099029e06685c\
		 df40903660b2f83de48fff77966b6137807453e18eac880afef8e87f01710e22f262864024c0bff7df45a06beed13850\
		 898b892b2df2b65a1633186d74ff9bb74975433816f630cd4d25effb1452ce411c6667c3e3b6d71738ab985e63e3a2c4\
		 ad6b95b4117173fee2a85e24e81cb80b078fc8a51e24435dd8bc9321aecaffdbf66ddb6ae29da57e37ea94ebbb8e709d\
		 622f90a8bd57abc743e17e6dd6d56f00c8d1a1453681b6956232172caf9349c1f3d7b6681a3051d5d4d61013bdf76799\
		 52049c9eadd081c7fee89ef37570ea3cf52e300ab4a4f8006a3c6b1b8a4c4e8e23ac9e3e7a4e31b5d5aca5fb2949b226\
		 9e5bd01e4e609b51efc9681ecc8d1764b5cd6659875d4990e0e355f56e99d7201ea96ad099e1ff4afdf0420e278094c1\
		 017e5cc0ee810361d000fdb41429f2c90f22fb18fc87924d55197cfc4dd4ef28f77e9f8108a5b99ca1511e862d7bed98\
		 a2c853";
}

fn hex_bytes(hex: &str) -> Vec<u8> {
	let compact: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
	from_hex(compact).expect("invalid genesis hex")
}

lazy_static! {
	static ref GENESIS_HEADER: BlockHeader = {
		let (year, month, day, hour, min, sec) = net::TIMESTAMP;
		BlockHeader {
			version: HeaderVersion(1),
			height: 0,
			timestamp: Utc
				.with_ymd_and_hms(year, month, day, hour, min, sec)
				.unwrap(),
			prev_hash: ZERO_HASH,
			prev_root: Hash::from_hex(net::PREV_ROOT).unwrap(),
			output_root: Hash::from_hex(net::OUTPUT_ROOT).unwrap(),
			range_proof_root: Hash::from_hex(net::RANGE_PROOF_ROOT).unwrap(),
			kernel_root: Hash::from_hex(net::KERNEL_ROOT).unwrap(),
			total_kernel_offset: BlindingFactor::zero(),
			output_mmr_size: 1,
			kernel_mmr_size: 1,
			pow: ProofOfWork {
				total_difficulty: Difficulty::from_num(0x20000),
				secondary_scaling: 1856,
				nonce: net::NONCE,
				proof: Proof::new(net::PROOF_NONCES.to_vec(), 29),
			},
		}
	};
	static ref GENESIS_KERNEL: TxKernel = {
		let sig_bytes = hex_bytes(net::KERNEL_SIG);
		let mut sig = [0; AGG_SIGNATURE_SIZE];
		sig.copy_from_slice(&sig_bytes);
		TxKernel::from_parts(
			KernelFeatures::Coinbase,
			Commitment::from_vec(hex_bytes(net::KERNEL_EXCESS)),
			Signature::from_raw_data(&sig).unwrap(),
		)
	};
	static ref GENESIS_OUTPUT: Output = Output::from_parts(
		OutputFeatures::Coinbase,
		Commitment::from_vec(hex_bytes(net::OUTPUT_COMMIT)),
	);
	static ref GENESIS_RANGEPROOF: Rangeproof = {
		let bytes = hex_bytes(net::RANGEPROOF);
		Rangeproof::from_bytes(bytes.len() as u64, &bytes, false).unwrap()
	};
}

/// The genesis block header for this network.
pub fn genesis_header() -> &'static BlockHeader {
	&GENESIS_HEADER
}

/// The genesis block kernel for this network.
pub fn genesis_kernel() -> &'static TxKernel {
	&GENESIS_KERNEL
}

/// The genesis block output for this network.
pub fn genesis_output() -> &'static Output {
	&GENESIS_OUTPUT
}

/// The genesis block rangeproof for this network.
pub fn genesis_rangeproof() -> &'static Rangeproof {
	&GENESIS_RANGEPROOF
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::core::hash::Hashed;

	// ensure the genesis constants parse and hash deterministically
	#[test]
	fn genesis_state_is_consistent() {
		let header = genesis_header();
		assert_eq!(header.height, 0);
		assert_eq!(header.output_mmr_size, 1);
		assert_eq!(header.kernel_mmr_size, 1);
		assert_eq!(header.hash(), header.hash());

		assert!(genesis_kernel().is_coinbase());
		assert_eq!(genesis_kernel().fee(), 0);
		assert!(genesis_output().is_coinbase());
		assert_eq!(genesis_rangeproof().len(), Rangeproof::LEN as u64);
	}
}
