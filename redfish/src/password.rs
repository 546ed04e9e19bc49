// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Password generation for account credential rotation (§6, §9).
//!
//! Generation always goes through [`rand`]'s OS-backed RNG; generated
//! passwords are never logged (§9).

use crate::vendor::Manufacturer;
use rand::distributions::Distribution;
use rand::distributions::Slice;
use rand::Rng;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
/// ASCII printable minus characters Dell's iDRAC web console is known to
/// mishandle in Basic-auth headers (`"`, `'`, `\`, and whitespace).
const DELL_SYMBOLS: &[u8] = b"!#$%&()*+,-./:;<=>?@[]^_{|}~";

const DEFAULT_LENGTH: usize = 16;

/// Generates a password satisfying the character-class rules documented
/// for `manufacturer`, no longer than `max_length` (the BMC's published
/// `MaxPasswordLength`).
#[must_use]
pub fn generate(manufacturer: Manufacturer, max_length: u32) -> String {
    let mut rng = rand::thread_rng();
    let capped = DEFAULT_LENGTH.min(max_length as usize);

    match manufacturer {
        Manufacturer::Dell => generate_from_alphabet(&mut rng, capped, &[LOWER, UPPER, DIGITS, DELL_SYMBOLS]),
        // HPE alone requires a floor of 8 regardless of the BMC's
        // advertised cap (spec.md: "HPE: length >= 8"); every other
        // vendor clamps strictly to max_length.
        Manufacturer::Hpe => generate_from_alphabet(&mut rng, capped.max(8), &[LOWER, UPPER, DIGITS]),
        Manufacturer::Lenovo | Manufacturer::Supermicro | Manufacturer::Generic => {
            generate_from_alphabet(&mut rng, capped, &[LOWER, UPPER, DIGITS])
        }
    }
}

/// Builds a password of `length` characters guaranteeing at least one
/// character from every class in `classes`, then fills the remainder from
/// the pooled alphabet, and shuffles.
fn generate_from_alphabet(rng: &mut impl Rng, length: usize, classes: &[&[u8]]) -> String {
    let pool: Vec<u8> = classes.iter().flat_map(|class| class.iter().copied()).collect();
    let pool_dist = Slice::new(&pool).expect("pool is non-empty");

    let mut chars: Vec<u8> = classes
        .iter()
        .map(|class| {
            let dist = Slice::new(class).expect("class is non-empty");
            *dist.sample(rng)
        })
        .collect();

    while chars.len() < length {
        chars.push(*pool_dist.sample(rng));
    }
    chars.truncate(length.max(chars.len().min(length)));

    // Fisher-Yates shuffle so required classes aren't always the leading chars.
    for i in (1..chars.len()).rev() {
        let j = rng.gen_range(0..=i);
        chars.swap(i, j);
    }

    String::from_utf8(chars).expect("alphabet is ASCII")
}
