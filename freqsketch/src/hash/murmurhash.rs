// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::hash::Hasher;

const C1: u64 = 0x87c37b91114253d5;
const C2: u64 = 0x4cf5ad432745937f;
const BLOCK_LEN: usize = 16;

/// Streaming MurmurHash3 (x64, 128-bit output).
///
/// Implements [`Hasher`] so any `T: Hash` can be fed through its own `Hash`
/// impl. The 128-bit digest is available through [`finish128`](Self::finish128);
/// [`Hasher::finish`] returns its low half.
#[derive(Debug, Clone)]
pub struct MurmurHash3X64128 {
    h1: u64,
    h2: u64,
    total_len: u64,
    buffer: [u8; BLOCK_LEN],
    buffer_len: usize,
}

impl MurmurHash3X64128 {
    pub fn with_seed(seed: u64) -> Self {
        MurmurHash3X64128 {
            h1: seed,
            h2: seed,
            total_len: 0,
            buffer: [0; BLOCK_LEN],
            buffer_len: 0,
        }
    }

    /// Returns both 64-bit halves of the digest of everything written so far.
    pub fn finish128(&self) -> (u64, u64) {
        let mut h1 = self.h1;
        let mut h2 = self.h2;

        let tail = &self.buffer[..self.buffer_len];
        if tail.len() > 8 {
            let mut k2 = 0u64;
            for (i, byte) in tail[8..].iter().enumerate() {
                k2 ^= (*byte as u64) << (i * 8);
            }
            h2 ^= mix_k2(k2);
        }
        if !tail.is_empty() {
            let mut k1 = 0u64;
            for (i, byte) in tail.iter().take(8).enumerate() {
                k1 ^= (*byte as u64) << (i * 8);
            }
            h1 ^= mix_k1(k1);
        }

        h1 ^= self.total_len;
        h2 ^= self.total_len;

        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);

        h1 = fmix64(h1);
        h2 = fmix64(h2);

        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);

        (h1, h2)
    }

    #[inline]
    fn update(&mut self, block: &[u8]) {
        let k1 = super::read_u64_le(&block[0..8]);
        let k2 = super::read_u64_le(&block[8..16]);

        self.h1 ^= mix_k1(k1);
        self.h1 = self
            .h1
            .rotate_left(27)
            .wrapping_add(self.h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dce729);

        self.h2 ^= mix_k2(k2);
        self.h2 = self
            .h2
            .rotate_left(31)
            .wrapping_add(self.h1)
            .wrapping_mul(5)
            .wrapping_add(0x38495ab5);
    }
}

impl Hasher for MurmurHash3X64128 {
    fn finish(&self) -> u64 {
        self.finish128().0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.total_len = self.total_len.wrapping_add(bytes.len() as u64);

        if self.buffer_len + bytes.len() < BLOCK_LEN {
            self.buffer[self.buffer_len..self.buffer_len + bytes.len()].copy_from_slice(bytes);
            self.buffer_len += bytes.len();
            return;
        }

        let mut bytes = bytes;

        if self.buffer_len != 0 {
            let needed = BLOCK_LEN - self.buffer_len;
            self.buffer[self.buffer_len..].copy_from_slice(&bytes[..needed]);
            let block = self.buffer;
            self.update(&block);
            self.buffer_len = 0;
            bytes = &bytes[needed..];
        }

        let mut blocks = bytes.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            self.update(block);
        }

        let remainder = blocks.remainder();
        if !remainder.is_empty() {
            self.buffer[..remainder.len()].copy_from_slice(remainder);
            self.buffer_len = remainder.len();
        }
    }
}

#[inline]
fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}

#[inline]
fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^ (k >> 33)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn murmur(bytes: &[u8], seed: u64) -> (u64, u64) {
        let mut hasher = MurmurHash3X64128::with_seed(seed);
        hasher.write(bytes);
        hasher.finish128()
    }

    #[test]
    fn test_known_vectors() {
        // remainder < 8
        let key = "The quick brown fox jumps over the lazy dogdogdog";
        assert_eq!(murmur(key.as_bytes(), 0), (0x9c8205300e612fc4, 0xcbc0af6136aa3df9));

        // remainder = 8
        let key = "The quick brown fox jumps over the lazy1";
        assert_eq!(murmur(key.as_bytes(), 0), (0xe3301a827e5cdfe3, 0xbdbf05f8da0f0392));

        // remainder = 0
        let key = "The quick brown fox jumps over t";
        assert_eq!(murmur(key.as_bytes(), 0), (0xdf6af91bb29bdacf, 0x91a341c58df1f3a6));

        // a ones byte and a zeros byte
        let key = [
            0x54, 0x68, 0x65, 0x20, 0x71, 0x75, 0x69, 0x63, 0x6b, 0x20, 0x62, 0x72, 0x6f, 0x77,
            0x6e, 0x20, 0x66, 0x6f, 0x78, 0x20, 0x6a, 0x75, 0x6d, 0x70, 0x73, 0x20, 0x6f, 0x76,
            0x65, 0x72, 0x20, 0x74, 0x68, 0x65, 0x20, 0x6c, 0x61, 0x7a, 0x79, 0x20, 0x64, 0x6f,
            0x67, 0xff, 0x64, 0x6f, 0x67, 0x00,
        ];
        assert_eq!(murmur(&key, 0), (0xe88abda785929c9e, 0x96b98587cacc83d6));
    }

    #[test]
    fn test_matches_reference_for_all_tail_lengths() {
        let data: Vec<u8> = (0u8..=80).map(|b| b.wrapping_mul(37).wrapping_add(11)).collect();
        for len in 0..data.len() {
            for seed in [0, 1, 9001, 4_000_000_000] {
                let expected = mur3::murmurhash3_x64_128(&data[..len], seed);
                assert_eq!(murmur(&data[..len], seed as u64), expected, "len={len} seed={seed}");
            }
        }
    }

    #[test]
    fn test_chunked_writes_match_single_write() {
        let data: Vec<u8> = (0u8..100).collect();
        let expected = murmur(&data, 42);
        for chunk_len in [1, 3, 7, 15, 16, 17, 33] {
            let mut hasher = MurmurHash3X64128::with_seed(42);
            for chunk in data.chunks(chunk_len) {
                hasher.write(chunk);
            }
            assert_eq!(hasher.finish128(), expected, "chunk_len={chunk_len}");
        }
    }

    #[test]
    fn test_finish_is_low_half() {
        let mut hasher = MurmurHash3X64128::with_seed(7);
        hasher.write(b"apple");
        assert_eq!(hasher.finish(), hasher.finish128().0);
    }
}
