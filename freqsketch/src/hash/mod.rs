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

//! Hash functions used to project items onto sketch buckets.

mod murmurhash;

pub use self::murmurhash::MurmurHash3X64128;

/// The seed used when none is configured, shared with the rest of the
/// sketch families so equally-configured sketches are mergeable.
pub const DEFAULT_UPDATE_SEED: u64 = 9001;

#[inline]
fn read_u64_le(bytes: &[u8]) -> u64 {
    use byteorder::ByteOrder;
    byteorder::LittleEndian::read_u64(bytes)
}
