// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shodan-compatible favicon hashing: MIME-style base64 fed to MurmurHash3.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use url::Url;

const BASE64_LINE_WIDTH: usize = 76;

/// Favicon hash as Shodan's `http.favicon.hash` reports it
pub fn favicon_hash(data: &[u8]) -> i32 {
    murmur3_32(&shodan_base64(data), 0) as i32
}

/// Standard base64 with a newline after every 76 characters and a trailing newline
pub fn shodan_base64(data: &[u8]) -> Vec<u8> {
    let encoded = BASE64.encode(data);
    let mut out = Vec::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_WIDTH + 1);

    for (i, ch) in encoded.bytes().enumerate() {
        out.push(ch);
        if (i + 1) % BASE64_LINE_WIDTH == 0 {
            out.push(b'\n');
        }
    }
    out.push(b'\n');
    out
}

/// `scheme://host[:port]/favicon.ico` for any URL
pub fn favicon_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;

    Some(match url.port() {
        Some(port) => format!("{}://{}:{}/favicon.ico", url.scheme(), host, port),
        None => format!("{}://{}/favicon.ico", url.scheme(), host),
    })
}

/// MurmurHash3 x86 32-bit
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e2d51;
    const C2: u32 = 0x1b873593;
    const R1: u32 = 15;
    const R2: u32 = 13;
    const M: u32 = 5;
    const N: u32 = 0xe6546b64;

    let mut h1 = seed;
    let mut blocks = data.chunks_exact(4);

    for block in &mut blocks {
        let k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]])
            .wrapping_mul(C1)
            .rotate_left(R1)
            .wrapping_mul(C2);

        h1 ^= k1;
        h1 = h1.rotate_left(R2).wrapping_mul(M).wrapping_add(N);
    }

    let tail = blocks.remainder();
    let mut k1: u32 = 0;
    if tail.len() >= 3 {
        k1 ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        k1 ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        k1 ^= tail[0] as u32;
        h1 ^= k1.wrapping_mul(C1).rotate_left(R1).wrapping_mul(C2);
    }

    h1 ^= data.len() as u32;
    h1 ^= h1 >> 16;
    h1 = h1.wrapping_mul(0x85ebca6b);
    h1 ^= h1 >> 13;
    h1 = h1.wrapping_mul(0xc2b2ae35);
    h1 ^= h1 >> 16;

    h1
}
