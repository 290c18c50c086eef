//! Body obfuscation as specified in [RFC8907 section 4.5].
//!
//! The pseudo-pad is built by chaining MD5 hashes of the session id, shared secret,
//! version and sequence number (plus the previous hash, after the first one). XORing
//! a body with the pad both obfuscates and deobfuscates it.
//!
//! [RFC8907 section 4.5]: https://www.rfc-editor.org/rfc/rfc8907.html#name-data-obfuscation

use core::iter::zip;

use md5::{Digest, Md5};

use super::HeaderInfo;

#[cfg(test)]
mod tests;

/// MD5 hash output size, in bytes.
const MD5_OUTPUT_SIZE: usize = 16;

fn xor_slices(output: &mut [u8], pseudo_pad: &[u8]) {
    for (out, pad) in zip(output, pseudo_pad) {
        *out ^= pad;
    }
}

/// Generates `length` bytes of pseudo-pad for the given session parameters.
pub fn pseudo_pad(
    session_id: u32,
    secret: &[u8],
    version: u8,
    sequence_number: u8,
    length: usize,
) -> Vec<u8> {
    // prehash common prefix for all hash invocations
    // prefix: session id -> key -> version -> sequence number
    let mut prefix_hasher = Md5::new();
    prefix_hasher.update(session_id.to_be_bytes());
    prefix_hasher.update(secret);
    prefix_hasher.update([version, sequence_number]);

    let chunk_count = length.div_ceil(MD5_OUTPUT_SIZE);
    let mut pad = Vec::with_capacity(chunk_count * MD5_OUTPUT_SIZE);

    for _ in 0..chunk_count {
        let mut hasher = prefix_hasher.clone();

        // every chunk after the first also hashes the one before it
        if let Some(previous) = pad.len().checked_sub(MD5_OUTPUT_SIZE) {
            hasher.update(&pad[previous..]);
        }

        pad.extend_from_slice(&hasher.finalize());
    }

    pad.truncate(length);
    pad
}

/// Obfuscates (or deobfuscates) a packet body.
///
/// Applying this twice with the same parameters returns the original body.
pub fn transform(
    body: &[u8],
    session_id: u32,
    secret: &[u8],
    version: u8,
    sequence_number: u8,
) -> Vec<u8> {
    let mut output = body.to_vec();
    let pad = pseudo_pad(session_id, secret, version, sequence_number, output.len());
    xor_slices(&mut output, &pad);
    output
}

/// Obfuscates a body in place, keyed by the relevant fields of its packet header.
pub(super) fn obfuscate_in_place(body: &mut [u8], header: &HeaderInfo, secret: &[u8]) {
    let pad = pseudo_pad(
        header.session_id,
        secret,
        header.version.into(),
        header.sequence_number,
        body.len(),
    );
    xor_slices(body, &pad);
}
