// src/encoding.rs
//! Binary wire format for minimized server lists.
//!
//! Bandwidth constrained clients request this instead of JSON. The
//! payload layout:
//!
//! ```text
//! byte 0      record count (u8)
//! bytes 1-2   reserved, always zero
//! bytes 3..   one 32 byte block per record, in input order:
//!               0..28   server URL bytes, NUL padded, truncated at 28
//!               28      current players, clamped to 0..=255
//!               29      max players, clamped to 0..=255
//!               30      status flag, 1 = online, 0 = anything else
//!               31      reserved, zero
//! ```
//!
//! Total length is `3 + 32 * count`. Byte 0 always matches the number
//! of blocks present, so a decoder needs nothing beyond this table.

use crate::models::server::GameServerMin;
use log::warn;

/// The count field is a single byte; longer inputs are capped, never
/// wrapped.
pub const MAX_RECORDS: usize = 255;
pub const HEADER_LEN: usize = 3;
pub const URL_FIELD_LEN: usize = 28;
pub const RECORD_LEN: usize = 32;

/// Serializes an ordered minimized list into the layout above. Pure and
/// infallible: the same input always yields the same bytes.
pub fn encode_server_list(servers: &[GameServerMin]) -> Vec<u8> {
    let count = servers.len().min(MAX_RECORDS);
    if servers.len() > MAX_RECORDS {
        warn!(
            "binary listing capped at {} records, dropping {}",
            MAX_RECORDS,
            servers.len() - MAX_RECORDS
        );
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + count * RECORD_LEN);
    buf.push(count as u8);

    // Reserved for future use
    buf.push(0);
    buf.push(0);

    for server in &servers[..count] {
        let url = server.serverurl.as_bytes();
        let url_len = url.len().min(URL_FIELD_LEN);
        buf.extend_from_slice(&url[..url_len]);
        buf.resize(buf.len() + (URL_FIELD_LEN - url_len), 0);

        buf.push(clamp_u8(server.curplayers));
        buf.push(clamp_u8(server.maxplayers));
        buf.push(server.online as u8);
        buf.push(0);
    }

    buf
}

fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min(url: &str, cur: i32, max: i32, online: bool) -> GameServerMin {
        GameServerMin {
            serverurl: url.to_string(),
            curplayers: cur,
            maxplayers: max,
            online,
        }
    }

    #[test]
    fn empty_list_is_just_the_header() {
        assert_eq!(encode_server_list(&[]), vec![0, 0, 0]);
    }

    #[test]
    fn header_carries_count_and_zeroed_reserved_bytes() {
        let servers = vec![
            min("tcp://one.example:6502", 3, 8, true),
            min("tcp://two.example:6502", 0, 16, true),
        ];

        let buf = encode_server_list(&servers);
        assert_eq!(buf[0], 2);
        assert_eq!(buf[1], 0);
        assert_eq!(buf[2], 0);
        assert_eq!(buf.len(), HEADER_LEN + 2 * RECORD_LEN);
    }

    #[test]
    fn record_blocks_follow_the_documented_layout() {
        let servers = vec![min("tcp://one.example:6502", 3, 8, true)];
        let buf = encode_server_list(&servers);
        let block = &buf[HEADER_LEN..];

        let url = b"tcp://one.example:6502";
        assert_eq!(&block[..url.len()], url);
        // the URL field is NUL padded out to its fixed width
        assert!(block[url.len()..URL_FIELD_LEN].iter().all(|&b| b == 0));
        assert_eq!(block[28], 3);
        assert_eq!(block[29], 8);
        assert_eq!(block[30], 1);
        assert_eq!(block[31], 0);
    }

    #[test]
    fn offline_records_carry_a_zero_status_flag() {
        let buf = encode_server_list(&[min("tcp://one.example:6502", 0, 8, false)]);
        assert_eq!(buf[HEADER_LEN + 30], 0);
    }

    #[test]
    fn encoding_is_deterministic() {
        let servers = vec![
            min("tcp://one.example:6502", 3, 8, true),
            min("tcp://two.example:6502", 0, 16, false),
        ];

        assert_eq!(encode_server_list(&servers), encode_server_list(&servers));
    }

    #[test]
    fn records_keep_their_input_order() {
        let servers = vec![
            min("zzz://last.example:1", 1, 2, true),
            min("aaa://first.example:1", 3, 4, true),
        ];

        let buf = encode_server_list(&servers);
        assert_eq!(&buf[HEADER_LEN..HEADER_LEN + 3], b"zzz");
        assert_eq!(
            &buf[HEADER_LEN + RECORD_LEN..HEADER_LEN + RECORD_LEN + 3],
            b"aaa"
        );
    }

    #[test]
    fn long_urls_are_truncated_to_the_field_width() {
        let long = "tcp://a-very-long-hostname.example.org:65020";
        let buf = encode_server_list(&[min(long, 1, 2, true)]);

        assert_eq!(
            &buf[HEADER_LEN..HEADER_LEN + URL_FIELD_LEN],
            &long.as_bytes()[..URL_FIELD_LEN]
        );
        assert_eq!(buf[HEADER_LEN + 28], 1);
    }

    #[test]
    fn player_counts_clamp_to_a_single_byte() {
        let buf = encode_server_list(&[min("tcp://big.example:1", 4_000, -3, true)]);
        assert_eq!(buf[HEADER_LEN + 28], 255);
        assert_eq!(buf[HEADER_LEN + 29], 0);
    }

    #[test]
    fn oversized_lists_are_capped_not_wrapped() {
        let servers: Vec<GameServerMin> = (0..300)
            .map(|i| min(&format!("tcp://host{}.example:1", i), 1, 2, true))
            .collect();

        let buf = encode_server_list(&servers);
        assert_eq!(buf[0], 255);
        assert_eq!(buf.len(), HEADER_LEN + MAX_RECORDS * RECORD_LEN);
    }
}
