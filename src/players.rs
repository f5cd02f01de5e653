use crate::cursor::PacketCursor;
use crate::error::SourceQueryError;

/// One roster row from an A2S_PLAYER reply. The wire also carries an index,
/// a score and a connection duration per player; none of those are part of
/// the output contract, so they are consumed and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEntry {
    pub name: String,
}

/// Parse the body of an A2S_PLAYER reply (everything after the `'D'` type
/// code), preserving wire order.
pub fn parse_players(body: &[u8]) -> Result<Vec<PlayerEntry>, SourceQueryError> {
    let mut cursor = PacketCursor::new(body);

    let count = cursor.read_u8()?;
    let mut players = Vec::with_capacity(count as usize);
    for _ in 0..count {
        cursor.read_u8()?; // index
        let name = cursor.read_cstring()?;
        cursor.read_u32_le()?; // score
        cursor.skip_f32()?; // duration
        players.push(PlayerEntry { name });
    }

    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_players(names: &[&str]) -> Vec<u8> {
        let mut body = vec![names.len() as u8];
        for (i, name) in names.iter().enumerate() {
            body.push(i as u8);
            body.extend_from_slice(name.as_bytes());
            body.push(0);
            body.extend_from_slice(&(100 + i as u32).to_le_bytes());
            body.extend_from_slice(&321.5f32.to_le_bytes());
        }
        body
    }

    #[test]
    fn names_in_wire_order_without_score_or_duration() {
        let players = parse_players(&encode_players(&["scout", "pyro", "medic"])).unwrap();
        let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["scout", "pyro", "medic"]);
    }

    #[test]
    fn empty_roster() {
        assert!(parse_players(&[0]).unwrap().is_empty());
    }

    #[test]
    fn truncated_mid_name_on_last_record() {
        let mut body = encode_players(&["scout", "pyro", "medic"]);
        // cut inside the last name, before its terminator
        body.truncate(body.len() - 11);
        let err = parse_players(&body).unwrap_err();
        assert!(matches!(err, SourceQueryError::TruncatedData));
    }

    #[test]
    fn count_larger_than_records_is_truncated_data() {
        let mut body = encode_players(&["scout"]);
        body[0] = 4;
        let err = parse_players(&body).unwrap_err();
        assert!(matches!(err, SourceQueryError::TruncatedData));
    }
}
